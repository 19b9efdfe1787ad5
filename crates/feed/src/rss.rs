// ABOUTME: RSS 2.0 channel parsing with iTunes podcast extensions.
// ABOUTME: Maps channel metadata and item elements onto Feed and Episode.

use crate::duration_parse::parse_duration;
use crate::error::FeedError;
use crate::fields::{
    attribute_or_default, canonical_url, find_attribute, find_text, text_or_default,
};
use crate::models::{Episode, Feed};
use crate::time_parse::{parse_rfc822_time, published_or_now};
use crate::xml_tree::{Document, Element};

/// Parses the `channel` of an RSS document into a [`Feed`].
///
/// `source_url` becomes the canonical URL when the channel declares no
/// `itunes:new-feed-url`; if both are empty the document is `Invalid`. Items
/// are only parsed when `verbose` is set.
pub fn parse_rss(doc: &Document, source_url: &str, verbose: bool) -> Result<Feed, FeedError> {
    let channel = doc
        .root()
        .and_then(|root| root.first_child_element("channel"))
        .ok_or_else(|| FeedError::invalid("not an RSS feed: missing channel"))?;

    let mut feed = Feed {
        title: text_or_default(&channel, &["title"], "title"),
        link: text_or_default(&channel, &["link"], "link"),
        url: canonical_url(find_text(&channel, &["itunes:new-feed-url"]), source_url)?,
        description: text_or_default(&channel, &["description", "itunes:summary"], "description"),
        copyright: text_or_default(&channel, &["copyright"], "copyright"),
        image_url_large: find_text(&channel, &["image/url"])
            .or_else(|| find_attribute(&channel, &["itunes:image"], "href"))
            .unwrap_or_default(),
        owner_email: text_or_default(&channel, &["itunes:owner/itunes:email"], "owner email"),
        ..Default::default()
    };
    feed.owner_name = find_text(&channel, &["itunes:owner/itunes:name"])
        .or_else(|| find_text(&channel, &["itunes:author", "managingEditor"]))
        .unwrap_or_else(|| feed.title.clone());

    if verbose {
        for item in channel.child_elements("item") {
            let episode = parse_item(&item, &feed.owner_name);
            feed.add_episode(episode);
        }
    }

    Ok(feed)
}

fn parse_item(item: &Element<'_>, owner_name: &str) -> Episode {
    let date = find_text(item, &["pubDate"]);
    Episode {
        title: text_or_default(item, &["title"], "item title"),
        description: text_or_default(
            item,
            &["description", "itunes:summary", "content:encoded"],
            "item description",
        ),
        published: published_or_now(date.as_deref(), parse_rfc822_time),
        author: find_text(item, &["itunes:author", "author"])
            .unwrap_or_else(|| owner_name.to_string()),
        url: attribute_or_default(item, &["enclosure", "media:content"], "url", "item url"),
        duration_secs: find_text(item, &["itunes:duration"])
            .map(|d| parse_duration(&d))
            .unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str, verbose: bool) -> Result<Feed, FeedError> {
        let doc = Document::parse(xml.as_bytes()).unwrap();
        parse_rss(&doc, "https://example.com/fetched.xml", verbose)
    }

    #[test]
    fn missing_channel_is_invalid() {
        let err = parse("<rss version=\"2.0\"/>", true).unwrap_err();
        assert!(matches!(err, FeedError::Invalid(_)));
    }

    #[test]
    fn owner_name_falls_back_to_author_then_title() {
        let feed = parse(
            "<rss><channel><title>T</title><itunes:author>A</itunes:author></channel></rss>",
            false,
        )
        .unwrap();
        assert_eq!(feed.owner_name, "A");

        let feed = parse("<rss><channel><title>T</title></channel></rss>", false).unwrap();
        assert_eq!(feed.owner_name, "T");
    }

    #[test]
    fn non_verbose_skips_items() {
        let xml = r#"<rss><channel><title>T</title>
            <item><title>E</title><enclosure url="https://cdn.example.com/e.mp3"/></item>
        </channel></rss>"#;
        assert!(parse(xml, false).unwrap().episodes.is_empty());
        assert_eq!(parse(xml, true).unwrap().episodes.len(), 1);
    }

    #[test]
    fn item_author_defaults_to_owner() {
        let xml = r#"<rss><channel><title>T</title>
            <itunes:owner><itunes:name>Owner</itunes:name></itunes:owner>
            <item><enclosure url="https://cdn.example.com/1.mp3"/></item>
            <item><author>guest@example.com</author><enclosure url="https://cdn.example.com/2.mp3"/></item>
        </channel></rss>"#;
        let feed = parse(xml, true).unwrap();
        assert_eq!(feed.episodes[0].author, "Owner");
        assert_eq!(feed.episodes[1].author, "guest@example.com");
    }

    #[test]
    fn image_falls_back_to_itunes_image() {
        let xml = r#"<rss><channel><itunes:image href="https://example.com/art.jpg"/></channel></rss>"#;
        assert_eq!(parse(xml, false).unwrap().image_url_large, "https://example.com/art.jpg");
    }
}
