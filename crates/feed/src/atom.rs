// ABOUTME: Atom feed parsing for podcasts published as Atom documents.
// ABOUTME: Episodes take their media URL from the first audio link of each entry.

use crate::duration_parse::parse_duration;
use crate::error::FeedError;
use crate::fields::{attribute_or_default, canonical_url, find_text, text_or_default};
use crate::models::{Episode, Feed};
use crate::time_parse::{parse_iso8601_time, published_or_now};
use crate::xml_tree::{Document, Element};

/// Parses an Atom `feed` document into a [`Feed`].
///
/// The root element must be literally `feed`. `source_url` becomes the
/// canonical URL when the feed has no `id`; if both are empty the document is
/// `Invalid`. Entries are only parsed when `verbose` is set.
pub fn parse_atom(doc: &Document, source_url: &str, verbose: bool) -> Result<Feed, FeedError> {
    let root = doc
        .root()
        .filter(|root| root.name() == "feed")
        .ok_or_else(|| FeedError::invalid("not an Atom feed: root is not <feed>"))?;

    let mut feed = Feed {
        title: text_or_default(&root, &["title"], "title"),
        link: attribute_or_default(&root, &["link"], "href", "link"),
        url: canonical_url(find_text(&root, &["id"]), source_url)?,
        description: text_or_default(&root, &["subtitle"], "description"),
        copyright: text_or_default(&root, &["rights"], "copyright"),
        image_url_large: text_or_default(&root, &["logo", "icon"], "image"),
        owner_email: text_or_default(&root, &["author/email"], "owner email"),
        ..Default::default()
    };
    feed.owner_name = find_text(&root, &["author/name"]).unwrap_or_else(|| feed.title.clone());

    if verbose {
        for entry in root.child_elements("entry") {
            let episode = parse_entry(&entry, &feed.owner_name);
            feed.add_episode(episode);
        }
    }

    Ok(feed)
}

fn parse_entry(entry: &Element<'_>, owner_name: &str) -> Episode {
    let date = find_text(entry, &["published", "updated"]);
    Episode {
        title: text_or_default(entry, &["title"], "entry title"),
        description: text_or_default(entry, &["summary", "content"], "entry description"),
        published: published_or_now(date.as_deref(), parse_iso8601_time),
        author: find_text(entry, &["author/name"]).unwrap_or_else(|| owner_name.to_string()),
        url: audio_link(entry).unwrap_or_default(),
        duration_secs: find_text(entry, &["itunes:duration"])
            .map(|d| parse_duration(&d))
            .unwrap_or(0),
    }
}

/// The `href` of the first `link` whose `type` mentions `audio/`.
fn audio_link(entry: &Element<'_>) -> Option<String> {
    entry
        .child_elements("link")
        .find(|link| link.attribute("type").is_some_and(|t| t.contains("audio/")))
        .and_then(|link| link.attribute("href"))
        .map(|href| href.trim().to_string())
}
