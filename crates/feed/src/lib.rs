// ABOUTME: Core podcast document parsing library for castparse.
// ABOUTME: Classifies RSS, Atom, and OPML documents and turns them into feeds and episodes.

pub mod atom;
pub mod cancel;
mod charset;
pub mod classify;
pub mod duration_parse;
pub mod error;
pub mod fields;
pub mod models;
pub mod opml;
pub mod options;
pub mod parser;
pub mod retrieve;
pub mod rss;
pub mod time_parse;
pub mod xml_tree;

pub use cancel::CancellationToken;
pub use classify::{classify, looks_like_feed, FeedFormat};
pub use duration_parse::parse_duration;
pub use error::FeedError;
pub use fields::{find_attribute, find_text};
pub use models::{Episode, Feed, FeedList};
pub use opml::{OutlineLeaf, OutlineNode};
pub use options::{ParserOptions, PodcastParserBuilder};
pub use parser::{parse_feed_bytes, supports_content_type, PodcastParser, SUPPORTED_MIME_TYPES};
pub use retrieve::{DocumentRetriever, NoRetrieval};
pub use time_parse::{parse_iso8601_time, parse_rfc822_time};

// ----------------------------------------------------------------------------
// URL utilities
// ----------------------------------------------------------------------------

use url::Url;

/// Podcast client pseudo-schemes and the scheme they stand for.
const PSEUDO_SCHEMES: &[(&str, &str)] = &[
    ("itpc://", "http://"),
    ("pcast://", "http://"),
    ("feed://", "http://"),
    ("itms://", "https://"),
];

/// Turns user-entered text into a fetchable feed URL.
///
/// Rewrites podcast pseudo-schemes such as `itpc://`, adds `http://` when no
/// scheme is given, and rejects anything that is not http(s) with a host.
pub fn normalize_feed_url(input: &str) -> Option<Url> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let lower = input.to_ascii_lowercase();
    let rewritten = PSEUDO_SCHEMES
        .iter()
        .find(|(pseudo, _)| lower.starts_with(pseudo))
        .map(|(pseudo, real)| format!("{}{}", real, &input[pseudo.len()..]))
        .unwrap_or_else(|| {
            if input.contains("://") {
                input.to_string()
            } else {
                format!("http://{}", input)
            }
        });

    let url = Url::parse(&rewritten).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Some(url),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_pseudo_schemes() {
        assert_eq!(
            normalize_feed_url("itpc://x.com/a").map(String::from),
            Some("http://x.com/a".to_string())
        );
        assert_eq!(
            normalize_feed_url("FEED://x.com/rss").map(String::from),
            Some("http://x.com/rss".to_string())
        );
        assert_eq!(
            normalize_feed_url("itms://podcasts.example.com/id1").map(String::from),
            Some("https://podcasts.example.com/id1".to_string())
        );
    }

    #[test]
    fn adds_missing_scheme() {
        assert_eq!(
            normalize_feed_url("  example.com/feed.xml ").map(String::from),
            Some("http://example.com/feed.xml".to_string())
        );
    }

    #[test]
    fn rejects_non_http() {
        assert!(normalize_feed_url("").is_none());
        assert!(normalize_feed_url("ftp://example.com/feed.xml").is_none());
        assert!(normalize_feed_url("file:///etc/passwd").is_none());
    }
}
