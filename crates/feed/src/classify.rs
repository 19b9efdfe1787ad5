// ABOUTME: Decides which schema a document uses: RSS, Atom, OPML outline, or none.
// ABOUTME: Also provides an advisory byte sniff for callers that want a cheap pre-filter.

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

use crate::xml_tree::Document;

/// The schema of a document, decided once from its root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Rss,
    Atom,
    Outline,
    Unrecognized,
}

impl FeedFormat {
    /// Classifies an already parsed document by its root element's local name.
    pub fn of(doc: &Document) -> Self {
        match doc.root().map(|root| root.local_name()) {
            Some("rss") => FeedFormat::Rss,
            Some("feed") => FeedFormat::Atom,
            Some("opml") => FeedFormat::Outline,
            _ => FeedFormat::Unrecognized,
        }
    }
}

/// Parses `data` and classifies it. Malformed XML is `Unrecognized`.
pub fn classify(data: &[u8]) -> FeedFormat {
    match Document::parse(data) {
        Ok(doc) => FeedFormat::of(&doc),
        Err(_) => FeedFormat::Unrecognized,
    }
}

static ROOT_TAGS: Lazy<Option<AhoCorasick>> =
    Lazy::new(|| AhoCorasick::new(["<rss", "<feed", "<opml"]).ok());

/// Advisory check that the raw bytes mention an `<rss`, `<feed` or `<opml` tag.
///
/// The tag name must end at a word boundary, so `<feedburner:info>` does not
/// count. A `true` result does not mean the document will parse.
pub fn looks_like_feed(data: &[u8]) -> bool {
    let Some(matcher) = ROOT_TAGS.as_ref() else {
        return false;
    };
    matcher.find_iter(data).any(|m| {
        data.get(m.end())
            .map_or(true, |&next| !(next.is_ascii_alphanumeric() || next == b'_'))
    })
}
