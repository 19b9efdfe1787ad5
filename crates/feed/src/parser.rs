// ABOUTME: The parsing pipeline: classify a document once, then run the matching parser.
// ABOUTME: Outline leaves are fetched through a DocumentRetriever and fed back into the pipeline.

use tracing::{debug, warn};

use crate::atom::parse_atom;
use crate::cancel::CancellationToken;
use crate::classify::FeedFormat;
use crate::error::FeedError;
use crate::models::{Feed, FeedList};
use crate::opml::{traverse_outline, OutlineLeaf};
use crate::options::ParserOptions;
use crate::retrieve::DocumentRetriever;
use crate::rss::parse_rss;
use crate::xml_tree::Document;

/// Content types worth attempting to parse.
pub const SUPPORTED_MIME_TYPES: &[&str] = &[
    "application/rss+xml",
    "application/xml",
    "text/x-opml",
    "text/xml",
    "application/atom+xml",
];

/// Returns true if a response with `content_type` is worth parsing.
///
/// An empty content type is accepted optimistically. Parameters such as
/// `; charset=utf-8` are tolerated.
pub fn supports_content_type(content_type: &str) -> bool {
    let content_type = content_type.trim();
    if content_type.is_empty() {
        return true;
    }
    let lower = content_type.to_ascii_lowercase();
    SUPPORTED_MIME_TYPES.iter().any(|mime| lower.contains(mime))
}

/// Parses a single RSS or Atom document, including its episodes.
///
/// # Arguments
/// * `data` - Raw document bytes
/// * `feed_url` - The URL the document was fetched from
///
/// # Returns
/// * `Ok(Feed)` - The parsed feed
/// * `Err(FeedError)` - Malformed XML, an outline document, or an unknown schema
pub fn parse_feed_bytes(data: &[u8], feed_url: &str) -> Result<Feed, FeedError> {
    let doc = Document::parse(data)?;
    match FeedFormat::of(&doc) {
        FeedFormat::Rss => parse_rss(&doc, feed_url, true),
        FeedFormat::Atom => parse_atom(&doc, feed_url, true),
        FeedFormat::Outline => Err(FeedError::invalid(
            "outline documents reference other feeds; use PodcastParser::load",
        )),
        FeedFormat::Unrecognized => Err(FeedError::invalid("unrecognized document root")),
    }
}

/// Turns documents of any supported schema into a [`FeedList`].
#[derive(Debug, Clone)]
pub struct PodcastParser<R> {
    retriever: R,
    opts: ParserOptions,
}

impl<R: DocumentRetriever> PodcastParser<R> {
    /// Create a parser with default options.
    pub fn new(retriever: R) -> Self {
        Self::with_options(retriever, ParserOptions::default())
    }

    pub fn with_options(retriever: R, opts: ParserOptions) -> Self {
        Self { retriever, opts }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.opts
    }

    pub fn retriever(&self) -> &R {
        &self.retriever
    }

    /// Parses `data`, fetched from `url`, into zero or more feeds.
    ///
    /// RSS and Atom documents produce one feed; episodes are included only
    /// when `verbose` is set. Outline documents produce one feed per
    /// referenced document that parses, in pre-order.
    ///
    /// Malformed or unrecognized input is not an error: it yields an empty
    /// list. The only error is [`FeedError::Cancelled`], returned when
    /// `cancel` fires during an outline traversal. Feeds gathered before the
    /// cancellation are dropped.
    pub fn load(
        &self,
        data: &[u8],
        url: &str,
        verbose: bool,
        cancel: &CancellationToken,
    ) -> Result<FeedList, FeedError> {
        self.load_at_depth(data, url, verbose, cancel, 0)
    }

    fn load_at_depth(
        &self,
        data: &[u8],
        url: &str,
        verbose: bool,
        cancel: &CancellationToken,
        depth: usize,
    ) -> Result<FeedList, FeedError> {
        let doc = match Document::parse(data) {
            Ok(doc) => doc,
            Err(err) => {
                debug!(url, error = %err, "document is not well-formed XML");
                return Ok(FeedList::new());
            }
        };

        let format = FeedFormat::of(&doc);
        debug!(url, ?format, depth, "classified document");

        let result = match format {
            FeedFormat::Rss => parse_rss(&doc, url, verbose).map(|feed| vec![feed]),
            FeedFormat::Atom => parse_atom(&doc, url, verbose).map(|feed| vec![feed]),
            FeedFormat::Outline if depth > self.opts.max_document_depth => {
                warn!(url, depth, "outline documents nested too deeply, skipping");
                Ok(FeedList::new())
            }
            FeedFormat::Outline => {
                traverse_outline(&doc, cancel, |leaf| self.resolve_leaf(leaf, cancel, depth))
            }
            FeedFormat::Unrecognized => Ok(FeedList::new()),
        };

        match result {
            Err(FeedError::Cancelled) => Err(FeedError::Cancelled),
            Err(err) => {
                debug!(url, error = %err, "document produced no feeds");
                Ok(FeedList::new())
            }
            ok => ok,
        }
    }

    /// Fetches and parses every URL a leaf references.
    ///
    /// Retrieval failures and empty bodies mean "no feed" for that URL.
    fn resolve_leaf(
        &self,
        leaf: &OutlineLeaf<'_>,
        cancel: &CancellationToken,
        depth: usize,
    ) -> Result<FeedList, FeedError> {
        let mut feeds = FeedList::new();
        for url in leaf.candidate_urls() {
            if cancel.is_cancelled() {
                return Err(FeedError::Cancelled);
            }
            debug!(url, "will process feed url");
            let data = match self.retriever.retrieve(url) {
                Ok(data) if !data.is_empty() => data,
                Ok(_) => {
                    debug!(url, "retrieved an empty document");
                    continue;
                }
                Err(err) => {
                    warn!(url, error = %err, "failed to retrieve outline reference");
                    continue;
                }
            };
            let verbose = self.opts.verbose_outline_children;
            feeds.extend(self.load_at_depth(&data, url, verbose, cancel, depth + 1)?);
        }
        Ok(feeds)
    }
}
