// ABOUTME: The document retrieval seam used when an outline references other feeds.
// ABOUTME: Implemented by the embedding application; closures work for tests.

use crate::error::FeedError;

/// Fetches the bytes of a referenced document.
///
/// A failure or an empty body only means the referencing outline entry
/// produces no feed; it never ends a traversal.
pub trait DocumentRetriever {
    fn retrieve(&self, url: &str) -> Result<Vec<u8>, FeedError>;
}

impl<F> DocumentRetriever for F
where
    F: Fn(&str) -> Result<Vec<u8>, FeedError>,
{
    fn retrieve(&self, url: &str) -> Result<Vec<u8>, FeedError> {
        self(url)
    }
}

/// A retriever for callers that parse single documents only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetrieval;

impl DocumentRetriever for NoRetrieval {
    fn retrieve(&self, url: &str) -> Result<Vec<u8>, FeedError> {
        Err(FeedError::fetch(url, "retrieval is disabled"))
    }
}
