// ABOUTME: Error types for podcast document parsing and outline traversal.
// ABOUTME: Provides FeedError with Parse, Invalid, Fetch, and Cancelled variants.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while turning a document into feeds.
///
/// Only [`FeedError::Cancelled`] escapes [`crate::PodcastParser::load`]; the
/// other variants are structural and are reported as an empty feed list.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The bytes are not well-formed XML or contain no root element.
    #[error("failed to parse document: {0}")]
    Parse(String),

    /// The XML is well-formed but is not the schema it claims to be.
    #[error("invalid feed: {0}")]
    Invalid(String),

    /// The retriever could not produce a document for a referenced URL.
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// The outline traversal was cancelled by its caller.
    #[error("traversal cancelled")]
    Cancelled,
}

impl FeedError {
    /// Creates a Parse error from an underlying XML error.
    pub fn parse(err: impl fmt::Display) -> Self {
        FeedError::Parse(err.to_string())
    }

    /// Creates an Invalid error with a custom message.
    pub fn invalid(msg: impl Into<String>) -> Self {
        FeedError::Invalid(msg.into())
    }

    /// Creates a Fetch error for `url`.
    pub fn fetch(url: impl Into<String>, err: impl fmt::Display) -> Self {
        FeedError::Fetch {
            url: url.into(),
            message: err.to_string(),
        }
    }

    /// Returns true if this error is a cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FeedError::Cancelled)
    }
}
