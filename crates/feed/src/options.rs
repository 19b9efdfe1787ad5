// ABOUTME: Configuration for PodcastParser, with a fluent builder.
// ABOUTME: Controls how referenced outline documents are parsed and how deep they may nest.

use crate::parser::PodcastParser;
use crate::retrieve::DocumentRetriever;

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Parse episodes of feeds referenced from an outline. Off by default so
    /// that probing a large subscription list stays cheap.
    pub verbose_outline_children: bool,
    /// How many outline documents may reference each other before further
    /// references are skipped. The top-level document is depth 0.
    pub max_document_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            verbose_outline_children: false,
            max_document_depth: 4,
        }
    }
}

/// Builder for [`PodcastParser`].
#[derive(Debug, Clone, Default)]
pub struct PodcastParserBuilder {
    opts: ParserOptions,
}

impl PodcastParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options at once.
    pub fn options(mut self, opts: ParserOptions) -> Self {
        self.opts = opts;
        self
    }

    pub fn verbose_outline_children(mut self, verbose: bool) -> Self {
        self.opts.verbose_outline_children = verbose;
        self
    }

    pub fn max_document_depth(mut self, depth: usize) -> Self {
        self.opts.max_document_depth = depth;
        self
    }

    /// Build a parser that fetches referenced documents through `retriever`.
    pub fn build<R: DocumentRetriever>(self, retriever: R) -> PodcastParser<R> {
        PodcastParser::with_options(retriever, self.opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieve::NoRetrieval;

    #[test]
    fn builder_overrides_defaults() {
        let parser = PodcastParserBuilder::new()
            .max_document_depth(1)
            .verbose_outline_children(true)
            .build(NoRetrieval);
        assert_eq!(
            parser.options(),
            &ParserOptions {
                verbose_outline_children: true,
                max_document_depth: 1,
            }
        );
    }

    #[test]
    fn defaults_probe_outline_children_cheaply() {
        let opts = ParserOptions::default();
        assert!(!opts.verbose_outline_children);
        assert_eq!(opts.max_document_depth, 4);
    }
}
