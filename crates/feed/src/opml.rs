// ABOUTME: Explicit-stack traversal of OPML outline trees with cooperative cancellation.
// ABOUTME: Containers are descended, leaves are handed to a resolver that produces feeds.

use tracing::debug;

use crate::cancel::CancellationToken;
use crate::error::FeedError;
use crate::models::FeedList;
use crate::xml_tree::{Document, Element};

const OUTLINE: &str = "outline";

/// A transient view of one `<outline>` element.
#[derive(Debug, Clone, Copy)]
pub enum OutlineNode<'a> {
    /// No `type` attribute: a folder whose children are visited.
    Container(Element<'a>),
    /// Has a `type` attribute: a reference to at most one feed.
    Leaf(OutlineLeaf<'a>),
}

impl<'a> OutlineNode<'a> {
    pub fn from_element(element: Element<'a>) -> Self {
        match element.attribute("type") {
            None => OutlineNode::Container(element),
            Some(kind) => OutlineNode::Leaf(OutlineLeaf {
                kind,
                text: element.attribute("text").or_else(|| element.attribute("title")),
                url: non_empty(element.attribute("url")),
                xml_url: non_empty(element.attribute("xmlUrl")),
            }),
        }
    }
}

/// The feed reference carried by a leaf outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineLeaf<'a> {
    pub kind: &'a str,
    pub text: Option<&'a str>,
    pub url: Option<&'a str>,
    pub xml_url: Option<&'a str>,
}

impl<'a> OutlineLeaf<'a> {
    /// URLs to resolve, in order: `url`, then `xmlUrl` unless it repeats `url`.
    pub fn candidate_urls(&self) -> Vec<&'a str> {
        let mut urls: Vec<&'a str> = self.url.into_iter().collect();
        if let Some(xml_url) = self.xml_url {
            if self.url != Some(xml_url) {
                urls.push(xml_url);
            }
        }
        urls
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Walks `<opml><body>` in pre-order and collects the feeds `resolve` returns
/// for each leaf.
///
/// Uses a heap stack of containers whose following siblings are still
/// pending, so arbitrarily deep outlines cannot overflow the call stack.
/// `cancel` is checked once per visited node; a cancelled walk returns
/// [`FeedError::Cancelled`] and discards what it collected. Errors from
/// `resolve` other than cancellation do not occur in practice because
/// resolvers swallow per-leaf failures, but any error is propagated as is.
pub fn traverse_outline<F>(
    doc: &Document,
    cancel: &CancellationToken,
    mut resolve: F,
) -> Result<FeedList, FeedError>
where
    F: FnMut(&OutlineLeaf<'_>) -> Result<FeedList, FeedError>,
{
    let body = doc
        .root()
        .and_then(|root| root.first_child_element("body"))
        .ok_or_else(|| FeedError::invalid("not an OPML document: missing body"))?;

    let mut feeds = FeedList::new();
    let mut pending: Vec<Element<'_>> = Vec::new();
    let mut current = body.first_child_element(OUTLINE);

    loop {
        if cancel.is_cancelled() {
            debug!(collected = feeds.len(), "outline traversal cancelled");
            return Err(FeedError::Cancelled);
        }

        let Some(element) = current else {
            // Advancing: resume after the innermost open container.
            match pending.pop() {
                Some(container) => {
                    current = container.next_sibling_element(OUTLINE);
                    continue;
                }
                None => break,
            }
        };

        match OutlineNode::from_element(element) {
            OutlineNode::Container(container) => {
                // Descending
                pending.push(container);
                current = container.first_child_element(OUTLINE);
            }
            OutlineNode::Leaf(leaf) => {
                // Resolving
                debug!(kind = leaf.kind, text = leaf.text, "resolving outline leaf");
                feeds.extend(resolve(&leaf)?);
                current = element.next_sibling_element(OUTLINE);
            }
        }
    }

    Ok(feeds)
}
