// ABOUTME: Arena-backed XML element tree built from quick-xml events.
// ABOUTME: Gives the feed parsers first-child/next-sibling navigation without recursion.

use std::borrow::Cow;

use ego_tree::{NodeId, NodeRef, Tree};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::reader::Reader;

use crate::charset::decode_document;
use crate::error::FeedError;

/// A node stored in the document arena.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// Synthetic parent of the top-level elements.
    Document,
    Element {
        name: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

/// A parsed XML document.
///
/// Built with an explicit stack of open elements, so nesting depth is bounded
/// only by heap memory.
#[derive(Debug, Clone)]
pub struct Document {
    tree: Tree<XmlNode>,
}

impl Document {
    /// Parses raw bytes into a document tree.
    ///
    /// Returns `FeedError::Parse` for ill-formed markup or when there is no
    /// root element. Content after the first top-level element is kept but
    /// ignored by [`Document::root`].
    pub fn parse(data: &[u8]) -> Result<Self, FeedError> {
        let text = decode_document(data);
        let mut reader = Reader::from_reader(text.as_bytes());
        reader.config_mut().check_end_names = true;

        let mut tree = Tree::new(XmlNode::Document);
        let document_id = tree.root().id();
        let mut open: Vec<NodeId> = Vec::new();
        let mut buf = Vec::new();

        loop {
            let parent_id = open.last().copied().unwrap_or(document_id);
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let id = append(&mut tree, parent_id, element_node(e, &reader))?;
                    open.push(id);
                }
                Ok(Event::Empty(ref e)) => {
                    append(&mut tree, parent_id, element_node(e, &reader))?;
                }
                Ok(Event::End(_)) => {
                    if open.pop().is_none() {
                        return Err(FeedError::parse("closing tag without matching opening tag"));
                    }
                }
                Ok(Event::Text(ref e)) if !open.is_empty() => {
                    let text = e.decode().map_err(FeedError::parse)?;
                    if !text.is_empty() {
                        append(&mut tree, parent_id, XmlNode::Text(text.into_owned()))?;
                    }
                }
                Ok(Event::CData(ref e)) if !open.is_empty() => {
                    let text = e.decode().map_err(FeedError::parse)?;
                    append(&mut tree, parent_id, XmlNode::Text(text.into_owned()))?;
                }
                Ok(Event::GeneralRef(ref e)) if !open.is_empty() => {
                    let text = resolve_reference(e)?;
                    append(&mut tree, parent_id, XmlNode::Text(text.into_owned()))?;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(FeedError::parse(e)),
                _ => {}
            }
            buf.clear();
        }

        if !open.is_empty() {
            return Err(FeedError::parse("unexpected end of document: unclosed element"));
        }

        let document = Document { tree };
        if document.root().is_none() {
            return Err(FeedError::parse("no root element"));
        }
        Ok(document)
    }

    /// Returns the first top-level element.
    pub fn root(&self) -> Option<Element<'_>> {
        self.tree.root().children().find_map(Element::from_node)
    }
}

fn append(tree: &mut Tree<XmlNode>, parent: NodeId, value: XmlNode) -> Result<NodeId, FeedError> {
    let mut parent = tree
        .get_mut(parent)
        .ok_or_else(|| FeedError::parse("dangling parent node"))?;
    Ok(parent.append(value).id())
}

fn element_node(e: &BytesStart, reader: &Reader<&[u8]>) -> XmlNode {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let attributes = e
        .attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            // Undeclared entities in attribute values are kept verbatim.
            let value = attr
                .decode_and_unescape_value(reader.decoder())
                .map(Cow::into_owned)
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            (key, value)
        })
        .collect();
    XmlNode::Element { name, attributes }
}

/// Resolves `&amp;`-style and numeric references; unknown entities are kept as written.
fn resolve_reference(e: &BytesRef) -> Result<Cow<'static, str>, FeedError> {
    if let Some(ch) = e.resolve_char_ref().map_err(FeedError::parse)? {
        return Ok(Cow::Owned(ch.to_string()));
    }
    let name = e.decode().map_err(FeedError::parse)?;
    match resolve_predefined_entity(&name) {
        Some(resolved) => Ok(Cow::Borrowed(resolved)),
        None => Ok(Cow::Owned(format!("&{};", name))),
    }
}

/// A borrowed view of one element in a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    node: NodeRef<'a, XmlNode>,
    name: &'a str,
    attributes: &'a [(String, String)],
}

impl<'a> Element<'a> {
    fn from_node(node: NodeRef<'a, XmlNode>) -> Option<Self> {
        match node.value() {
            XmlNode::Element { name, attributes } => Some(Element {
                node,
                name,
                attributes,
            }),
            _ => None,
        }
    }

    /// The qualified name as written, e.g. `itunes:author`.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The name without its namespace prefix.
    pub fn local_name(&self) -> &'a str {
        self.name.rsplit(':').next().unwrap_or(self.name)
    }

    /// Concatenated direct text and CDATA content, trimmed.
    /// Returns None when the element has no non-whitespace text.
    pub fn text(&self) -> Option<String> {
        let text: String = self
            .node
            .children()
            .filter_map(|child| match child.value() {
                XmlNode::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn first_child_element(&self, name: &str) -> Option<Element<'a>> {
        self.child_elements(name).next()
    }

    /// The next sibling element called `name`, skipping text and other elements.
    pub fn next_sibling_element(&self, name: &str) -> Option<Element<'a>> {
        self.node
            .next_siblings()
            .filter_map(Element::from_node)
            .find(|e| e.name == name)
    }

    /// All direct child elements called `name`, in document order.
    pub fn child_elements<'n>(&self, name: &'n str) -> impl Iterator<Item = Element<'a>> + 'n
    where
        'a: 'n,
    {
        self.node
            .children()
            .filter_map(Element::from_node)
            .filter(move |e| e.name == name)
    }
}
