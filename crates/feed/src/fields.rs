// ABOUTME: Tolerant field lookup over XML elements using ordered candidate paths.
// ABOUTME: A path is a child name ("title") or a parent/child pair ("itunes:owner/itunes:name").

use tracing::debug;

use crate::error::FeedError;
use crate::xml_tree::Element;

/// Resolves a path to the element it names, one or two levels below `element`.
fn resolve<'a>(element: &Element<'a>, path: &str) -> Option<Element<'a>> {
    match path.split_once('/') {
        Some((parent, child)) => element
            .first_child_element(parent)?
            .first_child_element(child),
        None => element.first_child_element(path),
    }
}

/// Returns the text of the first candidate path that exists and has text.
pub fn find_text(element: &Element<'_>, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .find_map(|path| resolve(element, path).and_then(|found| found.text()))
}

/// Returns `attribute` of the first candidate path that exists and carries it.
pub fn find_attribute(element: &Element<'_>, paths: &[&str], attribute: &str) -> Option<String> {
    paths.iter().find_map(|path| {
        resolve(element, path)
            .and_then(|found| found.attribute(attribute))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}

/// Picks a feed's canonical URL: the one the document declares, else `source_url`.
///
/// Fails when both are empty, so every parsed feed carries a URL.
pub(crate) fn canonical_url(declared: Option<String>, source_url: &str) -> Result<String, FeedError> {
    declared
        .or_else(|| {
            let source_url = source_url.trim();
            (!source_url.is_empty()).then(|| source_url.to_string())
        })
        .ok_or_else(|| FeedError::invalid("feed declares no URL and no source URL was given"))
}

/// Like [`find_text`], but logs the missing `field` and returns an empty string.
pub fn text_or_default(element: &Element<'_>, paths: &[&str], field: &str) -> String {
    find_text(element, paths).unwrap_or_else(|| {
        debug!(field, element = element.name(), ?paths, "setting field failed");
        String::new()
    })
}

/// Like [`find_attribute`], but logs the missing `field` and returns an empty string.
pub fn attribute_or_default(
    element: &Element<'_>,
    paths: &[&str],
    attribute: &str,
    field: &str,
) -> String {
    find_attribute(element, paths, attribute).unwrap_or_else(|| {
        debug!(field, element = element.name(), ?paths, attribute, "setting field failed");
        String::new()
    })
}
