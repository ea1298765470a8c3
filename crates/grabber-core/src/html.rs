//! HTML-backed document.
//!
//! Parses a page with `scraper` and exposes it through [`Dom`]. Match counts
//! come from scraper's selector engine, which evaluates `:nth-of-type` and the
//! child combinator the same way browsers do.
//!
//! `<template>` contents are parsed into the tree but are not part of the
//! document, so selection and enumeration skip them like `querySelectorAll`.

use crate::dom::Dom;
use crate::hit_test::{ExcludeSet, LayoutSnapshot};
use grabber_common::SelectorError;
use grabber_common::protocol::LayoutEntry;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::warn;

pub use ego_tree::NodeId;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid target selector: {0}")]
    InvalidTarget(#[from] SelectorError),

    #[error("No element matches target: {0}")]
    NoMatch(String),

    #[error("Target '{target}' has {count} matches, index {index} is out of range")]
    IndexOutOfRange {
        target: String,
        index: usize,
        count: usize,
    },
}

pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// The `index`-th element (document order) matching `target`.
    pub fn select_nth(&self, target: &str, index: usize) -> Result<NodeId, DocumentError> {
        let selector = parse_selector(target)?;
        let matches: Vec<NodeId> = self.select(&selector).map(|e| e.id()).collect();
        if matches.is_empty() {
            return Err(DocumentError::NoMatch(target.to_string()));
        }
        matches
            .get(index)
            .copied()
            .ok_or(DocumentError::IndexOutOfRange {
                target: target.to_string(),
                index,
                count: matches.len(),
            })
    }

    /// All elements in document order, starting with `<html>`.
    pub fn elements(&self) -> Vec<NodeId> {
        self.document_elements().map(|e| e.id()).collect()
    }

    /// Every element whose `id` attribute equals `id`.
    pub fn elements_with_id(&self, id: &str) -> Vec<NodeId> {
        self.document_elements()
            .filter(|e| e.value().attr("id") == Some(id))
            .map(|e| e.id())
            .collect()
    }

    /// Exclusion set covering the elements carrying any of `ids`.
    pub fn overlay_nodes(&self, ids: &[String]) -> ExcludeSet<NodeId> {
        ids.iter()
            .flat_map(|id| self.elements_with_id(id))
            .collect()
    }

    /// Position layout boxes on this document. Each entry's selector is
    /// resolved to its first match; entries that fail to resolve are skipped.
    pub fn layout(&self, entries: &[LayoutEntry]) -> LayoutSnapshot<NodeId> {
        let mut layout = LayoutSnapshot::new();
        for entry in entries {
            match self.select_nth(&entry.selector, 0) {
                Ok(node) => layout.push(node, entry.rect),
                Err(e) => warn!("Skipping layout entry '{}': {}", entry.selector, e),
            }
        }
        layout
    }

    pub fn first_text_node(&self) -> Option<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .find(|n| n.value().is_text())
            .map(|n| n.id())
    }

    fn element(&self, node: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(node).and_then(ElementRef::wrap)
    }

    fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html.select(selector).filter(|e| !in_template(e))
    }

    fn document_elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|e| !in_template(e))
    }
}

fn in_template(element: &ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| a.value().name() == "template")
}

fn parse_selector(selector: &str) -> Result<Selector, SelectorError> {
    Selector::parse(selector).map_err(|e| SelectorError::malformed(selector, format!("{:?}", e)))
}

impl Dom for HtmlDocument {
    type Node = NodeId;

    fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.element(node)
            .map(|e| e.value().name().to_ascii_lowercase())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.element(node)
            .and_then(|e| e.value().attr(name).map(str::to_string))
    }

    fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        self.element(node)
            .map(|e| {
                e.value()
                    .attrs()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.html.tree.get(node)?.parent()?;
        ElementRef::wrap(parent).map(|e| e.id())
    }

    fn previous_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.html
            .tree
            .get(node)?
            .prev_siblings()
            .find_map(ElementRef::wrap)
            .map(|e| e.id())
    }

    fn body(&self) -> Option<NodeId> {
        self.html
            .root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .find(|e| e.value().name() == "body")
            .map(|e| e.id())
    }

    fn match_count(&self, selector: &str) -> Result<usize, SelectorError> {
        let parsed = parse_selector(selector)?;
        Ok(self.select(&parsed).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wraps_fragment_in_body() {
        let doc = HtmlDocument::parse("<div>x</div>");
        let div = doc.select_nth("div", 0).unwrap();
        let body = doc.body().unwrap();
        assert_eq!(doc.parent_element(div), Some(body));
        assert_eq!(doc.tag_name(body).as_deref(), Some("body"));
    }

    #[test]
    fn test_select_nth_errors() {
        let doc = HtmlDocument::parse("<p>a</p><p>b</p>");
        assert!(matches!(doc.select_nth("h1", 0), Err(DocumentError::NoMatch(_))));
        assert!(matches!(
            doc.select_nth("p", 2),
            Err(DocumentError::IndexOutOfRange { count: 2, .. })
        ));
        assert!(matches!(
            doc.select_nth("p[", 0),
            Err(DocumentError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_match_count_rejects_malformed() {
        let doc = HtmlDocument::parse("<p>a</p>");
        assert_eq!(doc.match_count("p").unwrap(), 1);
        assert!(matches!(
            doc.match_count("p:::"),
            Err(SelectorError::Malformed { .. })
        ));
        assert!(doc.match_count("").is_err());
    }

    #[test]
    fn test_previous_sibling_skips_text() {
        let doc = HtmlDocument::parse("<div><a>1</a> text <b>2</b></div>");
        let b = doc.select_nth("b", 0).unwrap();
        let a = doc.select_nth("a", 0).unwrap();
        assert_eq!(doc.previous_element_sibling(b), Some(a));
        assert_eq!(doc.previous_element_sibling(a), None);
    }

    #[test]
    fn test_attributes_in_source_order() {
        let doc = HtmlDocument::parse(r#"<input type="text" name="q" data-z="1" aria-label="Search">"#);
        let input = doc.select_nth("input", 0).unwrap();
        let names: Vec<String> = doc.attributes(input).into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["type", "name", "data-z", "aria-label"]);
    }

    #[test]
    fn test_template_content_is_not_in_document() {
        let doc = HtmlDocument::parse("<template><p>tpl</p></template><p>real</p>");
        assert_eq!(doc.match_count("p").unwrap(), 1);
        assert_eq!(doc.match_count("template").unwrap(), 1);

        assert!(matches!(
            doc.select_nth("p", 1),
            Err(DocumentError::IndexOutOfRange { count: 1, .. })
        ));
        let tags: Vec<String> = doc
            .elements()
            .into_iter()
            .filter_map(|n| doc.tag_name(n))
            .collect();
        assert_eq!(tags.iter().filter(|t| *t == "p").count(), 1);
    }

    #[test]
    fn test_overlay_nodes_by_id() {
        let doc = HtmlDocument::parse(r#"<div id="overlay"></div><div id="page"></div>"#);
        let set = doc.overlay_nodes(&["overlay".to_string(), "missing".to_string()]);
        assert_eq!(set.len(), 1);
        assert!(set.contains(doc.select_nth("#overlay", 0).unwrap()));
    }
}
