//! Candidate Generation
//!
//! Builds the two kinds of selector text the resolver evaluates:
//! - the simple selector: `tag#id`, or `tag` plus up to three class tokens
//! - path segments: `tag:nth-of-type(n)`, one per ancestor level

use crate::dom::Dom;
use regex::Regex;
use std::sync::LazyLock;

/// Class tokens considered from the class attribute, counted before filtering.
pub const MAX_CLASS_TOKENS: usize = 3;

static ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z][A-Za-z0-9_-]*$").unwrap());
static CLASS_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// An id is usable in a selector only if it starts with a letter and
/// continues with letters, digits, hyphens or underscores.
pub fn is_valid_id(id: &str) -> bool {
    ID_RE.is_match(id)
}

pub fn is_class_token(token: &str) -> bool {
    CLASS_TOKEN_RE.is_match(token)
}

/// Escape backslashes and double quotes for embedding an id in a selector.
pub fn escape_css_id(id: &str) -> String {
    id.replace('\\', "\\\\").replace('"', "\\\"")
}

/// `tag#id` when the id is valid, otherwise `tag.c1.c2.c3`.
///
/// Only the first [`MAX_CLASS_TOKENS`] tokens are looked at; tokens with
/// characters outside `[A-Za-z0-9_-]` are dropped, not replaced.
/// Returns an empty string for non-element nodes.
pub fn simple_selector<D: Dom>(dom: &D, node: D::Node) -> String {
    let Some(tag) = element_tag(dom, node) else {
        return String::new();
    };

    if let Some(id) = dom.attribute(node, "id")
        && is_valid_id(&id)
    {
        return format!("{}#{}", tag, escape_css_id(&id));
    }

    let mut selector = tag;
    if let Some(class) = dom.attribute(node, "class") {
        for token in class
            .split_whitespace()
            .take(MAX_CLASS_TOKENS)
            .filter(|t| is_class_token(t))
        {
            selector.push('.');
            selector.push_str(token);
        }
    }
    selector
}

/// `tag:nth-of-type(n)`, where `n` counts this element and its preceding
/// siblings with the same tag.
pub fn path_segment<D: Dom>(dom: &D, node: D::Node) -> String {
    let Some(tag) = element_tag(dom, node) else {
        return String::new();
    };

    let mut nth = 1;
    let mut sibling = dom.previous_element_sibling(node);
    while let Some(sib) = sibling {
        if dom.tag_name(sib).as_deref() == Some(tag.as_str()) {
            nth += 1;
        }
        sibling = dom.previous_element_sibling(sib);
    }

    format!("{}:nth-of-type({})", tag, nth)
}

fn element_tag<D: Dom>(dom: &D, node: D::Node) -> Option<String> {
    if !dom.is_element(node) {
        return None;
    }
    dom.tag_name(node)
}
