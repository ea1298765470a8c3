//! Uniqueness Resolution
//!
//! Turns a target element into the shortest selector that matches only it:
//!
//! 1. Try the simple selector. At most one match means done.
//! 2. Otherwise walk from the element towards `<body>`, prepending one
//!    `tag:nth-of-type(n)` segment per level, and stop at the first path
//!    that matches exactly one element.
//! 3. If the walk runs out, hand back the simple selector, flagged.
//!
//! The walk never backtracks, so the first unique path found is the answer.

use crate::candidate::{path_segment, simple_selector};
use crate::dom::Dom;
use crate::snapshot::snapshot;
use grabber_common::protocol::{PickResult, SelectorDescriptor};
use tracing::{debug, warn};

pub const PATH_SEPARATOR: &str = " > ";

/// Number of elements `selector` matches. Malformed selectors count as zero.
pub fn count_matches<D: Dom>(dom: &D, selector: &str) -> usize {
    match dom.match_count(selector) {
        Ok(count) => {
            debug!("Selector '{}' matches {} element(s)", selector, count);
            count
        }
        Err(e) => {
            warn!("Treating selector as unmatched: {}", e);
            0
        }
    }
}

/// Synthesize a selector for `node`.
pub fn resolve<D: Dom>(dom: &D, node: D::Node) -> SelectorDescriptor {
    if !dom.is_element(node) {
        return SelectorDescriptor::unique(String::new());
    }

    let simple = simple_selector(dom, node);
    if count_matches(dom, &simple) <= 1 {
        return SelectorDescriptor::unique(simple);
    }

    let body = dom.body();
    let mut path: Vec<String> = Vec::new();
    let mut current = Some(node);

    while let Some(element) = current {
        if Some(element) == body {
            break;
        }

        path.insert(0, path_segment(dom, element));
        let candidate = path.join(PATH_SEPARATOR);
        if count_matches(dom, &candidate) == 1 {
            return SelectorDescriptor::fallback(candidate);
        }

        current = dom.parent_element(element);
    }

    debug!(
        "No unique path for '{}', returning it as an ambiguous fallback",
        simple
    );
    SelectorDescriptor::fallback(simple)
}

/// Resolve `node` and collect what the presentation layer shows for it.
pub fn pick<D: Dom>(dom: &D, node: D::Node) -> PickResult {
    let descriptor = resolve(dom, node);
    PickResult {
        selector: descriptor.selector,
        ambiguous_fallback: descriptor.ambiguous_fallback,
        tag_name: dom.tag_name(node).unwrap_or_default(),
        attributes: snapshot(dom, node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grabber_common::SelectorError;
    use std::collections::HashMap;

    /// Hand-built document with scripted match counts.
    struct MockDom {
        tags: Vec<&'static str>,
        parents: Vec<Option<usize>>,
        ids: HashMap<usize, &'static str>,
        body: Option<usize>,
        counts: HashMap<String, usize>,
    }

    impl MockDom {
        /// 0 = html, 1 = body, 2 = div, 3..=4 = two spans under the div.
        fn new() -> Self {
            Self {
                tags: vec!["html", "body", "div", "span", "span"],
                parents: vec![None, Some(0), Some(1), Some(2), Some(2)],
                ids: HashMap::new(),
                body: Some(1),
                counts: HashMap::new(),
            }
        }

        fn count(mut self, selector: &str, n: usize) -> Self {
            self.counts.insert(selector.to_string(), n);
            self
        }
    }

    impl Dom for MockDom {
        type Node = usize;

        fn is_element(&self, node: usize) -> bool {
            node < self.tags.len()
        }

        fn tag_name(&self, node: usize) -> Option<String> {
            self.tags.get(node).map(|t| t.to_string())
        }

        fn attribute(&self, node: usize, name: &str) -> Option<String> {
            match name {
                "id" => self.ids.get(&node).map(|s| s.to_string()),
                _ => None,
            }
        }

        fn attributes(&self, node: usize) -> Vec<(String, String)> {
            self.ids
                .get(&node)
                .map(|id| vec![("id".to_string(), id.to_string())])
                .unwrap_or_default()
        }

        fn parent_element(&self, node: usize) -> Option<usize> {
            self.parents.get(node).copied().flatten()
        }

        fn previous_element_sibling(&self, node: usize) -> Option<usize> {
            let parent = self.parent_element(node)?;
            (0..node).rev().find(|&n| self.parents[n] == Some(parent))
        }

        fn body(&self) -> Option<usize> {
            self.body
        }

        fn match_count(&self, selector: &str) -> Result<usize, SelectorError> {
            if selector.contains('#') {
                return Err(SelectorError::malformed(selector, "scripted failure"));
            }
            Ok(self.counts.get(selector).copied().unwrap_or(0))
        }
    }

    #[test]
    fn test_malformed_simple_selector_counts_as_zero() {
        let mut dom = MockDom::new();
        dom.ids.insert(3, "item");
        // "span#item" errors, which is zero matches, which is "unique enough".
        let result = resolve(&dom, 3);
        assert_eq!(result, SelectorDescriptor::unique("span#item"));
    }

    #[test]
    fn test_walk_stops_at_first_unique_path() {
        let dom = MockDom::new()
            .count("span", 2)
            .count("span:nth-of-type(2)", 3)
            .count("div:nth-of-type(1) > span:nth-of-type(2)", 1);
        let result = resolve(&dom, 4);
        assert_eq!(
            result,
            SelectorDescriptor::fallback("div:nth-of-type(1) > span:nth-of-type(2)")
        );
    }

    #[test]
    fn test_exhausted_walk_returns_simple_selector() {
        // Nothing below body ever becomes unique.
        let dom = MockDom::new()
            .count("span", 2)
            .count("span:nth-of-type(1)", 2)
            .count("div:nth-of-type(1) > span:nth-of-type(1)", 2);
        let result = resolve(&dom, 3);
        assert_eq!(result, SelectorDescriptor::fallback("span"));
    }

    #[test]
    fn test_detached_element_walks_to_its_root() {
        let mut dom = MockDom::new().count("span", 2);
        dom.parents[2] = None;
        dom.body = Some(1);
        let result = resolve(&dom, 3);
        assert!(result.ambiguous_fallback);
        assert_eq!(result.selector, "span");
    }

    #[test]
    fn test_body_target_is_never_walked() {
        let dom = MockDom::new().count("body", 2);
        assert_eq!(resolve(&dom, 1), SelectorDescriptor::fallback("body"));
    }

    #[test]
    fn test_non_element_resolves_to_empty() {
        let dom = MockDom::new();
        assert_eq!(resolve(&dom, 99), SelectorDescriptor::unique(""));
    }

    #[test]
    fn test_pick_collects_tag_and_attributes() {
        let mut dom = MockDom::new().count("div", 1);
        dom.ids.insert(2, "1x");
        let result = pick(&dom, 2);
        assert_eq!(result.selector, "div");
        assert!(!result.ambiguous_fallback);
        assert_eq!(result.tag_name, "div");
        assert_eq!(result.attributes.get("id"), Some("1x"));
    }
}
