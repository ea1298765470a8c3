//! Document Inspection Abstraction
//!
//! Selector synthesis only ever reads the document. Everything it needs is
//! behind this trait:
//! - [`HtmlDocument`](crate::html::HtmlDocument): a parsed HTML page
//! - Tests: small mock documents

use grabber_common::SelectorError;
use std::fmt::Debug;

/// Read-only view of a live document tree.
pub trait Dom {
    /// Opaque element reference. Never retained past a single call.
    type Node: Copy + Eq + Debug;

    fn is_element(&self, node: Self::Node) -> bool;

    /// Lower-cased tag name, `None` for non-element nodes.
    fn tag_name(&self, node: Self::Node) -> Option<String>;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    /// All attributes in DOM order.
    fn attributes(&self, node: Self::Node) -> Vec<(String, String)>;

    fn parent_element(&self, node: Self::Node) -> Option<Self::Node>;

    fn previous_element_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// The document body, where upward path construction stops.
    fn body(&self) -> Option<Self::Node>;

    /// Count elements in the whole document matching `selector`.
    ///
    /// Returns `Err(SelectorError::Malformed)` when the selector cannot be parsed.
    fn match_count(&self, selector: &str) -> Result<usize, SelectorError>;
}
