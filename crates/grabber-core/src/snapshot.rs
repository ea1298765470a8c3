use crate::dom::Dom;
use grabber_common::AttributeSnapshot;

/// Every attribute of `node` in DOM order. Non-element nodes give an empty
/// snapshot.
pub fn snapshot<D: Dom>(dom: &D, node: D::Node) -> AttributeSnapshot {
    if !dom.is_element(node) {
        return AttributeSnapshot::new();
    }
    AttributeSnapshot::from_pairs(dom.attributes(node))
}
