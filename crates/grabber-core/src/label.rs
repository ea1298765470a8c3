use crate::dom::Dom;

/// Short tooltip text for a hovered element: `tag`, then `#id` when an id is
/// present, then `.class` for the first class token.
///
/// Unlike [`simple_selector`](crate::candidate::simple_selector) the id is
/// shown as-is, even when it could not be used in a selector.
pub fn hover_label<D: Dom>(dom: &D, node: D::Node) -> String {
    let Some(tag) = dom.tag_name(node) else {
        return String::new();
    };

    let mut label = tag;
    if let Some(id) = dom.attribute(node, "id")
        && !id.is_empty()
    {
        label.push('#');
        label.push_str(&id);
    }
    if let Some(class) = dom.attribute(node, "class")
        && let Some(first) = class.split_whitespace().next()
    {
        label.push('.');
        label.push_str(first);
    }
    label
}
