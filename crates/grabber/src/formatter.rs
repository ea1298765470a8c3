use grabber_common::protocol::{HoverInfo, PickResult};

const AMBIGUITY_NOTE: &str =
    "Duplicate elements found - selector uses parent path for uniqueness.";

pub fn format_pick_result(result: &PickResult, preview_len: usize) -> String {
    let mut output = format!("Selector: {}\n", result.selector);
    if result.ambiguous_fallback {
        output.push_str(&format!("  ({})\n", AMBIGUITY_NOTE));
    }
    output.push_str(&format!("Tag: {}\n", result.tag_name));

    if result.attributes.is_empty() {
        output.push_str("Attributes: (none)");
        return output;
    }

    output.push_str("Attributes:");
    for (name, value) in result.attributes.iter() {
        output.push_str(&format!("\n  {} = {:?}", name, truncate_value(value, preview_len)));
    }
    output
}

pub fn format_hover(info: &HoverInfo) -> String {
    match &info.rect {
        Some(rect) => format!(
            "{} @ ({:.0},{:.0}) {:.0}x{:.0}",
            info.label, rect.x, rect.y, rect.width, rect.height
        ),
        None => info.label.clone(),
    }
}

/// Cut `value` to `max_chars` characters, marking the cut with `…`.
pub fn truncate_value(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut short: String = value.chars().take(max_chars).collect();
    short.push('…');
    short
}
