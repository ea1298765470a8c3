use thiserror::Error;

/// Errors produced while counting the elements a selector matches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The selector string is not valid CSS selector syntax.
    #[error("Invalid selector '{selector}': {reason}")]
    Malformed { selector: String, reason: String },
}

impl SelectorError {
    pub fn malformed(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            selector: selector.into(),
            reason: reason.into(),
        }
    }
}
