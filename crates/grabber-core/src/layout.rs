//! Layout files: element boxes keyed by selector.
//!
//! ```yaml
//! - selector: "main"
//!   rect: { x: 0, y: 0, width: 800, height: 600 }
//! - selector: "#submit"
//!   rect: { x: 20, y: 40, width: 120, height: 32 }
//! ```
//!
//! Entries are in paint order. JSON arrays work too.

use grabber_common::protocol::LayoutEntry;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Failed to read layout file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse layout file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub fn parse_layout(content: &str) -> Result<Vec<LayoutEntry>, LayoutError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_yaml::from_str(content)?)
}

pub async fn load_layout(path: &Path) -> Result<Vec<LayoutEntry>, LayoutError> {
    let content = tokio::fs::read_to_string(path).await?;
    parse_layout(&content)
}
