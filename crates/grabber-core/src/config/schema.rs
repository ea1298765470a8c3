use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrabberConfig {
    #[serde(default)]
    pub picker: PickerConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Ids of the picker's own overlay elements; never returned by hit tests.
    #[serde(default = "default_overlay_ids")]
    pub overlay_ids: Vec<String>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            overlay_ids: default_overlay_ids(),
        }
    }
}

fn default_overlay_ids() -> Vec<String> {
    vec![
        "selector-grabber-overlay".to_string(),
        "selector-grabber-highlight".to_string(),
        "selector-grabber-tooltip".to_string(),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationConfig {
    #[serde(default = "default_attribute_preview_len")]
    pub attribute_preview_len: usize,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            attribute_preview_len: default_attribute_preview_len(),
        }
    }
}

fn default_attribute_preview_len() -> usize {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "info".to_string()
}
