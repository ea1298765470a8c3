use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Outcome of selector synthesis for one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorDescriptor {
    pub selector: String,
    /// Set when the simple selector was not unique and a path (or the
    /// non-unique simple selector itself) had to be returned instead.
    pub ambiguous_fallback: bool,
}

impl SelectorDescriptor {
    pub fn unique(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            ambiguous_fallback: false,
        }
    }

    pub fn fallback(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            ambiguous_fallback: true,
        }
    }
}

/// Attribute name/value pairs captured at pick time, in DOM order.
///
/// Serialized as a JSON object whose key order follows the element's
/// attribute order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSnapshot {
    entries: Vec<(String, String)>,
}

impl AttributeSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut snapshot = Self::new();
        for (name, value) in pairs {
            snapshot.insert(name, value);
        }
        snapshot
    }

    /// Insert an attribute. A repeated name overwrites the earlier value but
    /// keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AttributeSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AttributeSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = AttributeSnapshot;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of attribute names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut snapshot = AttributeSnapshot::new();
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    snapshot.insert(name, value);
                }
                Ok(snapshot)
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}

/// Everything the presentation layer receives when an element is picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickResult {
    pub selector: String,
    pub ambiguous_fallback: bool,
    pub tag_name: String,
    pub attributes: AttributeSnapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Edges are inclusive.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && y >= self.y && x <= self.x + self.width && y <= self.y + self.height
    }
}

/// Tooltip data shown while the pointer moves over a candidate element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverInfo {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<Rect>,
}

/// One positioned box of a layout file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub selector: String,
    pub rect: Rect,
}

// ---------------------------------------------------------------------------
// Native messaging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub html: String,
    pub target: String,
    #[serde(default)]
    pub index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickRequest {
    pub html: String,
    #[serde(default)]
    pub layout: Vec<LayoutEntry>,
    pub x: f32,
    pub y: f32,
}

/// Requests accepted by the native-messaging host.
#[derive(Debug, Clone)]
pub enum HostRequest {
    Resolve(ResolveRequest),
    Pick(PickRequest),
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid request: {0}")]
    Invalid(#[from] serde_json::Error),
}

impl HostRequest {
    /// Decode a request by its `action` field. The action is trimmed and
    /// lower-cased before matching.
    pub fn from_value(value: serde_json::Value) -> Result<Self, RequestError> {
        let action = value
            .get("action")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .trim()
            .to_lowercase();

        match action.as_str() {
            "resolve" => Ok(HostRequest::Resolve(serde_json::from_value(value)?)),
            "pick" => Ok(HostRequest::Pick(serde_json::from_value(value)?)),
            _ => Err(RequestError::UnknownAction(action)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<PickResult>,
}

impl HostResponse {
    pub fn ok(result: PickResult) -> Self {
        Self {
            success: true,
            message: None,
            result: Some(result),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            result: None,
        }
    }
}
