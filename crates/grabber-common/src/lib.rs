pub mod error;
pub mod protocol;

pub use error::SelectorError;
pub use protocol::{AttributeSnapshot, HoverInfo, PickResult, Rect, SelectorDescriptor};
