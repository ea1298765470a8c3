pub mod candidate;
pub mod config;
pub mod dom;
pub mod html;
pub mod label;
pub mod layout;
pub mod resolution;
pub mod session;
pub mod snapshot;

pub use dom::Dom;
pub use grabber_common::protocol;
pub use hit_test::{ExcludeSet, HitTest, LayoutSnapshot};
pub use html::{DocumentError, HtmlDocument, NodeId};
pub use resolution::{pick, resolve};
pub use session::{PickerEvent, PickerHost, PickerOutput, PickerSession, SessionHandle, Toggle};
pub use snapshot::snapshot;
