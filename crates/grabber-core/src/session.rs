//! Picking sessions.
//!
//! The host owns a [`PickerHost`], which is either idle or holds one active
//! [`PickerSession`]. Pointer and keyboard events are dispatched into the
//! session; resolution itself stays stateless.

use crate::dom::Dom;
use crate::hit_test::{ExcludeSet, HitTest};
use crate::label::hover_label;
use crate::resolution::pick;
use grabber_common::protocol::{HoverInfo, PickResult};
use tracing::{debug, info};

pub const CANCEL_KEY: &str = "Escape";

#[derive(Debug, Clone, PartialEq)]
pub enum PickerEvent {
    PointerMove { x: f32, y: f32 },
    Click { x: f32, y: f32 },
    Key(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PickerOutput {
    Hover(HoverInfo),
    Picked(PickResult),
    /// The session ended through the keyboard.
    Cancelled,
    /// No target under the pointer, an ignored key, or no active session.
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Started(SessionHandle),
    Stopped,
}

pub struct PickerSession<N> {
    handle: SessionHandle,
    exclude: ExcludeSet<N>,
    active: bool,
}

impl<N: Copy + Eq> PickerSession<N> {
    fn new(handle: SessionHandle, exclude: ExcludeSet<N>) -> Self {
        Self {
            handle,
            exclude,
            active: true,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn dispatch<D, H>(&mut self, dom: &D, hit_test: &H, event: PickerEvent) -> PickerOutput
    where
        D: Dom<Node = N>,
        H: HitTest<N>,
    {
        if !self.active {
            return PickerOutput::Nothing;
        }

        match event {
            PickerEvent::PointerMove { x, y } => {
                match hit_test.element_at(dom, x, y, &self.exclude) {
                    Some(node) => PickerOutput::Hover(HoverInfo {
                        label: hover_label(dom, node),
                        rect: hit_test.bounds(node),
                    }),
                    None => PickerOutput::Nothing,
                }
            }
            PickerEvent::Click { x, y } => match hit_test.element_at(dom, x, y, &self.exclude) {
                Some(node) => {
                    let result = pick(dom, node);
                    info!(
                        "Picked <{}> -> {} (ambiguous: {})",
                        result.tag_name, result.selector, result.ambiguous_fallback
                    );
                    PickerOutput::Picked(result)
                }
                None => {
                    debug!("No pickable element at ({}, {})", x, y);
                    PickerOutput::Nothing
                }
            },
            PickerEvent::Key(key) if key == CANCEL_KEY => {
                self.active = false;
                PickerOutput::Cancelled
            }
            PickerEvent::Key(_) => PickerOutput::Nothing,
        }
    }
}

/// Host-side picking state: idle, or exactly one active session.
pub struct PickerHost<N> {
    session: Option<PickerSession<N>>,
    next_handle: u64,
}

impl<N> Default for PickerHost<N> {
    fn default() -> Self {
        Self {
            session: None,
            next_handle: 1,
        }
    }
}

impl<N: Copy + Eq> PickerHost<N> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_active())
    }

    pub fn session(&self) -> Option<&PickerSession<N>> {
        self.session.as_ref()
    }

    /// Start a new session, replacing any existing one.
    pub fn start(&mut self, exclude: ExcludeSet<N>) -> SessionHandle {
        let handle = SessionHandle(self.next_handle);
        self.next_handle += 1;
        self.session = Some(PickerSession::new(handle, exclude));
        info!("Picking session {} started", handle.0);
        handle
    }

    /// Stop the session identified by `handle`. Returns `false` when that
    /// session is not the current one.
    pub fn stop(&mut self, handle: SessionHandle) -> bool {
        match &self.session {
            Some(session) if session.handle == handle => {
                self.session = None;
                info!("Picking session {} stopped", handle.0);
                true
            }
            _ => false,
        }
    }

    /// Start when idle, stop when active. `exclude` is only called on start.
    pub fn toggle<F>(&mut self, exclude: F) -> Toggle
    where
        F: FnOnce() -> ExcludeSet<N>,
    {
        if let Some(session) = self.session.take()
            && session.is_active()
        {
            info!("Picking session {} stopped", session.handle.0);
            return Toggle::Stopped;
        }
        Toggle::Started(self.start(exclude()))
    }

    pub fn dispatch<D, H>(&mut self, dom: &D, hit_test: &H, event: PickerEvent) -> PickerOutput
    where
        D: Dom<Node = N>,
        H: HitTest<N>,
    {
        let Some(session) = self.session.as_mut() else {
            return PickerOutput::Nothing;
        };

        let output = session.dispatch(dom, hit_test, event);
        if !session.is_active() {
            info!("Picking session {} cancelled", session.handle.0);
            self.session = None;
        }
        output
    }
}
