//! Data types for the subset of X events the window manager responds to.
use crate::{core::bindings::KeyCode, Xid};

/// A higher level translation of the raw X event types handled by minwm.
///
/// Every backend is responsible for converting its native event structs
/// into this form before handing them to the dispatch loop. Events minwm
/// has no interest in are dropped inside the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XEvent {
    /// A client window is asking to be displayed.
    ///
    /// The second field is the window's override-redirect flag: windows
    /// that set it (menus, tooltips) are shown but never managed.
    MapRequest(Xid, bool),

    /// A client window is no longer visible.
    ///
    /// The second field is true for synthetic events sent by another
    /// client rather than generated by the server.
    Unmap(Xid, bool),

    /// A client window has been destroyed.
    Destroy(Xid),

    /// Input focus has moved to the given window.
    FocusIn(Xid),

    /// A grabbed key combination was pressed.
    KeyPress(KeyCode),
}
