//! Logic for interacting with the X server
use crate::{
    core::bindings::{KeyBinding, KeyBindings},
    pure::geometry::Rect,
    Color, Result, Xid,
};

pub mod event;
#[cfg(test)]
pub mod mock;

pub use event::XEvent;

/// The window attributes minwm cares about when deciding whether an
/// existing window should be managed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WindowAttributes {
    /// Whether the window has opted out of window manager control.
    pub override_redirect: bool,
    /// Whether the window is currently mapped and viewable.
    pub viewable: bool,
}

/// A handle on a running X11 connection that we can use for issuing X
/// requests.
///
/// XConn abstracts the window manager's narrow contract with the display
/// server so that the dispatch loop can be driven (and tested) without a
/// live connection. Implementations are expected to be synchronous: each
/// method completes its protocol interaction before returning.
pub trait XConn {
    /// The ID of the window manager root window.
    fn root(&self) -> Xid;

    /// The pixel dimensions of the screen being managed.
    fn screen_size(&self) -> Result<Rect>;

    /// Register for the notifications a window manager needs from the root
    /// window.
    ///
    /// This is the point at which we claim window manager duties for the
    /// display: it fails with [X11rbError::OtherWmRunning][crate::x11rb::X11rbError]
    /// if another window manager already holds them.
    fn select_root_events(&self) -> Result<()>;

    /// Register for structure, focus and property notifications from the
    /// given client window.
    fn select_client_events(&self, client: Xid) -> Result<()>;

    /// The windows currently known to the server, in server order, along
    /// with the attributes needed to decide whether to manage them.
    fn existing_clients(&self) -> Result<Vec<(Xid, WindowAttributes)>>;

    /// Resolve each binding's keysym against the server's keyboard mapping,
    /// grab the resulting key codes and return the resolved binding table.
    fn grab_keys(&self, bindings: &[KeyBinding]) -> Result<KeyBindings>;

    /// Block and wait for the next event from the X server so it can be
    /// processed.
    fn next_event(&self) -> Result<XEvent>;

    /// Flush any pending requests to the X server.
    fn flush(&self);

    /// Apply a computed geometry to a client window: move and resize it,
    /// assert the window manager's border width and make sure the window
    /// is mapped. Applying the same geometry twice is idempotent.
    fn position_client(&self, client: Xid, r: Rect, border: u32) -> Result<()>;

    /// Map the given client window to the screen, making it visible.
    fn map(&self, client: Xid) -> Result<()>;

    /// Update the border color of the given client window.
    fn set_client_border_color(&self, client: Xid, color: Color) -> Result<()>;

    /// Set X input focus to be held by the given window.
    ///
    /// Passing the root window releases focus to the background, ensuring
    /// no stale client keeps receiving keyboard input.
    fn focus(&self, client: Xid) -> Result<()>;

    /// Ask the client's application to close the window gracefully.
    fn send_close_request(&self, client: Xid) -> Result<()>;

    /// Forcibly terminate the client's connection to the server.
    ///
    /// Only used for the explicit force-quit binding: the graceful
    /// [send_close_request][XConn::send_close_request] is always the
    /// default path.
    fn kill(&self, client: Xid) -> Result<()>;
}
