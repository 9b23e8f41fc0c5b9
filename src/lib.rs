//! minwm: a minimal tiling window manager for X11.
//!
//! minwm manages a single workspace: every top level window is tiled
//! according to the active layout policy (a uniform grid or a master/stack
//! split), focus follows a small set of grabbed key bindings and the X
//! server's own focus notifications, and nothing is persisted between runs.
//!
//! The crate is split into side effect free state ([pure]), the window
//! manager core and its key bindings ([core]), the X server contract
//! ([XConn][crate::x::XConn]) and the default x11rb backed implementation
//! of it ([x11rb]).
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms
)]

pub mod core;
pub mod pure;
pub mod util;
pub mod x;
pub mod x11rb;

pub use crate::core::{Config, WindowManager};
pub use crate::x11rb::new_x11rb_backed_window_manager;

/// A Result where the error type is a minwm [Error].
pub type Result<T> = std::result::Result<T, Error>;

/// The error type returned by the window manager core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error from the [x11rb][crate::x11rb] backend.
    #[error(transparent)]
    X11rb(#[from] crate::x11rb::X11rbError),

    /// Something went wrong at the std::io level (typically when spawning
    /// a subprocess).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// An X resource ID.
///
/// Xids are assigned by the X server and are unique among live resources.
/// minwm never creates Xids itself: they only ever enter the system through
/// events and queries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Xid(pub(crate) u32);

impl std::fmt::Display for Xid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Xid {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<Xid> for u32 {
    fn from(id: Xid) -> Self {
        id.0
    }
}

impl std::ops::Deref for Xid {
    type Target = u32;

    fn deref(&self) -> &u32 {
        &self.0
    }
}

/// A simple RGB color for window borders, stored as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    /// Create a new [Color] from a packed `0xRRGGBB` value.
    pub const fn new(rgb: u32) -> Self {
        Self(rgb)
    }

    /// The raw `0xRRGGBB` pixel value of this color.
    pub fn rgb_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Color {
    fn from(rgb: u32) -> Self {
        Self(rgb)
    }
}
