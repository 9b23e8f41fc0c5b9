//! Helpers and utilities for using x11rb as a back end for minwm
use crate::core::{Config, WindowManager};

use x11rb::rust_connection::RustConnection;

pub(crate) mod event;
pub mod xconn;

#[doc(inline)]
pub use xconn::X11rbConnection;

/// Result type for fallible methods using x11rb
pub type Result<T> = std::result::Result<T, X11rbError>;

/// Construct a minwm [WindowManager] backed by the default [x11rb][crate::x11rb]
/// backend, connecting to the display named by `$DISPLAY`.
pub fn new_x11rb_backed_window_manager(
    config: Config,
) -> crate::Result<WindowManager<X11rbConnection<RustConnection>>> {
    let (inner_conn, _) = RustConnection::connect(None).map_err(X11rbError::from)?;
    let conn = X11rbConnection::new_for_connection(inner_conn)?;

    WindowManager::new(config, conn)
}

/// Enum to store the various ways that operations can fail inside of the
/// x11rb implementations of minwm traits.
#[derive(thiserror::Error, Debug)]
pub enum X11rbError {
    /// Unable to establish a connection to the X server
    #[error(transparent)]
    Connect(#[from] ::x11rb::errors::ConnectError),

    /// The X11 connection broke
    #[error(transparent)]
    Connection(#[from] ::x11rb::errors::ConnectionError),

    /// Could not get X11 request reply
    #[error(transparent)]
    ReplyError(#[from] ::x11rb::errors::ReplyError),

    /// Another window manager already holds substructure redirect on the
    /// root window
    #[error("unable to become the window manager: another window manager is already running")]
    OtherWmRunning,

    /// A keysym used by a key binding is not present in the server's
    /// keyboard mapping
    #[error("no keycode found for keysym {0:#x}")]
    UnknownKeysym(u32),
}
