//! Side effect free management of internal window manager state
pub mod clients;
pub mod geometry;
pub mod layout;

#[doc(inline)]
pub use clients::{Client, ClientList};
#[doc(inline)]
pub use layout::{Layout, LayoutKind};
