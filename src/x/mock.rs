//! A mock implementation of XConn that is easier to implement for
//! use in tests.
//! This module and its contents are only available when testing.
use crate::{
    core::bindings::{KeyBinding, KeyBindings},
    pure::geometry::Rect,
    x::{event::XEvent, WindowAttributes, XConn},
    Color, Result, Xid,
};

/// All methods on this trait are unimplemented by default unless an
/// implementation is provided. The `mock_root` method always returns id 0
/// and `mock_flush` by default is a no-op.
///
/// Any implementation of `MockXConn` will automatically implement `XConn`
/// by forwarding on calls to `$method` to `mock_$method`.
#[allow(unused_variables)]
pub trait MockXConn {
    fn mock_root(&self) -> Xid {
        Xid(0)
    }

    fn mock_screen_size(&self) -> Result<Rect> {
        unimplemented!("mock_screen_size")
    }

    fn mock_select_root_events(&self) -> Result<()> {
        unimplemented!("mock_select_root_events")
    }

    fn mock_select_client_events(&self, client: Xid) -> Result<()> {
        unimplemented!("mock_select_client_events")
    }

    fn mock_existing_clients(&self) -> Result<Vec<(Xid, WindowAttributes)>> {
        unimplemented!("mock_existing_clients")
    }

    fn mock_grab_keys(&self, bindings: &[KeyBinding]) -> Result<KeyBindings> {
        unimplemented!("mock_grab_keys")
    }

    fn mock_next_event(&self) -> Result<XEvent> {
        unimplemented!("mock_next_event")
    }

    fn mock_flush(&self) {}

    fn mock_position_client(&self, client: Xid, r: Rect, border: u32) -> Result<()> {
        unimplemented!("mock_position_client")
    }

    fn mock_map(&self, client: Xid) -> Result<()> {
        unimplemented!("mock_map")
    }

    fn mock_set_client_border_color(&self, client: Xid, color: Color) -> Result<()> {
        unimplemented!("mock_set_client_border_color")
    }

    fn mock_focus(&self, client: Xid) -> Result<()> {
        unimplemented!("mock_focus")
    }

    fn mock_send_close_request(&self, client: Xid) -> Result<()> {
        unimplemented!("mock_send_close_request")
    }

    fn mock_kill(&self, client: Xid) -> Result<()> {
        unimplemented!("mock_kill")
    }
}

impl<T> XConn for T
where
    T: MockXConn,
{
    fn root(&self) -> Xid {
        self.mock_root()
    }

    fn screen_size(&self) -> Result<Rect> {
        self.mock_screen_size()
    }

    fn select_root_events(&self) -> Result<()> {
        self.mock_select_root_events()
    }

    fn select_client_events(&self, client: Xid) -> Result<()> {
        self.mock_select_client_events(client)
    }

    fn existing_clients(&self) -> Result<Vec<(Xid, WindowAttributes)>> {
        self.mock_existing_clients()
    }

    fn grab_keys(&self, bindings: &[KeyBinding]) -> Result<KeyBindings> {
        self.mock_grab_keys(bindings)
    }

    fn next_event(&self) -> Result<XEvent> {
        self.mock_next_event()
    }

    fn flush(&self) {
        self.mock_flush()
    }

    fn position_client(&self, client: Xid, r: Rect, border: u32) -> Result<()> {
        self.mock_position_client(client, r, border)
    }

    fn map(&self, client: Xid) -> Result<()> {
        self.mock_map(client)
    }

    fn set_client_border_color(&self, client: Xid, color: Color) -> Result<()> {
        self.mock_set_client_border_color(client, color)
    }

    fn focus(&self, client: Xid) -> Result<()> {
        self.mock_focus(client)
    }

    fn send_close_request(&self, client: Xid) -> Result<()> {
        self.mock_send_close_request(client)
    }

    fn kill(&self, client: Xid) -> Result<()> {
        self.mock_kill(client)
    }
}
