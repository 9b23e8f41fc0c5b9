//! Converting x11rb event structs into minwm [XEvent]s.
use crate::{
    core::bindings::KeyCode,
    x::XEvent,
    x11rb::{xconn::X11rbConnection, Result},
    Xid,
};

use tracing::warn;

use x11rb::{
    connection::Connection,
    protocol::{
        xproto::{ConnectionExt as _, ModMask},
        Event,
    },
};

// The send_event flag lives in the top bit of an event's raw response type.
const SENT_EVENT_MASK: u8 = 0x80;

/// Convert an event into the minwm representation, or `None` for event
/// types the window manager has no interest in.
pub(crate) fn convert_event<C: Connection>(
    conn: &X11rbConnection<C>,
    event: Event,
) -> Result<Option<XEvent>> {
    match event {
        Event::MapRequest(event) => {
            // The window can be gone again by the time we ask after it: a
            // failed reply here just means there is nothing left to manage.
            let attrs = match conn.connection().get_window_attributes(event.window)?.reply() {
                Ok(attrs) => attrs,
                Err(_) => return Ok(None),
            };

            Ok(Some(XEvent::MapRequest(
                Xid(event.window),
                attrs.override_redirect,
            )))
        }

        Event::UnmapNotify(event) => Ok(Some(XEvent::Unmap(
            Xid(event.window),
            event.response_type & SENT_EVENT_MASK != 0,
        ))),

        Event::DestroyNotify(event) => Ok(Some(XEvent::Destroy(Xid(event.window)))),

        Event::FocusIn(event) => Ok(Some(XEvent::FocusIn(Xid(event.event)))),

        Event::KeyPress(event) => {
            let code = KeyCode {
                mask: u16::from(event.state),
                code: event.detail,
            };
            let numlock = u16::from(ModMask::M2);

            Ok(Some(XEvent::KeyPress(code.ignoring_modifier(numlock))))
        }

        // Errors here are the asynchronous kind generated by requests whose
        // replies we never check: operating on a window that is already
        // gone is expected behaviour for a window manager, so they are
        // logged and dropped rather than allowed to kill the event loop.
        Event::Error(err) => {
            warn!(?err, "dropping asynchronous X11 error");
            Ok(None)
        }

        // NOTE: Ignoring other event types
        _ => Ok(None),
    }
}
