//! An [XConn] implementation using x11rb to communicate with the X server.
use crate::{
    core::bindings::{KeyBinding, KeyBindings, KeyCode},
    pure::geometry::Rect,
    x::{WindowAttributes, XConn, XEvent},
    x11rb::{event::convert_event, Result as X11Result, X11rbError},
    Color, Result, Xid,
};

use std::collections::HashMap;

use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter};
use tracing::warn;

use x11rb::{
    connection::Connection,
    protocol::{
        xproto::{
            ChangeWindowAttributesAux, ClientMessageEvent, ConfigureWindowAux,
            ConnectionExt as _, EventMask, GrabMode, InputFocus, MapState, ModMask,
            Window,
        },
        ErrorKind,
    },
    rust_connection::RustConnection,
    CURRENT_TIME,
};

/// The atoms interned when a connection is first established so that
/// protocol messages can be built without extra round trips.
#[derive(AsRefStr, EnumIter, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Atom {
    #[strum(serialize = "WM_PROTOCOLS")]
    WmProtocols,
    #[strum(serialize = "WM_DELETE_WINDOW")]
    WmDeleteWindow,
}

/// A minwm [XConn] backed by an [x11rb] connection.
#[derive(Debug)]
pub struct X11rbConnection<C: Connection> {
    conn: C,
    root: Window,
    screen: Rect,
    atoms: HashMap<Atom, u32>,
}

impl X11rbConnection<RustConnection> {
    /// Connect to the X server using the `$DISPLAY` environment variable.
    pub fn new() -> Result<Self> {
        let (conn, _) = RustConnection::connect(None).map_err(X11rbError::from)?;

        Self::new_for_connection(conn)
    }
}

impl<C: Connection> X11rbConnection<C> {
    /// Wrap an existing [Connection], interning the atoms minwm needs.
    pub fn new_for_connection(conn: C) -> Result<Self> {
        let screen = &conn.setup().roots[0];
        let root = screen.root;
        let r = Rect::new(
            0,
            0,
            screen.width_in_pixels as u32,
            screen.height_in_pixels as u32,
        );

        // Send all of the intern requests first so that we only pay for a
        // single round trip to the server.
        let cookies = Atom::iter()
            .map(|atom| Ok((atom, conn.intern_atom(false, atom.as_ref().as_bytes())?)))
            .collect::<X11Result<Vec<_>>>()?;
        let atoms = cookies
            .into_iter()
            .map(|(atom, cookie)| Ok((atom, cookie.reply()?.atom)))
            .collect::<X11Result<HashMap<_, _>>>()?;

        Ok(Self {
            conn,
            root,
            screen: r,
            atoms,
        })
    }

    pub(crate) fn connection(&self) -> &C {
        &self.conn
    }

    fn known_atom(&self, atom: Atom) -> u32 {
        self.atoms[&atom]
    }

    /// Map each keysym to the first keycode producing it in the server's
    /// current keyboard mapping.
    fn keysym_to_keycode(&self) -> X11Result<HashMap<u32, u8>> {
        let setup = self.conn.setup();
        let (min, max) = (setup.min_keycode, setup.max_keycode);
        let reply = self
            .conn
            .get_keyboard_mapping(min, max - min + 1)?
            .reply()?;

        let mut codes = HashMap::new();
        for (i, chunk) in reply
            .keysyms
            .chunks(reply.keysyms_per_keycode as usize)
            .enumerate()
        {
            match chunk.first() {
                Some(&sym) if sym != 0 => {
                    codes.entry(sym).or_insert(min + i as u8);
                }
                _ => (),
            }
        }

        Ok(codes)
    }
}

impl<C: Connection> XConn for X11rbConnection<C> {
    fn root(&self) -> Xid {
        Xid(self.root)
    }

    fn screen_size(&self) -> Result<Rect> {
        Ok(self.screen)
    }

    fn select_root_events(&self) -> Result<()> {
        let mask = EventMask::SUBSTRUCTURE_REDIRECT
            | EventMask::SUBSTRUCTURE_NOTIFY
            | EventMask::KEY_PRESS;
        let aux = ChangeWindowAttributesAux::new().event_mask(mask);

        let cookie = self
            .conn
            .change_window_attributes(self.root, &aux)
            .map_err(X11rbError::from)?;

        // Only one client may hold substructure redirect on the root at a
        // time: a BadAccess here means a window manager is already running.
        if let Err(e) = cookie.check() {
            let err = match e {
                x11rb::errors::ReplyError::X11Error(ref x11_err)
                    if x11_err.error_kind == ErrorKind::Access =>
                {
                    X11rbError::OtherWmRunning
                }
                other => X11rbError::from(other),
            };

            return Err(err.into());
        }

        Ok(())
    }

    fn select_client_events(&self, client: Xid) -> Result<()> {
        let mask =
            EventMask::STRUCTURE_NOTIFY | EventMask::FOCUS_CHANGE | EventMask::PROPERTY_CHANGE;
        let aux = ChangeWindowAttributesAux::new().event_mask(mask);
        self.conn
            .change_window_attributes(*client, &aux)
            .map_err(X11rbError::from)?;

        Ok(())
    }

    fn existing_clients(&self) -> Result<Vec<(Xid, WindowAttributes)>> {
        let tree = self
            .conn
            .query_tree(self.root)
            .map_err(X11rbError::from)?
            .reply()
            .map_err(X11rbError::from)?;

        let mut clients = Vec::with_capacity(tree.children.len());
        for &id in tree.children.iter() {
            // Windows can vanish between the query and the attribute fetch:
            // skip rather than fail.
            let attrs = match self.conn.get_window_attributes(id) {
                Ok(cookie) => match cookie.reply() {
                    Ok(attrs) => attrs,
                    Err(_) => continue,
                },
                Err(_) => continue,
            };

            clients.push((
                Xid(id),
                WindowAttributes {
                    override_redirect: attrs.override_redirect,
                    viewable: attrs.map_state == MapState::VIEWABLE,
                },
            ));
        }

        Ok(clients)
    }

    fn grab_keys(&self, bindings: &[KeyBinding]) -> Result<KeyBindings> {
        let codes = self.keysym_to_keycode()?;
        let mut resolved = HashMap::with_capacity(bindings.len());

        for b in bindings.iter() {
            let code = *codes
                .get(&b.keysym)
                .ok_or(X11rbError::UnknownKeysym(b.keysym))?;

            // Grab with and without num lock held so bindings fire
            // regardless of its state; the num lock bit is stripped again
            // on the way back in when key press events are converted.
            for extra in [0, u16::from(ModMask::M2)] {
                self.conn
                    .grab_key(
                        false,
                        self.root,
                        ModMask::from(b.modifiers | extra),
                        code,
                        GrabMode::ASYNC,
                        GrabMode::ASYNC,
                    )
                    .map_err(X11rbError::from)?;
            }

            resolved.insert(
                KeyCode {
                    mask: b.modifiers,
                    code,
                },
                b.action,
            );
        }

        Ok(resolved)
    }

    fn next_event(&self) -> Result<XEvent> {
        loop {
            let event = self.conn.wait_for_event().map_err(X11rbError::from)?;
            if let Some(converted) = convert_event(self, event)? {
                return Ok(converted);
            }
        }
    }

    fn flush(&self) {
        if self.conn.flush().is_err() {
            warn!("unable to flush pending requests to the X server");
        }
    }

    fn position_client(&self, client: Xid, r: Rect, border: u32) -> Result<()> {
        let aux = ConfigureWindowAux::new()
            .x(r.x as i32)
            .y(r.y as i32)
            .width(r.w)
            .height(r.h)
            .border_width(border);

        self.conn
            .configure_window(*client, &aux)
            .map_err(X11rbError::from)?;
        self.conn.map_window(*client).map_err(X11rbError::from)?;

        Ok(())
    }

    fn map(&self, client: Xid) -> Result<()> {
        self.conn.map_window(*client).map_err(X11rbError::from)?;

        Ok(())
    }

    fn set_client_border_color(&self, client: Xid, color: Color) -> Result<()> {
        let aux = ChangeWindowAttributesAux::new().border_pixel(color.rgb_u32());
        self.conn
            .change_window_attributes(*client, &aux)
            .map_err(X11rbError::from)?;

        Ok(())
    }

    fn focus(&self, client: Xid) -> Result<()> {
        self.conn
            .set_input_focus(InputFocus::PARENT, *client, CURRENT_TIME)
            .map_err(X11rbError::from)?;

        Ok(())
    }

    fn send_close_request(&self, client: Xid) -> Result<()> {
        let msg = ClientMessageEvent::new(
            32,
            *client,
            self.known_atom(Atom::WmProtocols),
            [self.known_atom(Atom::WmDeleteWindow), CURRENT_TIME, 0, 0, 0],
        );

        self.conn
            .send_event(false, *client, EventMask::NO_EVENT, msg)
            .map_err(X11rbError::from)?;

        Ok(())
    }

    fn kill(&self, client: Xid) -> Result<()> {
        self.conn.kill_client(*client).map_err(X11rbError::from)?;

        Ok(())
    }
}
