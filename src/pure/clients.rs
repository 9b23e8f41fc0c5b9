//! An ordered registry of the client windows currently under management.
//!
//! The registry is ordering sensitive: the client at the head of the list is
//! the "master" and every following client is part of the "stack", top to
//! bottom. Layouts only ever read this ordering; mutating operations on the
//! registry never talk to the X server themselves.
use crate::{pure::geometry::Rect, Xid};

/// A managed client window along with the geometry it was last assigned.
///
/// The geometry is only authoritative after a layout pass: clients are
/// created with a placeholder region that the next pass overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Client {
    id: Xid,
    region: Rect,
}

impl Client {
    fn new(id: Xid) -> Self {
        Self {
            id,
            region: Rect::default(),
        }
    }

    /// The X resource ID of this client window.
    pub fn id(&self) -> Xid {
        self.id
    }

    /// The screen region this client was assigned by the last layout pass.
    pub fn region(&self) -> Rect {
        self.region
    }
}

/// The ordered set of currently managed clients.
///
/// Invariant: ids are unique. All operations are idempotent when asked to
/// act on an id that is already in (or already absent from) the registry,
/// so callers racing against window lifetimes degrade to no-ops rather
/// than erroring.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ClientList {
    clients: Vec<Client>,
}

impl ClientList {
    /// Create a new empty [ClientList].
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of clients currently being managed.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Whether or not there are any clients being managed.
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// The current master client, if there is one.
    pub fn master(&self) -> Option<&Client> {
        self.clients.first()
    }

    /// The position of the given client in the current ordering.
    pub fn position_of(&self, id: Xid) -> Option<usize> {
        self.clients.iter().position(|c| c.id == id)
    }

    /// Whether or not the given client is currently being managed.
    pub fn contains(&self, id: Xid) -> bool {
        self.position_of(id).is_some()
    }

    /// Look up a managed client by id.
    pub fn get(&self, id: Xid) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Iterate over the managed clients in order, master first.
    pub fn iter(&self) -> impl Iterator<Item = &Client> {
        self.clients.iter()
    }

    /// Insert a new client as master, pushing all existing clients back into
    /// the stack.
    ///
    /// If the client is already present this is a no-op. In both cases the
    /// client's current position is returned.
    pub fn insert_as_master(&mut self, id: Xid) -> usize {
        match self.position_of(id) {
            Some(index) => index,
            None => {
                self.clients.insert(0, Client::new(id));
                0
            }
        }
    }

    /// Append a new client at the tail of the stack, leaving the existing
    /// ordering untouched.
    ///
    /// This is used when adopting windows that already exist on the server
    /// at startup, where the first reported window should become master.
    /// No-op if the client is already present.
    pub fn push(&mut self, id: Xid) {
        if !self.contains(id) {
            self.clients.push(Client::new(id));
        }
    }

    /// Remove the client with the given id if it is present.
    pub fn remove(&mut self, id: Xid) {
        self.clients.retain(|c| c.id != id);
    }

    /// Move the given client to the master position, preserving the relative
    /// order of all other clients.
    ///
    /// No-op if the client is absent or already master.
    pub fn promote_to_master(&mut self, id: Xid) {
        if let Some(index) = self.position_of(id) {
            if index > 0 {
                let c = self.clients.remove(index);
                self.clients.insert(0, c);
            }
        }
    }

    /// Move the current master to the tail of the stack, shifting every
    /// other client forward by one.
    ///
    /// No-op when fewer than two clients are being managed.
    pub fn rotate(&mut self) {
        if self.clients.len() > 1 {
            self.clients.rotate_left(1);
        }
    }

    pub(crate) fn set_region(&mut self, id: Xid, region: Rect) {
        if let Some(c) = self.clients.iter_mut().find(|c| c.id == id) {
            c.region = region;
        }
    }
}
