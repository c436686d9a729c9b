use parley_core::{ConnectionId, ParticipantId};
use std::collections::HashMap;

/// Outcome of [`Registry::register`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Registration {
    /// Another connection that held the identifier and lost it.
    pub displaced: Option<ConnectionId>,
    /// Identifier this connection held before re-joining under a new name.
    pub renamed_from: Option<ParticipantId>,
}

/// Participant id <-> connection mapping. At most one entry per id and per
/// connection.
#[derive(Debug, Default)]
pub struct Registry {
    by_id: HashMap<ParticipantId, ConnectionId>,
    by_conn: HashMap<ConnectionId, ParticipantId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the entry for `id`.
    pub fn register(&mut self, id: ParticipantId, conn: ConnectionId) -> Registration {
        let mut registration = Registration::default();

        if let Some(previous) = self.by_conn.remove(&conn) {
            if previous != id {
                self.by_id.remove(&previous);
                registration.renamed_from = Some(previous);
            }
        }

        if let Some(holder) = self.by_id.insert(id.clone(), conn) {
            if holder != conn {
                self.by_conn.remove(&holder);
                registration.displaced = Some(holder);
            }
        }

        self.by_conn.insert(conn, id);
        registration
    }

    pub fn lookup(&self, id: &ParticipantId) -> Option<ConnectionId> {
        self.by_id.get(id).copied()
    }

    /// Frees whatever identifier `conn` owns. `None` if it never joined.
    pub fn remove(&mut self, conn: &ConnectionId) -> Option<ParticipantId> {
        let id = self.by_conn.remove(conn)?;
        self.by_id.remove(&id);
        Some(id)
    }

    pub fn participant_of(&self, conn: &ConnectionId) -> Option<&ParticipantId> {
        self.by_conn.get(conn)
    }

    pub fn participants(&self) -> Vec<ParticipantId> {
        self.by_id.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
