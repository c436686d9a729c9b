use parley_core::ParticipantId;
use serde_json::Value;
use tracing::debug;

use crate::error::SessionError;
use crate::session::{Role, SessionState};
use crate::transport::PeerTransport;

/// Upper bound on remote candidates held for one peer before they can be applied.
pub const MAX_PENDING_CANDIDATES: usize = 64;

/// Negotiation state for one remote participant. Only the engine task touches it.
pub struct PeerSession<S> {
    peer_id: ParticipantId,
    generation: u64,
    role: Role,
    state: SessionState,
    pending_candidates: Vec<Value>,
    transport: Box<dyn PeerTransport>,
    stream: Option<S>,
}

impl<S> PeerSession<S> {
    pub fn new(
        peer_id: ParticipantId,
        generation: u64,
        role: Role,
        transport: Box<dyn PeerTransport>,
    ) -> Self {
        Self {
            peer_id,
            generation,
            role,
            state: SessionState::Idle,
            pending_candidates: Vec::new(),
            transport,
            stream: None,
        }
    }

    pub fn peer_id(&self) -> &ParticipantId {
        &self.peer_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn stream(&self) -> Option<&S> {
        self.stream.as_ref()
    }

    pub fn transport(&self) -> &dyn PeerTransport {
        self.transport.as_ref()
    }

    pub fn transition(&mut self, next: SessionState) -> Result<(), SessionError> {
        if !self.state.can_transition_to(next) {
            return Err(SessionError::IllegalTransition {
                peer_id: self.peer_id.clone(),
                from: self.state,
                to: next,
            });
        }
        debug!("Session {}: {} -> {}", self.peer_id, self.state, next);
        self.state = next;
        Ok(())
    }

    /// Holds a remote candidate until the remote description is in place.
    /// Returns false when the buffer is full and the candidate was dropped.
    pub fn buffer_candidate(&mut self, candidate: Value) -> bool {
        if self.pending_candidates.len() >= MAX_PENDING_CANDIDATES {
            return false;
        }
        self.pending_candidates.push(candidate);
        true
    }

    pub fn pending_candidates(&self) -> &[Value] {
        &self.pending_candidates
    }

    pub fn take_pending_candidates(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.pending_candidates)
    }

    /// Associates remote media with this peer. Moves `answer-sent` to `connected`.
    pub fn attach_stream(&mut self, stream: S) {
        self.stream = Some(stream);
        if self.state == SessionState::AnswerSent {
            self.state = SessionState::Connected;
            debug!("Session {}: answer-sent -> connected", self.peer_id);
        }
    }

    /// Idempotent: closing a closed session does nothing.
    pub async fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        debug!("Session {}: {} -> closed", self.peer_id, self.state);
        self.state = SessionState::Closed;
        self.stream = None;
        self.pending_candidates.clear();
        self.transport.close().await;
    }
}
