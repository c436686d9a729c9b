use parley_core::ParticipantId;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

/// Asynchronous notifications from a negotiation transport back to the engine.
#[derive(Debug)]
pub enum TransportEvent<S> {
    /// A local ICE candidate to trickle to the peer.
    CandidateGenerated {
        peer_id: ParticipantId,
        generation: u64,
        candidate: Value,
    },
    /// Remote media arrived.
    StreamReceived {
        peer_id: ParticipantId,
        generation: u64,
        stream: S,
    },
    /// The connection failed after negotiation started.
    Failed {
        peer_id: ParticipantId,
        generation: u64,
        reason: String,
    },
}

impl<S> TransportEvent<S> {
    pub fn peer_id(&self) -> &ParticipantId {
        match self {
            TransportEvent::CandidateGenerated { peer_id, .. }
            | TransportEvent::StreamReceived { peer_id, .. }
            | TransportEvent::Failed { peer_id, .. } => peer_id,
        }
    }

    pub fn generation(&self) -> u64 {
        match self {
            TransportEvent::CandidateGenerated { generation, .. }
            | TransportEvent::StreamReceived { generation, .. }
            | TransportEvent::Failed { generation, .. } => *generation,
        }
    }
}

/// Handed to each transport on creation; stamps events with the session they
/// belong to so the engine can discard events from a replaced session.
pub struct TransportEvents<S> {
    peer_id: ParticipantId,
    generation: u64,
    tx: mpsc::UnboundedSender<TransportEvent<S>>,
}

impl<S> Clone for TransportEvents<S> {
    fn clone(&self) -> Self {
        Self {
            peer_id: self.peer_id.clone(),
            generation: self.generation,
            tx: self.tx.clone(),
        }
    }
}

impl<S> TransportEvents<S> {
    pub fn new(
        peer_id: ParticipantId,
        generation: u64,
        tx: mpsc::UnboundedSender<TransportEvent<S>>,
    ) -> Self {
        Self {
            peer_id,
            generation,
            tx,
        }
    }

    pub fn peer_id(&self) -> &ParticipantId {
        &self.peer_id
    }

    pub fn candidate(&self, candidate: Value) {
        self.emit(TransportEvent::CandidateGenerated {
            peer_id: self.peer_id.clone(),
            generation: self.generation,
            candidate,
        });
    }

    pub fn stream(&self, stream: S) {
        self.emit(TransportEvent::StreamReceived {
            peer_id: self.peer_id.clone(),
            generation: self.generation,
            stream,
        });
    }

    pub fn failed(&self, reason: impl Into<String>) {
        self.emit(TransportEvent::Failed {
            peer_id: self.peer_id.clone(),
            generation: self.generation,
            reason: reason.into(),
        });
    }

    fn emit(&self, event: TransportEvent<S>) {
        if self.tx.send(event).is_err() {
            debug!("Engine gone; dropping transport event for {}", self.peer_id);
        }
    }
}
