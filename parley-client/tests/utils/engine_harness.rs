use anyhow::{Context, Result, bail};
use parley_client::{CallEngine, EngineEvent, EngineHandle, SessionState};
use parley_core::{ParticipantId, SignalMessage};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use super::mock_signaling::{MockSignalingOutput, Outgoing};
use super::mock_transport::{MockBehavior, MockFactory, TransportLog};

/// Timeout for a single expected signal or event (ms).
pub const ENGINE_TIMEOUT_MS: u64 = 2000;

/// A running engine wired to mock signaling and mock transports.
pub struct EngineHarness {
    pub local_id: ParticipantId,
    pub handle: EngineHandle,
    pub log: TransportLog,
    pub signaling: MockSignalingOutput,
    inbound: mpsc::Sender<SignalMessage>,
    outgoing: mpsc::UnboundedReceiver<Outgoing>,
    events: mpsc::UnboundedReceiver<EngineEvent<String>>,
}

impl EngineHarness {
    pub fn spawn(local_id: &str, behavior: MockBehavior) -> Self {
        let local_id = ParticipantId::from(local_id);
        let factory = MockFactory::new(behavior);
        let log = factory.log();
        let (signaling, outgoing) = MockSignalingOutput::new();
        let (inbound, signal_rx) = mpsc::channel(64);

        let (engine, handle, events) =
            CallEngine::new(local_id.clone(), factory, Arc::new(signaling.clone()), signal_rx);
        tokio::spawn(engine.run());

        Self {
            local_id,
            handle,
            log,
            signaling,
            inbound,
            outgoing,
            events,
        }
    }

    /// Delivers a message as if the signaling server relayed it.
    pub async fn deliver(&self, msg: SignalMessage) -> Result<()> {
        self.inbound
            .send(msg)
            .await
            .context("Engine stopped reading signals")
    }

    pub async fn deliver_joined(&self, peer: &str) -> Result<()> {
        self.deliver(SignalMessage::Joined { from: peer.into() }).await
    }

    pub async fn deliver_left(&self, peer: &str) -> Result<()> {
        self.deliver(SignalMessage::Left { from: peer.into() }).await
    }

    pub async fn deliver_offer(&self, peer: &str, signal: Value) -> Result<()> {
        self.deliver(SignalMessage::Offer {
            from: peer.into(),
            to: self.local_id.clone(),
            signal,
        })
        .await
    }

    pub async fn deliver_answer(&self, peer: &str, signal: Value) -> Result<()> {
        self.deliver(SignalMessage::Answer {
            from: peer.into(),
            to: self.local_id.clone(),
            signal,
        })
        .await
    }

    pub async fn deliver_ice(&self, peer: &str, candidate: Value) -> Result<()> {
        self.deliver(SignalMessage::IceCandidate {
            from: peer.into(),
            to: self.local_id.clone(),
            candidate,
        })
        .await
    }

    /// Closes the inbound signaling channel, as when the socket drops.
    pub fn disconnect_signaling(&mut self) {
        let (closed, _) = mpsc::channel(1);
        self.inbound = closed;
    }

    pub async fn next_outgoing(&mut self) -> Result<Outgoing> {
        tokio::time::timeout(
            Duration::from_millis(ENGINE_TIMEOUT_MS),
            self.outgoing.recv(),
        )
        .await
        .context("Timeout waiting for outgoing signal")?
        .context("Signaling output dropped")
    }

    /// Next outgoing offer or answer, skipping trickled candidates.
    pub async fn next_description(&mut self) -> Result<Outgoing> {
        loop {
            match self.next_outgoing().await? {
                Outgoing::Ice { .. } => continue,
                other => return Ok(other),
            }
        }
    }

    pub async fn next_event(&mut self) -> Result<EngineEvent<String>> {
        tokio::time::timeout(Duration::from_millis(ENGINE_TIMEOUT_MS), self.events.recv())
            .await
            .context("Timeout waiting for engine event")?
            .context("Engine event channel closed")
    }

    /// Asserts that no UI event shows up within a short grace period.
    pub async fn expect_no_event(&mut self) -> Result<()> {
        match tokio::time::timeout(Duration::from_millis(100), self.events.recv()).await {
            Ok(Some(event)) => bail!("Unexpected engine event: {:?}", event),
            _ => Ok(()),
        }
    }

    pub async fn state_of(&self, peer: &str) -> Result<Option<SessionState>> {
        Ok(self.handle.session_state(peer.into()).await?)
    }

    /// Polls until `peer`'s session reaches `expected` (`None` = no session).
    pub async fn wait_for_state(&self, peer: &str, expected: Option<SessionState>) -> Result<()> {
        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(ENGINE_TIMEOUT_MS);

        loop {
            let state = self.state_of(peer).await?;
            if state == expected {
                return Ok(());
            }
            if start.elapsed() > timeout {
                bail!("Session with {} is {:?}, expected {:?}", peer, state, expected);
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

/// Polls until `log` shows `count` remote candidates applied for `peer`.
pub async fn wait_for_candidates(log: &TransportLog, peer: &str, count: usize) -> Result<Vec<Value>> {
    let start = std::time::Instant::now();
    let timeout = Duration::from_millis(ENGINE_TIMEOUT_MS);
    let peer = ParticipantId::from(peer);

    loop {
        let applied = log.candidates_for(&peer).await;
        if applied.len() >= count {
            return Ok(applied);
        }
        if start.elapsed() > timeout {
            bail!("Only {} of {} candidates applied for {}", applied.len(), count, peer);
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

pub fn offer_signal() -> Value {
    json!({ "type": "offer", "sdp": "v=0\r\n" })
}

pub fn answer_signal() -> Value {
    json!({ "type": "answer", "sdp": "v=0\r\n" })
}

pub fn candidate(n: u32) -> Value {
    json!({ "candidate": format!("candidate:{} 1 UDP 1 127.0.0.1 9 typ host", n), "sdpMid": "0" })
}
