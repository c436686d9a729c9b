use crate::error::ProtocolError;
use crate::model::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages exchanged over the signaling channel.
///
/// `signal` and `candidate` are produced and consumed by the WebRTC layer on
/// the clients; the server never looks inside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SignalMessage {
    /// A participant announces itself on its connection.
    Join { from: ParticipantId },
    /// Broadcast: `from` has joined.
    Joined { from: ParticipantId },
    /// Broadcast: `from` has disconnected.
    Left { from: ParticipantId },
    Offer {
        from: ParticipantId,
        to: ParticipantId,
        signal: Value,
    },
    Answer {
        from: ParticipantId,
        to: ParticipantId,
        signal: Value,
    },
    IceCandidate {
        from: ParticipantId,
        to: ParticipantId,
        candidate: Value,
    },
}

const KNOWN_TYPES: [&str; 6] = ["join", "joined", "left", "offer", "answer", "ice-candidate"];

impl SignalMessage {
    /// Decodes one text frame.
    ///
    /// Returns `Ok(None)` for a well-formed object whose `type` this protocol
    /// does not define; those are ignored rather than treated as malformed.
    pub fn parse(text: &str) -> Result<Option<Self>, ProtocolError> {
        let value: Value = serde_json::from_str(text)?;
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(ProtocolError::MissingType)?
            .to_owned();

        if !KNOWN_TYPES.contains(&kind.as_str()) {
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|source| ProtocolError::InvalidPayload { kind, source })
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SignalMessage::Join { .. } => "join",
            SignalMessage::Joined { .. } => "joined",
            SignalMessage::Left { .. } => "left",
            SignalMessage::Offer { .. } => "offer",
            SignalMessage::Answer { .. } => "answer",
            SignalMessage::IceCandidate { .. } => "ice-candidate",
        }
    }

    pub fn sender(&self) -> &ParticipantId {
        match self {
            SignalMessage::Join { from }
            | SignalMessage::Joined { from }
            | SignalMessage::Left { from }
            | SignalMessage::Offer { from, .. }
            | SignalMessage::Answer { from, .. }
            | SignalMessage::IceCandidate { from, .. } => from,
        }
    }

    /// The addressee of a point-to-point message; `None` for presence messages.
    pub fn recipient(&self) -> Option<&ParticipantId> {
        match self {
            SignalMessage::Offer { to, .. }
            | SignalMessage::Answer { to, .. }
            | SignalMessage::IceCandidate { to, .. } => Some(to),
            _ => None,
        }
    }
}
