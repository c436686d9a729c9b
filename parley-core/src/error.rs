use thiserror::Error;

/// Reasons an inbound signaling frame could not be turned into a [`SignalMessage`].
///
/// [`SignalMessage`]: crate::SignalMessage
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("message has no string `type` field")]
    MissingType,

    #[error("malformed `{kind}` message: {source}")]
    InvalidPayload {
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}
