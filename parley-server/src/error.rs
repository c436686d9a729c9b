use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalingError {
    /// The router task is gone; nothing can be registered or relayed.
    #[error("message router has shut down")]
    RouterClosed,
}
