mod peer_session;
mod session_state;

pub use peer_session::*;
pub use session_state::*;
