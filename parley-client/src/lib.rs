mod engine;
mod error;
mod session;
mod signaling;
mod transport;

pub use engine::*;
pub use error::*;
pub use session::*;
pub use signaling::*;
pub use transport::*;
