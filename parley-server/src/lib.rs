mod config;
mod error;
mod registry;
mod router;
mod signaling;

pub use config::*;
pub use error::*;
pub use registry::*;
pub use router::*;
pub use signaling::*;
