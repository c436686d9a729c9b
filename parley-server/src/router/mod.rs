mod message_router;
mod router_command;
mod router_config;

pub use message_router::*;
pub use router_command::*;
pub use router_config::*;
