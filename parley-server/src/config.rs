use crate::router::{DuplicateJoin, RouterConfig};
use clap::Parser;
use std::net::{Ipv4Addr, SocketAddr};

#[derive(Debug, Clone, Parser)]
#[command(name = "parley-server")]
#[command(about = "WebSocket signaling relay for peer-to-peer calls")]
pub struct ServerConfig {
    /// Port to listen on (all interfaces).
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Policy for a `join` naming an identifier that is already connected.
    #[arg(long, env = "PARLEY_DUPLICATE_JOIN", value_enum, default_value_t = DuplicateJoin::Replace)]
    pub duplicate_join: DuplicateJoin,

    /// Do not echo `joined` back to the participant that just joined.
    #[arg(long, env = "PARLEY_EXCLUDE_SENDER")]
    pub exclude_sender: bool,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            duplicate_join: self.duplicate_join,
            notify_sender_on_join: !self.exclude_sender,
        }
    }
}
