mod peer_transport;
mod rtc_transport;
mod transport_event;

pub use peer_transport::*;
pub use rtc_transport::*;
pub use transport_event::*;
