pub mod udp;

pub use udp::{UdpSession, UdpTransport};
