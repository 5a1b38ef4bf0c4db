mod interface_monitor;
mod upstream_transport;

pub use interface_monitor::InterfaceMonitor;
pub use upstream_transport::{UpstreamSession, UpstreamTransport};
