use ferrous_named_domain::DomainError;
use std::net::Ipv4Addr;

pub trait InterfaceMonitor: Send + Sync {
    /// Current IPv4 address of `name`, or `None` when the interface is
    /// absent or not up.
    fn interface_address(&self, name: &str) -> Result<Option<Ipv4Addr>, DomainError>;
}
