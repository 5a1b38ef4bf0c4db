use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use crate::reverse_name::reverse_zone_name;
use crate::server_group::ServerGroups;

/// Runtime settings shared read-only by every query worker.
///
/// Built once at startup from [`crate::Config`] plus what the host reports
/// (own host name, system resolvers).
#[derive(Debug, Clone)]
pub struct Configuration {
    pub port: u16,
    pub upstream_port: u16,
    pub authority_network: Ipv4Addr,
    pub authority_netmask: Ipv4Addr,
    pub authority_domain: String,
    pub own_hostname: String,
    pub referral_interface: String,
    pub server_groups: ServerGroups,
}

impl Configuration {
    /// `(addr & netmask) == network`
    pub fn in_authority(&self, addr: Ipv4Addr) -> bool {
        u32::from(addr) & u32::from(self.authority_netmask) == u32::from(self.authority_network)
    }

    pub fn reverse_zone(&self) -> String {
        reverse_zone_name(self.authority_network, self.authority_netmask)
    }

    pub fn upstream_addr(&self, server: Ipv4Addr) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(server, self.upstream_port))
    }
}

/// Lowercases a host name and appends `.domain` when it has no dot.
pub fn qualify_host_name(name: &str, domain: &str) -> String {
    let name = name.trim_end_matches('.').to_ascii_lowercase();
    if name.contains('.') || domain.is_empty() {
        name
    } else {
        format!("{}.{}", name, domain.trim_matches('.').to_ascii_lowercase())
    }
}
