use serde::Deserialize;
use std::net::Ipv4Addr;

use crate::dns_protocol::DNS_PORT;
use crate::server_group::ServerGroup;

#[derive(Debug, Clone, Deserialize)]
pub struct ReferralConfig {
    /// Interface whose current address selects the server group.
    #[serde(default = "default_interface")]
    pub interface: String,

    #[serde(default = "default_upstream_port")]
    pub upstream_port: u16,

    /// Build the fallback group from the system resolver configuration.
    #[serde(default = "default_true")]
    pub use_system_resolvers: bool,

    #[serde(default = "default_resolv_conf")]
    pub resolv_conf: String,

    /// Treat the interface as up with this address instead of asking the
    /// kernel. Useful on hosts without the configured interface.
    #[serde(default)]
    pub assume_interface_address: Option<Ipv4Addr>,

    #[serde(default)]
    pub groups: Vec<ServerGroupConfig>,
}

impl Default for ReferralConfig {
    fn default() -> Self {
        Self {
            interface: default_interface(),
            upstream_port: default_upstream_port(),
            use_system_resolvers: true,
            resolv_conf: default_resolv_conf(),
            assume_interface_address: None,
            groups: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerGroupConfig {
    pub interface_address: Ipv4Addr,
    pub interface_mask: Ipv4Addr,
    pub servers: Vec<Ipv4Addr>,
}

impl ServerGroupConfig {
    pub fn to_group(&self) -> ServerGroup {
        ServerGroup::new(
            self.interface_address,
            self.interface_mask,
            self.servers.clone(),
        )
    }
}

fn default_interface() -> String {
    "eth0".to_string()
}

fn default_upstream_port() -> u16 {
    DNS_PORT
}

fn default_resolv_conf() -> String {
    "/etc/resolv.conf".to_string()
}

fn default_true() -> bool {
    true
}
