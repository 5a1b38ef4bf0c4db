use serde::Deserialize;
use std::net::Ipv4Addr;

/// Zone this server answers for.
///
/// With the defaults (`0.0.0.0/255.255.255.255`) no reverse lookup falls
/// inside the authority and every PTR query is referred upstream.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorityConfig {
    #[serde(default = "default_network")]
    pub network: Ipv4Addr,

    #[serde(default = "default_netmask")]
    pub netmask: Ipv4Addr,

    /// Forward domain; falls back to the system resolver's default domain.
    #[serde(default)]
    pub domain: Option<String>,

    /// Own host name; falls back to the system host name.
    #[serde(default)]
    pub hostname: Option<String>,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            netmask: default_netmask(),
            domain: None,
            hostname: None,
        }
    }
}

fn default_network() -> Ipv4Addr {
    Ipv4Addr::UNSPECIFIED
}

fn default_netmask() -> Ipv4Addr {
    Ipv4Addr::BROADCAST
}
