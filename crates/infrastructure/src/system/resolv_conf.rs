use ferrous_named_domain::{DomainError, MAX_SERVERS_PER_GROUP};
use std::net::{IpAddr, Ipv4Addr};
use tokio::fs;
use tracing::{debug, warn};

/// What the system resolver configuration contributes: the fallback
/// upstream servers and the default domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemResolverConfig {
    pub nameservers: Vec<Ipv4Addr>,
    pub domain: Option<String>,
}

/// Reads resolv.conf(5)
pub struct ResolvConfReader {
    path: String,
}

impl ResolvConfReader {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub async fn read(&self) -> Result<SystemResolverConfig, DomainError> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::IoError(format!("Failed to read {}: {}", self.path, e))
        })?;

        let config = parse_resolv_conf(&content);
        debug!(
            path = %self.path,
            nameservers = config.nameservers.len(),
            domain = ?config.domain,
            "Resolver configuration parsed"
        );
        Ok(config)
    }
}

/// Keeps the first three IPv4 `nameserver` entries. `domain` and `search`
/// both set the default domain (first search entry); the last one wins.
pub fn parse_resolv_conf(content: &str) -> SystemResolverConfig {
    let mut config = SystemResolverConfig::default();

    for line in content.lines() {
        let line = line.trim_start();
        if line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next()) {
            (Some("nameserver"), Some(server)) => match server.parse::<IpAddr>() {
                Ok(IpAddr::V4(addr)) if config.nameservers.len() < MAX_SERVERS_PER_GROUP => {
                    config.nameservers.push(addr);
                }
                Ok(IpAddr::V4(addr)) => {
                    debug!(server = %addr, "Ignoring nameserver beyond the first three");
                }
                Ok(IpAddr::V6(addr)) => {
                    debug!(server = %addr, "Ignoring IPv6 nameserver");
                }
                Err(e) => warn!(server = server, error = %e, "Invalid nameserver entry"),
            },
            (Some("domain"), Some(domain)) | (Some("search"), Some(domain)) => {
                config.domain = Some(domain.trim_end_matches('.').to_ascii_lowercase());
            }
            _ => {}
        }
    }

    config
}
