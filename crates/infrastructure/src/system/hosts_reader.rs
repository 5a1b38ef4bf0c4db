use ferrous_named_domain::{qualify_host_name, DomainError, HostEntry};
use std::net::IpAddr;
use std::str::FromStr;
use tokio::fs;
use tracing::{debug, warn};

/// Reads a hosts(5) file into local zone entries.
pub struct HostsFileReader {
    path: String,
    domain: String,
}

impl HostsFileReader {
    /// `domain` is appended to every name that has no dot.
    pub fn new(path: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            domain: domain.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn read_entries(&self) -> Result<Vec<HostEntry>, DomainError> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::IoError(format!("Failed to read hosts file {}: {}", self.path, e))
        })?;

        let entries = parse_hosts(&content, &self.domain);
        debug!(path = %self.path, entries = entries.len(), "Hosts file parsed");
        Ok(entries)
    }
}

/// Parses hosts-file text.
///
/// Format: `address name [alias ...]`, `#` starts a comment. IPv6 lines
/// and lines without a valid IPv4 address or any name are skipped.
pub fn parse_hosts(content: &str, domain: &str) -> Vec<HostEntry> {
    let mut entries = Vec::new();

    for (line_num, raw) in content.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default();
        let mut fields = line.split_whitespace();

        let Some(address_str) = fields.next() else {
            continue;
        };

        let address = match IpAddr::from_str(address_str) {
            Ok(IpAddr::V4(address)) => address,
            Ok(IpAddr::V6(_)) => {
                debug!(line = line_num + 1, "Skipping IPv6 hosts entry");
                continue;
            }
            Err(e) => {
                warn!(
                    line = line_num + 1,
                    address = address_str,
                    error = %e,
                    "Invalid address in hosts file"
                );
                continue;
            }
        };

        let Some(name) = fields.next() else {
            warn!(line = line_num + 1, address = %address, "Hosts entry without a name");
            continue;
        };

        let name = qualify_host_name(name, domain);
        let aliases: Vec<String> = fields
            .map(|alias| qualify_host_name(alias, domain))
            .filter(|alias| *alias != name)
            .collect();

        entries.push(HostEntry::new(address, name).with_aliases(aliases));
    }

    entries
}
