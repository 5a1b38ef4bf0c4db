use std::net::Ipv4Addr;
use std::sync::Arc;

use crate::dns_protocol::LOCAL_TTL;

/// Position of a record inside the record store.
///
/// Records are never removed, so an id stays valid for the lifetime of the
/// store that issued it. Aliases refer to their primary through one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Primary { address: Ipv4Addr },
    Alias { primary: RecordId },
}

/// A locally authoritative name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    pub name: Arc<str>,
    pub ttl: u32,
    pub kind: RecordKind,
}

impl HostRecord {
    pub fn primary(name: &str, address: Ipv4Addr) -> Self {
        Self {
            name: Arc::from(name.to_ascii_lowercase()),
            ttl: LOCAL_TTL,
            kind: RecordKind::Primary { address },
        }
    }

    pub fn alias(name: &str, primary: RecordId) -> Self {
        Self {
            name: Arc::from(name.to_ascii_lowercase()),
            ttl: LOCAL_TTL,
            kind: RecordKind::Alias { primary },
        }
    }

    pub fn address(&self) -> Option<Ipv4Addr> {
        match self.kind {
            RecordKind::Primary { address } => Some(address),
            RecordKind::Alias { .. } => None,
        }
    }

    pub fn is_alias(&self) -> bool {
        matches!(self.kind, RecordKind::Alias { .. })
    }
}

/// One hosts-file line: an address, its canonical name and any aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntry {
    pub address: Ipv4Addr,
    pub name: String,
    pub aliases: Vec<String>,
}

impl HostEntry {
    pub fn new(address: Ipv4Addr, name: impl Into<String>) -> Self {
        Self {
            address,
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }
}
