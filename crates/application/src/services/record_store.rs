use ferrous_named_domain::{DomainError, HostEntry, HostRecord, RecordId, RecordKind};
use std::net::Ipv4Addr;
use tracing::debug;

/// Local zone held in memory.
///
/// Records are appended and never removed; lookups scan newest first, so a
/// later record with the same name (or address) shadows an earlier one.
/// The zone is small and loaded once, so lookups stay unindexed.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: Vec<HostRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = HostEntry>,
    {
        let mut store = Self::new();
        for entry in entries {
            store.add_host(&entry);
        }
        debug!(records = store.len(), "Record store loaded");
        store
    }

    pub fn insert_primary(&mut self, name: &str, address: Ipv4Addr) -> RecordId {
        self.push(HostRecord::primary(name, address))
    }

    /// Adds `name` as an alias of the primary record `primary`.
    pub fn insert_alias(&mut self, name: &str, primary: RecordId) -> Result<RecordId, DomainError> {
        match self.get(primary).map(|record| record.kind) {
            Some(RecordKind::Primary { .. }) => Ok(self.push(HostRecord::alias(name, primary))),
            Some(RecordKind::Alias { .. }) => Err(DomainError::InvalidHostsEntry(format!(
                "alias {} must point at a primary record",
                name
            ))),
            None => Err(DomainError::InvalidHostsEntry(format!(
                "alias {} points at unknown record {}",
                name, primary.0
            ))),
        }
    }

    /// Inserts the entry's primary name followed by one alias per extra name.
    pub fn add_host(&mut self, entry: &HostEntry) -> RecordId {
        let primary = self.insert_primary(&entry.name, entry.address);
        for alias in &entry.aliases {
            self.push(HostRecord::alias(alias, primary));
        }
        primary
    }

    pub fn get(&self, id: RecordId) -> Option<&HostRecord> {
        self.records.get(id.0)
    }

    /// Newest record whose name equals `name`, ignoring ASCII case.
    pub fn find_by_name(&self, name: &str) -> Option<&HostRecord> {
        self.records
            .iter()
            .rev()
            .find(|record| record.name.eq_ignore_ascii_case(name))
    }

    /// Newest primary record holding `address`. Aliases never match.
    pub fn find_by_address(&self, address: Ipv4Addr) -> Option<&HostRecord> {
        self.records
            .iter()
            .rev()
            .find(|record| record.address() == Some(address))
    }

    /// The primary behind `record`; a primary resolves to itself.
    pub fn primary_of<'a>(&'a self, record: &'a HostRecord) -> Option<&'a HostRecord> {
        match record.kind {
            RecordKind::Primary { .. } => Some(record),
            RecordKind::Alias { primary } => self.get(primary),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn push(&mut self, record: HostRecord) -> RecordId {
        let id = RecordId(self.records.len());
        self.records.push(record);
        id
    }
}
