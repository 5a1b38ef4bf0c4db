use anyhow::Context;
use ferrous_named_application::services::RecordStore;
use ferrous_named_domain::{Config, Configuration};
use ferrous_named_infrastructure::system::HostsFileReader;
use tracing::{info, warn};

pub async fn load_records(config: &Config, runtime: &Configuration) -> anyhow::Result<RecordStore> {
    let reader =
        HostsFileReader::new(config.hosts.path.as_str(), runtime.authority_domain.as_str());
    let entries = reader
        .read_entries()
        .await
        .with_context(|| format!("loading local zone from {}", reader.path()))?;

    let records = RecordStore::from_entries(entries);

    if records.find_by_name(&runtime.own_hostname).is_none() {
        warn!(
            hostname = %runtime.own_hostname,
            path = %reader.path(),
            "Own host name is not in the local zone, A answers will fail"
        );
    }

    info!(records = records.len(), path = %reader.path(), "Local zone loaded");
    Ok(records)
}
