use ferrous_named_domain::{Config, Configuration, ServerGroupConfig, ServerGroups};
use ferrous_named_infrastructure::system::{own_hostname, ResolvConfReader, SystemResolverConfig};
use tracing::{debug, info, warn};

/// Resolves the loaded configuration against the host: default domain and
/// fallback servers from resolv.conf, own host name from the system.
pub async fn build_configuration(config: &Config) -> anyhow::Result<Configuration> {
    let system = match ResolvConfReader::new(config.referral.resolv_conf.as_str())
        .read()
        .await
    {
        Ok(system) => system,
        Err(e) => {
            warn!(
                path = %config.referral.resolv_conf,
                error = %e,
                "Cannot read resolver configuration"
            );
            SystemResolverConfig::default()
        }
    };

    let authority_domain = config
        .authority
        .domain
        .as_deref()
        .map(|domain| domain.trim_end_matches('.').to_ascii_lowercase())
        .or(system.domain)
        .unwrap_or_default();

    let own_hostname = own_hostname(config.authority.hostname.as_deref(), &authority_domain)?;

    let fallback_servers = if config.referral.use_system_resolvers {
        system.nameservers
    } else {
        Vec::new()
    };
    let configured = config
        .referral
        .groups
        .iter()
        .map(ServerGroupConfig::to_group)
        .collect();
    let server_groups = ServerGroups::new(configured, fallback_servers);

    info!(
        domain = %authority_domain,
        hostname = %own_hostname,
        network = %config.authority.network,
        netmask = %config.authority.netmask,
        "Authority configured"
    );
    for group in server_groups.iter() {
        info!(
            interface_address = %group.if_addr,
            interface_mask = %group.if_mask,
            servers = ?group.servers,
            "Upstream server group"
        );
    }
    if server_groups.iter().all(|group| group.is_empty()) {
        warn!("No upstream servers configured, referrals will fail");
    }
    debug!(interface = %config.referral.interface, "Referral interface");

    Ok(Configuration {
        port: config.server.dns_port,
        upstream_port: config.referral.upstream_port,
        authority_network: config.authority.network,
        authority_netmask: config.authority.netmask,
        authority_domain,
        own_hostname,
        referral_interface: config.referral.interface.clone(),
        server_groups,
    })
}
