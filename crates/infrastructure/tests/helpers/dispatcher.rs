#![allow(dead_code)]

use ferrous_named_application::ports::{InterfaceMonitor, UpstreamTransport};
use ferrous_named_application::services::RecordStore;
use ferrous_named_application::use_cases::ReferQueryUseCase;
use ferrous_named_domain::{Configuration, ServerGroup, ServerGroups};
use ferrous_named_infrastructure::dns::QueryDispatcher;
use ferrous_named_infrastructure::system::StaticInterfaceMonitor;

use super::mocks::ScriptedTransport;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

pub const UPSTREAM: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 53);

/// Authority over 192.168.1.0/24 as `home.lan`, served by `ns.home.lan`,
/// referring through `ppp0` to [`UPSTREAM`] when it has a 10/8 address.
pub fn configuration() -> Configuration {
    configuration_with_upstream(53, vec![UPSTREAM])
}

pub fn configuration_with_upstream(upstream_port: u16, servers: Vec<Ipv4Addr>) -> Configuration {
    Configuration {
        port: 53,
        upstream_port,
        authority_network: Ipv4Addr::new(192, 168, 1, 0),
        authority_netmask: Ipv4Addr::new(255, 255, 255, 0),
        authority_domain: "home.lan".to_string(),
        own_hostname: "ns.home.lan".to_string(),
        referral_interface: "ppp0".to_string(),
        server_groups: ServerGroups::new(
            vec![ServerGroup::new(
                Ipv4Addr::new(10, 0, 0, 0),
                Ipv4Addr::new(255, 0, 0, 0),
                servers,
            )],
            vec![],
        ),
    }
}

/// `ns` at .1, `nas` at .10 with alias `files`, `printer` at .20.
pub fn home_records() -> RecordStore {
    let mut store = RecordStore::new();
    store.insert_primary("ns.home.lan", Ipv4Addr::new(192, 168, 1, 1));
    let nas = store.insert_primary("nas.home.lan", Ipv4Addr::new(192, 168, 1, 10));
    store
        .insert_alias("files.home.lan", nas)
        .expect("alias of a primary");
    store.insert_primary("printer.home.lan", Ipv4Addr::new(192, 168, 1, 20));
    store
}

pub fn referral_interface_up() -> StaticInterfaceMonitor {
    StaticInterfaceMonitor::new(Ipv4Addr::new(10, 1, 2, 3))
}

pub fn dispatcher(
    records: RecordStore,
    transport: impl UpstreamTransport + 'static,
    interfaces: impl InterfaceMonitor + 'static,
) -> QueryDispatcher {
    dispatcher_with_config(records, transport, interfaces, configuration())
}

/// Home zone with the referral interface up and a silent upstream.
pub fn home_dispatcher() -> QueryDispatcher {
    dispatcher(home_records(), ScriptedTransport::silent(), referral_interface_up())
}

pub fn dispatcher_with_config(
    records: RecordStore,
    transport: impl UpstreamTransport + 'static,
    interfaces: impl InterfaceMonitor + 'static,
    config: Configuration,
) -> QueryDispatcher {
    let config = Arc::new(config);
    let referral =
        ReferQueryUseCase::new(Arc::new(transport), Arc::new(interfaces), config.clone());
    QueryDispatcher::new(Arc::new(records), Arc::new(referral), config)
}

pub fn client() -> SocketAddr {
    SocketAddr::from(([192, 168, 1, 50], 40000))
}
