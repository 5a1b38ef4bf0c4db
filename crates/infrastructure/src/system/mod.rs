pub mod hostname;
pub mod hosts_reader;
pub mod interface_monitor;
pub mod resolv_conf;

pub use hostname::own_hostname;
pub use hosts_reader::{parse_hosts, HostsFileReader};
pub use interface_monitor::{StaticInterfaceMonitor, SystemInterfaceMonitor};
pub use resolv_conf::{parse_resolv_conf, ResolvConfReader, SystemResolverConfig};
