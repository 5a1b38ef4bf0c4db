//! Ferrous Named Domain Layer
pub mod config;
pub mod configuration;
pub mod dns_protocol;
pub mod dns_record;
pub mod errors;
pub mod reverse_name;
pub mod server_group;

pub use config::{
    AuthorityConfig, CliOverrides, Config, ConfigError, HostsConfig, LoggingConfig,
    ReferralConfig, ServerConfig, ServerGroupConfig,
};
pub use configuration::{qualify_host_name, Configuration};
pub use dns_protocol::{Opcode, ResponseCode};
pub use dns_record::{HostEntry, HostRecord, RecordId, RecordKind, RecordType};
pub use errors::DomainError;
pub use reverse_name::{parse_reverse_name, reverse_zone_name};
pub use server_group::{ServerGroup, ServerGroups, MAX_SERVERS_PER_GROUP};
