use serde::Deserialize;
use std::path::Path;

use super::authority::AuthorityConfig;
use super::errors::ConfigError;
use super::hosts::HostsConfig;
use super::logging::LoggingConfig;
use super::referral::ReferralConfig;
use super::server::ServerConfig;
use crate::server_group::MAX_SERVERS_PER_GROUP;

const LOCAL_CONFIG_PATH: &str = "ferrous-named.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/ferrous-named/config.toml";

/// Main configuration structure for Ferrous Named
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Listening socket
    #[serde(default)]
    pub server: ServerConfig,

    /// Local zone and own identity
    #[serde(default)]
    pub authority: AuthorityConfig,

    /// Upstream referral interface and server groups
    #[serde(default)]
    pub referral: ReferralConfig,

    /// Host list the local zone is loaded from
    #[serde(default)]
    pub hosts: HostsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-named.toml in current directory
    /// 3. /etc/ferrous-named/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(hosts) = overrides.hosts_path {
            self.hosts.path = hosts;
        }
        if let Some(interface) = overrides.referral_interface {
            self.referral.interface = interface;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.referral.upstream_port == 0 {
            return Err(ConfigError::Validation(
                "Upstream port cannot be 0".to_string(),
            ));
        }

        if self.referral.interface.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Referral interface name cannot be empty".to_string(),
            ));
        }

        let network = u32::from(self.authority.network);
        let netmask = u32::from(self.authority.netmask);
        if network & netmask != network {
            return Err(ConfigError::Validation(format!(
                "Authority network {} has bits outside netmask {}",
                self.authority.network, self.authority.netmask
            )));
        }

        for group in &self.referral.groups {
            if group.servers.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Server group {}/{} has no servers",
                    group.interface_address, group.interface_mask
                )));
            }
            if group.servers.len() > MAX_SERVERS_PER_GROUP {
                return Err(ConfigError::Validation(format!(
                    "Server group {}/{} lists {} servers, at most {} are allowed",
                    group.interface_address,
                    group.interface_mask,
                    group.servers.len(),
                    MAX_SERVERS_PER_GROUP
                )));
            }
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub hosts_path: Option<String>,
    pub referral_interface: Option<String>,
    pub log_level: Option<String>,
}
