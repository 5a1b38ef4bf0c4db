pub mod authority;
pub mod errors;
pub mod hosts;
pub mod logging;
pub mod referral;
pub mod root;
pub mod server;

pub use authority::AuthorityConfig;
pub use errors::ConfigError;
pub use hosts::HostsConfig;
pub use logging::LoggingConfig;
pub use referral::{ReferralConfig, ServerGroupConfig};
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
