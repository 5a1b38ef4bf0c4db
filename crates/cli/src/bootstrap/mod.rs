mod config;
mod logging;
mod records;
mod runtime;

pub use config::load_config;
pub use logging::init_logging;
pub use records::load_records;
pub use runtime::build_configuration;
