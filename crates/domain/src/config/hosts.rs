use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct HostsConfig {
    #[serde(default = "default_hosts_path")]
    pub path: String,
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            path: default_hosts_path(),
        }
    }
}

fn default_hosts_path() -> String {
    "/etc/hosts".to_string()
}
