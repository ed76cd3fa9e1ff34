use std::env;

/// Config holds all application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to a JSON network map. Empty means the built-in seed map.
    pub network_map: String,
    /// Database named in the `USE` line ahead of the DDL. Empty skips the line.
    pub database: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn load() -> Self {
        Self {
            network_map: get_env("NETWORK_MAP", ""),
            database: get_env("VLAN_DB", "arptools"),
        }
    }

    pub fn network_map_path(&self) -> Option<&str> {
        non_empty(&self.network_map)
    }

    pub fn database_name(&self) -> Option<&str> {
        non_empty(&self.database)
    }
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
