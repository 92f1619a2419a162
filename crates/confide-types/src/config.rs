//! Relay configuration types.
//!
//! `RelayConfig` mirrors `config.toml` in the data directory. Every field has
//! a default, so an empty or partial file is valid.

use serde::{Deserialize, Serialize};

use crate::role::DEFAULT_COUNSELOR_ID;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Client identifier that is granted the Counselor role.
    #[serde(default = "default_counselor_id")]
    pub counselor_id: String,

    /// Capacity of each connection's outbound queue. A peer whose queue is
    /// full misses messages instead of stalling the fan-out.
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer: usize,

    /// Address the server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_counselor_id() -> String {
    DEFAULT_COUNSELOR_ID.to_string()
}

fn default_outbound_buffer() -> usize {
    256
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            counselor_id: default_counselor_id(),
            outbound_buffer: default_outbound_buffer(),
            host: default_host(),
            port: default_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relay_config_default_values() {
        let config = RelayConfig::default();
        assert_eq!(config.counselor_id, "1234");
        assert_eq!(config.outbound_buffer, 256);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_relay_config_partial_toml() {
        let config: RelayConfig = toml::from_str("counselor_id = \"desk\"\nport = 9000").unwrap();
        assert_eq!(config.counselor_id, "desk");
        assert_eq!(config.port, 9000);
        assert_eq!(config.outbound_buffer, 256);
    }

    #[test]
    fn test_relay_config_empty_toml() {
        let config: RelayConfig = toml::from_str("").unwrap();
        assert_eq!(config, RelayConfig::default());
    }
}
