//! HTTP listener configuration.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    8080
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Path prefix every API route is nested under. Empty mounts at `/`.
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_prefix: default_api_prefix(),
        }
    }
}

impl ServerConfig {
    /// Socket address to bind, parsed from `host:port`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `host` is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        };
        raw.parse().map_err(|e| ConfigError::InvalidValue {
            field: "server.host".into(),
            reason: format!("'{raw}' is not a socket address: {e}"),
        })
    }

    /// The prefix normalized to `/segment` form, or empty for root mounting.
    #[must_use]
    pub fn normalized_prefix(&self) -> String {
        let trimmed = self.api_prefix.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.api_prefix, "/api/v1");
    }

    #[test]
    fn bind_addr_parses_ipv4_and_ipv6() {
        let v4 = ServerConfig::default().bind_addr().unwrap();
        assert_eq!(v4.to_string(), "127.0.0.1:8080");

        let v6 = ServerConfig {
            host: "::1".into(),
            port: 9000,
            ..Default::default()
        };
        assert_eq!(v6.bind_addr().unwrap().to_string(), "[::1]:9000");
    }

    #[test]
    fn bind_addr_rejects_hostnames() {
        let config = ServerConfig {
            host: "not a host".into(),
            ..Default::default()
        };
        let err = config.bind_addr().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "server.host"));
    }

    #[test]
    fn prefix_normalization() {
        let mut config = ServerConfig::default();
        assert_eq!(config.normalized_prefix(), "/api/v1");
        config.api_prefix = "api/".into();
        assert_eq!(config.normalized_prefix(), "/api");
        config.api_prefix = "/".into();
        assert_eq!(config.normalized_prefix(), "");
    }
}
