//! Configuration management for the attribute gateway

pub mod file;

use std::path::Path;

use crate::attributes::{InvalidValueStatus, ResponsePolicy};
use crate::devices::DeviceRegistration;
use crate::transport::DEFAULT_QUEUE_CAPACITY;
use crate::{Error, Result};

use self::file::GatewayConfigFile;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8080;

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API server configuration
    pub api_server: ApiServerConfig,

    /// Device transport configuration
    pub transport: TransportConfig,

    /// Response formatting
    pub responses: ResponsePolicy,

    /// Devices registered at startup
    pub devices: Vec<DeviceRegistration>,
}

/// HTTP API server configuration
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Accepted API keys (from `ATTRGW_API_KEYS`, comma separated)
    pub api_keys: Vec<String>,
}

/// Device transport configuration
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Per-device queue depth
    pub queue_capacity: usize,

    /// Retries for frames the radio reports busy
    pub max_retries: u32,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_retries: 3,
        }
    }
}

impl Config {
    /// Load configuration from the config file and environment
    ///
    /// Environment variables override file values.
    ///
    /// # Errors
    ///
    /// Returns error if an environment override cannot be parsed
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let fc = file::load_config_file(path);
        Self::from_sources(fc, |key| std::env::var(key).ok())
    }

    /// Assemble configuration from a parsed file and an environment lookup
    ///
    /// # Errors
    ///
    /// Returns error if an environment override cannot be parsed
    pub fn from_sources(
        fc: GatewayConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let port = match env("ATTRGW_PORT") {
            Some(v) => parse_env("ATTRGW_PORT", &v)?,
            None => fc.server.port.unwrap_or(DEFAULT_PORT),
        };

        let api_keys = env("ATTRGW_API_KEYS").map_or_else(
            || fc.server.api_keys.unwrap_or_default(),
            |v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(String::from)
                    .collect()
            },
        );

        let defaults = TransportConfig::default();
        let queue_capacity = match env("ATTRGW_QUEUE_CAPACITY") {
            Some(v) => parse_env("ATTRGW_QUEUE_CAPACITY", &v)?,
            None => fc.transport.queue_capacity.unwrap_or(defaults.queue_capacity),
        };
        if queue_capacity == 0 {
            return Err(Error::Config("queue capacity must be at least 1".to_string()));
        }

        let invalid_value_status = match env("ATTRGW_INVALID_VALUE_STATUS") {
            Some(v) => InvalidValueStatus::parse(&v).ok_or_else(|| {
                Error::Config(format!("invalid ATTRGW_INVALID_VALUE_STATUS: {v}"))
            })?,
            None => fc.responses.invalid_value_status.unwrap_or_default(),
        };

        Ok(Self {
            api_server: ApiServerConfig { port, api_keys },
            transport: TransportConfig {
                queue_capacity,
                max_retries: fc.transport.max_retries.unwrap_or(defaults.max_retries),
            },
            responses: ResponsePolicy {
                invalid_value_status,
            },
            devices: fc.devices,
        })
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("invalid {key}: {value}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_sources() {
        let config = Config::from_sources(GatewayConfigFile::default(), env(&[])).unwrap();
        assert_eq!(config.api_server.port, DEFAULT_PORT);
        assert!(config.api_server.api_keys.is_empty());
        assert_eq!(config.transport.queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert_eq!(
            config.responses.invalid_value_status,
            InvalidValueStatus::NotFound
        );
    }

    #[test]
    fn env_overrides_file() {
        let fc = file::parse_config_file(
            "[server]\nport = 9000\napi_keys = [\"file-key\"]\n[transport]\nqueue_capacity = 2",
        )
        .unwrap();
        let config = Config::from_sources(
            fc,
            env(&[
                ("ATTRGW_PORT", "9100"),
                ("ATTRGW_API_KEYS", "a, b,,"),
                ("ATTRGW_INVALID_VALUE_STATUS", "bad_request"),
            ]),
        )
        .unwrap();

        assert_eq!(config.api_server.port, 9100);
        assert_eq!(config.api_server.api_keys, vec!["a", "b"]);
        assert_eq!(config.transport.queue_capacity, 2);
        assert_eq!(
            config.responses.invalid_value_status,
            InvalidValueStatus::BadRequest
        );
    }

    #[test]
    fn rejects_bad_env_values() {
        assert!(
            Config::from_sources(GatewayConfigFile::default(), env(&[("ATTRGW_PORT", "http")]))
                .is_err()
        );
        assert!(
            Config::from_sources(
                GatewayConfigFile::default(),
                env(&[("ATTRGW_QUEUE_CAPACITY", "0")])
            )
            .is_err()
        );
        assert!(
            Config::from_sources(
                GatewayConfigFile::default(),
                env(&[("ATTRGW_INVALID_VALUE_STATUS", "maybe")])
            )
            .is_err()
        );
    }
}
