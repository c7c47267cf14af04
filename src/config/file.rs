//! TOML configuration file loading
//!
//! Supports `~/.config/attrgw/config.toml` as a persistent config source.
//! Every field is optional; the file overlays the built-in defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;
use crate::attributes::InvalidValueStatus;
use crate::devices::DeviceRegistration;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct GatewayConfigFile {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Device transport configuration
    #[serde(default)]
    pub transport: TransportFileConfig,

    /// Response formatting
    #[serde(default)]
    pub responses: ResponsesFileConfig,

    /// Devices to register at startup
    #[serde(default)]
    pub devices: Vec<DeviceRegistration>,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// API server port
    pub port: Option<u16>,

    /// Accepted API keys (empty = unauthenticated)
    pub api_keys: Option<Vec<String>>,
}

/// Transport configuration
#[derive(Debug, Default, Deserialize)]
pub struct TransportFileConfig {
    /// Per-device queue depth
    pub queue_capacity: Option<usize>,

    /// Retries for frames the radio reports busy
    pub max_retries: Option<u32>,
}

/// Response formatting configuration
#[derive(Debug, Default, Deserialize)]
pub struct ResponsesFileConfig {
    /// `not_found` (default) or `bad_request`
    pub invalid_value_status: Option<InvalidValueStatus>,
}

/// Parse configuration file contents
///
/// # Errors
///
/// Returns error if the contents are not valid TOML for this schema
pub fn parse_config_file(content: &str) -> Result<GatewayConfigFile> {
    Ok(toml::from_str(content)?)
}

/// Load the TOML config file from `path`, or the standard path when `None`
///
/// Returns `GatewayConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file(path: Option<&Path>) -> GatewayConfigFile {
    let Some(path) = path.map(Path::to_path_buf).or_else(config_file_path) else {
        return GatewayConfigFile::default();
    };

    if !path.exists() {
        return GatewayConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match parse_config_file(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                GatewayConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            GatewayConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/attrgw/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("attrgw").join("config.toml"))
}
