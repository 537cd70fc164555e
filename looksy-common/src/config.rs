//! Configuration loading for Looksy services
//!
//! Resolution priority, highest first:
//! 1. Environment variables (`LOOKSY_*`)
//! 2. TOML config file (`~/.config/looksy/looksy.toml`)
//! 3. Compiled defaults

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5810;
const DEFAULT_AI_BASE_URL: &str = "https://ai.gateway.lovable.dev/functions/v1";
const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;

/// Remote AI service endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiServiceConfig {
    /// Base URL for the analysis/generation functions
    pub base_url: String,
    /// Bearer token; empty means no Authorization header is sent
    #[serde(default)]
    pub api_key: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_ai_timeout")]
    pub timeout_secs: u64,
}

fn default_ai_timeout() -> u64 {
    DEFAULT_AI_TIMEOUT_SECS
}

impl Default for AiServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_AI_BASE_URL.to_string(),
            api_key: String::new(),
            timeout_secs: DEFAULT_AI_TIMEOUT_SECS,
        }
    }
}

/// Service configuration for looksy-ui
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LooksyConfig {
    /// HTTP bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// HTTP port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Remote AI service endpoint
    #[serde(default)]
    pub ai: AiServiceConfig,
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for LooksyConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: DEFAULT_PORT,
            ai: AiServiceConfig::default(),
        }
    }
}

impl LooksyConfig {
    /// Socket address string for the HTTP listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Load configuration with ENV → TOML → default resolution
    pub fn load() -> Self {
        let mut config = match load_config_file() {
            Ok(path) => match read_toml_config(&path) {
                Ok(config) => {
                    info!("Configuration loaded from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Ignoring unreadable config file: {}", e);
                    LooksyConfig::default()
                }
            },
            Err(_) => LooksyConfig::default(),
        };

        // Environment overrides (highest priority)
        if let Ok(addr) = std::env::var("LOOKSY_BIND_ADDRESS") {
            config.bind_address = addr;
        }
        if let Ok(port) = std::env::var("LOOKSY_PORT") {
            match port.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => warn!("LOOKSY_PORT is not a valid port number: {}", port),
            }
        }
        if let Ok(url) = std::env::var("LOOKSY_AI_BASE_URL") {
            config.ai.base_url = url;
        }
        if let Ok(key) = std::env::var("LOOKSY_AI_API_KEY") {
            config.ai.api_key = key;
        }

        config
    }
}

/// Parse a TOML config file into LooksyConfig
pub fn read_toml_config(path: &std::path::Path) -> Result<LooksyConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read config failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse config failed: {}", e)))
}

/// Get default configuration file path for the platform
fn load_config_file() -> Result<PathBuf> {
    let path = dirs::config_dir()
        .map(|d| d.join("looksy").join("looksy.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if path.exists() {
        Ok(path)
    } else {
        Err(Error::Config(format!("Config file not found: {:?}", path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = LooksyConfig::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert!(config.ai.api_key.is_empty());
        assert_eq!(config.listen_address(), format!("127.0.0.1:{}", DEFAULT_PORT));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
bind_address = "0.0.0.0"
port = 8080

[ai]
base_url = "http://localhost:9000"
api_key = "test-key"
"#
        )
        .unwrap();

        let config = read_toml_config(file.path()).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.ai.base_url, "http://localhost:9000");
        assert_eq!(config.ai.api_key, "test-key");
        assert_eq!(config.ai.timeout_secs, DEFAULT_AI_TIMEOUT_SECS);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "port = 9999\n").unwrap();

        let config = read_toml_config(file.path()).unwrap();
        assert_eq!(config.port, 9999);
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.ai.base_url, DEFAULT_AI_BASE_URL);
    }
}
