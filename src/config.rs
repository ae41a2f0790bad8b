use std::fs;
use std::io;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscConfig {
    /// Host messages are sent to.
    pub server_host: String,
    pub server_port: u16,
    /// Local interface the listener binds.
    pub listening_host: String,
    /// Local port inbound messages arrive on.
    pub client_port: u16,
    /// Prefix for prompt addresses that do not start with `/`.
    pub base_path: Option<String>,
}

impl Default for OscConfig {
    fn default() -> Self {
        OscConfig {
            server_host: "127.0.0.1".to_string(),
            server_port: 53700,
            listening_host: "0.0.0.0".to_string(),
            client_port: 53701,
            base_path: None,
        }
    }
}

impl OscConfig {
    pub fn listening_addr(&self) -> String {
        format!("{}:{}", self.listening_host, self.client_port)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub osc: OscConfig,
    pub debug: bool,
}

impl Config {
    /// Read `path`, writing a default file first if it does not exist.
    pub fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Config::default();
            config.save(path)?;
            info!("Created default config at {}", path.display());
            return Ok(config);
        }
        Self::load(path)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}
