//! Link configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via RADIOLINK_CONFIG or `from_file`)
//! 3. Environment variables

use crate::error::ConfigError;
use crate::fragment::MAX_FRAGMENTS;
use crate::packet::{BROADCAST_ID, DEFAULT_VERSION};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for one end of a radio link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Id stamped into outgoing packets as the transmitter.
    pub transmitter_id: u16,
    /// Id outgoing packets are addressed to.
    pub receiver_id: u16,
    /// Packet protocol version written into outgoing packets.
    pub version: u8,
    /// Reject received packets whose CRC8 does not match.
    pub verify_checksums: bool,
    /// Upper bound on fragments buffered for one message.
    pub max_fragments: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            transmitter_id: 0x0000,
            receiver_id: BROADCAST_ID,
            version: DEFAULT_VERSION,
            verify_checksums: true,
            max_fragments: MAX_FRAGMENTS,
        }
    }
}

impl LinkConfig {
    /// Loads configuration from file, then applies environment variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("RADIOLINK_CONFIG") {
            config = Self::from_file(&path)?;
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: LinkConfig =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from environment variables only.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var("RADIOLINK_TRANSMITTER_ID") {
            if let Some(parsed) = parse_id(&id) {
                self.transmitter_id = parsed;
            }
        }

        if let Ok(id) = std::env::var("RADIOLINK_RECEIVER_ID") {
            if let Some(parsed) = parse_id(&id) {
                self.receiver_id = parsed;
            }
        }

        if let Ok(version) = std::env::var("RADIOLINK_VERSION") {
            if let Ok(parsed) = version.parse() {
                self.version = parsed;
            }
        }

        if let Ok(verify) = std::env::var("RADIOLINK_VERIFY_CHECKSUMS") {
            self.verify_checksums = verify == "1" || verify.to_lowercase() == "true";
        }
    }

    /// Checks that the settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_fragments == 0 || self.max_fragments > MAX_FRAGMENTS {
            return Err(ConfigError::ValidationError(format!(
                "max_fragments must be between 1 and {}, got {}",
                MAX_FRAGMENTS, self.max_fragments
            )));
        }
        Ok(())
    }

    /// Saves configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }
}

/// Accepts decimal or `0x`-prefixed hex station ids.
fn parse_id(value: &str) -> Option<u16> {
    let value = value.trim();
    match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}
