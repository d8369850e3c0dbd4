//! # Configuration Management
//!
//! Decoder settings for the header codec.
//!
//! Short headers carry no length byte for their destination connection id, so
//! the receiving side has to know the width it expects. That width, and how
//! strictly the flags byte is checked, live in [`CodecConfig`].
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - TOML strings via `from_toml()`
//! - Direct instantiation with defaults, optionally through `default_with_overrides()`

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Width of the connection ids built from a `u64`
pub const DEFAULT_CONNECTION_ID_LEN: usize = 8;

/// Largest connection id QUIC v1 allows
pub const MAX_CONNECTION_ID_LEN: usize = 20;

/// Decoder configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Destination connection id width expected in short headers (0 = absent)
    pub short_header_dcid_len: usize,

    /// Upper bound for any connection id on the wire
    pub max_connection_id_len: usize,

    /// Reject headers whose fixed bit is 0
    pub require_fixed_bit: bool,

    /// Reject headers with non-zero reserved bits
    pub reject_reserved_bits: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            short_header_dcid_len: DEFAULT_CONNECTION_ID_LEN,
            max_connection_id_len: MAX_CONNECTION_ID_LEN,
            require_fixed_bit: true,
            reject_reserved_bits: true,
        }
    }
}

impl CodecConfig {
    /// Read decoder settings from a TOML file. The result is validated.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Parse decoder settings from TOML, filling missing keys with defaults.
    ///
    /// Fails with [`ProtocolError::ConfigError`] on malformed TOML or on
    /// settings `validate` rejects.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config = toml::from_str::<Self>(content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to parse TOML: {e}")))?;
        config.validate_strict()?;
        Ok(config)
    }

    /// Default settings with `mutator` applied, e.g. to decode short headers
    /// without a connection id
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// The default settings rendered as TOML
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Write the settings to `path` as TOML
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| ProtocolError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Check connection id bounds: the maximum lies in 1..=20 and the short
    /// header width fits under it. Returns one message per problem found.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.max_connection_id_len == 0 {
            errors.push("Max connection id length must be greater than 0".to_string());
        } else if self.max_connection_id_len > MAX_CONNECTION_ID_LEN {
            errors.push(format!(
                "Max connection id length too large: {} (maximum: {MAX_CONNECTION_ID_LEN})",
                self.max_connection_id_len
            ));
        }

        if self.short_header_dcid_len > self.max_connection_id_len {
            errors.push(format!(
                "Short header connection id length {} exceeds max connection id length {}",
                self.short_header_dcid_len, self.max_connection_id_len
            ));
        }

        errors
    }

    /// `validate` folded into a single [`ProtocolError::ConfigError`]
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ProtocolError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}
