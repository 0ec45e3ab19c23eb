// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{DEFAULT_LOG_FILTER, DEFAULT_PREFER_HARDWARE};
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Framework options.
///
/// Every field is optional in the file; an empty document yields the defaults.
///
/// # Fields
/// * `prefer_hardware` - Bind channels to the hardware engine when one is
///   registered and hands out a channel. `false` pins every channel to the
///   software engine.
/// * `log_filter` - `tracing` filter directive for the demo binary, used when
///   `RUST_LOG` is unset
///
/// # Example
/// ```yaml
/// prefer_hardware: false
/// log_filter: "accel_engine=debug"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AccelConfig {
    #[serde(default = "default_prefer_hardware")]
    pub prefer_hardware: bool,
    #[serde(default)]
    pub log_filter: Option<String>,
}

fn default_prefer_hardware() -> bool {
    DEFAULT_PREFER_HARDWARE
}

impl Default for AccelConfig {
    fn default() -> Self {
        Self {
            prefer_hardware: DEFAULT_PREFER_HARDWARE,
            log_filter: None,
        }
    }
}

impl AccelConfig {
    /// The configured filter, or the built-in default.
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(filter) = &self.log_filter {
            EnvFilter::try_new(filter).map_err(|e| {
                ConfigError::Invalid(format!("log_filter '{}': {}", filter, e))
            })?;
        }
        Ok(())
    }
}

/// Load and validate a config file. The format follows the extension:
/// `.yaml`/`.yml` or `.toml`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AccelConfig, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let cfg: AccelConfig = match extension.as_deref() {
        Some("yaml") | Some("yml") => {
            let content = fs::read_to_string(path)?;
            // An empty YAML document deserializes as unit, not a mapping.
            if content.trim().is_empty() {
                AccelConfig::default()
            } else {
                serde_yaml::from_str(&content)?
            }
        }
        Some("toml") => toml::from_str(&fs::read_to_string(path)?)?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    cfg.validate()?;
    Ok(cfg)
}
