// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading accel configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// Only `.yaml`, `.yml` and `.toml` files are understood.
    #[error("Unsupported config file extension: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
