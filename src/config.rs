// src/config.rs

//! Configuration structures for eva.
//!
//! Every section deserializes with `#[serde(default)]`, so a config file only
//! needs the fields it wants to change. The library never reads [`CONFIG`]
//! itself; an [`EventLoop`](crate::app::EventLoop) is always handed a
//! `Config` value explicitly, which keeps several loops in one process (or
//! one test binary) independent.

use crate::pixels::Pixel;
use anyhow::{Context, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "EVA_CONFIG";

/// Process-wide configuration, loaded on first use from `EVA_CONFIG`.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);

/// Root of the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub framebuffer: FramebufferConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Loads a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid eva config JSON")
    }

    /// Loads from `EVA_CONFIG` when set, falling back to defaults.
    pub fn from_env() -> Self {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => match Self::load(Path::new(&path)) {
                Ok(config) => {
                    info!("Loaded config from {}", Path::new(&path).display());
                    config
                }
                Err(e) => {
                    warn!("{:#}. Using default config.", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }
}

/// Initial window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title, UTF-8.
    pub title: String,
    /// Initial width in window units.
    pub width: i32,
    /// Initial height in window units.
    pub height: i32,
    /// Capacity of the native title buffer in UTF-16 units, terminator included.
    pub title_capacity: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            title: "eva".to_string(),
            width: 800,
            height: 600,
            title_capacity: 256,
        }
    }
}

/// Framebuffer storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramebufferConfig {
    /// Colour written into freshly allocated storage.
    pub fill: Pixel,
}

impl Default for FramebufferConfig {
    fn default() -> Self {
        FramebufferConfig {
            fill: Pixel::BLACK,
        }
    }
}

/// Logging settings for the binary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `env_logger` filter when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "info".to_string(),
        }
    }
}
