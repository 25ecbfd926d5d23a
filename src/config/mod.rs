// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/trinetra-rs

//! Configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,

    /// Application version
    pub version: String,

    /// Log level
    pub log_level: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Zone store configuration
    pub store: StoreConfig,

    /// Auto-dispatch configuration
    pub dispatch: DispatchConfig,

    /// Simulator configuration
    pub simulator: SimulatorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "Trinetra".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            dispatch: DispatchConfig::default(),
            simulator: SimulatorConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            // Create parent directories
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("trinetra"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP API port
    pub http_port: u16,

    /// WebSocket fan-out port
    pub ws_port: u16,

    /// Maximum concurrent WebSocket observers
    pub ws_max_clients: usize,

    /// Broadcast channel capacity per event kind
    pub channel_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 4000,
            ws_port: 8765,
            ws_max_clients: 64,
            channel_capacity: 1000,
        }
    }
}

/// Zone store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Samples kept in the per-zone ZLI history ring
    pub history_len: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { history_len: 20 }
    }
}

/// Auto-dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Undo window in whole seconds
    pub window_secs: u32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self { window_secs: 7 }
    }
}

/// Simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Base URL of the ingestion endpoint the producer posts to
    pub target_url: String,

    /// Seconds between readings
    pub interval_secs: f64,

    /// Zone ids the producer cycles through
    pub zones: Vec<String>,

    /// Probability of a crowd surge on any reading
    pub surge_probability: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            target_url: "http://localhost:4000".to_string(),
            interval_secs: 1.0,
            zones: vec![
                "GHAT1".to_string(),
                "GHAT2".to_string(),
                "MAIN".to_string(),
            ],
            surge_probability: 0.08,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.http_port, config.server.http_port);
        assert_eq!(parsed.dispatch.window_secs, 7);
        assert_eq!(parsed.simulator.zones.len(), 3);
    }
}
