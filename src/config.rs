// src/config.rs
//! Configuration management with platform-specific storage

use crate::{
    error::{GpsError, Result},
    monitor::NmeaSource,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub source_type: String, // "serial", "file"
    pub serial_port: Option<String>,
    pub serial_baudrate: Option<u32>,
    pub replay_file: Option<PathBuf>,
    pub interval_ms: u64,
    pub output: String, // "text", "json"
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::platform_default()
    }
}

impl MonitorConfig {
    /// Get platform-specific default configuration
    pub fn platform_default() -> Self {
        #[cfg(windows)]
        let serial_port = "COM4";

        #[cfg(not(windows))]
        let serial_port = "/dev/ttyUSB0";

        Self {
            source_type: "serial".to_string(),
            serial_port: Some(serial_port.to_string()),
            serial_baudrate: Some(9600),
            replay_file: None,
            interval_ms: 1000,
            output: "text".to_string(),
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    /// Load from a config file, falling back to defaults if it does not exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::platform_default());
        }

        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| GpsError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| GpsError::Config(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save to a config file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| GpsError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let contents = serde_json::to_string_pretty(self)?;

        std::fs::write(config_path, contents)
            .map_err(|e| GpsError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Get config file path
    pub fn get_config_path() -> Result<PathBuf> {
        #[cfg(windows)]
        let base = std::env::var("APPDATA")
            .map(PathBuf::from)
            .map_err(|_| GpsError::Config("APPDATA environment variable not set".to_string()))?;

        #[cfg(not(windows))]
        let base = std::env::var("HOME")
            .map(|home| PathBuf::from(home).join(".config"))
            .map_err(|_| GpsError::Config("HOME environment variable not set".to_string()))?;

        Ok(base.join("nmea-monitor").join("config.json"))
    }

    /// Update serial port settings
    pub fn update_serial(&mut self, port: String, baudrate: u32) {
        self.source_type = "serial".to_string();
        self.serial_port = Some(port);
        self.serial_baudrate = Some(baudrate);
    }

    /// Update replay file settings
    pub fn update_file(&mut self, path: PathBuf) {
        self.source_type = "file".to_string();
        self.replay_file = Some(path);
    }

    pub fn json_output(&self) -> bool {
        self.output == "json"
    }

    /// Build the input source described by this configuration
    pub fn to_source(&self) -> Result<NmeaSource> {
        match self.source_type.as_str() {
            "serial" => {
                let port = self
                    .serial_port
                    .clone()
                    .ok_or_else(|| GpsError::Config("No serial port configured".to_string()))?;
                Ok(NmeaSource::Serial {
                    port,
                    baudrate: self.serial_baudrate.unwrap_or(9600),
                })
            }
            "file" => {
                let path = self
                    .replay_file
                    .clone()
                    .ok_or_else(|| GpsError::Config("No replay file configured".to_string()))?;
                Ok(NmeaSource::File { path })
            }
            other => Err(GpsError::Config(format!("Unknown source type: {}", other))),
        }
    }
}
