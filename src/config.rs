use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, Result};

/// Main configuration for the Cover-Compositor service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Storage folder layout
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|_| ConfigError::ParseFailed {
            path: path.display().to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "server.host".to_string(),
                value: self.host.clone(),
            }
            .into());
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                key: "server.port".to_string(),
                value: self.port.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Storage folder configuration
///
/// Folder names are joined onto the data directory chosen at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Folder for raw uploaded photos
    pub upload_folder: String,

    /// Folder for cover template images
    pub template_folder: String,

    /// Folder for generated cover outputs
    pub generated_folder: String,

    /// Catalog records file
    pub catalog_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_folder: "uploads".to_string(),
            template_folder: "cover_templates".to_string(),
            generated_folder: "generated_covers".to_string(),
            catalog_file: "models.json".to_string(),
        }
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        let folders = [
            ("storage.upload_folder", &self.upload_folder),
            ("storage.template_folder", &self.template_folder),
            ("storage.generated_folder", &self.generated_folder),
            ("storage.catalog_file", &self.catalog_file),
        ];

        for (key, value) in &folders {
            if value.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                }
                .into());
            }
        }

        // The three folders must be distinct or uploads would shadow covers
        let names = [
            &self.upload_folder,
            &self.template_folder,
            &self.generated_folder,
        ];
        for i in 0..names.len() {
            for j in (i + 1)..names.len() {
                if names[i] == names[j] {
                    return Err(ConfigError::InvalidValue {
                        key: "storage.folders".to_string(),
                        value: names[i].to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(())
    }
}
