//! Configuration file handling for ~/.pkgdock/config.ini.
//!
//! Loads and saves user configuration with sensible defaults. The console
//! only needs to know where the store lives and how the listing paginates.

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default store API base URL.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080/api";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

/// Connection settings for the package store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Base URL of the store's REST API.
    pub gateway_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Listing display settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSettings {
    /// Rows per page in listings and file views.
    pub page_size: usize,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            page_size: crate::listing::DEFAULT_PAGE_SIZE,
        }
    }
}

/// User configuration from `~/.pkgdock/config.ini`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigFile {
    pub store: StoreSettings,
    pub listing: ListingSettings,
}

impl ConfigFile {
    /// Load configuration from the default path (~/.pkgdock/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        Self::from_ini(&ini)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let path = config_file_path();
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        self.to_ini()
            .write_to_file(path)
            .map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            let config = Self::default();
            config.save_to(&path)?;
        }
        Ok(path)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigFileError> {
        let mut config = Self::default();

        if let Some(store) = ini.section(Some("store")) {
            if let Some(url) = store.get("gateway_url") {
                config.store.gateway_url = url.to_string();
            }
            if let Some(raw) = store.get("timeout_secs") {
                config.store.timeout_secs =
                    raw.parse().map_err(|_| ConfigFileError::InvalidValue {
                        section: "store".to_string(),
                        key: "timeout_secs".to_string(),
                        value: raw.to_string(),
                        reason: "expected a positive integer".to_string(),
                    })?;
            }
        }

        if let Some(listing) = ini.section(Some("listing")) {
            if let Some(raw) = listing.get("page_size") {
                let size: usize = raw.parse().map_err(|_| ConfigFileError::InvalidValue {
                    section: "listing".to_string(),
                    key: "page_size".to_string(),
                    value: raw.to_string(),
                    reason: "expected a positive integer".to_string(),
                })?;
                if size == 0 {
                    return Err(ConfigFileError::InvalidValue {
                        section: "listing".to_string(),
                        key: "page_size".to_string(),
                        value: raw.to_string(),
                        reason: "page size must be at least 1".to_string(),
                    });
                }
                config.listing.page_size = size;
            }
        }

        Ok(config)
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        ini.with_section(Some("store"))
            .set("gateway_url", self.store.gateway_url.as_str())
            .set("timeout_secs", self.store.timeout_secs.to_string());
        ini.with_section(Some("listing"))
            .set("page_size", self.listing.page_size.to_string());
        ini
    }
}

/// Get the path to the config directory (~/.pkgdock).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pkgdock")
}

/// Get the path to the config file (~/.pkgdock/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
