//! asset-gallery configuration management.
//!
//! Settings come from, in order of precedence:
//! 1. Command-line flags
//! 2. The file named by `--config`
//! 3. `./asset-gallery.toml`
//! 4. The user config file:
//!    - Linux: ~/.config/asset-gallery/config.toml
//!    - macOS: ~/Library/Application Support/asset-gallery/config.toml
//!    - Windows: %APPDATA%\asset-gallery\config.toml
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GalleryError, Result};
use crate::render::{normalize_asset_mount, RenderOptions};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "asset-gallery.toml";

/// asset-gallery configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GalleryConfig {
    /// Scan settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Page rendering settings
    #[serde(default)]
    pub render: RenderOptions,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Scan configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Directory to index; relative paths resolve against the working directory
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

fn default_root() -> PathBuf {
    PathBuf::from("src/assets")
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Open the default browser once the listener is bound
    pub open_browser: bool,
    /// Rescan and reload on filesystem changes
    pub watch: bool,
    /// Extra directory served at `/` (e.g. for an external stylesheet)
    pub static_dir: Option<PathBuf>,
    /// Write JSON-lines status events to stdout
    pub emit_events: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            open_browser: true,
            watch: true,
            static_dir: None,
            emit_events: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl GalleryConfig {
    /// Load configuration, preferring an explicit path over the lookup chain
    ///
    /// An explicit path must exist; the implicit locations are optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(GalleryError::Config {
                    message: format!("Config file not found: {}", path.display()),
                });
            }
            return Self::load_from(path);
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::load_from(&local);
        }

        match Self::user_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path, falling back to defaults if absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| GalleryError::Config {
            message: format!("Failed to parse {}: {}", path.display(), e),
        })?;
        tracing::debug!("Loaded config from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    /// Check and normalize values once file and flag layers are merged
    pub fn validate(&mut self) -> Result<()> {
        self.render.asset_mount = normalize_asset_mount(&self.render.asset_mount)?;
        Ok(())
    }

    /// Per-user config file location
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("asset-gallery").join("config.toml"))
    }

    /// Absolute scan root, resolved against `cwd` when relative
    pub fn resolved_root(&self, cwd: &Path) -> PathBuf {
        if self.scan.root.is_absolute() {
            self.scan.root.clone()
        } else {
            cwd.join(&self.scan.root)
        }
    }

    /// Render as TOML, e.g. to print the effective configuration
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GalleryError::Config {
            message: format!("Failed to serialize config: {}", e),
        })
    }
}
