//! Error types and exit codes for asset-gallery

use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Main error type for asset-gallery operations
#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Scan root not found: {path}")]
    RootNotFound { path: String },

    #[error("Failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File watcher error: {message}")]
    Watch { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Server error: {message}")]
    Server { message: String },

    #[error("Output error: {message}")]
    Output { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GalleryError {
    /// Build a scan error for the path that failed
    pub fn scan(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Scan {
            path: path.into(),
            source,
        }
    }

    /// Numeric exit status:
    /// - 0: Success
    /// - 1: Root not found / IO or output error
    /// - 2: Scan failure
    /// - 3: Configuration error
    /// - 4: Server or watcher failure
    pub fn exit_status(&self) -> u8 {
        match self {
            Self::RootNotFound { .. } => 1,
            Self::Io(_) | Self::Output { .. } => 1,
            Self::Scan { .. } => 2,
            Self::Config { .. } => 3,
            Self::Server { .. } | Self::Watch { .. } => 4,
        }
    }

    /// Convert error to a process exit code
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

/// Result type alias for asset-gallery operations
pub type Result<T> = std::result::Result<T, GalleryError>;
