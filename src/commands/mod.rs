//! Command modules for the asset-gallery CLI
//!
//! Each command module implements a single top-level command:
//! - `serve` - Live gallery over HTTP with file watching
//! - `scan` - Print the gallery index
//! - `render` - Write the gallery page once
//!
//! All command handlers take their `Args` struct from `cli.rs` and a shared
//! `CommandContext` carrying the loaded configuration.

pub mod render;
pub mod scan;
pub mod serve;

pub use render::run_render;
pub use scan::run_scan;
pub use serve::run_serve;

use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;

use crate::cli::OutputFormat;
use crate::config::GalleryConfig;
use crate::error::Result;

/// Shared context passed to all command handlers
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Output format (text or json)
    pub format: OutputFormat,
    /// Show verbose output
    pub verbose: bool,
    /// Configuration loaded from file, before command-line overrides
    pub config: GalleryConfig,
    /// Working directory that relative roots resolve against
    pub cwd: PathBuf,
}

impl CommandContext {
    /// Create a context for the current working directory
    pub fn new(format: OutputFormat, verbose: bool, config: GalleryConfig) -> Result<Self> {
        Ok(Self {
            format,
            verbose,
            config,
            cwd: std::env::current_dir()?,
        })
    }

    /// Create a context rooted at an explicit directory
    pub fn with_cwd(format: OutputFormat, config: GalleryConfig, cwd: &Path) -> Self {
        Self {
            format,
            verbose: false,
            config,
            cwd: cwd.to_path_buf(),
        }
    }
}

/// Initialize tracing (logs to stderr)
///
/// `RUST_LOG` directives take effect alongside the given default level.
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(level: &str) {
    let mut filter = EnvFilter::from_default_env();
    match format!("asset_gallery={}", level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring invalid log level '{}': {}", level, e),
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
