//! CLI argument definitions using clap with subcommand architecture
//!
//! Running without a subcommand behaves like `serve`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::GalleryConfig;

/// Local image asset gallery with live reload
#[derive(Parser, Debug)]
#[command(name = "asset-gallery")]
#[command(about = "Browse a folder of image assets in the browser and copy their import paths")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file to load instead of the default lookup
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Output format (applies to `scan`)
    #[arg(short, long, default_value = "text", value_enum, global = true)]
    pub format: OutputFormat,

    /// Show verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the live gallery over HTTP
    Serve(ServeArgs),

    /// Scan the asset root and print the gallery index
    Scan(ScanArgs),

    /// Write the gallery page to a file or stdout
    Render(RenderArgs),
}

/// Output format for `scan`
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Folder headings followed by indented asset paths
    #[default]
    Text,
    /// JSON object mapping folder to asset list
    Json,
}

// ============================================
// Serve Subcommand
// ============================================

/// Arguments for the serve command
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Directory to scan for images (default: src/assets)
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Port to listen on (default: 8000)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to (default: 127.0.0.1)
    #[arg(long)]
    pub host: Option<String>,

    /// Do not open a browser window after startup
    #[arg(long)]
    pub no_open: bool,

    /// Disable the file watcher and live reload
    #[arg(long)]
    pub no_watch: bool,

    /// Extra directory served at `/` (e.g. for an external stylesheet)
    #[arg(long, value_name = "DIR")]
    pub static_dir: Option<PathBuf>,

    /// Write JSON-lines status events to stdout
    #[arg(long)]
    pub emit_events: bool,

    #[command(flatten)]
    pub page: PageArgs,
}

// ============================================
// Scan Subcommand
// ============================================

/// Arguments for the scan command
#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// Directory to scan for images (default: src/assets)
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,
}

// ============================================
// Render Subcommand
// ============================================

/// Arguments for the render command
#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    /// Directory to scan for images (default: src/assets)
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    /// Write the page here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub page: PageArgs,
}

/// Page presentation flags shared by `serve` and `render`
#[derive(Args, Debug, Default)]
pub struct PageArgs {
    /// Page title and heading
    #[arg(long)]
    pub title: Option<String>,

    /// Prefix for copied import paths (default: @/assets)
    #[arg(long, value_name = "PREFIX")]
    pub alias_prefix: Option<String>,

    /// URL prefix the asset root is served under (default: /src/assets)
    #[arg(long, value_name = "PATH")]
    pub asset_mount: Option<String>,

    /// Link this stylesheet instead of the inline styles
    #[arg(long, value_name = "HREF")]
    pub stylesheet: Option<String>,

    /// Hide the background colour picker
    #[arg(long)]
    pub no_color_picker: bool,
}

impl PageArgs {
    /// Overlay the flags that were given onto a loaded config
    pub fn apply(&self, config: &mut GalleryConfig) {
        let render = &mut config.render;
        if let Some(title) = &self.title {
            render.title = title.clone();
        }
        if let Some(prefix) = &self.alias_prefix {
            render.alias_prefix = prefix.clone();
        }
        if let Some(mount) = &self.asset_mount {
            render.asset_mount = mount.clone();
        }
        if let Some(href) = &self.stylesheet {
            render.stylesheet = Some(href.clone());
        }
        if self.no_color_picker {
            render.color_picker = false;
        }
    }
}

impl ServeArgs {
    /// Overlay the flags that were given onto a loaded config
    pub fn apply(&self, config: &mut GalleryConfig) {
        if let Some(root) = &self.root {
            config.scan.root = root.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if self.no_open {
            config.server.open_browser = false;
        }
        if self.no_watch {
            config.server.watch = false;
        }
        if let Some(dir) = &self.static_dir {
            config.server.static_dir = Some(dir.clone());
        }
        if self.emit_events {
            config.server.emit_events = true;
        }
        self.page.apply(config);
    }
}
