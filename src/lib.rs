//! asset-gallery: live-reloading local gallery for image assets
//!
//! Scans a directory tree for images (`png`, `jpg`, `jpeg`, `svg`), groups
//! them by folder and serves an HTML page where clicking an image copies its
//! import path (e.g. `@/assets/icons/home.svg`). Any change under the root
//! triggers a full rescan and reloads open pages.
//!
//! # Example
//!
//! ```no_run
//! use asset_gallery::{build_index, render_gallery, RenderOptions};
//! use std::path::Path;
//!
//! let index = build_index(Path::new("src/assets"))?;
//! for group in index.groups() {
//!     println!("{}: {} images", group.folder, group.assets.len());
//! }
//! let html = render_gallery(&index, &RenderOptions::default());
//! # Ok::<(), asset_gallery::GalleryError>(())
//! ```

pub mod browser;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod gallery;
pub mod render;
pub mod server;

// Re-export commonly used types
pub use cli::{Cli, Commands, OutputFormat};
pub use config::GalleryConfig;
pub use error::{GalleryError, Result};
pub use gallery::{
    asset_path, build_index, build_index_with_stats, folder_key, is_image_file, FolderGroup,
    GalleryIndex, ScanStats, IMAGE_EXTENSIONS, ROOT_KEY,
};
pub use render::{render_gallery, RenderOptions};
pub use server::{FileWatcher, GalleryState, ReloadBus};
