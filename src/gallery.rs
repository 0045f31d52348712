//! Asset indexer: scans a directory tree and groups image files by folder
//!
//! The gallery index maps a folder key to the image files found directly in
//! that folder. Keys and entries are root-relative, use forward slashes and
//! start with `/`. Images sitting in the scan root itself are grouped under
//! [`ROOT_KEY`].
//!
//! ```text
//! assets/
//! ├── a/b.png          ──►  "/a"     => ["/a/b.png"]
//! ├── a/sub/c.svg      ──►  "/a/sub" => ["/a/sub/c.svg"]
//! └── a/readme.md          (skipped)
//! ```
//!
//! The index is always rebuilt from scratch. Groups appear in the order their
//! first image was discovered, and entries keep `read_dir` order.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

use ahash::AHashMap;
use serde::Serialize;

use crate::error::{GalleryError, Result};

/// Image extensions recognised by the indexer (compared case-insensitively)
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "svg"];

/// Folder key used for images that live directly in the scan root
pub const ROOT_KEY: &str = "/";

/// One folder and the image files discovered in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderGroup {
    /// Root-relative folder path, e.g. `/icons/social`
    pub folder: String,
    /// Root-relative image paths, e.g. `/icons/social/x.svg`
    pub assets: Vec<String>,
}

impl FolderGroup {
    /// Whether this group holds images from the scan root itself
    pub fn is_root(&self) -> bool {
        self.folder == ROOT_KEY
    }
}

/// Mapping from folder key to its images, in discovery order
#[derive(Debug, Clone, Default)]
pub struct GalleryIndex {
    groups: Vec<FolderGroup>,
    positions: AHashMap<String, usize>,
}

impl GalleryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an asset to its folder, creating the folder key on first use
    pub fn insert(&mut self, folder: String, asset: String) {
        match self.positions.get(&folder) {
            Some(&pos) => self.groups[pos].assets.push(asset),
            None => {
                self.positions.insert(folder.clone(), self.groups.len());
                self.groups.push(FolderGroup {
                    folder,
                    assets: vec![asset],
                });
            }
        }
    }

    /// Images for a folder key, if the folder has any
    pub fn get(&self, folder: &str) -> Option<&[String]> {
        self.positions
            .get(folder)
            .map(|&pos| self.groups[pos].assets.as_slice())
    }

    pub fn contains_folder(&self, folder: &str) -> bool {
        self.positions.contains_key(folder)
    }

    /// Folder groups in discovery order
    pub fn groups(&self) -> &[FolderGroup] {
        &self.groups
    }

    pub fn folders(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.folder.as_str())
    }

    /// Every asset path across all folders
    pub fn assets(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|g| g.assets.iter().map(String::as_str))
    }

    pub fn folder_count(&self) -> usize {
        self.groups.len()
    }

    pub fn asset_count(&self) -> usize {
        self.groups.iter().map(|g| g.assets.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl PartialEq for GalleryIndex {
    fn eq(&self, other: &Self) -> bool {
        self.groups == other.groups
    }
}

impl Eq for GalleryIndex {}

impl Serialize for GalleryIndex {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.folder, &group.assets)?;
        }
        map.end()
    }
}

/// Summary of a completed scan
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ScanStats {
    pub folders: usize,
    pub assets: usize,
    pub duration_ms: u64,
}

impl ScanStats {
    fn new(index: &GalleryIndex, elapsed: Duration) -> Self {
        Self {
            folders: index.folder_count(),
            assets: index.asset_count(),
            duration_ms: elapsed.as_millis() as u64,
        }
    }
}

/// Check whether a file name carries one of the image extensions
///
/// Only the suffix after the last `.` is tested, so `.png` on its own counts
/// while `png` (no dot) does not.
pub fn is_image_file(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => IMAGE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known)),
        None => false,
    }
}

/// Express `path` relative to `root` with forward slashes and a leading `/`
///
/// Returns `None` when `path` is not under `root`. The root itself maps to
/// [`ROOT_KEY`].
pub fn asset_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut out = String::new();
    for component in relative.components() {
        if let Component::Normal(name) = component {
            out.push('/');
            // Backslashes are legal in Unix file names; keep stored paths
            // free of them on every host.
            out.push_str(&name.to_string_lossy().replace('\\', "/"));
        }
    }
    if out.is_empty() {
        out.push_str(ROOT_KEY);
    }
    Some(out)
}

/// Folder key for an asset path produced by [`asset_path`]
pub fn folder_key(asset: &str) -> &str {
    match asset.rfind('/') {
        Some(0) | None => ROOT_KEY,
        Some(idx) => &asset[..idx],
    }
}

/// Scan `root` and build a fresh gallery index
///
/// Any filesystem error aborts the scan; no partial index is returned.
pub fn build_index(root: &Path) -> Result<GalleryIndex> {
    build_index_with_stats(root).map(|(index, _)| index)
}

/// Same as [`build_index`], also reporting counts and timing
pub fn build_index_with_stats(root: &Path) -> Result<(GalleryIndex, ScanStats)> {
    let started = Instant::now();

    let meta = fs::metadata(root).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => GalleryError::RootNotFound {
            path: root.display().to_string(),
        },
        _ => GalleryError::scan(root, e),
    })?;
    if !meta.is_dir() {
        return Err(GalleryError::RootNotFound {
            path: root.display().to_string(),
        });
    }

    let mut index = GalleryIndex::new();
    let mut visited: HashSet<PathBuf> = HashSet::new();
    let mut stack: Vec<PathBuf> = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let canonical = fs::canonicalize(&dir).map_err(|e| GalleryError::scan(&dir, e))?;
        if !visited.insert(canonical) {
            tracing::debug!("Skipping already visited directory {}", dir.display());
            continue;
        }

        let entries = fs::read_dir(&dir).map_err(|e| GalleryError::scan(&dir, e))?;
        let mut subdirs = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| GalleryError::scan(&dir, e))?;
            let path = entry.path();
            // Follows symlinks, so linked files and folders are indexed too
            let meta = fs::metadata(&path).map_err(|e| GalleryError::scan(&path, e))?;

            if meta.is_dir() {
                subdirs.push(path);
                continue;
            }

            let name = entry.file_name();
            if !is_image_file(&name.to_string_lossy()) {
                continue;
            }

            if let Some(asset) = asset_path(root, &path) {
                let folder = folder_key(&asset).to_string();
                index.insert(folder, asset);
            }
        }

        // Reverse so subdirectories are visited in listing order
        stack.extend(subdirs.into_iter().rev());
    }

    let stats = ScanStats::new(&index, started.elapsed());
    tracing::debug!(
        "Scanned {}: {} assets in {} folders ({}ms)",
        root.display(),
        stats.assets,
        stats.folders,
        stats.duration_ms
    );

    Ok((index, stats))
}
