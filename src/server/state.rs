//! Thread-safe gallery state
//!
//! Owns the current [`GalleryIndex`] for the lifetime of the server. The index
//! is held as `Arc<GalleryIndex>` behind a `parking_lot::RwLock`:
//!
//! - Readers clone the `Arc` under a short read lock and render from the
//!   snapshot without holding any lock.
//! - A rescan builds the new index with no lock held, then swaps the `Arc`
//!   under the write lock. Readers see either the old or the new index,
//!   never a partial one.
//! - A failed rescan leaves the current index in place.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};

use crate::error::Result;
use crate::gallery::{build_index_with_stats, GalleryIndex, ScanStats};

/// Point-in-time view of the state's bookkeeping
#[derive(Debug, Clone)]
pub struct StateStatus {
    /// Scan root
    pub root: PathBuf,
    /// Number of successful index installs
    pub generation: u64,
    /// When the current index was installed
    pub last_scan: Option<DateTime<Utc>>,
    /// Stats of the current index
    pub last_stats: Option<ScanStats>,
    /// Error from the most recent scan, cleared on success
    pub last_error: Option<String>,
}

/// Shared owner of the current gallery index
pub struct GalleryState {
    /// Current index. LOCKING ORDER: acquire before `status`.
    index: RwLock<Arc<GalleryIndex>>,
    /// Scan bookkeeping. LOCKING ORDER: acquire last.
    status: Mutex<StateStatus>,
    /// Scan root (immutable after creation)
    root: PathBuf,
}

impl GalleryState {
    /// Create an empty state for a scan root
    pub fn new(root: PathBuf) -> Self {
        Self {
            index: RwLock::new(Arc::new(GalleryIndex::new())),
            status: Mutex::new(StateStatus {
                root: root.clone(),
                generation: 0,
                last_scan: None,
                last_stats: None,
                last_error: None,
            }),
            root,
        }
    }

    /// Create the state and install the first index
    ///
    /// Fails if the initial scan fails, since there is no earlier index to
    /// fall back on.
    pub fn initialize(root: PathBuf) -> Result<Self> {
        let state = Self::new(root);
        let (index, stats) = build_index_with_stats(&state.root)?;
        state.replace(index, stats);
        Ok(state)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current index snapshot
    pub fn snapshot(&self) -> Arc<GalleryIndex> {
        Arc::clone(&self.index.read())
    }

    /// Install a new index, discarding the previous one
    pub fn replace(&self, index: GalleryIndex, stats: ScanStats) {
        *self.index.write() = Arc::new(index);

        let mut status = self.status.lock();
        status.generation += 1;
        status.last_scan = Some(Utc::now());
        status.last_stats = Some(stats);
        status.last_error = None;
    }

    /// Record a failed scan, keeping the current index
    pub fn record_failure(&self, message: impl Into<String>) {
        self.status.lock().last_error = Some(message.into());
    }

    pub fn status(&self) -> StateStatus {
        self.status.lock().clone()
    }

    pub fn generation(&self) -> u64 {
        self.status.lock().generation
    }

    /// Rebuild the index from disk
    ///
    /// On success the new index is installed; on failure the error is
    /// recorded and returned and the previous index stays servable.
    pub fn rescan(&self) -> Result<ScanStats> {
        match build_index_with_stats(&self.root) {
            Ok((index, stats)) => {
                self.replace(index, stats);
                Ok(stats)
            }
            Err(e) => {
                self.record_failure(e.to_string());
                Err(e)
            }
        }
    }
}
