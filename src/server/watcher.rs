//! File system watcher driving gallery rescans
//!
//! Uses the `notify` crate to watch the scan root recursively. Every
//! notification counts as a change, including ones for non-image files, and
//! there is no debounce window.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌─────────────┐
//! │   notify    │────>│  watcher thread  │────>│  on_change  │
//! │   watcher   │     │ drain + coalesce │     │  (rescan)   │
//! └─────────────┘     └──────────────────┘     └─────────────┘
//! ```
//!
//! The callback runs on one dedicated thread, so rescans never overlap.
//! Notifications that pile up while a rescan is running are drained and
//! folded into a single follow-up call.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use notify::{Event, RecursiveMode, Watcher};

use crate::error::{GalleryError, Result};

/// How often the watcher thread checks its stop flag while idle
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Recursive watcher for a scan root
pub struct FileWatcher {
    root: PathBuf,
}

impl FileWatcher {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start watching and call `on_change` after filesystem changes
    ///
    /// Fails if the underlying watch cannot be set up (root missing,
    /// permission denied, watch limit reached).
    pub fn start<F>(&self, on_change: F) -> Result<WatcherHandle>
    where
        F: FnMut(usize) + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<notify::Result<Event>>();

        let mut watcher = notify::recommended_watcher(tx).map_err(|e| GalleryError::Watch {
            message: format!("Failed to create watcher: {}", e),
        })?;
        watcher
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(|e| GalleryError::Watch {
                message: format!("Failed to watch {}: {}", self.root.display(), e),
            })?;

        tracing::info!("[WATCHER] Watching {}", self.root.display());

        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);
        let thread = std::thread::Builder::new()
            .name("asset-watcher".to_string())
            .spawn(move || {
                run_loop(rx, thread_running, on_change);
                // Keep the watcher alive until the loop exits
                drop(watcher);
            })?;

        Ok(WatcherHandle {
            running,
            thread: Some(thread),
        })
    }
}

fn run_loop<F>(rx: Receiver<notify::Result<Event>>, running: Arc<AtomicBool>, mut on_change: F)
where
    F: FnMut(usize),
{
    while running.load(Ordering::SeqCst) {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(first) => {
                let mut changes = count_change(first);
                // Fold in whatever else is already queued
                while let Ok(next) = rx.try_recv() {
                    changes += count_change(next);
                }
                if changes == 0 {
                    continue;
                }
                if !running.load(Ordering::SeqCst) {
                    break;
                }
                tracing::debug!("[WATCHER] {} notifications, rescanning", changes);
                on_change(changes);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                tracing::warn!("[WATCHER] Event channel closed, stopping");
                break;
            }
        }
    }
    tracing::debug!("[WATCHER] Stopped");
}

fn count_change(event: notify::Result<Event>) -> usize {
    match event {
        Ok(event) => {
            tracing::trace!("[WATCHER] {:?} {:?}", event.kind, event.paths);
            1
        }
        Err(e) => {
            tracing::error!("[WATCHER] Watch error: {}", e);
            0
        }
    }
}

/// Handle for controlling a running watcher
///
/// Dropping the handle stops the watcher.
pub struct WatcherHandle {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl WatcherHandle {
    /// Stop the watcher; an in-flight callback is allowed to finish
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop and wait for the watcher thread to exit
    pub fn join(mut self) {
        self.stop();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

// ============================================================================
// Tests
// ============================================================================
