//! Gallery events: JSON-lines status output and the live-reload broadcast
//!
//! Two consumers are served from one place:
//!
//! - When enabled, every event is written to stdout as a single JSON line so
//!   that wrapping tools can follow the server:
//!   ```json
//!   {"type":"gallery_updated","folders":3,"assets":41,"duration_ms":4,...}
//!   ```
//! - [`ReloadBus`] fans a reload signal out to every open browser page over
//!   Server-Sent Events after each successful rescan.

use serde::Serialize;
use std::io::{self, Write};
use tokio::sync::broadcast;

use crate::gallery::ScanStats;

/// Event emitter for sending JSON events to stdout
#[derive(Debug, Clone, Copy)]
pub struct EventEmitter {
    enabled: bool,
}

impl EventEmitter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Emit an event to stdout as JSON
    pub fn emit<E: GalleryEvent>(&self, event: &E) {
        if !self.enabled {
            return;
        }

        if let Some(json) = to_json_line(event) {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore write errors (reader may have gone away)
            let _ = writeln!(handle, "{}", json);
            let _ = handle.flush();
        }
    }
}

/// Wrapper for events with type field
#[derive(Serialize)]
struct EventWrapper<'a, P: Serialize> {
    #[serde(rename = "type")]
    event_type: &'static str,
    #[serde(flatten)]
    payload: &'a P,
}

/// Serialize an event with its `type` tag
pub fn to_json_line<E: GalleryEvent>(event: &E) -> Option<String> {
    let wrapper = EventWrapper {
        event_type: E::event_type(),
        payload: event,
    };
    serde_json::to_string(&wrapper).ok()
}

/// Trait for gallery events
pub trait GalleryEvent: Serialize {
    fn event_type() -> &'static str;
}

// ============================================================================
// Event Types
// ============================================================================

/// Emitted after a scan installs a new index
#[derive(Debug, Clone, Serialize)]
pub struct GalleryUpdatedEvent {
    pub folders: usize,
    pub assets: usize,
    pub duration_ms: u64,
    /// Timestamp (RFC 3339)
    pub timestamp: String,
}

impl GalleryEvent for GalleryUpdatedEvent {
    fn event_type() -> &'static str {
        "gallery_updated"
    }
}

impl GalleryUpdatedEvent {
    pub fn from_stats(stats: &ScanStats) -> Self {
        Self {
            folders: stats.folders,
            assets: stats.assets,
            duration_ms: stats.duration_ms,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Emitted when a rescan fails and the previous index is kept
#[derive(Debug, Clone, Serialize)]
pub struct ScanFailedEvent {
    pub error: String,
    pub timestamp: String,
}

impl GalleryEvent for ScanFailedEvent {
    fn event_type() -> &'static str {
        "scan_failed"
    }
}

impl ScanFailedEvent {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Emitted when the server starts or stops
#[derive(Debug, Clone, Serialize)]
pub struct ServerStatusEvent {
    /// Server status (started, stopped)
    pub status: String,
    /// Scan root
    pub root: String,
    /// Page URL
    pub url: String,
    /// Whether live reload is active
    pub watching: bool,
    pub timestamp: String,
}

impl GalleryEvent for ServerStatusEvent {
    fn event_type() -> &'static str {
        "server_status"
    }
}

impl ServerStatusEvent {
    pub fn started(root: &str, url: &str, watching: bool) -> Self {
        Self {
            status: "started".to_string(),
            root: root.to_string(),
            url: url.to_string(),
            watching,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn stopped(root: &str, url: &str) -> Self {
        Self {
            status: "stopped".to_string(),
            root: root.to_string(),
            url: url.to_string(),
            watching: false,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

// ============================================================================
// Live Reload Broadcast
// ============================================================================

/// Number of reload signals buffered per subscriber before it lags
const RELOAD_CHANNEL_CAPACITY: usize = 16;

/// Fan-out of reload signals to connected browser pages
///
/// Each message carries the index generation that triggered it. A subscriber
/// that falls behind skips straight to the newest signal, which is all a
/// page needs in order to reload.
#[derive(Debug, Clone)]
pub struct ReloadBus {
    tx: broadcast::Sender<u64>,
}

impl ReloadBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(RELOAD_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Signal all connected pages; returns how many were listening
    pub fn notify(&self, generation: u64) -> usize {
        self.tx.send(generation).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<u64> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ReloadBus {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
