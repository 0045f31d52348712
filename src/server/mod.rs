//! Live gallery server
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        GalleryState                          │
//! │            RwLock<Arc<GalleryIndex>>  +  scan status         │
//! └──────────────────────────────────────────────────────────────┘
//!        ▲ replace()                          │ snapshot()
//!        │                                    ▼
//! ┌──────────────┐   notify()   ┌──────────────────────────────┐
//! │ FileWatcher  │─────────────>│ HTTP (axum)                  │
//! │ + rescan     │  ReloadBus   │  /  assets  /__livereload    │
//! └──────────────┘              └──────────────────────────────┘
//! ```
//!
//! # Locking Order
//!
//! 1. `GalleryState::index` (RwLock)
//! 2. `GalleryState::status` (Mutex)
//!
//! Scans run with no lock held; only the final swap takes the write lock.
//!
//! # Modules
//!
//! - `state` - Thread-safe owner of the current index
//! - `watcher` - File system watching
//! - `events` - JSON-lines events and the live-reload broadcast
//! - `http` - Routes and server lifecycle

pub mod events;
pub mod http;
pub mod state;
pub mod watcher;

pub use events::{
    EventEmitter, GalleryEvent, GalleryUpdatedEvent, ReloadBus, ScanFailedEvent,
    ServerStatusEvent,
};
pub use http::{router, AppState, GalleryServer};
pub use state::{GalleryState, StateStatus};
pub use watcher::{FileWatcher, WatcherHandle};
