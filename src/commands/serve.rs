//! Gallery server command handler
//!
//! Runs the live gallery:
//! - Initial scan (fatal on failure: there is nothing to serve yet)
//! - FileWatcher: full rescan on any change under the root, then a reload
//!   signal to every open page
//! - Rescan failures keep the last good index and are only logged
//! - HTTP server on the configured port, browser opened once bound
//!
//! The server runs until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use crate::browser::open_url;
use crate::cli::ServeArgs;
use crate::error::{GalleryError, Result};
use crate::server::{
    AppState, EventEmitter, FileWatcher, GalleryServer, GalleryState, GalleryUpdatedEvent,
    ReloadBus, ScanFailedEvent, ServerStatusEvent, WatcherHandle,
};

use super::CommandContext;

/// How long shutdown waits for open connections (e.g. reload streams)
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Run the gallery server
///
/// This creates a tokio runtime and blocks until the server stops.
pub fn run_serve(ctx: &CommandContext, args: &ServeArgs) -> Result<String> {
    let runtime = tokio::runtime::Runtime::new().map_err(|e| GalleryError::Server {
        message: format!("Failed to create tokio runtime: {}", e),
    })?;

    runtime.block_on(async { run_serve_async(ctx, args).await })?;

    Ok(String::new())
}

/// Async implementation of the gallery server
async fn run_serve_async(ctx: &CommandContext, args: &ServeArgs) -> Result<()> {
    let mut config = ctx.config.clone();
    args.apply(&mut config);
    config.validate()?;
    let root = config.resolved_root(&ctx.cwd);

    tracing::info!("Starting asset-gallery v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Scan root: {}", root.display());

    let emitter = EventEmitter::new(config.server.emit_events);
    let state = Arc::new(GalleryState::initialize(root.clone())?);
    if let Some(stats) = state.status().last_stats {
        tracing::info!(
            "Indexed {} assets in {} folders ({}ms)",
            stats.assets,
            stats.folders,
            stats.duration_ms
        );
        emitter.emit(&GalleryUpdatedEvent::from_stats(&stats));
    }

    let reload = ReloadBus::new();
    let watcher = if config.server.watch {
        start_watcher(&state, &reload, emitter)
    } else {
        tracing::info!("FileWatcher disabled");
        None
    };

    let mut render = config.render.clone();
    render.live_reload = watcher.is_some();

    let app_state = Arc::new(AppState::new(
        Arc::clone(&state),
        render,
        reload,
        config.server.static_dir.clone(),
    ));
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let server = GalleryServer::bind(&bind_addr, app_state).await?;

    let url = page_url(&config.server.host, server.addr().port());
    tracing::info!("running at : {}", url);
    let root_display = root.display().to_string();
    emitter.emit(&ServerStatusEvent::started(
        &root_display,
        &url,
        watcher.is_some(),
    ));

    if config.server.open_browser {
        let target = url.clone();
        tokio::task::spawn_blocking(move || {
            if let Err(e) = open_url(&target) {
                tracing::warn!("Could not open browser: {}", e);
            }
        });
    }

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");

    if let Some(handle) = watcher {
        let _ = tokio::task::spawn_blocking(move || handle.join()).await;
    }
    if tokio::time::timeout(SHUTDOWN_GRACE, server.shutdown())
        .await
        .is_err()
    {
        tracing::debug!("Connections still open after {:?}", SHUTDOWN_GRACE);
    }
    emitter.emit(&ServerStatusEvent::stopped(&root_display, &url));

    Ok(())
}

/// Start the watcher, degrading to a static gallery if that fails
fn start_watcher(
    state: &Arc<GalleryState>,
    reload: &ReloadBus,
    emitter: EventEmitter,
) -> Option<WatcherHandle> {
    let watch_state = Arc::clone(state);
    let watch_reload = reload.clone();
    let watcher = FileWatcher::new(state.root().to_path_buf());

    match watcher.start(move |_| {
        rescan_and_notify(&watch_state, &watch_reload, emitter);
    }) {
        Ok(handle) => {
            tracing::info!("Started FileWatcher for live reload");
            Some(handle)
        }
        Err(e) => {
            tracing::error!(
                "{}; serving {} without live reload",
                e,
                watcher.root().display()
            );
            None
        }
    }
}

/// Rebuild the index and tell open pages to reload
///
/// Returns `true` when a new index was installed.
pub fn rescan_and_notify(state: &GalleryState, reload: &ReloadBus, emitter: EventEmitter) -> bool {
    match state.rescan() {
        Ok(stats) => {
            tracing::info!(
                "Assets updated: {} assets in {} folders ({}ms)",
                stats.assets,
                stats.folders,
                stats.duration_ms
            );
            emitter.emit(&GalleryUpdatedEvent::from_stats(&stats));
            let listeners = reload.notify(state.generation());
            tracing::debug!("Reload sent to {} pages", listeners);
            true
        }
        Err(e) => {
            tracing::error!("Rescan failed, keeping previous index: {}", e);
            emitter.emit(&ScanFailedEvent::new(e.to_string()));
            false
        }
    }
}

/// Browser-facing URL for the bound port
fn page_url(host: &str, port: u16) -> String {
    match host {
        "127.0.0.1" | "0.0.0.0" | "::" | "::1" | "localhost" => {
            format!("http://localhost:{}", port)
        }
        other => format!("http://{}:{}", other, port),
    }
}
