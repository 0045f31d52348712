//! HTTP surface of the gallery
//!
//! | Route                    | Response                                   |
//! |--------------------------|--------------------------------------------|
//! | `GET /`                  | rendered gallery page                      |
//! | `GET {asset_mount}/*`    | raw files from the scan root               |
//! | `GET /__livereload`      | SSE stream, one `reload` event per rescan  |
//! | fallback                 | files from `static_dir`, otherwise 404     |

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::error::{GalleryError, Result};
use crate::render::{normalize_asset_mount, render_gallery, RenderOptions, LIVE_RELOAD_PATH};

use super::events::ReloadBus;
use super::state::GalleryState;

/// Shared state for request handlers
pub struct AppState {
    pub gallery: Arc<GalleryState>,
    pub render: RenderOptions,
    pub reload: ReloadBus,
    /// Directories searched by the fallback route, in order
    pub static_roots: Vec<PathBuf>,
}

impl AppState {
    pub fn new(
        gallery: Arc<GalleryState>,
        render: RenderOptions,
        reload: ReloadBus,
        static_dir: Option<PathBuf>,
    ) -> Self {
        let mut static_roots = Vec::new();
        // An empty mount means the scan root is served at `/` itself
        if render.asset_mount.trim_matches('/').is_empty() {
            static_roots.push(gallery.root().to_path_buf());
        }
        static_roots.extend(static_dir);
        Self {
            gallery,
            render,
            reload,
            static_roots,
        }
    }
}

/// Build the gallery router
///
/// Fails with a config error when the asset mount is not a usable route.
pub fn router(state: Arc<AppState>) -> Result<Router> {
    let mut app = Router::new()
        .route("/", get(index_page))
        .route(LIVE_RELOAD_PATH, get(live_reload));

    let mount = normalize_asset_mount(&state.render.asset_mount)?;
    if !mount.is_empty() {
        app = app.route(&format!("{}/*path", mount), get(serve_asset));
    }

    Ok(app.fallback(serve_static).with_state(state))
}

async fn index_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let index = state.gallery.snapshot();
    Html(render_gallery(&index, &state.render))
}

async fn serve_asset(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Response {
    serve_file(state.gallery.root(), &path).await
}

async fn serve_static(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let requested = urlencoding::decode(uri.path())
        .map(|p| p.into_owned())
        .unwrap_or_else(|_| uri.path().to_string());

    for root in &state.static_roots {
        if let Some(file) = resolve_within(root, &requested).await {
            return file_response(&file).await;
        }
    }
    not_found()
}

async fn live_reload(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let rx = state.reload.subscribe();
    tracing::debug!(
        "Live reload client connected ({} listening)",
        state.reload.subscriber_count()
    );

    let stream = BroadcastStream::new(rx).filter_map(|message| match message {
        Ok(generation) => Some(Ok(Event::default()
            .event("reload")
            .data(generation.to_string()))),
        // Lagged: the page reloads on the next signal anyway
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

async fn serve_file(root: &FsPath, relative: &str) -> Response {
    match resolve_within(root, relative).await {
        Some(file) => file_response(&file).await,
        None => not_found(),
    }
}

/// Resolve `relative` under `root`, refusing anything that escapes it
async fn resolve_within(root: &FsPath, relative: &str) -> Option<PathBuf> {
    let base = tokio::fs::canonicalize(root).await.ok()?;
    let resolved = tokio::fs::canonicalize(base.join(relative.trim_start_matches('/')))
        .await
        .ok()?;

    // Path traversal guard
    if !resolved.starts_with(&base) {
        tracing::debug!("Rejected path outside {}: {}", base.display(), relative);
        return None;
    }

    let meta = tokio::fs::metadata(&resolved).await.ok()?;
    meta.is_file().then_some(resolved)
}

async fn file_response(path: &FsPath) -> Response {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("Failed to read {}: {}", path.display(), e);
            return not_found();
        }
    };

    let content_type = content_type_for(path);
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from(bytes))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

/// Content type by file extension
pub fn content_type_for(path: &FsPath) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "css" => "text/css",
        "js" | "mjs" => "application/javascript",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "txt" => "text/plain",
        "woff2" => "font/woff2",
        "woff" => "font/woff",
        _ => "application/octet-stream",
    }
}

// ============================================================================
// Server lifecycle
// ============================================================================

/// A running HTTP server; shuts down gracefully when dropped
pub struct GalleryServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl GalleryServer {
    /// Bind `addr` and serve the gallery in a background task
    pub async fn bind(addr: &str, state: Arc<AppState>) -> Result<Self> {
        let app = router(state)?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| GalleryError::Server {
                message: format!("Failed to bind {}: {}", addr, e),
            })?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = result {
                tracing::error!("HTTP server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for the server task to finish
    pub async fn shutdown(mut self) {
        if let Some(sender) = self.shutdown.take() {
            let _ = sender.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for GalleryServer {
    fn drop(&mut self) {
        if let Some(sender) = self.shutdown.take() {
            let _ = sender.send(());
        }
    }
}
