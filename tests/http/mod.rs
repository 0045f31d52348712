//! HTTP surface tests
//!
//! Each test binds a real server on an ephemeral port and talks to it with
//! reqwest.

pub mod live_reload_tests;
pub mod routes_tests;

use std::path::PathBuf;
use std::sync::Arc;

use asset_gallery::server::{AppState, GalleryServer};
use asset_gallery::{GalleryState, ReloadBus, RenderOptions};

/// Running server plus handles the tests poke at
pub struct TestServer {
    pub server: GalleryServer,
    pub state: Arc<GalleryState>,
    pub reload: ReloadBus,
}

impl TestServer {
    pub async fn start(root: PathBuf, render: RenderOptions, static_dir: Option<PathBuf>) -> Self {
        let state = Arc::new(GalleryState::initialize(root).expect("initial scan"));
        let reload = ReloadBus::new();
        let app = Arc::new(AppState::new(
            Arc::clone(&state),
            render,
            reload.clone(),
            static_dir,
        ));
        let server = GalleryServer::bind("127.0.0.1:0", app)
            .await
            .expect("bind");
        Self {
            server,
            state,
            reload,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.server.addr(), path)
    }
}
