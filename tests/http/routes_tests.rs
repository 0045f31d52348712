//! Page, asset and static routes

use asset_gallery::RenderOptions;
use reqwest::StatusCode;

use super::TestServer;
use crate::common::{assert_contains, AssetTree, PNG};

fn mounted_at_root() -> RenderOptions {
    RenderOptions {
        asset_mount: String::new(),
        ..RenderOptions::default()
    }
}

#[tokio::test]
async fn test_index_page_lists_every_folder() {
    let tree = AssetTree::new();
    tree.with_project_layout();
    let server = TestServer::start(
        tree.path().join("src/assets"),
        RenderOptions::default(),
        None,
    )
    .await;

    let response = reqwest::get(server.url("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"), "{}", content_type);

    let html = response.text().await.unwrap();
    assert_contains(&html, "<h2>Root</h2>");
    assert_contains(&html, "<h2>/icons</h2>");
    assert_contains(&html, "<h2>/icons/social</h2>");
    assert_contains(&html, "<h2>/photos</h2>");
    assert_contains(&html, "copyToClipboard('@/assets/icons/social/x.svg')");
    assert_contains(&html, "src=\"/src/assets/logo.png\"");
    assert!(!html.contains("LICENSE"));
}

#[tokio::test]
async fn test_index_page_reflects_rescan() {
    let tree = AssetTree::new();
    tree.with_scenario_layout();
    let server = TestServer::start(tree.path().to_path_buf(), mounted_at_root(), None).await;

    let before = reqwest::get(server.url("/")).await.unwrap().text().await.unwrap();
    assert_contains(&before, "<h2>/a/sub</h2>");

    tree.remove("a/sub/c.svg");
    server.state.rescan().unwrap();

    let after = reqwest::get(server.url("/")).await.unwrap().text().await.unwrap();
    assert!(!after.contains("<h2>/a/sub</h2>"));
    assert_contains(&after, "<h2>/a</h2>");
}

#[tokio::test]
async fn test_asset_served_under_mount() {
    let tree = AssetTree::new();
    tree.with_project_layout();
    let server = TestServer::start(
        tree.path().join("src/assets"),
        RenderOptions::default(),
        None,
    )
    .await;

    let response = reqwest::get(server.url("/src/assets/logo.png")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert_eq!(response.bytes().await.unwrap().as_ref(), PNG);

    let svg = reqwest::get(server.url("/src/assets/icons/home.svg")).await.unwrap();
    assert_eq!(svg.status(), StatusCode::OK);
    assert_eq!(svg.headers()["content-type"], "image/svg+xml");
}

#[tokio::test]
async fn test_asset_served_at_root_mount() {
    let tree = AssetTree::new();
    tree.with_scenario_layout();
    let server = TestServer::start(tree.path().to_path_buf(), mounted_at_root(), None).await;

    let response = reqwest::get(server.url("/a/b.png")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.bytes().await.unwrap().as_ref(), PNG);
}

#[tokio::test]
async fn test_missing_asset_is_404() {
    let tree = AssetTree::new();
    tree.with_scenario_layout();
    let server = TestServer::start(tree.path().to_path_buf(), mounted_at_root(), None).await;

    let response = reqwest::get(server.url("/a/nope.png")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_traversal_outside_root_is_404() {
    let tree = AssetTree::new();
    tree.with_project_layout();
    let server = TestServer::start(
        tree.path().join("src/assets"),
        RenderOptions::default(),
        None,
    )
    .await;

    // An encoded slash keeps the client from normalizing the dots away
    let response = reqwest::get(server.url("/src/assets/..%2fmain.ts"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_dir_fallback() {
    let tree = AssetTree::new();
    tree.with_project_layout()
        .add_file("public/gallery.css", b"body { margin: 0 }");
    let server = TestServer::start(
        tree.path().join("src/assets"),
        RenderOptions::default(),
        Some(tree.path().join("public")),
    )
    .await;

    let response = reqwest::get(server.url("/gallery.css")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/css");
    assert_eq!(response.text().await.unwrap(), "body { margin: 0 }");

    let missing = reqwest::get(server.url("/other.css")).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mount_without_leading_slash_is_served() {
    let tree = AssetTree::new();
    tree.with_scenario_layout();
    let render = RenderOptions {
        asset_mount: "assets".to_string(),
        ..RenderOptions::default()
    };
    let server = TestServer::start(tree.path().to_path_buf(), render, None).await;

    let response = reqwest::get(server.url("/assets/a/b.png")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.bytes().await.unwrap().as_ref(), PNG);
}
