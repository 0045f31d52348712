//! Server-sent reload stream

use std::time::Duration;

use asset_gallery::commands::serve::rescan_and_notify;
use asset_gallery::server::EventEmitter;
use asset_gallery::RenderOptions;
use reqwest::StatusCode;

use super::TestServer;
use crate::common::{assert_contains, AssetTree};

/// Read from the stream until `needle` shows up or the deadline passes
async fn read_until(response: &mut reqwest::Response, needle: &str) -> String {
    let mut received = String::new();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !received.contains(needle) {
        let chunk = tokio::time::timeout_at(deadline, response.chunk())
            .await
            .unwrap_or_else(|_| panic!("timed out waiting for '{}': {}", needle, received))
            .unwrap();
        match chunk {
            Some(bytes) => received.push_str(&String::from_utf8_lossy(&bytes)),
            None => panic!("stream closed before '{}': {}", needle, received),
        }
    }
    received
}

async fn wait_for_subscriber(server: &TestServer) {
    for _ in 0..100 {
        if server.reload.subscriber_count() > 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("reload stream never subscribed");
}

#[tokio::test]
async fn test_reload_event_after_rescan() {
    let tree = AssetTree::new();
    tree.with_scenario_layout();
    let server = TestServer::start(tree.path().to_path_buf(), RenderOptions::default(), None).await;

    let mut stream = reqwest::get(server.url("/__livereload")).await.unwrap();
    assert_eq!(stream.status(), StatusCode::OK);
    let content_type = stream.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/event-stream"), "{}", content_type);
    wait_for_subscriber(&server).await;

    tree.add_image("a/new.svg");
    assert!(rescan_and_notify(
        &server.state,
        &server.reload,
        EventEmitter::new(false)
    ));

    let received = read_until(&mut stream, "data: 2").await;
    assert_contains(&received, "event: reload");
}

#[tokio::test]
async fn test_failed_rescan_sends_no_reload() {
    let tree = AssetTree::new();
    tree.with_project_layout();
    let root = tree.path().join("src/assets");
    let server = TestServer::start(root.clone(), RenderOptions::default(), None).await;

    let mut stream = reqwest::get(server.url("/__livereload")).await.unwrap();
    wait_for_subscriber(&server).await;

    std::fs::remove_dir_all(&root).unwrap();
    assert!(!rescan_and_notify(
        &server.state,
        &server.reload,
        EventEmitter::new(false)
    ));

    // Nothing but possibly keep-alive comments within a short window
    let quiet = tokio::time::timeout(Duration::from_millis(300), stream.chunk()).await;
    if let Ok(Ok(Some(bytes))) = quiet {
        assert!(!String::from_utf8_lossy(&bytes).contains("event: reload"));
    }

    // The last good index is still served
    let html = reqwest::get(server.url("/")).await.unwrap().text().await.unwrap();
    assert_contains(&html, "<h2>/icons/social</h2>");
    assert!(server.state.status().last_error.is_some());
}
