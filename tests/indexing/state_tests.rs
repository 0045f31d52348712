//! GalleryState lifecycle: initial scan, replacement, degraded rescans

use std::sync::Arc;
use std::thread;

use asset_gallery::GalleryState;

use crate::common::AssetTree;

#[test]
fn test_snapshots_are_never_partial() {
    let tree = AssetTree::new();
    for i in 0..20 {
        tree.add_image(&format!("set/{}.png", i));
    }
    let state = Arc::new(GalleryState::initialize(tree.path().to_path_buf()).unwrap());

    let writer = {
        let state = Arc::clone(&state);
        thread::spawn(move || {
            for _ in 0..20 {
                state.rescan().unwrap();
            }
        })
    };

    for _ in 0..200 {
        assert_eq!(state.snapshot().asset_count(), 20);
    }
    writer.join().unwrap();
    assert_eq!(state.generation(), 21);
}

#[test]
fn test_rescan_after_delete_keeps_root_readable() {
    let tree = AssetTree::new();
    tree.with_scenario_layout();
    let state = GalleryState::initialize(tree.path().to_path_buf()).unwrap();

    tree.remove("a/b.png");
    let stats = state.rescan().unwrap();

    assert_eq!(stats.assets, 1);
    assert_eq!(stats.folders, 1);
    assert!(state.status().last_error.is_none());
}
