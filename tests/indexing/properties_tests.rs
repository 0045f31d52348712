//! Coverage, uniqueness and path-normalization properties of `build_index`

use std::collections::{BTreeMap, BTreeSet};

use asset_gallery::{build_index, is_image_file, GalleryError, GalleryIndex, ROOT_KEY};

use crate::common::{assert_forward_slashes, AssetTree};

fn as_sets(index: &GalleryIndex) -> BTreeMap<String, BTreeSet<String>> {
    index
        .groups()
        .iter()
        .map(|g| (g.folder.clone(), g.assets.iter().cloned().collect()))
        .collect()
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_scenario_nested_folders() {
    let tree = AssetTree::new();
    tree.with_scenario_layout();

    let index = build_index(tree.path()).unwrap();

    let json = serde_json::to_value(&index).unwrap();
    let expected: serde_json::Value =
        serde_json::json!({ "/a": ["/a/b.png"], "/a/sub": ["/a/sub/c.svg"] });
    // Key order follows discovery, so compare as maps
    assert_eq!(
        json.as_object().unwrap().clone().into_iter().collect::<BTreeMap<_, _>>(),
        expected.as_object().unwrap().clone().into_iter().collect::<BTreeMap<_, _>>()
    );
    assert!(index.assets().all(|a| !a.contains("readme")));
}

#[test]
fn test_scenario_empty_tree() {
    let tree = AssetTree::new();
    tree.add_dir("nothing/here");

    let index = build_index(tree.path()).unwrap();
    assert!(index.is_empty());
    assert_eq!(serde_json::to_string(&index).unwrap(), "{}");
}

#[test]
fn test_scenario_deleted_image_drops_folder_key() {
    let tree = AssetTree::new();
    tree.with_scenario_layout();
    assert!(build_index(tree.path()).unwrap().contains_folder("/a/sub"));

    tree.remove("a/sub/c.svg");

    let index = build_index(tree.path()).unwrap();
    assert!(!index.contains_folder("/a/sub"));
    assert!(index.contains_folder("/a"));
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn test_every_image_listed_exactly_once() {
    let tree = AssetTree::new();
    let images = [
        "logo.png",
        "icons/home.svg",
        "icons/HOME2.SVG",
        "icons/social/x.svg",
        "icons/social/y.jpeg",
        "photos/2024/team.jpg",
        "photos/2024/raw/DSC_0001.JPG",
    ];
    for image in images {
        tree.add_image(image);
    }
    tree.add_file("photos/2024/clip.mp4", b"x")
        .add_file("notes.txt", b"x")
        .add_file("icons/social/x.svg.bak", b"x");

    let index = build_index(tree.path()).unwrap();

    let listed: Vec<&str> = index.assets().collect();
    let unique: BTreeSet<&str> = listed.iter().copied().collect();
    assert_eq!(listed.len(), images.len(), "no omissions: {:?}", listed);
    assert_eq!(unique.len(), listed.len(), "no duplicates: {:?}", listed);

    for image in images {
        assert!(unique.contains(format!("/{}", image).as_str()), "missing {}", image);
    }
}

#[test]
fn test_non_images_never_listed() {
    let tree = AssetTree::new();
    tree.add_file("docs/readme.txt", b"x")
        .add_file("media/intro.mp4", b"x")
        .add_file("media/cover.webp", b"x")
        .add_image("media/cover.png");

    let index = build_index(tree.path()).unwrap();
    for asset in index.assets() {
        let name = asset.rsplit('/').next().unwrap();
        assert!(is_image_file(name), "unexpected asset {}", asset);
    }
    assert!(!index.contains_folder("/docs"));
    assert_eq!(index.asset_count(), 1);
}

#[test]
fn test_folder_keys_unique_and_match_parents() {
    let tree = AssetTree::new();
    tree.with_project_layout();

    let index = build_index(tree.path()).unwrap();
    let keys: Vec<&str> = index.folders().collect();
    let unique: BTreeSet<&str> = keys.iter().copied().collect();
    assert_eq!(keys.len(), unique.len());

    for group in index.groups() {
        for asset in &group.assets {
            let parent = match asset.rfind('/') {
                Some(0) => ROOT_KEY,
                Some(idx) => &asset[..idx],
                None => panic!("asset without slash: {}", asset),
            };
            assert_eq!(parent, group.folder);
        }
    }
    assert!(index.contains_folder("/src/assets/icons/social"));
    assert!(!index.contains_folder("/src"));
}

#[test]
fn test_paths_use_forward_slashes() {
    let tree = AssetTree::new();
    tree.with_project_layout();

    let index = build_index(tree.path()).unwrap();
    assert_forward_slashes(index.assets());
    assert_forward_slashes(index.folders());
}

#[test]
fn test_rescans_of_unchanged_tree_agree() {
    let tree = AssetTree::new();
    tree.with_project_layout().with_scenario_layout();

    let first = build_index(tree.path()).unwrap();
    let second = build_index(tree.path()).unwrap();
    assert_eq!(as_sets(&first), as_sets(&second));
}

#[test]
fn test_missing_root_is_an_error() {
    let tree = AssetTree::new();
    let err = build_index(&tree.path().join("src/assets")).unwrap_err();
    assert!(matches!(err, GalleryError::RootNotFound { .. }), "{}", err);
}
