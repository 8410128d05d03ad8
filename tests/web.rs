//! Browser tests for the JavaScript-facing engine.
//! Run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use chaos_tree::ChaosTree;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

const SMALL: &str = "seed: 9\nfoliage:\n  count: 64\nornaments:\n  count: 8\nphotos:\n  count: 3\n";

#[wasm_bindgen_test]
fn test_invalid_yaml_is_rejected() {
    let err = ChaosTree::with_config_yaml("foliage:\n  count: 0\n", 800.0, 600.0)
        .err()
        .and_then(|e| e.as_string())
        .unwrap_or_default();
    assert!(err.contains("foliage"), "unexpected error: {}", err);
}

#[wasm_bindgen_test]
fn test_wheel_scatters_tree() {
    let mut tree = ChaosTree::with_config_yaml(SMALL, 800.0, 600.0).unwrap();
    tree.on_wheel(-1000.0);
    for _ in 0..120 {
        tree.render(1.0 / 60.0);
    }
    assert_eq!(tree.progress(), 0.0);
    assert_eq!(tree.status_label(), "CHAOS DETECTED");
    assert_eq!(tree.foliage_data().len(), 64 * 7);
}

#[wasm_bindgen_test]
fn test_swipe_and_spin() {
    let mut tree = ChaosTree::with_config_yaml(SMALL, 390.0, 844.0).unwrap();
    tree.on_touch_start(100.0, 400.0);
    tree.on_touch_move(100.0, 500.0);
    tree.on_touch_end();
    assert!((tree.progress() - 0.5).abs() < 1e-5);

    tree.on_pointer_move(0.8, 0.0);
    tree.on_pointer_down();
    tree.render(0.1);
    assert!((tree.group_rotation() - 0.16).abs() < 1e-5);
    tree.on_pointer_up();
    assert_eq!(tree.camera_position().len(), 3);
}
