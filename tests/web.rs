#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use glitch_overlay::wasm::overlay;

fn canvas_count() -> u32 {
    web_sys::window()
        .unwrap()
        .document()
        .unwrap()
        .get_elements_by_tag_name("canvas")
        .length()
}

#[wasm_bindgen_test]
fn start_mounts_exactly_one_canvas() {
    overlay::stop();
    let base = canvas_count();

    overlay::start(None);
    assert_eq!(canvas_count(), base + 1);

    // restarting detaches the prior surface before mounting the new one
    overlay::start(Some(r#"{"intensity": 0.6}"#.to_string()));
    assert_eq!(canvas_count(), base + 1);

    overlay::stop();
    assert_eq!(canvas_count(), base);
}

#[wasm_bindgen_test]
fn stop_is_idempotent_and_safe_before_start() {
    // the module's auto-start hooks may have mounted an overlay already, so
    // assert against a post-stop baseline rather than an empty document
    overlay::stop();
    let base = canvas_count();
    overlay::stop();
    assert_eq!(canvas_count(), base);
    overlay::stop();
    assert_eq!(canvas_count(), base);
}

#[wasm_bindgen_test]
fn controls_are_no_ops_without_an_active_overlay() {
    overlay::stop();
    let base = canvas_count();
    overlay::burst(Some(50.0));
    overlay::set_colors(r##"{"scanline": "#00ffff"}"##);
    overlay::set_random_range(r#"{"frequencyMin": 100}"#);
    overlay::set_intensity(0.9);
    assert_eq!(canvas_count(), base);
}

#[wasm_bindgen_test]
fn malformed_config_still_mounts_with_defaults() {
    overlay::stop();
    let base = canvas_count();
    overlay::start(Some("{not json".to_string()));
    assert_eq!(canvas_count(), base + 1);
    overlay::stop();
}
