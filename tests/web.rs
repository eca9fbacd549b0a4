//! Browser smoke tests: `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use funland_server::{handle_request, init_session};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn boots_and_serves_menu() {
    assert_eq!(init_session(r#"{"seed": 42}"#), "ok");
    let html = handle_request("GET", "/", "", "");
    assert!(html.contains("Math Adventures"));
}

#[wasm_bindgen_test]
fn roll_schedules_resume() {
    init_session("");
    handle_request("GET", "/count", "", "");
    let html = handle_request("POST", "/api/count/roll", "", "");
    assert!(html.contains("/api/count/resume"));
}
