//! Full-screen decorative glitch overlay for web pages.
//!
//! The effect core (configuration resolution, the burst scheduler and its
//! virtual clock, per-tick frame planning) is plain Rust and compiles on any
//! target, so scheduling and drawing decisions are testable with `cargo
//! test` on the host. The browser pathway lives in [`wasm`] and only exists
//! on wasm32: canvas surface, rAF loop, exported page API, auto-start.

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod scheduler;

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    pub mod overlay;
    mod render;

    /// Module entry point: wires up the auto-start hooks so pages get a
    /// default overlay without calling anything. Failures past this point
    /// are logged to the console, never thrown into the page.
    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        overlay::install_auto_start()
    }
}
