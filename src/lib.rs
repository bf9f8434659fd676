//! Bubble Doll core crate.
//!
//! Two-phase browser toy: drag clothing onto the doll's matching drop zones,
//! then pop the bubbles that float up by dragging the doll's arm into them.
//! The page provides the markup surface (see README) and calls `start_game()`
//! once; everything after that is driven by browser events.

use wasm_bindgen::prelude::*;

pub mod game;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Wire the dress-up surface and hand control to the browser event loop.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    game::start()
}

/// Deterministically halt the bubble spawner and animation loop.
///
/// Nothing in normal play calls this; it exists so embedders can tear the
/// session down without reloading the page.
#[wasm_bindgen]
pub fn stop_game() {
    game::shutdown()
}
