//! FCPXML Marker Resolver WASM Module
//!
//! Translates a Final Cut Pro X interchange document into a project graph in
//! which every marker carries an exact, frame-correct position on the
//! timeline that contains it.

pub mod api;
pub mod converters;
pub mod errors;
pub mod models;

// Re-export commonly used types
pub use converters::{parse_document, parse_document_with, parse_file, ParseSettings};
pub use errors::{FcpxError, Result};
pub use models::*;

use wasm_bindgen::prelude::*;

// Runs once when the WASM module is instantiated.
#[wasm_bindgen(start)]
pub fn start() {
    install_panic_hook();
    if init_logging() {
        log::info!("FCPXML marker resolver WASM module initialized");
    }
}

#[cfg(feature = "console_error_panic_hook")]
fn install_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn install_panic_hook() {}

#[cfg(feature = "console_log")]
fn init_logging() -> bool {
    console_log::init_with_level(log::Level::Debug).is_ok()
}

#[cfg(not(feature = "console_log"))]
fn init_logging() -> bool {
    false
}
