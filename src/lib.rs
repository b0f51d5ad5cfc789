/// Tab Saver - save, tag and search browser tabs
/// Built with Rust + WASM

pub mod clock;
pub mod error;
pub mod search;
pub mod storage;
pub mod store;
pub mod tab_data;

#[cfg(target_arch = "wasm32")]
mod bindings;

#[cfg(target_arch = "wasm32")]
pub use bindings::TabSaver;
pub use error::{BackendError, StoreError, StoreResult};
pub use store::{StoreConfig, TabStore};
pub use tab_data::{NewTab, TabPatch, TabRecord};

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Called from the background script's runtime.onInstalled listener
#[wasm_bindgen(js_name = onInstalled)]
pub fn on_installed() {
    log::info!("Tab Saver Pro installed successfully");
}

// Comma-separated form field to tag list, for the popup's add/edit form
#[wasm_bindgen(js_name = parseTags)]
pub fn parse_tag_input(input: &str) -> Vec<String> {
    tab_data::parse_tags(input)
}
