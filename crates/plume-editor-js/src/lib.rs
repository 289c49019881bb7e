//! WASM bindings for the plume rich-text editor widget.
//!
//! Provides the embeddable toolbar + content editor for JavaScript/TypeScript
//! pages. Formatting is delegated to the browser's built-in rich-text
//! commands; this crate only exposes construction and lifecycle.

mod editor;
mod types;

pub use editor::*;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Route `tracing` output to the browser console.
///
/// Safe to call more than once; only the first call installs a subscriber.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(debug: bool) {
    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if debug { Level::DEBUG } else { Level::INFO };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let reg = Registry::default().with(wasm_layer);

    if set_global_default(reg).is_err() {
        tracing::debug!("logging already initialized");
    }
}
