//! PlumeEditor - the mounted editor exposed to JavaScript.

use wasm_bindgen::prelude::*;

use plume_editor_browser::{BrowserEditor, EditorConfig, EditorError};

use crate::types::EditorOptions;

fn to_js_error(err: EditorError) -> JsError {
    JsError::new(&err.to_string())
}

/// A toolbar + content editor mounted into the page.
///
/// The editor stays mounted until `destroy()` is called or the object is
/// freed from JavaScript.
#[wasm_bindgen]
pub struct PlumeEditor {
    inner: Option<BrowserEditor>,
}

#[wasm_bindgen]
impl PlumeEditor {
    /// Mount into `#editor` with the given toolbar commands.
    ///
    /// Throws on an unknown command name, an empty list or a missing mount.
    #[wasm_bindgen(constructor)]
    pub fn new(commands: Vec<String>) -> Result<PlumeEditor, JsError> {
        Self::mount(&commands, EditorConfig::default())
    }

    /// Mount using an `EditorOptions` object.
    #[wasm_bindgen(js_name = withOptions)]
    pub fn with_options(options: JsValue) -> Result<PlumeEditor, JsError> {
        let options: EditorOptions = serde_wasm_bindgen::from_value(options)
            .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))?;
        Self::mount(&options.commands, options.to_config())
    }

    fn mount(commands: &[String], config: EditorConfig) -> Result<PlumeEditor, JsError> {
        let inner = BrowserEditor::mount_with_config(commands, config).map_err(to_js_error)?;
        Ok(Self { inner: Some(inner) })
    }

    /// Focus the content surface.
    pub fn focus(&self) {
        if let Some(inner) = &self.inner {
            inner.focus();
        }
    }

    /// Current HTML of the content surface, or an empty string once destroyed.
    #[wasm_bindgen(js_name = getHtml)]
    pub fn get_html(&self) -> String {
        self.inner
            .as_ref()
            .map(BrowserEditor::content_html)
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.inner.is_some()
    }

    /// Detach every listener and remove the toolbar and content surface.
    pub fn destroy(&mut self) {
        if self.inner.take().is_some() {
            tracing::debug!("editor destroyed");
        }
    }
}
