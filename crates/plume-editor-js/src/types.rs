//! Types exposed to JavaScript via wasm-bindgen.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

use plume_editor_browser::EditorConfig;

/// Options accepted by `PlumeEditor.withOptions`.
///
/// Anything left unset keeps its default.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct EditorOptions {
    /// Toolbar commands, in display order.
    pub commands: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolbar_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_input_id: Option<String>,
    /// Prompt shown when creating a link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_prompt: Option<String>,
    /// Initial width of inserted images, as a CSS length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_width: Option<String>,
}

impl EditorOptions {
    /// Overlay the options on the default configuration.
    pub fn to_config(&self) -> EditorConfig {
        let mut config = EditorConfig::default();
        let overrides = [
            (&mut config.mount_id, &self.mount_id),
            (&mut config.toolbar_id, &self.toolbar_id),
            (&mut config.content_id, &self.content_id),
            (&mut config.image_input_id, &self.image_input_id),
            (&mut config.link_prompt, &self.link_prompt),
            (&mut config.image_width, &self.image_width),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                field.clone_from(value);
            }
        }
        config
    }
}
