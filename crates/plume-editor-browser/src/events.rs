//! Browser event extraction for the editor.
//!
//! Thin helpers that pull the bits the core reactions need out of DOM
//! events: the pressed key, the chosen font size and the picked files.

use wasm_bindgen::JsCast;
use web_sys::{Event, File, HtmlInputElement, HtmlSelectElement, KeyboardEvent};

use plume_editor_core::{FontSize, ImageFile};

/// Key name of a keyboard event, if `event` is one.
pub fn keyboard_key(event: &Event) -> Option<String> {
    event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key)
}

/// Font size chosen in the size select that fired `event`.
///
/// Falls back to the default size when the option value doesn't parse.
pub fn selected_font_size(event: &Event) -> Option<FontSize> {
    let select = event.target()?.dyn_into::<HtmlSelectElement>().ok()?;
    Some(FontSize::from_host_value(&select.value()))
}

/// Files currently selected in a file input, in picker order.
pub fn picked_files(input: &HtmlInputElement) -> Vec<File> {
    let Some(list) = input.files() else {
        return Vec::new();
    };
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

/// Metadata the core needs to decide whether a file is insertable.
pub fn image_file(file: &File) -> ImageFile {
    ImageFile::new(file.name(), file.type_())
}
