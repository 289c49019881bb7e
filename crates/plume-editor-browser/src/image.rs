//! Image loading and removal tracking.

use std::rc::Weak;

use js_sys::{Array, Uint8Array};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, File, MutationObserver, MutationObserverInit, MutationRecord};

use plume_editor_core::{Editor, InsertedImage, PlatformError, data_url};

use crate::host::{BrowserHost, js_error};

/// Read a picked file into a `data:` URI.
pub async fn read_data_url(file: &File) -> Result<String, PlatformError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| js_error("file read", e))?;
    let bytes = Uint8Array::new(&buffer).to_vec();
    Ok(data_url(&file.type_(), &bytes))
}

/// Observes an inserted image's wrapper and drops the wrapper once the image
/// itself is deleted from the content surface.
///
/// The observer stays connected until the image is removed or the watch is
/// dropped.
pub struct ImageWatch {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(Array, MutationObserver)>,
}

impl ImageWatch {
    /// Start observing `inserted.wrapper` and its subtree.
    ///
    /// Holds only a weak reference to the editor so an abandoned watch never
    /// keeps it alive. `on_done` runs once, after the wrapper has been
    /// removed and the observer disconnected; the watch must not be dropped
    /// from inside it.
    pub fn observe(
        editor: Weak<Editor<BrowserHost>>,
        inserted: InsertedImage<Element>,
        on_done: impl FnOnce() + 'static,
    ) -> Result<Self, PlatformError> {
        let wrapper = inserted.wrapper.clone();
        let mut on_done = Some(on_done);
        let callback = Closure::<dyn FnMut(Array, MutationObserver)>::new(
            move |records: Array, observer: MutationObserver| {
                let Some(editor) = editor.upgrade() else {
                    observer.disconnect();
                    return;
                };
                let removed: Vec<Element> = records
                    .iter()
                    .filter_map(|record| record.dyn_into::<MutationRecord>().ok())
                    .flat_map(|record| {
                        let nodes = record.removed_nodes();
                        (0..nodes.length())
                            .filter_map(|i| nodes.get(i))
                            .filter_map(|node| node.dyn_into::<Element>().ok())
                            .collect::<Vec<_>>()
                    })
                    .collect();
                if editor.handle_image_mutation(&inserted, &removed) {
                    observer.disconnect();
                    if let Some(done) = on_done.take() {
                        done();
                    }
                }
            },
        );

        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| js_error("MutationObserver", e))?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer
            .observe_with_options(&wrapper, &init)
            .map_err(|e| js_error("MutationObserver.observe", e))?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for ImageWatch {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
