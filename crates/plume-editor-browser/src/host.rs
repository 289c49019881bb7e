//! `EditorHost` implementation over the browser DOM.
//!
//! Formatting goes through the document's built-in rich-text commands
//! (`execCommand`, `queryCommandState`, `queryCommandValue`), which is the
//! whole point of this widget: the browser owns the editing model.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlDocument, HtmlElement, HtmlSelectElement, Node, Window};

use plume_editor_core::{CommandHost, DomHost, PlatformError, PromptHost};

/// Convert a thrown JS value into a platform error.
pub(crate) fn js_error(context: &str, err: JsValue) -> PlatformError {
    PlatformError(format!("{context}: {err:?}"))
}

/// Browser host bound to the current window and document.
#[derive(Debug, Clone)]
pub struct BrowserHost {
    window: Window,
    document: HtmlDocument,
}

impl BrowserHost {
    /// Bind to the global window and its HTML document.
    pub fn new() -> Result<Self, PlatformError> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window
            .document()
            .ok_or("no document")?
            .dyn_into::<HtmlDocument>()
            .map_err(|_| PlatformError::from("document is not an HTML document"))?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &HtmlDocument {
        &self.document
    }

    fn html_element<'a>(&self, element: &'a Element) -> Result<&'a HtmlElement, PlatformError> {
        element
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| PlatformError(format!("<{}> is not an HTML element", element.tag_name())))
    }
}

impl CommandHost for BrowserHost {
    fn exec_command(&self, command: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => self
                .document
                .exec_command_with_show_ui_and_value(command, false, value),
            None => self.document.exec_command(command),
        };
        match result {
            Ok(true) => tracing::trace!(command, ?value, "execCommand"),
            Ok(false) => tracing::debug!(command, ?value, "execCommand declined by browser"),
            Err(e) => tracing::warn!(command, ?value, "execCommand threw: {:?}", e),
        }
    }

    fn query_command_state(&self, command: &str) -> bool {
        self.document.query_command_state(command).unwrap_or_else(|e| {
            tracing::debug!(command, "queryCommandState threw: {:?}", e);
            false
        })
    }

    fn query_command_value(&self, command: &str) -> String {
        self.document.query_command_value(command).unwrap_or_else(|e| {
            tracing::debug!(command, "queryCommandValue threw: {:?}", e);
            String::new()
        })
    }
}

impl DomHost for BrowserHost {
    type Element = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn create_element(&self, tag: &str) -> Result<Element, PlatformError> {
        self.document
            .create_element(tag)
            .map_err(|e| js_error("createElement", e))
    }

    fn set_attribute(&self, element: &Element, name: &str, value: &str) -> Result<(), PlatformError> {
        element
            .set_attribute(name, value)
            .map_err(|e| js_error("setAttribute", e))
    }

    fn set_inner_html(&self, element: &Element, html: &str) {
        element.set_inner_html(html);
    }

    fn inner_html(&self, element: &Element) -> String {
        element.inner_html()
    }

    fn add_class(&self, element: &Element, class: &str) -> Result<(), PlatformError> {
        element
            .class_list()
            .add_1(class)
            .map_err(|e| js_error("classList.add", e))
    }

    fn set_class(&self, element: &Element, class: &str, on: bool) -> Result<(), PlatformError> {
        element
            .class_list()
            .toggle_with_force(class, on)
            .map(|_| ())
            .map_err(|e| js_error("classList.toggle", e))
    }

    fn set_style(&self, element: &Element, property: &str, value: &str) -> Result<(), PlatformError> {
        self.html_element(element)?
            .style()
            .set_property(property, value)
            .map_err(|e| js_error("style.setProperty", e))
    }

    fn set_root_style_property(&self, property: &str, value: &str) -> Result<(), PlatformError> {
        let root = self
            .document
            .document_element()
            .ok_or("document has no root element")?;
        self.set_style(&root, property, value)
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), PlatformError> {
        parent
            .append_child(child)
            .map(|_| ())
            .map_err(|e| js_error("appendChild", e))
    }

    fn remove(&self, element: &Element) {
        element.remove();
    }

    fn first_child_is_text(&self, element: &Element) -> bool {
        element
            .first_child()
            .is_some_and(|node| node.node_type() == Node::TEXT_NODE)
    }

    fn set_selected_option(&self, select: &Element, index: usize) {
        match select.dyn_ref::<HtmlSelectElement>() {
            Some(select) => select.set_selected_index(index as i32),
            None => tracing::warn!("set_selected_option on a non-select element"),
        }
    }

    fn focus(&self, element: &Element) {
        if let Some(html) = element.dyn_ref::<HtmlElement>() {
            if let Err(e) = html.focus() {
                tracing::debug!("focus failed: {:?}", e);
            }
        }
    }
}

impl PromptHost for BrowserHost {
    fn prompt(&self, message: &str) -> Option<String> {
        match self.window.prompt_with_message(message) {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!("prompt failed: {:?}", e);
                None
            }
        }
    }
}
