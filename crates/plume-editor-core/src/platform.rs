//! Platform abstraction traits for the editor host.
//!
//! The editor never reaches into ambient global state. Everything it needs
//! from its surroundings (running formatting commands, building toolbar
//! elements, asking the user for a URL) goes through these traits, so the
//! same editor logic runs against a browser DOM or the in-memory host.

use thiserror::Error;

/// Error type for platform operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// Rich-text command execution provided by the host.
///
/// These calls are fire-and-forget. Hosts give no reliable success signal,
/// so implementations log refusals instead of returning them.
pub trait CommandHost {
    /// Run a named formatting command against the current selection.
    fn exec_command(&self, command: &str, value: Option<&str>);

    /// Whether the named command is active at the caret.
    fn query_command_state(&self, command: &str) -> bool;

    /// Current value of the named command at the caret.
    ///
    /// Returns an empty string when the host has nothing to report.
    fn query_command_value(&self, command: &str) -> String;
}

/// Element creation and lookup.
///
/// `Element` is an opaque handle. Cloning it must yield another handle to
/// the same element, never a copy of the element.
pub trait DomHost {
    type Element: Clone;

    /// Look up a connected element by id.
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Create a detached element.
    fn create_element(&self, tag: &str) -> Result<Self::Element, PlatformError>;

    fn set_attribute(
        &self,
        element: &Self::Element,
        name: &str,
        value: &str,
    ) -> Result<(), PlatformError>;

    /// Replace the children of `element` with parsed markup.
    fn set_inner_html(&self, element: &Self::Element, html: &str);

    /// Serialize the children of `element`.
    fn inner_html(&self, element: &Self::Element) -> String;

    fn add_class(&self, element: &Self::Element, class: &str) -> Result<(), PlatformError>;

    /// Add `class` when `on`, remove it otherwise.
    fn set_class(&self, element: &Self::Element, class: &str, on: bool)
    -> Result<(), PlatformError>;

    /// Set an inline style property on `element`.
    fn set_style(
        &self,
        element: &Self::Element,
        property: &str,
        value: &str,
    ) -> Result<(), PlatformError>;

    /// Set a style property (usually a CSS custom property) on the document root.
    fn set_root_style_property(&self, property: &str, value: &str) -> Result<(), PlatformError>;

    fn append_child(
        &self,
        parent: &Self::Element,
        child: &Self::Element,
    ) -> Result<(), PlatformError>;

    /// Detach `element` from its parent. No-op if already detached.
    fn remove(&self, element: &Self::Element);

    /// Whether the first child node of `element` is a bare text node.
    fn first_child_is_text(&self, element: &Self::Element) -> bool;

    /// Mark the option at `index` of a select element as selected.
    fn set_selected_option(&self, select: &Self::Element, index: usize);

    fn focus(&self, element: &Self::Element);
}

/// Blocking user prompt.
pub trait PromptHost {
    /// Ask the user for a line of text. `None` means the prompt was cancelled.
    fn prompt(&self, message: &str) -> Option<String>;
}

/// Everything the editor needs from its host.
pub trait EditorHost: CommandHost + DomHost + PromptHost {}

impl<T: CommandHost + DomHost + PromptHost> EditorHost for T {}

impl<T: CommandHost + ?Sized> CommandHost for &T {
    fn exec_command(&self, command: &str, value: Option<&str>) {
        (**self).exec_command(command, value)
    }

    fn query_command_state(&self, command: &str) -> bool {
        (**self).query_command_state(command)
    }

    fn query_command_value(&self, command: &str) -> String {
        (**self).query_command_value(command)
    }
}

impl<T: DomHost + ?Sized> DomHost for &T {
    type Element = T::Element;

    fn element_by_id(&self, id: &str) -> Option<Self::Element> {
        (**self).element_by_id(id)
    }

    fn create_element(&self, tag: &str) -> Result<Self::Element, PlatformError> {
        (**self).create_element(tag)
    }

    fn set_attribute(
        &self,
        element: &Self::Element,
        name: &str,
        value: &str,
    ) -> Result<(), PlatformError> {
        (**self).set_attribute(element, name, value)
    }

    fn set_inner_html(&self, element: &Self::Element, html: &str) {
        (**self).set_inner_html(element, html)
    }

    fn inner_html(&self, element: &Self::Element) -> String {
        (**self).inner_html(element)
    }

    fn add_class(&self, element: &Self::Element, class: &str) -> Result<(), PlatformError> {
        (**self).add_class(element, class)
    }

    fn set_class(
        &self,
        element: &Self::Element,
        class: &str,
        on: bool,
    ) -> Result<(), PlatformError> {
        (**self).set_class(element, class, on)
    }

    fn set_style(
        &self,
        element: &Self::Element,
        property: &str,
        value: &str,
    ) -> Result<(), PlatformError> {
        (**self).set_style(element, property, value)
    }

    fn set_root_style_property(&self, property: &str, value: &str) -> Result<(), PlatformError> {
        (**self).set_root_style_property(property, value)
    }

    fn append_child(
        &self,
        parent: &Self::Element,
        child: &Self::Element,
    ) -> Result<(), PlatformError> {
        (**self).append_child(parent, child)
    }

    fn remove(&self, element: &Self::Element) {
        (**self).remove(element)
    }

    fn first_child_is_text(&self, element: &Self::Element) -> bool {
        (**self).first_child_is_text(element)
    }

    fn set_selected_option(&self, select: &Self::Element, index: usize) {
        (**self).set_selected_option(select, index)
    }

    fn focus(&self, element: &Self::Element) {
        (**self).focus(element)
    }
}

impl<T: PromptHost + ?Sized> PromptHost for &T {
    fn prompt(&self, message: &str) -> Option<String> {
        (**self).prompt(message)
    }
}
