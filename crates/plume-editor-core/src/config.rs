//! Element ids, class names and strings used when building the editor.

/// Editor construction settings.
///
/// The defaults match the stylesheet shipped alongside the widget. Override
/// individual fields with struct update syntax:
///
/// ```
/// use plume_editor_core::EditorConfig;
///
/// let config = EditorConfig {
///     mount_id: "notes-editor".into(),
///     ..EditorConfig::default()
/// };
/// assert_eq!(config.toolbar_id, "toolbar");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Id of the element the toolbar and content surface are appended to.
    pub mount_id: String,
    pub toolbar_id: String,
    pub content_id: String,
    /// Id of the hidden file input behind the image label.
    pub image_input_id: String,
    pub toolbar_class: String,
    pub content_class: String,
    pub button_class: String,
    /// Class toggled on buttons whose command is active at the caret.
    pub selected_class: String,
    /// Class of the container that makes inserted images resizable.
    pub resize_class: String,
    /// CSS custom property on the document root holding each button's width.
    pub width_property: String,
    pub link_prompt: String,
    /// Element the host should use for new paragraphs.
    pub paragraph_separator: String,
    /// Initial width of a freshly inserted image container.
    pub image_width: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            mount_id: "editor".into(),
            toolbar_id: "toolbar".into(),
            content_id: "textbox".into(),
            image_input_id: "insertImage".into(),
            toolbar_class: "editor-toolbar".into(),
            content_class: "editor-content".into(),
            button_class: "editor-button".into(),
            selected_class: "button-selected".into(),
            resize_class: "resize".into(),
            width_property: "--number-buttons".into(),
            link_prompt: "Enter the link URL".into(),
            paragraph_separator: "p".into(),
            image_width: "100px".into(),
        }
    }
}
