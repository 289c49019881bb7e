//! The editor widget: toolbar, content surface and their event reactions.
//!
//! [`Editor`] builds its DOM through an injected [`EditorHost`] and exposes
//! one method per reaction (`activate`, `refresh_state`, `handle_input`,
//! `handle_keydown`, ...). Wiring those methods to real events is the job of
//! the platform layer.

use crate::command::{
    BlockTag, CREATE_LINK, Command, CommandKind, DEFAULT_PARAGRAPH_SEPARATOR, FONT_SIZE,
    FORMAT_BLOCK, FontSize,
};
use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::image::{ImageFile, first_image};
use crate::platform::{EditorHost, PlatformError};

/// Key that inserts a paragraph break.
pub const PARAGRAPH_BREAK_KEY: &str = "Enter";

/// A toolbar control built for one requested command.
#[derive(Debug, Clone)]
pub struct Control<E> {
    pub command: Command,
    /// The visible control: a button, the image label, or the size select.
    pub element: E,
    /// Hidden file input, for the image control only.
    pub input: Option<E>,
}

/// Visual state of a control derived from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    /// Whether the button's command is active at the caret.
    Active(bool),
    /// Font size at the caret.
    FontSize(FontSize),
}

/// Outcome of a keydown in the content surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeydownResult {
    /// Nothing to do; the host handles the key.
    PassThrough,
    /// The platform must run this action on the next scheduler turn, after
    /// the host's default key handling has completed.
    Deferred(DeferredAction),
}

/// Correction scheduled to run after the current event turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Force the current block back to a paragraph.
    ResetBlockFormat,
}

/// Elements created for an inserted image.
#[derive(Debug, Clone)]
pub struct InsertedImage<E> {
    /// Outer element appended to the content surface.
    pub wrapper: E,
    /// Resizable container inside the wrapper.
    pub resizer: E,
    pub image: E,
}

impl<E: PartialEq> InsertedImage<E> {
    /// Whether the image left the document with `removed`.
    ///
    /// Deleting the resizable box takes the image with it, and observers
    /// report only the box in that case.
    pub fn image_removed<'a>(&self, removed: impl IntoIterator<Item = &'a E>) -> bool
    where
        E: 'a,
    {
        removed
            .into_iter()
            .any(|node| *node == self.image || *node == self.resizer)
    }
}

/// Rich-text editor assembled from toolbar controls over a host.
pub struct Editor<H: EditorHost> {
    host: H,
    config: EditorConfig,
    mount: H::Element,
    toolbar: H::Element,
    content: H::Element,
    controls: Vec<Control<H::Element>>,
}

impl<H: EditorHost> Editor<H> {
    /// Build an editor with the default configuration.
    pub fn new<S: AsRef<str>>(host: H, commands: &[S]) -> Result<Self, EditorError> {
        Self::with_config(host, commands, EditorConfig::default())
    }

    /// Build an editor inside the element whose id is `config.mount_id`.
    ///
    /// Every command name is validated before the document is touched, and
    /// the toolbar and content surface are assembled detached, then attached
    /// together. Any error leaves the mount as it was. Duplicate names
    /// produce duplicate controls.
    pub fn with_config<S: AsRef<str>>(
        host: H,
        commands: &[S],
        config: EditorConfig,
    ) -> Result<Self, EditorError> {
        let commands = parse_commands(commands)?;
        let mount = host
            .element_by_id(&config.mount_id)
            .ok_or_else(|| EditorError::MissingMount(config.mount_id.clone()))?;

        let toolbar = host.create_element("div")?;
        host.set_attribute(&toolbar, "id", &config.toolbar_id)?;
        host.add_class(&toolbar, &config.toolbar_class)?;

        let content = host.create_element("div")?;
        host.set_attribute(&content, "contenteditable", "true")?;
        host.add_class(&content, &config.content_class)?;
        host.set_attribute(&content, "id", &config.content_id)?;

        let mut editor = Self {
            host,
            config,
            mount,
            toolbar,
            content,
            controls: Vec::with_capacity(commands.len()),
        };

        for command in commands {
            let control = editor.build_control(command)?;
            editor.controls.push(control);
        }
        editor.attach()?;

        editor.host.exec_command(
            DEFAULT_PARAGRAPH_SEPARATOR,
            Some(&editor.config.paragraph_separator),
        );

        tracing::debug!(
            controls = editor.controls.len(),
            mount = %editor.config.mount_id,
            "editor constructed"
        );
        Ok(editor)
    }

    /// Append toolbar then content to the mount and publish the button
    /// width. Rolls both back out of the mount on failure.
    fn attach(&self) -> Result<(), PlatformError> {
        self.host.append_child(&self.mount, &self.toolbar)?;
        let width = button_width(self.controls.len());
        let attached = self
            .host
            .append_child(&self.mount, &self.content)
            .and_then(|()| {
                self.host
                    .set_root_style_property(&self.config.width_property, &width)
            });
        if let Err(e) = attached {
            self.host.remove(&self.toolbar);
            self.host.remove(&self.content);
            return Err(e);
        }
        tracing::trace!(width = %width, "toolbar attached");
        Ok(())
    }

    fn build_control(&self, command: Command) -> Result<Control<H::Element>, PlatformError> {
        let spec = command.spec();
        match spec.kind {
            CommandKind::Exec(_) | CommandKind::FormatBlock(_) | CommandKind::CreateLink => {
                let button = self.host.create_element("button")?;
                self.host.set_attribute(&button, "id", spec.id)?;
                self.host.set_inner_html(&button, spec.icon);
                self.host.add_class(&button, &self.config.button_class)?;
                self.host.append_child(&self.toolbar, &button)?;
                Ok(Control {
                    command,
                    element: button,
                    input: None,
                })
            }
            CommandKind::Image => {
                let input = self.host.create_element("input")?;
                self.host
                    .set_attribute(&input, "id", &self.config.image_input_id)?;
                self.host.set_attribute(&input, "type", "file")?;
                self.host.set_style(&input, "display", "none")?;

                let label = self.host.create_element("label")?;
                self.host.set_inner_html(&label, spec.icon);
                self.host.add_class(&label, &self.config.button_class)?;
                self.host.set_attribute(&label, "id", spec.id)?;
                self.host
                    .set_attribute(&label, "for", &self.config.image_input_id)?;

                self.host.append_child(&self.toolbar, &input)?;
                self.host.append_child(&self.toolbar, &label)?;
                Ok(Control {
                    command,
                    element: label,
                    input: Some(input),
                })
            }
            CommandKind::FontSize => {
                let select = self.host.create_element("select")?;
                self.host.add_class(&select, &self.config.button_class)?;
                self.host.set_attribute(&select, "id", spec.id)?;
                for size in FontSize::all() {
                    let option = self.host.create_element("option")?;
                    self.host.set_inner_html(&option, size.label());
                    self.host
                        .set_attribute(&option, "value", &size.level().to_string())?;
                    self.host.append_child(&select, &option)?;
                }
                self.host.append_child(&self.toolbar, &select)?;
                self.host
                    .set_selected_option(&select, FontSize::DEFAULT.index());
                Ok(Control {
                    command,
                    element: select,
                    input: None,
                })
            }
        }
    }

    // === Accessors ===

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mount(&self) -> &H::Element {
        &self.mount
    }

    pub fn toolbar(&self) -> &H::Element {
        &self.toolbar
    }

    pub fn content(&self) -> &H::Element {
        &self.content
    }

    /// Controls in the order their commands were requested.
    pub fn controls(&self) -> &[Control<H::Element>] {
        &self.controls
    }

    /// Current markup of the content surface.
    pub fn content_html(&self) -> String {
        self.host.inner_html(&self.content)
    }

    pub fn focus(&self) {
        self.host.focus(&self.content);
    }

    // === Toolbar ===

    /// Click on the control at `index`.
    ///
    /// The image label and the size select have no click behaviour of their
    /// own: the label opens the picker and the select reacts to `change`.
    pub fn activate(&self, index: usize) {
        let Some(control) = self.controls.get(index) else {
            tracing::warn!(index, "activate: no such control");
            return;
        };

        match control.command.spec().kind {
            CommandKind::Exec(host_command) => {
                tracing::trace!(command = host_command, "exec");
                self.host.exec_command(host_command, None);
            }
            CommandKind::FormatBlock(tag) => self.format_block(tag),
            CommandKind::CreateLink => self.create_link(),
            CommandKind::Image | CommandKind::FontSize => {}
        }
    }

    fn format_block(&self, tag: BlockTag) {
        tracing::trace!(tag = tag.tag_name(), "formatBlock");
        self.host.exec_command(FORMAT_BLOCK, Some(tag.host_arg()));
    }

    /// Prompt for a URL and link the selection to it.
    ///
    /// A cancelled or empty answer is a no-op.
    pub fn create_link(&self) {
        match self.host.prompt(&self.config.link_prompt) {
            Some(url) if !url.is_empty() => {
                tracing::debug!(url = %url, "creating link");
                self.host.exec_command(CREATE_LINK, Some(&url));
            }
            _ => tracing::debug!("link prompt cancelled"),
        }
    }

    /// Apply a font size chosen in the size select, then return focus to the
    /// content surface.
    pub fn select_font_size(&self, size: FontSize) {
        self.host
            .exec_command(FONT_SIZE, Some(&size.level().to_string()));
        self.focus();
    }

    // === State reflection ===

    /// Derive the visual state of every state-reflecting control from the host.
    ///
    /// Returns `(control index, state)` pairs. Nothing is cached: calling this
    /// twice without host changes in between yields the same result.
    pub fn control_states(&self) -> Vec<(usize, ControlState)> {
        self.controls
            .iter()
            .enumerate()
            .filter_map(|(index, control)| {
                let spec = control.command.spec();
                if !spec.reflects_state {
                    return None;
                }
                let state = match spec.kind {
                    CommandKind::Exec(host_command) => {
                        ControlState::Active(self.host.query_command_state(host_command))
                    }
                    CommandKind::FontSize => ControlState::FontSize(FontSize::from_host_value(
                        &self.host.query_command_value(FONT_SIZE),
                    )),
                    _ => return None,
                };
                Some((index, state))
            })
            .collect()
    }

    /// Re-query the host and update control visuals.
    ///
    /// Runs on keyup and mouseup in the content surface and on any click in
    /// the toolbar.
    pub fn refresh_state(&self) {
        for (index, state) in self.control_states() {
            let element = &self.controls[index].element;
            match state {
                ControlState::Active(active) => {
                    if let Err(e) = self
                        .host
                        .set_class(element, &self.config.selected_class, active)
                    {
                        tracing::warn!("failed to update button state: {}", e);
                    }
                }
                ControlState::FontSize(size) => {
                    self.host.set_selected_option(element, size.index());
                }
            }
        }
    }

    // === Content surface ===

    /// React to an input event in the content surface.
    ///
    /// Wraps a leading bare text node in a paragraph so block formatting
    /// behaves consistently. Returns whether a wrap was requested.
    pub fn handle_input(&self) -> bool {
        if self.host.first_child_is_text(&self.content) {
            tracing::trace!("wrapping bare text in paragraph");
            self.format_block(BlockTag::Paragraph);
            true
        } else {
            false
        }
    }

    /// React to a keydown in the content surface.
    ///
    /// Enter inside a blockquote or pre block must escape to a paragraph, but
    /// only once the host has inserted its own break. The reset is therefore
    /// returned as a [`KeydownResult::Deferred`] action for the platform to
    /// schedule, never applied here.
    pub fn handle_keydown(&self, key: &str) -> KeydownResult {
        if key != PARAGRAPH_BREAK_KEY {
            return KeydownResult::PassThrough;
        }

        let format = self.host.query_command_value(FORMAT_BLOCK);
        match BlockTag::from_host_value(&format) {
            Some(tag) if tag.traps_paragraph_break() => {
                tracing::trace!(block = tag.tag_name(), "deferring block reset");
                KeydownResult::Deferred(DeferredAction::ResetBlockFormat)
            }
            _ => KeydownResult::PassThrough,
        }
    }

    /// Run an action previously returned by [`Editor::handle_keydown`].
    pub fn run_deferred(&self, action: DeferredAction) {
        match action {
            DeferredAction::ResetBlockFormat => self.format_block(BlockTag::Paragraph),
        }
    }

    // === Images ===

    /// Start inserting an image from a picker selection.
    ///
    /// Focuses the content surface and returns the file to load, if the
    /// first selected file is an image.
    pub fn begin_image_insert<'a>(&self, files: &'a [ImageFile]) -> Option<&'a ImageFile> {
        self.focus();
        first_image(files)
    }

    /// Append a decoded image to the content surface.
    ///
    /// The returned elements are attached to the live surface; observe the
    /// wrapper from here on and call [`Editor::handle_image_mutation`] with
    /// removed nodes.
    pub fn insert_image(&self, data_url: &str) -> Result<InsertedImage<H::Element>, EditorError> {
        let image = self.host.create_element("img")?;
        self.host.set_attribute(&image, "src", data_url)?;
        self.host.set_style(&image, "max-width", "100%")?;

        let resizer = self.host.create_element("div")?;
        self.host.add_class(&resizer, &self.config.resize_class)?;
        self.host
            .set_style(&resizer, "width", &self.config.image_width)?;
        self.host.append_child(&resizer, &image)?;

        let wrapper = self.host.create_element("div")?;
        self.host.append_child(&wrapper, &resizer)?;
        self.host.append_child(&self.content, &wrapper)?;

        tracing::debug!(bytes = data_url.len(), "image inserted");
        Ok(InsertedImage {
            wrapper,
            resizer,
            image,
        })
    }

    /// React to nodes removed under an inserted image's wrapper.
    ///
    /// When the image was removed, directly or along with its resizable
    /// box, the whole wrapper goes with it, so
    /// no empty resizable box is left behind. Returns whether the wrapper was
    /// removed; observation can stop once it has been.
    pub fn handle_image_mutation(
        &self,
        inserted: &InsertedImage<H::Element>,
        removed: &[H::Element],
    ) -> bool
    where
        H::Element: PartialEq,
    {
        if inserted.image_removed(removed) {
            tracing::debug!("image removed, dropping its wrapper");
            self.host.remove(&inserted.wrapper);
            true
        } else {
            false
        }
    }

    // === Lifecycle ===

    /// Remove the toolbar and content surface from the mount.
    pub fn teardown(&self) {
        self.host.remove(&self.toolbar);
        self.host.remove(&self.content);
        tracing::debug!(mount = %self.config.mount_id, "editor torn down");
    }
}

/// Parse and validate requested command names.
pub fn parse_commands<S: AsRef<str>>(names: &[S]) -> Result<Vec<Command>, EditorError> {
    if names.is_empty() {
        return Err(EditorError::EmptyCommandList);
    }
    names.iter().map(|name| name.as_ref().parse()).collect()
}

/// Width of one toolbar button as a CSS percentage.
///
/// Formatted like the host's number-to-string conversion, so four buttons
/// give `25%` and three give `33.333333333333336%`.
pub fn button_width(count: usize) -> String {
    format!("{}%", 100.0 / count as f64)
}
