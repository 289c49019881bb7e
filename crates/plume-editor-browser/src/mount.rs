//! A mounted editor with its browser event wiring.
//!
//! [`BrowserEditor`] owns the core [`Editor`] together with every listener,
//! timer callback and observer attached for it. Dropping it detaches all of
//! them and removes the toolbar and content surface from the mount.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Element, File, HtmlInputElement};

use plume_editor_core::{
    CommandKind, Control, DeferredAction, Editor, EditorConfig, EditorError, ImageFile,
    KeydownResult,
};

use crate::events::{image_file, keyboard_key, picked_files, selected_font_size};
use crate::host::BrowserHost;
use crate::image::{ImageWatch, read_data_url};

/// Observers of images still present in the content surface.
#[derive(Default)]
struct WatchSet {
    next_id: u64,
    active: HashMap<u64, ImageWatch>,
}

type Watches = Rc<RefCell<WatchSet>>;

/// An editor mounted into the live document.
pub struct BrowserEditor {
    editor: Rc<Editor<BrowserHost>>,
    listeners: Vec<EventListener>,
    watches: Watches,
}

impl BrowserEditor {
    /// Mount into `#editor` with the default configuration.
    pub fn mount<S: AsRef<str>>(commands: &[S]) -> Result<Self, EditorError> {
        Self::mount_with_config(commands, EditorConfig::default())
    }

    pub fn mount_with_config<S: AsRef<str>>(
        commands: &[S],
        config: EditorConfig,
    ) -> Result<Self, EditorError> {
        let host = BrowserHost::new()?;
        let editor = Rc::new(Editor::with_config(host, commands, config)?);

        let mut mounted = Self {
            editor,
            listeners: Vec::new(),
            watches: Watches::default(),
        };
        mounted.wire_content();
        mounted.wire_toolbar();

        tracing::debug!(listeners = mounted.listeners.len(), "editor wired");
        Ok(mounted)
    }

    pub fn editor(&self) -> &Editor<BrowserHost> {
        &self.editor
    }

    pub fn focus(&self) {
        self.editor.focus();
    }

    pub fn content_html(&self) -> String {
        self.editor.content_html()
    }

    /// Append an already encoded image and watch it for removal.
    pub fn insert_image(&self, data_url: &str) -> Result<(), EditorError> {
        insert_and_watch(&self.editor, &self.watches, data_url)
    }

    /// Number of inserted images whose removal is still being watched.
    pub fn watched_images(&self) -> usize {
        self.watches.borrow().active.len()
    }

    fn wire_content(&mut self) {
        let content = self.editor.content().clone();

        let editor = self.editor.clone();
        self.listeners
            .push(EventListener::new(&content, "input", move |_| {
                editor.handle_input();
            }));

        let editor = self.editor.clone();
        self.listeners
            .push(EventListener::new(&content, "keydown", move |event| {
                let Some(key) = keyboard_key(event) else {
                    return;
                };
                if let KeydownResult::Deferred(action) = editor.handle_keydown(&key) {
                    schedule_deferred(Rc::downgrade(&editor), action);
                }
            }));

        for event_type in ["keyup", "mouseup"] {
            let editor = self.editor.clone();
            self.listeners
                .push(EventListener::new(&content, event_type, move |_| {
                    editor.refresh_state();
                }));
        }
    }

    fn wire_toolbar(&mut self) {
        for (index, control) in self.editor.controls().iter().enumerate() {
            if let Some(listener) = self.wire_control(index, control) {
                self.listeners.push(listener);
            }
        }

        // Bubbles up after the clicked control has run its own handler.
        let editor = self.editor.clone();
        let toolbar = editor.toolbar().clone();
        self.listeners
            .push(EventListener::new(&toolbar, "click", move |_| {
                editor.refresh_state();
            }));
    }

    fn wire_control(&self, index: usize, control: &Control<Element>) -> Option<EventListener> {
        let editor = self.editor.clone();
        match control.command.spec().kind {
            CommandKind::Exec(_) | CommandKind::FormatBlock(_) | CommandKind::CreateLink => {
                Some(EventListener::new(&control.element, "click", move |_| {
                    editor.activate(index);
                }))
            }
            CommandKind::FontSize => {
                Some(EventListener::new(&control.element, "change", move |event| {
                    if let Some(size) = selected_font_size(event) {
                        editor.select_font_size(size);
                    }
                }))
            }
            CommandKind::Image => {
                let input = control.input.as_ref()?;
                let watches = self.watches.clone();
                Some(EventListener::new(input, "change", move |event| {
                    let Some(input) = event
                        .target()
                        .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                    else {
                        return;
                    };
                    let files = picked_files(&input);
                    // Cleared so picking the same file again still fires `change`.
                    input.set_value("");
                    if let Some(file) = choose_image(&editor, files) {
                        load_image(Rc::downgrade(&editor), watches.clone(), file);
                    }
                }))
            }
        }
    }
}

impl Drop for BrowserEditor {
    fn drop(&mut self) {
        self.watches.borrow_mut().active.clear();
        self.listeners.clear();
        self.editor.teardown();
    }
}

/// Run `action` on the next scheduler turn, after the browser's own key
/// handling has inserted the break.
fn schedule_deferred(editor: Weak<Editor<BrowserHost>>, action: DeferredAction) {
    Timeout::new(0, move || {
        if let Some(editor) = editor.upgrade() {
            editor.run_deferred(action);
        }
    })
    .forget();
}

fn choose_image(editor: &Editor<BrowserHost>, files: Vec<File>) -> Option<File> {
    let metadata: Vec<ImageFile> = files.iter().map(image_file).collect();
    editor.begin_image_insert(&metadata)?;
    files.into_iter().next()
}

fn load_image(editor: Weak<Editor<BrowserHost>>, watches: Watches, file: File) {
    wasm_bindgen_futures::spawn_local(async move {
        let url = match read_data_url(&file).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(name = %file.name(), "failed to read image: {}", e);
                return;
            }
        };
        // The editor may have been torn down while the file was loading.
        let Some(editor) = editor.upgrade() else {
            return;
        };
        if let Err(e) = insert_and_watch(&editor, &watches, &url) {
            tracing::warn!("failed to insert image: {}", e);
        }
    });
}

fn insert_and_watch(
    editor: &Rc<Editor<BrowserHost>>,
    watches: &Watches,
    data_url: &str,
) -> Result<(), EditorError> {
    let inserted = editor.insert_image(data_url)?;

    let id = {
        let mut set = watches.borrow_mut();
        set.next_id += 1;
        set.next_id
    };
    // Released on a later turn: the watch owns the observer callback that
    // reports completion.
    let release = Rc::downgrade(watches);
    let on_done = move || {
        Timeout::new(0, move || {
            if let Some(watches) = release.upgrade() {
                watches.borrow_mut().active.remove(&id);
            }
        })
        .forget();
    };

    let watch = ImageWatch::observe(Rc::downgrade(editor), inserted, on_done)?;
    watches.borrow_mut().active.insert(id, watch);
    Ok(())
}
