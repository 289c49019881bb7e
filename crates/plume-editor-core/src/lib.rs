//! plume-editor-core: rich-text editor widget logic without platform dependencies.
//!
//! This crate provides:
//! - `Command` / `CommandSpec` - the closed toolbar vocabulary and its control records
//! - `EditorHost` - the host façade (formatting commands, elements, prompt)
//! - `Editor<H>` - toolbar and content surface construction plus event reactions
//! - `MemoryHost` - an in-memory host for headless use and tests

pub mod command;
pub mod config;
pub mod editor;
pub mod error;
pub mod image;
pub mod memory;
pub mod platform;


pub use command::{BlockTag, Command, CommandKind, CommandSpec, FontSize};
pub use config::EditorConfig;
pub use editor::{
    Control, ControlState, DeferredAction, Editor, InsertedImage, KeydownResult,
    PARAGRAPH_BREAK_KEY, button_width, parse_commands,
};
pub use error::EditorError;
pub use image::{ImageFile, data_url, first_image, is_image_mime};
pub use memory::{ExecCall, MemoryElement, MemoryHost, MemoryNode};
pub use platform::{CommandHost, DomHost, EditorHost, PlatformError, PromptHost};
