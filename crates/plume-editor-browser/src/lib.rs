//! Browser DOM layer for the plume editor widget.
//!
//! This crate implements the core host traits over the DOM and wires the
//! editor's reactions to browser events. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `host`: `BrowserHost`, the `EditorHost` over `document.execCommand` and friends
//! - `events`: extraction helpers for keyboard, select and file input events
//! - `image`: file reading into data URIs and removal observation
//! - `mount`: `BrowserEditor`, which owns the editor and its listeners
//!
//! # Re-exports
//!
//! This crate re-exports `plume-editor-core` for convenience, so consumers
//! only need to depend on `plume-editor-browser`.

// Re-export core crate
pub use plume_editor_core;
pub use plume_editor_core::*;

pub mod events;
pub mod host;
pub mod image;
pub mod mount;

pub use host::BrowserHost;
pub use image::{ImageWatch, read_data_url};
pub use mount::BrowserEditor;
