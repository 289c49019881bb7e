//! Error types for editor construction.

use thiserror::Error;

use crate::platform::PlatformError;

/// Errors that abort editor construction.
///
/// Anything that goes wrong after construction degrades to "the formatting
/// did not happen" and is logged rather than returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditorError {
    /// A requested command has no control builder.
    #[error("unknown editor command: {0:?}")]
    UnknownCommand(String),

    /// No commands were requested.
    #[error("editor needs at least one command")]
    EmptyCommandList,

    /// The mount element is not in the document.
    #[error("mount element #{0} not found")]
    MissingMount(String),

    /// The host refused to build part of the editor.
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}
