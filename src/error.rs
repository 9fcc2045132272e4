//! Error types.

use crate::view::ViewId;
use crate::window::WindowId;
use thiserror::Error;

/// Errors that may occur when mutating the view tree.
///
/// Tab selection, focus and capture never produce errors; invalid requests there are ignored.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The view does not exist (or has been destroyed).
    #[error("no such view: {0:?}")]
    NoSuchView(ViewId),

    /// The window does not exist (or has been closed).
    #[error("no such window: {0:?}")]
    NoSuchWindow(WindowId),

    /// The operation requires a container.
    #[error("view {0:?} is not a container")]
    NotAContainer(ViewId),

    /// The operation would make a view its own ancestor.
    #[error("adding view {0:?} would create a cycle")]
    Cycle(ViewId),

    /// The backend failed to create a native surface.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type for view tree operations.
pub type Result<T> = std::result::Result<T, Error>;
