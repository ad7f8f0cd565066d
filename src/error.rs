//! Error type for widget tree operations.
//!
//! Queries on stale handles return neutral values instead of errors; only
//! operations that can be refused or fail return [`GuiResult`].

use thiserror::Error;

/// Failure of a widget core operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuiError {
    /// Handle does not refer to a live widget (removed or never created).
    #[error("invalid or stale widget handle")]
    InvalidHandle,
    /// Operation needs a widget kind that allows children.
    #[error("widget does not allow children")]
    ChildrenNotAllowed,
    /// Widget kind vetoed creation in its pre-init hook.
    #[error("widget creation vetoed by pre-init")]
    Vetoed,
    /// Widget (or one of its children) refused removal, or it is the desktop.
    #[error("widget removal refused")]
    RemoveRefused,
    /// Operation needs a parent widget.
    #[error("widget has no parent")]
    NoParent,
    /// Color index outside of the kind's color table.
    #[error("color index {0} out of range")]
    ColorIndex(usize),
    /// Text editing needs an owned text buffer.
    #[error("widget has no owned text memory")]
    NoTextMemory,
    /// Operation not supported by this widget kind.
    #[error("operation not supported by widget kind")]
    Unsupported,
}

/// Result alias for widget core operations.
pub type GuiResult<T> = Result<T, GuiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_messages() {
        assert_eq!(GuiError::ColorIndex(7).to_string(), "color index 7 out of range");
        assert_eq!(GuiError::RemoveRefused.to_string(), "widget removal refused");
    }
}
