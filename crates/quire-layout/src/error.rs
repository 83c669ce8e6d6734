//! Error types for box-tree construction.
//!
//! Layout itself never fails on document data: over-constrained boxes,
//! phantom lines and overflowing content all have defined fallbacks. Only
//! building an ill-formed tree is reported, and broken internal invariants
//! panic.

use thiserror::Error;

/// Result type alias for box-tree construction.
pub type Result<T> = std::result::Result<T, BoxError>;

/// Errors raised while building the box tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoxError {
    /// Text boxes must hold at least one character.
    #[error("empty text box for element '{element_tag}'")]
    EmptyText {
        /// Element the text belonged to.
        element_tag: String,
    },

    /// A table-structural box was inserted under a parent it cannot belong to.
    #[error("{child} is not a proper child of {parent}")]
    ImproperChild {
        /// Variant of the rejected child.
        child: &'static str,
        /// Variant of the parent.
        parent: &'static str,
    },

    /// The variant is never generated anonymously.
    #[error("{kind} cannot be generated as an anonymous box")]
    NotAnonymous {
        /// Variant that was requested.
        kind: &'static str,
    },

    /// A leaf box was given children.
    #[error("{kind} cannot have children")]
    NotAParent {
        /// Variant of the leaf box.
        kind: &'static str,
    },
}
