//! Error types for the streaming writer.
//!
//! Errors fall into two groups. Structural errors (`InvalidName`,
//! `IllegalState`, `Format`) are detected before any byte of the offending construct
//! reaches the sink, so the output stays well-formed. Sink errors (`Io`,
//! `Poisoned`) are terminal for the whole document: the first failure is
//! returned as `Io`, and every later write is refused with `Poisoned`.
//! A failure hit while dropping a handle is returned as `Io` by the next
//! write or by `Document::finish`.

use std::fmt;
use std::io;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Which kind of name failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// An element (tag) name.
    Element,
    /// An attribute name.
    Attribute,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element => write!(f, "element"),
            Self::Attribute => write!(f, "attribute"),
        }
    }
}

/// The operation that was attempted in the wrong state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Adding an attribute after the element received content.
    AttributeAfterContent,
    /// Writing text after the element received content.
    TextAfterContent,
    /// Writing a text payload on a tree element.
    TextInTree,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttributeAfterContent => write!(f, "attribute added after content"),
            Self::TextAfterContent => write!(f, "text written after content"),
            Self::TextInTree => write!(f, "text written on a tree element"),
        }
    }
}

/// The error type returned by every fallible writer operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A name was rejected by the configured [`NamePolicy`](crate::NamePolicy).
    #[error("invalid {kind} name {name:?}")]
    InvalidName {
        /// Whether the name belongs to an element or an attribute.
        kind: NameKind,
        /// The rejected name.
        name: String,
    },

    /// An operation is not allowed in the element's current state.
    #[error("illegal operation on <{element}>: {operation}")]
    IllegalState {
        /// Name of the element the operation was attempted on.
        element: String,
        /// What was attempted.
        operation: Operation,
    },

    /// The output sink failed a write or flush.
    #[error("write to output failed: {0}")]
    Io(#[from] io::Error),

    /// A value's `Display` implementation returned an error. Nothing of the
    /// construct was written.
    #[error("a value failed to format")]
    Format,

    /// A write was attempted after the sink had already failed.
    #[error("output is unusable after an earlier {0} failure")]
    Poisoned(io::ErrorKind),

    /// Transcoding was requested for an encoding that cannot be produced.
    #[error("unsupported output encoding: {0}")]
    UnsupportedEncoding(String),
}

impl Error {
    /// Returns `true` for errors that leave the output untouched and the
    /// document usable (`InvalidName`, `IllegalState`, `Format`).
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::InvalidName { .. } | Self::IllegalState { .. } | Self::Format
        )
    }

    pub(crate) fn illegal(element: &str, operation: Operation) -> Self {
        Self::IllegalState {
            element: element.to_string(),
            operation,
        }
    }
}
