//! Error types for the cellgeom system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for cellgeom operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates a parse error at a byte position with the offending text.
    #[must_use]
    pub fn parse(message: impl Into<String>, position: usize, context: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse {
            message: message.into(),
            position,
            context: context.into(),
        })
    }

    /// Creates an unknown-surface error.
    #[must_use]
    pub fn unknown_surface(number: i32) -> Self {
        Self::new(ErrorKind::UnknownSurface(number))
    }

    /// Creates a zero-surface error.
    #[must_use]
    pub fn zero_surface() -> Self {
        Self::new(ErrorKind::ZeroSurface)
    }

    /// Creates a duplicate-surface error.
    #[must_use]
    pub fn duplicate_surface(number: i32) -> Self {
        Self::new(ErrorKind::DuplicateSurface(number))
    }

    /// Creates a duplicate-cell error.
    #[must_use]
    pub fn duplicate_cell(id: i32) -> Self {
        Self::new(ErrorKind::DuplicateCell(id))
    }

    /// Creates an unknown-cell error.
    #[must_use]
    pub fn unknown_cell(id: i32) -> Self {
        Self::new(ErrorKind::UnknownCell(id))
    }

    /// Creates a literal-count limit error.
    #[must_use]
    pub fn limit_exceeded(literals: usize, limit: usize) -> Self {
        Self::new(ErrorKind::LimitExceeded { literals, limit })
    }

    /// Creates an unassigned-literal error.
    #[must_use]
    pub fn unassigned_literal(literal: i32) -> Self {
        Self::new(ErrorKind::UnassignedLiteral(literal))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Malformed boolean expression string.
    #[error("parse error at byte {position}: {message} (near {context:?})")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Byte offset of the offending token.
        position: usize,
        /// The offending substring.
        context: String,
    },

    /// Reference to a surface number that is not registered.
    #[error("unknown surface: {0}")]
    UnknownSurface(i32),

    /// Surface number 0 is not a valid reference.
    #[error("surface number 0 is not valid")]
    ZeroSurface,

    /// A surface number was registered twice.
    #[error("duplicate surface: {0}")]
    DuplicateSurface(i32),

    /// A cell id was inserted twice.
    #[error("duplicate cell: {0}")]
    DuplicateCell(i32),

    /// Reference to a cell id that is not in the object index.
    #[error("unknown cell: {0}")]
    UnknownCell(i32),

    /// Literal count exceeds the minterm enumeration ceiling.
    #[error("literal count {literals} exceeds minimization limit {limit}")]
    LimitExceeded {
        /// Number of distinct literals requested.
        literals: usize,
        /// The configured ceiling.
        limit: usize,
    },

    /// Truth evaluation met a literal absent from the assignment map.
    #[error("literal {0} has no assigned truth value")]
    UnassignedLiteral(i32),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}
