//! Error handling for ContourKit
//!
//! Provides error types for every stage of the profile-to-toolpath conversion:
//! - Profile errors (loading and normalizing the height curve)
//! - Command errors (parsing and rewriting sketch commands)
//! - Sketch errors (segmenting and restructuring the curve region)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Profile error type
///
/// Represents errors raised while building a [`crate::ProfileTable`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// Fewer than two usable points remained after filtering
    #[error("Insufficient profile data: {points} usable point(s), at least 2 required")]
    InsufficientData {
        /// The number of usable points found.
        points: usize,
    },

    /// A profile line did not start with two numeric tokens
    #[error("Malformed profile line {line_number}: '{token}' ({reason})")]
    MalformedLine {
        /// The 1-based line number in the profile source.
        line_number: usize,
        /// The offending token, or the whole line if tokens are missing.
        token: String,
        /// The reason the line was rejected.
        reason: String,
    },

    /// Positions are not strictly monotonic in either direction
    #[error("Profile positions are not monotonic at point {index}: {previous} then {current}")]
    NonMonotonic {
        /// Index (after any reversal) of the first out-of-order point.
        index: usize,
        /// Position of the point before it.
        previous: f64,
        /// Position of the out-of-order point.
        current: f64,
    },
}

/// Command error type
///
/// Represents errors related to parsing and rewriting sketch commands.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// An argument token is not numeric
    #[error("Malformed command at line {line_number}: '{token}' is not a number")]
    Malformed {
        /// The 1-based line number in the sketch source.
        line_number: usize,
        /// The offending token.
        token: String,
    },

    /// The command carries the wrong number of arguments for its opcode
    #[error("{opcode} at line {line_number} expects {expected} argument(s), found {actual}")]
    ArityMismatch {
        /// The 1-based line number in the sketch source.
        line_number: usize,
        /// The opcode token.
        opcode: String,
        /// Expected argument count.
        expected: usize,
        /// Argument count found.
        actual: usize,
    },

    /// An argument index past the end of the argument list
    #[error("Argument index {index} out of range for {opcode} with {arity} argument(s)")]
    ArgumentOutOfRange {
        /// The opcode token.
        opcode: String,
        /// The requested index.
        index: usize,
        /// The number of arguments the command carries.
        arity: usize,
    },
}

/// Sketch error type
///
/// Represents errors in the structure of a sketch or its curve region.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SketchError {
    /// Input ended before the curve region was closed
    #[error("Sketch truncated after {lines_read} line(s): {reason}")]
    Truncated {
        /// Number of lines consumed before input ran out.
        lines_read: usize,
        /// What the segmenter was waiting for.
        reason: String,
    },

    /// The curve region violates its expected shape
    #[error("Curve structure violated: {reason}")]
    StructuralInvariant {
        /// Description of the violated invariant.
        reason: String,
    },
}

impl SketchError {
    /// Create a structural invariant error from a message
    pub fn structural(reason: impl Into<String>) -> Self {
        SketchError::StructuralInvariant {
            reason: reason.into(),
        }
    }
}

/// Main error type for ContourKit
///
/// A unified error type that can represent any error from all stages.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Profile error
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// Command error
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Sketch error
    #[error(transparent)]
    Sketch(#[from] SketchError),
}

impl Error {
    /// Check if this is a profile error
    pub fn is_profile_error(&self) -> bool {
        matches!(self, Error::Profile(_))
    }

    /// Check if this is a command error
    pub fn is_command_error(&self) -> bool {
        matches!(self, Error::Command(_))
    }

    /// Check if this is a sketch error
    pub fn is_sketch_error(&self) -> bool {
        matches!(self, Error::Sketch(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
