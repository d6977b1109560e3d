//! Error types for cylgrid_core operations.
//!
//! Covers wall validation, quantity shape checks and view manipulation.

use thiserror::Error;

use crate::types::Axis;

/// Errors that can occur while building or validating a grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Wall input is not a usable 1-D sequence.
    #[error("{axis} walls: {message}")]
    Shape {
        /// Axis the walls belong to.
        axis: Axis,
        /// Description of the problem.
        message: String,
    },

    /// Wall positions are not strictly increasing.
    #[error("{axis} walls are not monotonically increasing at index {index} ({previous} -> {value})")]
    NonMonotonic {
        /// Axis the walls belong to.
        axis: Axis,
        /// Index of the first wall that does not exceed its predecessor.
        index: usize,
        /// Wall position before `index`.
        previous: f64,
        /// Wall position at `index`.
        value: f64,
    },

    /// Quantity array does not match the grid's cell shape.
    #[error("quantity '{name}' has shape {got:?} instead of {expected:?}")]
    ShapeMismatch {
        /// Name of the offending quantity.
        name: String,
        /// Grid shape.
        expected: Vec<usize>,
        /// Shape that was found.
        got: Vec<usize>,
    },

    /// Quantity data has an unexpected number of dimensions.
    #[error("quantity '{name}' has unexpected number of dimensions: {ndim}")]
    UnsupportedRank {
        /// Name of the offending quantity.
        name: String,
        /// Number of dimensions found.
        ndim: usize,
    },

    /// A value of the wrong kind was supplied.
    #[error("invalid value: {message}")]
    InvalidValue {
        /// Description of what was expected.
        message: String,
    },

    /// Multi-component quantities disagree on their component count.
    #[error("not all component lists in the grid have the same size: '{name}' has {got}, expected {expected}")]
    Consistency {
        /// Quantity whose count disagrees.
        name: String,
        /// Count established by earlier quantities.
        expected: usize,
        /// Count of `name`.
        got: usize,
    },

    /// No quantity with the requested name.
    #[error("unknown quantity '{name}'")]
    UnknownQuantity {
        /// Requested name.
        name: String,
    },

    /// An external reference could not be resolved.
    #[error("could not resolve link to '{path}' in {filename}: {message}")]
    UnresolvedLink {
        /// File the link points at.
        filename: String,
        /// Path inside that file.
        path: String,
        /// Reason reported by the resolver.
        message: String,
    },
}

/// Result type alias for cylgrid_core operations.
pub type Result<T> = std::result::Result<T, GridError>;
