//! Error types for cylgrid_io operations.

use thiserror::Error;

use cylgrid_core::GridError;

/// Errors that can occur while storing or loading grids.
#[derive(Error, Debug)]
pub enum IoError {
    /// The container does not hold a cylindrical-polar grid.
    #[error("grid is not cylindrical polar: grid_type is '{found}'")]
    GeometryType {
        /// Grid type found in the container.
        found: String,
    },

    /// Stored fingerprint does not match the stored walls.
    #[error("calculated geometry hash {computed} does not match hash in file {stored}")]
    Integrity {
        /// Fingerprint attribute read from the container.
        stored: String,
        /// Fingerprint recomputed from the stored walls.
        computed: String,
    },

    /// A required group, dataset or link is missing.
    #[error("no node named '{path}'")]
    MissingNode {
        /// Name or path that was looked up.
        path: String,
    },

    /// A node exists but is not a group.
    #[error("'{path}' is not a group")]
    NotAGroup {
        /// Name or path of the node.
        path: String,
    },

    /// A node exists but is not a dataset.
    #[error("'{path}' is not a dataset")]
    NotADataset {
        /// Name or path of the node.
        path: String,
    },

    /// A required attribute is missing or has the wrong type.
    #[error("attribute '{name}' on '{node}' is missing or not a string")]
    MissingAttribute {
        /// Node the attribute was looked up on.
        node: String,
        /// Attribute name.
        name: String,
    },

    /// Malformed container file.
    #[error("invalid container format: {message}")]
    InvalidFormat {
        /// Description of the format error.
        message: String,
    },

    /// Tree (de)serialization failure.
    #[error("container encoding error: {0}")]
    Codec(#[from] bincode::Error),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Geometry or quantity validation failure.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Result type alias for cylgrid_io operations.
pub type Result<T> = std::result::Result<T, IoError>;
