//! Core data types shared across the grid modules.

use core::fmt;
use std::path::PathBuf;

/// Cell counts `[n_p, n_z, n_w]` (azimuth, height, radius).
///
/// Arrays attached to a grid are indexed `[k, j, i]` with `k` along azimuth,
/// `j` along height and `i` along radius.
pub type GridShape = [usize; 3];

/// One of the three cylindrical-polar axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Cylindrical radius `w`.
    Radius,
    /// Height `z`.
    Height,
    /// Azimuthal angle `p`.
    Azimuth,
}

impl Axis {
    /// All axes in wall-argument order (radius, height, azimuth).
    pub const ALL: [Axis; 3] = [Axis::Radius, Axis::Height, Axis::Azimuth];

    /// Short symbol used for wall field names.
    pub const fn symbol(self) -> &'static str {
        match self {
            Axis::Radius => "w",
            Axis::Height => "z",
            Axis::Azimuth => "p",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Radius => write!(f, "radius"),
            Axis::Height => write!(f, "height"),
            Axis::Azimuth => write!(f, "azimuth"),
        }
    }
}

/// Pointer to an array stored in a different container file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalLink {
    /// Container file holding the data.
    pub filename: PathBuf,
    /// Slash-separated path of the dataset inside that file.
    pub path: String,
}

impl ExternalLink {
    /// Create a new link.
    pub fn new(filename: impl Into<PathBuf>, path: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            path: path.into(),
        }
    }
}

impl fmt::Display for ExternalLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.filename.display(), self.path)
    }
}
