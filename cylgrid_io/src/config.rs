//! Read and write configuration types.

use std::collections::BTreeSet;

use crate::container::Precision;

/// Which quantities to read or write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    /// Every quantity.
    #[default]
    All,
    /// Only the named quantities. Names that do not exist are ignored.
    Names(BTreeSet<String>),
}

impl Selection {
    /// Select the given names.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selection::Names(names.into_iter().map(Into::into).collect())
    }

    /// Whether `name` is selected.
    pub fn includes(&self, name: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Names(names) => names.contains(name),
        }
    }
}

/// Options for writing a grid into a container.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOptions {
    /// Quantities to write.
    pub quantities: Selection,
    /// Copy externally referenced arrays instead of writing links.
    pub copy: bool,
    /// When writing links, keep absolute file paths.
    pub absolute_paths: bool,
    /// Deflate dataset payloads.
    pub compression: bool,
    /// Precision of the wall datasets.
    pub wall_precision: Precision,
    /// Precision of the quantity datasets.
    pub physics_precision: Precision,
}

impl WriteOptions {
    /// Restrict the quantities that are written.
    pub fn with_quantities(mut self, quantities: Selection) -> Self {
        self.quantities = quantities;
        self
    }

    /// Choose between copying linked arrays and writing links.
    pub fn with_copy(mut self, copy: bool) -> Self {
        self.copy = copy;
        self
    }

    /// Choose between absolute and relative link paths.
    pub fn with_absolute_paths(mut self, absolute_paths: bool) -> Self {
        self.absolute_paths = absolute_paths;
        self
    }

    /// Enable or disable payload compression.
    pub fn with_compression(mut self, compression: bool) -> Self {
        self.compression = compression;
        self
    }

    /// Set the wall precision.
    pub fn with_wall_precision(mut self, precision: Precision) -> Self {
        self.wall_precision = precision;
        self
    }

    /// Set the quantity precision.
    pub fn with_physics_precision(mut self, precision: Precision) -> Self {
        self.physics_precision = precision;
        self
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            quantities: Selection::All,
            copy: true,
            absolute_paths: false,
            compression: true,
            wall_precision: Precision::F64,
            physics_precision: Precision::F64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection() {
        assert!(Selection::All.includes("density"));

        let selection = Selection::names(["density", "temperature"]);
        assert!(selection.includes("density"));
        assert!(!selection.includes("energy"));
        assert_eq!(Selection::default(), Selection::All);
    }

    #[test]
    fn test_write_options_default() {
        let options = WriteOptions::default();
        assert_eq!(options.quantities, Selection::All);
        assert!(options.copy);
        assert!(!options.absolute_paths);
        assert!(options.compression);
        assert_eq!(options.wall_precision, Precision::F64);
        assert_eq!(options.physics_precision, Precision::F64);
    }

    #[test]
    fn test_write_options_builder() {
        let options = WriteOptions::default()
            .with_copy(false)
            .with_absolute_paths(true)
            .with_compression(false)
            .with_physics_precision(Precision::F32);
        assert!(!options.copy);
        assert!(options.absolute_paths);
        assert!(!options.compression);
        assert_eq!(options.physics_precision, Precision::F32);
        assert_eq!(options.wall_precision, Precision::F64);
    }
}
