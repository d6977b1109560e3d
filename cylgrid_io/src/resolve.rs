//! Resolution of external links into other container files.

use std::path::{Path, PathBuf};

use cylgrid_core::{ArrayResolver, ExternalLink, GridError};
use ndarray::ArrayD;

use crate::container::{Dataset, Node};
use crate::error::{IoError, Result};
use crate::format::ContainerFile;

/// Opens linked container files read-only and follows the link path.
///
/// Relative link filenames are resolved against `base_dir` when set, and
/// against the working directory otherwise. Files are opened anew on every
/// call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerResolver {
    base_dir: Option<PathBuf>,
}

impl ContainerResolver {
    /// Resolver for relative filenames against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver for relative filenames against `dir`.
    pub fn relative_to(dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(dir.into()),
        }
    }

    /// Directory relative filenames are resolved against, if any.
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// File a link points into.
    pub fn locate(&self, link: &ExternalLink) -> PathBuf {
        match &self.base_dir {
            Some(dir) if link.filename.is_relative() => dir.join(&link.filename),
            _ => link.filename.clone(),
        }
    }

    /// Load the dataset a link points to.
    ///
    /// # Errors
    /// Returns `NotADataset` if the target is a group or another link.
    pub fn resolve_dataset(&self, link: &ExternalLink) -> Result<Dataset> {
        let file = ContainerFile::open(self.locate(link))?;
        match file.root().get_path(&link.path)? {
            Node::Dataset(dataset) => Ok(dataset.clone()),
            _ => Err(IoError::NotADataset {
                path: link.to_string(),
            }),
        }
    }

    /// Load the array a link points to, widened to `f64`.
    pub fn resolve_array(&self, link: &ExternalLink) -> Result<ArrayD<f64>> {
        Ok(self.resolve_dataset(link)?.data().to_f64())
    }
}

impl ArrayResolver for ContainerResolver {
    fn resolve_shape(&self, link: &ExternalLink) -> cylgrid_core::Result<Vec<usize>> {
        match self.resolve_dataset(link) {
            Ok(dataset) => Ok(dataset.shape().to_vec()),
            Err(IoError::NotADataset { .. }) => Err(GridError::InvalidValue {
                message: format!("external link {} does not point to a dataset", link),
            }),
            Err(err) => Err(GridError::UnresolvedLink {
                filename: link.filename.display().to_string(),
                path: link.path.clone(),
                message: err.to_string(),
            }),
        }
    }
}
