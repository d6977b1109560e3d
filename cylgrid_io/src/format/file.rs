//! File-backed containers.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::codec::{load_container, save_container};
use crate::container::Group;
use crate::error::Result;

/// Container tree bound to a path on disk.
///
/// The tree is loaded whole on [`open`](Self::open) and written whole on
/// [`flush`](Self::flush). Flushing writes a sibling temporary file and
/// renames it over the target, so readers never see a partial file.
#[derive(Debug, Clone)]
pub struct ContainerFile {
    path: PathBuf,
    root: Group,
}

impl ContainerFile {
    /// Create (or truncate) a container file with an empty root group.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = Self::from_root(path, Group::new());
        file.flush()?;
        Ok(file)
    }

    /// Bind an in-memory tree to a path without touching the disk.
    pub fn from_root(path: impl AsRef<Path>, root: Group) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            root,
        }
    }

    /// Open an existing container file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut reader = BufReader::new(File::open(&path)?);
        let root = load_container(&mut reader)?;
        log::debug!("opened container {}", path.display());
        Ok(Self { path, root })
    }

    /// Open the file if it exists, otherwise create it.
    pub fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Path of the backing file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Root group.
    #[inline]
    pub fn root(&self) -> &Group {
        &self.root
    }

    /// Root group, for modification. Changes reach disk on [`flush`](Self::flush).
    #[inline]
    pub fn root_mut(&mut self) -> &mut Group {
        &mut self.root
    }

    /// Consume the handle, keeping the tree.
    pub fn into_root(self) -> Group {
        self.root
    }

    /// Write the tree to disk.
    pub fn flush(&self) -> Result<()> {
        let mut temp_path = self.path.clone().into_os_string();
        temp_path.push(".tmp");
        let temp_path = PathBuf::from(temp_path);

        let written = self
            .write_to(&temp_path)
            .and_then(|()| Ok(std::fs::rename(&temp_path, &self.path)?));
        if written.is_err() && temp_path.exists() {
            if let Err(err) = std::fs::remove_file(&temp_path) {
                log::warn!("could not remove {}: {}", temp_path.display(), err);
            }
        }
        written?;

        log::debug!("flushed container {}", self.path.display());
        Ok(())
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        save_container(&self.root, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
