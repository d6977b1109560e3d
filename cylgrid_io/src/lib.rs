//! cylgrid_io - storage of cylindrical-polar grids in hierarchical containers.
//!
//! This crate writes a [`CylindricalPolarGrid`] (walls, fingerprint and
//! quantities) into a container tree and reads it back, verifying that the
//! stored fingerprint matches the stored walls.
//!
//! # Core Types
//!
//! - [`Group`], [`Dataset`], [`Node`]: The in-memory container tree
//! - [`ContainerFile`]: A tree bound to a file, flushed atomically
//! - [`ContainerResolver`]: Resolves external links into other files
//! - [`WriteOptions`], [`Selection`]: What and how to write or read
//!
//! # Example
//!
//! ```ignore
//! use cylgrid_io::{read_from_file, write_to_file, Selection, WriteOptions};
//! use cylgrid_core::CylindricalPolarGrid;
//! use ndarray::Array3;
//!
//! let mut grid = CylindricalPolarGrid::new(&[0.0, 1.0, 2.0], &[0.0, 1.0], &[0.0, 3.14])?;
//! grid.insert("density", Array3::from_elem((1, 1, 2), 1.0e-20));
//!
//! write_to_file(&grid, "model.cyl", &WriteOptions::default())?;
//! let loaded = read_from_file("model.cyl", &Selection::All)?;
//! assert_eq!(loaded.geometry_id(), grid.geometry_id());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod container;
pub mod error;
pub mod format;
pub mod grid_io;
pub mod resolve;

// Re-export core types from cylgrid_core
pub use cylgrid_core::{CylindricalPolarGrid, ExternalLink, GridError, Quantity};

// Re-export main types
pub use config::{Selection, WriteOptions};
pub use container::{ArrayData, AttrValue, Attributes, Dataset, Group, Node, Precision};
pub use error::{IoError, Result};
pub use resolve::ContainerResolver;

// Re-export format types
pub use format::{
    load_container, save_container, ContainerFile, ContainerHeader, CYLG_MAGIC, FORMAT_VERSION,
    HEADER_SIZE,
};

// Re-export grid I/O
pub use grid_io::{
    read_from_file, read_grid, read_grid_with, write_grid, write_grid_with, write_to_file,
    GEOMETRY_GROUP, GRID_TYPE, QUANTITIES_GROUP, WALL_UNIT,
};
