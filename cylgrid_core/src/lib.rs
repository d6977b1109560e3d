//! # cylgrid_core
//!
//! Geometry and bookkeeping for cylindrical-polar grids used by volumetric
//! (e.g. radiative transfer) simulations.
//!
//! A grid is defined by three strictly increasing arrays of wall positions
//! along radius (`w`), height (`z`) and azimuth (`p`). From these the crate
//! derives, once and as a unit:
//!
//! - cell centers and their 3-D broadcasts
//! - exact cell volumes
//! - the six wall areas of every cell
//! - per-axis cell widths (the azimuthal width is an arc length)
//!
//! Physical quantities are attached by name, either as one array, a list of
//! per-component arrays, or a link into another container. Their shapes are
//! checked against the grid before anything is stored.
//!
//! This crate does no I/O; `cylgrid_io` stores grids in hierarchical
//! containers and resolves external links.
//!
//! ## Modules
//!
//! - [`geometry`]: Wall validation and derived cell geometry
//! - [`meshgrid`]: Outer-product broadcast of per-axis coordinates
//! - [`fingerprint`]: Geometry hash
//! - [`quantity`]: Quantity variants
//! - [`validate`]: Shape checks against the grid
//! - [`grid`]: The grid aggregate
//! - [`view`]: Single-quantity views
//! - [`error`]: Error types
//!
//! ## Usage
//!
//! ```ignore
//! use cylgrid_core::prelude::*;
//! use ndarray::Array3;
//!
//! let mut grid = CylindricalPolarGrid::new(&[0.0, 1.0, 2.0], &[0.0, 1.0], &[0.0, 3.14])?;
//! grid.insert_components("density");
//!
//! let mut view = grid.view("density")?;
//! view.append(&Array3::from_elem((1, 1, 2), 1.0e-20))?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod fingerprint;
pub mod geometry;
pub mod grid;
pub mod meshgrid;
pub mod quantity;
pub mod types;
pub mod validate;
pub mod view;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{GridError, Result};
    pub use crate::grid::CylindricalPolarGrid;
    pub use crate::quantity::Quantity;
    pub use crate::types::{Axis, ExternalLink, GridShape};
    pub use crate::validate::ArrayResolver;
    pub use crate::view::{AppendSource, GridView};
}

pub use error::{GridError, Result};
pub use fingerprint::{fingerprint, FINGERPRINT_LEN};
pub use geometry::{check_walls, CellGeometry, AREA_ORDER, WIDTH_ORDER};
pub use grid::CylindricalPolarGrid;
pub use meshgrid::meshgrid_3d;
pub use quantity::{stack_components, Quantity};
pub use types::{Axis, ExternalLink, GridShape};
pub use validate::{check_array_dimensions, check_quantity, ArrayResolver};
pub use view::{AppendSource, GridView};
