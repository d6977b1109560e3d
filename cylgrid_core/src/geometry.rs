//! Cell geometry derived from wall positions.
//!
//! Given the wall positions along radius (`w`), height (`z`) and azimuth
//! (`p`), this module computes cell centers, broadcast coordinate arrays and
//! the exact cylindrical cell volumes, wall areas and widths:
//!
//! ```text
//! V        = (r_max² - r_min²) / 2 · (z_max - z_min) · (φ_max - φ_min)
//! A_r      = r · Δz · Δφ                  (r = r_min, r_max)
//! A_z      = (r_max² - r_min²) / 2 · Δφ
//! A_φ      = Δr · Δz
//! S_r, S_z = Δr, Δz
//! S_φ      = r_center · Δφ
//! ```

use std::cmp::Ordering;

use ndarray::{s, Array1, Array3, Array4, ArrayView1, ArrayViewD, Axis as NdAxis, Ix1};

use crate::error::{GridError, Result};
use crate::meshgrid::meshgrid_3d;
use crate::types::{Axis, GridShape};

/// Order of the six wall areas along the leading axis of [`CellGeometry::areas`].
pub const AREA_ORDER: [&str; 6] = ["r-min", "r-max", "z-min", "z-max", "phi-min", "phi-max"];

/// Order of the three widths along the leading axis of [`CellGeometry::widths`].
pub const WIDTH_ORDER: [&str; 3] = ["r", "z", "phi"];

/// Immutable geometry of a cylindrical-polar grid.
///
/// All derived arrays are computed together from the walls and never updated
/// in place; replacing the walls means building a new `CellGeometry`.
#[derive(Debug, Clone, PartialEq)]
pub struct CellGeometry {
    shape: GridShape,

    w_wall: Array1<f64>,
    z_wall: Array1<f64>,
    p_wall: Array1<f64>,

    w: Array1<f64>,
    z: Array1<f64>,
    p: Array1<f64>,

    gw: Array3<f64>,
    gz: Array3<f64>,
    gp: Array3<f64>,

    volumes: Array3<f64>,
    areas: Array4<f64>,
    widths: Array4<f64>,
}

impl CellGeometry {
    /// Derive the full geometry from three wall arrays.
    ///
    /// # Errors
    /// Returns `Shape` if an axis has fewer than two walls and `NonMonotonic`
    /// if wall positions are not strictly increasing.
    pub fn from_walls(w_wall: &[f64], z_wall: &[f64], p_wall: &[f64]) -> Result<Self> {
        check_walls(Axis::Radius, w_wall)?;
        check_walls(Axis::Height, z_wall)?;
        check_walls(Axis::Azimuth, p_wall)?;

        let w_wall = Array1::from(w_wall.to_vec());
        let z_wall = Array1::from(z_wall.to_vec());
        let p_wall = Array1::from(p_wall.to_vec());

        Ok(Self::derive(w_wall, z_wall, p_wall))
    }

    /// Derive the geometry from walls of arbitrary dimensionality.
    ///
    /// Used when walls come from storage, where the rank is not known
    /// statically. Anything other than a 1-D array is a `Shape` error.
    pub fn from_dyn_walls(
        w_wall: ArrayViewD<'_, f64>,
        z_wall: ArrayViewD<'_, f64>,
        p_wall: ArrayViewD<'_, f64>,
    ) -> Result<Self> {
        let w_wall = walls_1d(Axis::Radius, w_wall)?;
        let z_wall = walls_1d(Axis::Height, z_wall)?;
        let p_wall = walls_1d(Axis::Azimuth, p_wall)?;

        Self::from_walls(&w_wall, &z_wall, &p_wall)
    }

    fn derive(w_wall: Array1<f64>, z_wall: Array1<f64>, p_wall: Array1<f64>) -> Self {
        let shape = [p_wall.len() - 1, z_wall.len() - 1, w_wall.len() - 1];

        let w = radial_centers(w_wall.view());
        let z = linear_centers(z_wall.view());
        let p = linear_centers(p_wall.view());

        let (gw, gz, gp) = meshgrid_3d(w.view(), z.view(), p.view());

        // Inner and outer wall of every cell along each axis
        let (gw_min, gz_min, gp_min) = meshgrid_3d(
            w_wall.slice(s![..-1]),
            z_wall.slice(s![..-1]),
            p_wall.slice(s![..-1]),
        );
        let (gw_max, gz_max, gp_max) = meshgrid_3d(
            w_wall.slice(s![1..]),
            z_wall.slice(s![1..]),
            p_wall.slice(s![1..]),
        );

        let dr = &gw_max - &gw_min;
        let dr2 = gw_max.mapv(|r| r * r) - gw_min.mapv(|r| r * r);
        let dz = &gz_max - &gz_min;
        let dp = &gp_max - &gp_min;

        let volumes = &dr2 * &dz * &dp / 2.0;

        let [n_p, n_z, n_w] = shape;

        let mut areas = Array4::zeros((6, n_p, n_z, n_w));
        let z_area = &dr2 * &dp * 0.5;
        let p_area = &dr * &dz;
        areas
            .index_axis_mut(NdAxis(0), 0)
            .assign(&(&gw_min * &dz * &dp));
        areas
            .index_axis_mut(NdAxis(0), 1)
            .assign(&(&gw_max * &dz * &dp));
        areas.index_axis_mut(NdAxis(0), 2).assign(&z_area);
        areas.index_axis_mut(NdAxis(0), 3).assign(&z_area);
        areas.index_axis_mut(NdAxis(0), 4).assign(&p_area);
        areas.index_axis_mut(NdAxis(0), 5).assign(&p_area);

        let mut widths = Array4::zeros((3, n_p, n_z, n_w));
        widths.index_axis_mut(NdAxis(0), 0).assign(&dr);
        widths.index_axis_mut(NdAxis(0), 1).assign(&dz);
        widths.index_axis_mut(NdAxis(0), 2).assign(&(&gw * &dp));

        log::debug!("derived cylindrical-polar geometry with shape {:?}", shape);

        Self {
            shape,
            w_wall,
            z_wall,
            p_wall,
            w,
            z,
            p,
            gw,
            gz,
            gp,
            volumes,
            areas,
            widths,
        }
    }

    /// Cell counts `[n_p, n_z, n_w]`.
    #[inline]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Total number of cells.
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.shape.iter().product()
    }

    /// Radial wall positions.
    #[inline]
    pub fn w_wall(&self) -> &Array1<f64> {
        &self.w_wall
    }

    /// Height wall positions.
    #[inline]
    pub fn z_wall(&self) -> &Array1<f64> {
        &self.z_wall
    }

    /// Azimuthal wall positions.
    #[inline]
    pub fn p_wall(&self) -> &Array1<f64> {
        &self.p_wall
    }

    /// Wall positions for one axis.
    pub fn walls(&self, axis: Axis) -> &Array1<f64> {
        match axis {
            Axis::Radius => &self.w_wall,
            Axis::Height => &self.z_wall,
            Axis::Azimuth => &self.p_wall,
        }
    }

    /// Radial cell centers (log-space midpoints).
    #[inline]
    pub fn w(&self) -> &Array1<f64> {
        &self.w
    }

    /// Height cell centers.
    #[inline]
    pub fn z(&self) -> &Array1<f64> {
        &self.z
    }

    /// Azimuthal cell centers.
    #[inline]
    pub fn p(&self) -> &Array1<f64> {
        &self.p
    }

    /// Radial center of every cell.
    #[inline]
    pub fn gw(&self) -> &Array3<f64> {
        &self.gw
    }

    /// Height center of every cell.
    #[inline]
    pub fn gz(&self) -> &Array3<f64> {
        &self.gz
    }

    /// Azimuthal center of every cell.
    #[inline]
    pub fn gp(&self) -> &Array3<f64> {
        &self.gp
    }

    /// Cell volumes.
    #[inline]
    pub fn volumes(&self) -> &Array3<f64> {
        &self.volumes
    }

    /// Wall areas, shape `[6, n_p, n_z, n_w]`, ordered as [`AREA_ORDER`].
    #[inline]
    pub fn areas(&self) -> &Array4<f64> {
        &self.areas
    }

    /// Cell widths, shape `[3, n_p, n_z, n_w]`, ordered as [`WIDTH_ORDER`].
    ///
    /// The azimuthal width is an arc length at the cell's radial center.
    #[inline]
    pub fn widths(&self) -> &Array4<f64> {
        &self.widths
    }
}

/// Validate one axis of wall positions.
///
/// At least two walls are required and every wall must strictly exceed the
/// previous one. NaN positions fail the ordering check.
pub fn check_walls(axis: Axis, walls: &[f64]) -> Result<()> {
    if walls.len() < 2 {
        return Err(GridError::Shape {
            axis,
            message: format!("at least two walls are required, got {}", walls.len()),
        });
    }

    for (index, pair) in walls.windows(2).enumerate() {
        if pair[1].partial_cmp(&pair[0]) != Some(Ordering::Greater) {
            return Err(GridError::NonMonotonic {
                axis,
                index: index + 1,
                previous: pair[0],
                value: pair[1],
            });
        }
    }

    Ok(())
}

fn walls_1d(axis: Axis, walls: ArrayViewD<'_, f64>) -> Result<Vec<f64>> {
    let ndim = walls.ndim();
    let walls = walls
        .into_dimensionality::<Ix1>()
        .map_err(|_| GridError::Shape {
            axis,
            message: format!("expected a 1-D sequence, got {} dimensions", ndim),
        })?;
    Ok(walls.to_vec())
}

/// Radial centers as log-space midpoints of adjacent walls.
///
/// The midpoint is undefined when the innermost wall sits at exactly zero,
/// in which case the first center is placed halfway to the next wall.
fn radial_centers(w_wall: ArrayView1<'_, f64>) -> Array1<f64> {
    let mut w = Array1::from_shape_fn(w_wall.len() - 1, |i| {
        10f64.powf((w_wall[i].log10() + w_wall[i + 1].log10()) / 2.0)
    });
    if w_wall[0] == 0.0 {
        w[0] = w_wall[1] / 2.0;
    }
    w
}

fn linear_centers(walls: ArrayView1<'_, f64>) -> Array1<f64> {
    Array1::from_shape_fn(walls.len() - 1, |i| (walls[i] + walls[i + 1]) / 2.0)
}
