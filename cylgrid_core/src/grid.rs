//! The cylindrical-polar grid aggregate.

use std::collections::BTreeMap;
use std::sync::Arc;

use ndarray::{Array1, Array3, Array4};

use crate::error::{GridError, Result};
use crate::fingerprint::fingerprint;
use crate::geometry::CellGeometry;
use crate::quantity::Quantity;
use crate::types::{ExternalLink, GridShape};
use crate::validate::{check_array_dimensions, ArrayResolver};
use crate::view::GridView;

/// Cylindrical-polar grid: wall positions, derived cell geometry and the
/// physical quantities defined on the cells.
///
/// The geometry is held behind an `Arc` so views can share it; setting new
/// walls swaps the whole record and never touches the quantities.
///
/// # Example
///
/// ```ignore
/// use cylgrid_core::CylindricalPolarGrid;
/// use ndarray::Array3;
///
/// let mut grid = CylindricalPolarGrid::new(&[0.0, 1.0, 2.0], &[0.0, 1.0], &[0.0, 3.14])?;
/// grid.insert("density", Array3::<f64>::zeros((1, 1, 2)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CylindricalPolarGrid {
    geometry: Arc<CellGeometry>,
    quantities: BTreeMap<String, Quantity>,
}

impl CylindricalPolarGrid {
    /// Create a grid from radius, height and azimuth walls.
    pub fn new(w_wall: &[f64], z_wall: &[f64], p_wall: &[f64]) -> Result<Self> {
        Ok(Self::from_geometry(Arc::new(CellGeometry::from_walls(
            w_wall, z_wall, p_wall,
        )?)))
    }

    /// Create a grid without quantities around an existing geometry.
    pub fn from_geometry(geometry: Arc<CellGeometry>) -> Self {
        Self {
            geometry,
            quantities: BTreeMap::new(),
        }
    }

    /// Replace the walls and every derived geometry array.
    ///
    /// On error the previous geometry is kept unchanged.
    pub fn set_walls(&mut self, w_wall: &[f64], z_wall: &[f64], p_wall: &[f64]) -> Result<()> {
        let geometry = CellGeometry::from_walls(w_wall, z_wall, p_wall)?;
        self.geometry = Arc::new(geometry);
        Ok(())
    }

    /// Shared handle to the geometry.
    #[inline]
    pub fn geometry(&self) -> &Arc<CellGeometry> {
        &self.geometry
    }

    /// Cell counts `[n_p, n_z, n_w]`.
    #[inline]
    pub fn shape(&self) -> GridShape {
        self.geometry.shape()
    }

    /// Radial wall positions.
    #[inline]
    pub fn w_wall(&self) -> &Array1<f64> {
        self.geometry.w_wall()
    }

    /// Height wall positions.
    #[inline]
    pub fn z_wall(&self) -> &Array1<f64> {
        self.geometry.z_wall()
    }

    /// Azimuthal wall positions.
    #[inline]
    pub fn p_wall(&self) -> &Array1<f64> {
        self.geometry.p_wall()
    }

    /// Cell volumes.
    #[inline]
    pub fn volumes(&self) -> &Array3<f64> {
        self.geometry.volumes()
    }

    /// Wall areas, shape `[6, n_p, n_z, n_w]`.
    #[inline]
    pub fn areas(&self) -> &Array4<f64> {
        self.geometry.areas()
    }

    /// Cell widths, shape `[3, n_p, n_z, n_w]`.
    #[inline]
    pub fn widths(&self) -> &Array4<f64> {
        self.geometry.widths()
    }

    /// Fingerprint of the current walls.
    pub fn geometry_id(&self) -> String {
        fingerprint(
            self.w_wall().view(),
            self.z_wall().view(),
            self.p_wall().view(),
        )
    }

    /// All quantities by name.
    #[inline]
    pub fn quantities(&self) -> &BTreeMap<String, Quantity> {
        &self.quantities
    }

    /// Look up a quantity.
    pub fn get(&self, name: &str) -> Option<&Quantity> {
        self.quantities.get(name)
    }

    /// Look up a quantity for modification.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Quantity> {
        self.quantities.get_mut(name)
    }

    /// Whether a quantity with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.quantities.contains_key(name)
    }

    /// Names of all quantities, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.quantities.keys().map(String::as_str)
    }

    /// Store a quantity, returning any previous value under that name.
    ///
    /// Shapes are not checked here; see [`Self::check_array_dimensions`].
    pub fn insert(&mut self, name: impl Into<String>, quantity: impl Into<Quantity>) -> Option<Quantity> {
        self.quantities.insert(name.into(), quantity.into())
    }

    /// Store an empty component list, ready to be filled through a view.
    pub fn insert_components(&mut self, name: impl Into<String>) -> Option<Quantity> {
        self.insert(name, Quantity::MultiComponent(Vec::new()))
    }

    /// Store a reference to an array held in another container.
    pub fn insert_link(&mut self, name: impl Into<String>, link: ExternalLink) -> Option<Quantity> {
        self.insert(name, Quantity::ExternalRef(link))
    }

    /// Copy the viewed quantity of another grid's view into this grid.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the view's grid has a different shape.
    pub fn insert_from_view(&mut self, name: impl Into<String>, view: &GridView<'_>) -> Result<Option<Quantity>> {
        let name = name.into();
        if view.shape() != self.shape() {
            return Err(GridError::ShapeMismatch {
                name,
                expected: self.shape().to_vec(),
                got: view.shape().to_vec(),
            });
        }
        if view.geometry_id() != self.geometry_id() {
            log::warn!(
                "quantity '{}' copied from view '{}' defined on different walls",
                name,
                view.viewed_quantity()
            );
        }
        Ok(self.insert(name, view.quantity().clone()))
    }

    /// Remove a quantity.
    pub fn remove(&mut self, name: &str) -> Option<Quantity> {
        self.quantities.remove(name)
    }

    /// Component count shared by all multi-component quantities.
    ///
    /// Returns `None` when no quantity is a component list.
    ///
    /// # Errors
    /// Returns `Consistency` if two component lists differ in length.
    pub fn n_dust(&self) -> Result<Option<usize>> {
        let mut n_dust: Option<usize> = None;
        for (name, quantity) in &self.quantities {
            if let Some(count) = quantity.n_components() {
                match n_dust {
                    None => n_dust = Some(count),
                    Some(expected) if expected != count => {
                        return Err(GridError::Consistency {
                            name: name.clone(),
                            expected,
                            got: count,
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(n_dust)
    }

    /// Check that every quantity agrees with the grid shape.
    ///
    /// External references are resolved through `resolver`.
    pub fn check_array_dimensions(&self, resolver: &dyn ArrayResolver) -> Result<()> {
        check_array_dimensions(self.shape(), &self.quantities, resolver)
    }

    /// View restricted to one quantity.
    ///
    /// Appending through the view modifies this grid's quantity.
    ///
    /// # Errors
    /// Returns `UnknownQuantity` if there is no quantity called `name`.
    pub fn view(&mut self, name: &str) -> Result<GridView<'_>> {
        let geometry = Arc::clone(&self.geometry);
        let quantity = self
            .quantities
            .get_mut(name)
            .ok_or_else(|| GridError::UnknownQuantity {
                name: name.to_string(),
            })?;
        Ok(GridView::new(geometry, name.to_string(), quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn grid() -> CylindricalPolarGrid {
        CylindricalPolarGrid::new(&[0.0, 1.0, 2.0], &[0.0, 1.0], &[0.0, PI]).unwrap()
    }

    #[test]
    fn test_new_grid() {
        let g = grid();
        assert_eq!(g.shape(), [1, 1, 2]);
        assert!(g.quantities().is_empty());
        assert_eq!(g.n_dust().unwrap(), None);
    }

    #[test]
    fn test_set_walls_failure_keeps_geometry() {
        let mut g = grid();
        let before = g.geometry_id();

        let err = g.set_walls(&[0.0, 2.0, 1.0], &[0.0, 1.0], &[0.0, 1.0]);
        assert!(err.is_err());
        assert_eq!(g.geometry_id(), before);
        assert_eq!(g.shape(), [1, 1, 2]);

        g.set_walls(&[1.0, 2.0], &[0.0, 1.0, 2.0], &[0.0, 1.0]).unwrap();
        assert_eq!(g.shape(), [1, 2, 1]);
        assert_ne!(g.geometry_id(), before);
    }

    #[test]
    fn test_geometry_id_ignores_quantities() {
        let mut g = grid();
        let id = g.geometry_id();
        g.insert("density", Array3::<f64>::zeros((1, 1, 2)));
        assert_eq!(g.geometry_id(), id);
    }

    #[test]
    fn test_insert_and_contains() {
        let mut g = grid();
        assert!(!g.contains("density"));
        assert!(g.insert("density", Array3::<f64>::zeros((1, 1, 2))).is_none());
        assert!(g.contains("density"));
        assert!(g.insert_components("energy").is_none());
        assert_eq!(g.names().collect::<Vec<_>>(), ["density", "energy"]);
        assert!(g.remove("density").is_some());
        assert!(!g.contains("density"));
    }

    #[test]
    fn test_n_dust() {
        let mut g = grid();
        g.insert("temperature", Array3::<f64>::zeros((1, 1, 2)));
        g.insert("density", vec![Array3::<f64>::zeros((1, 1, 2)); 3]);
        g.insert("specific_energy", vec![Array3::<f64>::zeros((1, 1, 2)); 3]);
        assert_eq!(g.n_dust().unwrap(), Some(3));

        g.insert("other", vec![Array3::<f64>::zeros((1, 1, 2)); 2]);
        assert!(matches!(
            g.n_dust(),
            Err(GridError::Consistency { expected: 3, got: 2, .. })
        ));
    }

    #[test]
    fn test_view_unknown_quantity() {
        let mut g = grid();
        assert_eq!(
            g.view("density").unwrap_err(),
            GridError::UnknownQuantity {
                name: "density".into()
            }
        );
    }

    #[test]
    fn test_insert_from_view() {
        let mut source = grid();
        source.insert("density", Array3::from_elem((1, 1, 2), 4.0));
        let view = source.view("density").unwrap();

        let mut target = grid();
        target.insert_from_view("dust", &view).unwrap();
        assert_eq!(
            target.get("dust").and_then(Quantity::as_single),
            Some(&Array3::from_elem((1, 1, 2), 4.0))
        );

        let mut other = CylindricalPolarGrid::new(&[1.0, 2.0], &[0.0, 1.0], &[0.0, 1.0]).unwrap();
        assert!(matches!(
            other.insert_from_view("dust", &view),
            Err(GridError::ShapeMismatch { .. })
        ));
    }
}
