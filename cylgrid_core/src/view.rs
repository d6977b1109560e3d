//! Single-quantity views of a grid.

use std::sync::Arc;

use ndarray::Array3;

use crate::error::{GridError, Result};
use crate::fingerprint::fingerprint;
use crate::geometry::CellGeometry;
use crate::grid::CylindricalPolarGrid;
use crate::quantity::Quantity;
use crate::types::GridShape;

/// A grid restricted to one quantity.
///
/// The view shares the parent's geometry and borrows the parent's quantity
/// mutably, so components appended here show up in the parent grid.
#[derive(Debug)]
pub struct GridView<'g> {
    geometry: Arc<CellGeometry>,
    viewed_quantity: String,
    quantity: &'g mut Quantity,
}

/// What can be appended to a viewed component list.
#[derive(Debug, Clone, Copy)]
pub enum AppendSource<'s> {
    /// A bare array with the grid's shape.
    Array(&'s Array3<f64>),
    /// The viewed quantity of another view.
    View {
        /// Name of the other view's quantity.
        name: &'s str,
        /// The other view's quantity.
        quantity: &'s Quantity,
    },
}

impl<'s> From<&'s Array3<f64>> for AppendSource<'s> {
    fn from(array: &'s Array3<f64>) -> Self {
        AppendSource::Array(array)
    }
}

impl<'s, 'g: 's> From<&'s GridView<'g>> for AppendSource<'s> {
    fn from(view: &'s GridView<'g>) -> Self {
        AppendSource::View {
            name: view.viewed_quantity(),
            quantity: view.quantity(),
        }
    }
}

impl<'g> GridView<'g> {
    pub(crate) fn new(
        geometry: Arc<CellGeometry>,
        viewed_quantity: String,
        quantity: &'g mut Quantity,
    ) -> Self {
        Self {
            geometry,
            viewed_quantity,
            quantity,
        }
    }

    /// Name of the quantity this view exposes.
    #[inline]
    pub fn viewed_quantity(&self) -> &str {
        &self.viewed_quantity
    }

    /// The viewed quantity.
    #[inline]
    pub fn quantity(&self) -> &Quantity {
        self.quantity
    }

    /// Shared geometry of the parent grid.
    #[inline]
    pub fn geometry(&self) -> &Arc<CellGeometry> {
        &self.geometry
    }

    /// Cell counts `[n_p, n_z, n_w]`.
    #[inline]
    pub fn shape(&self) -> GridShape {
        self.geometry.shape()
    }

    /// Fingerprint of the parent's walls.
    pub fn geometry_id(&self) -> String {
        fingerprint(
            self.geometry.w_wall().view(),
            self.geometry.z_wall().view(),
            self.geometry.p_wall().view(),
        )
    }

    /// Component count of the viewed quantity, if it is a component list.
    pub fn n_dust(&self) -> Option<usize> {
        self.quantity.n_components()
    }

    /// Append an array, or the contents of another view, to the viewed
    /// component list.
    ///
    /// A source view holding a single array contributes one component; one
    /// holding a component list contributes all of its components in order.
    ///
    /// # Errors
    /// - `InvalidValue` if the viewed quantity is not a component list, or the
    ///   source view holds an external reference
    /// - `ShapeMismatch` if an incoming array does not have the grid's shape
    pub fn append<'s>(&mut self, source: impl Into<AppendSource<'s>>) -> Result<()> {
        let incoming: Vec<&Array3<f64>> = match source.into() {
            AppendSource::Array(array) => vec![array],
            AppendSource::View { quantity, name } => match quantity {
                Quantity::Single(array) => vec![array],
                Quantity::MultiComponent(components) => components.iter().collect(),
                Quantity::ExternalRef(link) => {
                    return Err(GridError::InvalidValue {
                        message: format!(
                            "cannot append view '{}' holding an external link to {}",
                            name, link
                        ),
                    });
                }
            },
        };

        let shape = self.shape();
        for array in &incoming {
            if array.shape() != shape {
                return Err(GridError::ShapeMismatch {
                    name: self.viewed_quantity.clone(),
                    expected: shape.to_vec(),
                    got: array.shape().to_vec(),
                });
            }
        }

        match &mut *self.quantity {
            Quantity::MultiComponent(components) => {
                components.extend(incoming.into_iter().cloned());
                Ok(())
            }
            other => Err(GridError::InvalidValue {
                message: format!(
                    "quantity '{}' is a {}, not a component list",
                    self.viewed_quantity,
                    other.kind()
                ),
            }),
        }
    }

    /// Standalone grid holding a copy of the viewed quantity.
    pub fn to_grid(&self) -> CylindricalPolarGrid {
        let mut grid = CylindricalPolarGrid::from_geometry(Arc::clone(&self.geometry));
        grid.insert(self.viewed_quantity.clone(), self.quantity.clone());
        grid
    }
}
