//! Physical quantities attached to a grid.

use ndarray::{Array3, Array4, ArrayD, Axis as NdAxis, Ix3};

use crate::error::{GridError, Result};
use crate::types::{ExternalLink, GridShape};

/// Value stored under a quantity name.
#[derive(Debug, Clone, PartialEq)]
pub enum Quantity {
    /// One field array with the grid's shape.
    Single(Array3<f64>),
    /// One array per component (e.g. per dust species), each with the grid's shape.
    MultiComponent(Vec<Array3<f64>>),
    /// Array stored in another container, resolved on demand.
    ExternalRef(ExternalLink),
}

impl Quantity {
    /// Build a quantity from an array of unknown rank.
    ///
    /// Rank 3 becomes `Single`; rank 4 becomes `MultiComponent`, split along
    /// the leading axis.
    ///
    /// # Errors
    /// Returns `UnsupportedRank` for any other rank.
    pub fn from_dyn(name: &str, array: ArrayD<f64>) -> Result<Self> {
        match array.ndim() {
            3 => {
                let array = array
                    .into_dimensionality::<Ix3>()
                    .map_err(|_| unsupported(name, 3))?;
                Ok(Quantity::Single(array))
            }
            4 => {
                let components = array
                    .axis_iter(NdAxis(0))
                    .map(|component| {
                        component
                            .to_owned()
                            .into_dimensionality::<Ix3>()
                            .map_err(|_| unsupported(name, 4))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Quantity::MultiComponent(components))
            }
            ndim => Err(unsupported(name, ndim)),
        }
    }

    /// Short description of the variant, for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Quantity::Single(_) => "array",
            Quantity::MultiComponent(_) => "component list",
            Quantity::ExternalRef(_) => "external link",
        }
    }

    /// Number of components of a multi-component quantity.
    pub fn n_components(&self) -> Option<usize> {
        match self {
            Quantity::MultiComponent(components) => Some(components.len()),
            _ => None,
        }
    }

    /// The single array, if this is a `Single` quantity.
    pub fn as_single(&self) -> Option<&Array3<f64>> {
        match self {
            Quantity::Single(array) => Some(array),
            _ => None,
        }
    }

    /// The component arrays, if this is a `MultiComponent` quantity.
    pub fn components(&self) -> Option<&[Array3<f64>]> {
        match self {
            Quantity::MultiComponent(components) => Some(components),
            _ => None,
        }
    }

    /// The link, if this is an `ExternalRef` quantity.
    pub fn as_link(&self) -> Option<&ExternalLink> {
        match self {
            Quantity::ExternalRef(link) => Some(link),
            _ => None,
        }
    }
}

impl From<Array3<f64>> for Quantity {
    fn from(array: Array3<f64>) -> Self {
        Quantity::Single(array)
    }
}

impl From<Vec<Array3<f64>>> for Quantity {
    fn from(components: Vec<Array3<f64>>) -> Self {
        Quantity::MultiComponent(components)
    }
}

impl From<ExternalLink> for Quantity {
    fn from(link: ExternalLink) -> Self {
        Quantity::ExternalRef(link)
    }
}

/// Stack component arrays along a new leading axis.
///
/// An empty list yields an array of shape `[0, n_p, n_z, n_w]`.
///
/// # Errors
/// Returns `ShapeMismatch` if a component does not have the grid's shape.
pub fn stack_components(
    name: &str,
    components: &[Array3<f64>],
    shape: GridShape,
) -> Result<Array4<f64>> {
    let [n_p, n_z, n_w] = shape;
    let mut stacked = Array4::zeros((components.len(), n_p, n_z, n_w));
    for (i, component) in components.iter().enumerate() {
        if component.shape() != shape {
            return Err(GridError::ShapeMismatch {
                name: name.to_string(),
                expected: shape.to_vec(),
                got: component.shape().to_vec(),
            });
        }
        stacked.index_axis_mut(NdAxis(0), i).assign(component);
    }
    Ok(stacked)
}

fn unsupported(name: &str, ndim: usize) -> GridError {
    GridError::UnsupportedRank {
        name: name.to_string(),
        ndim,
    }
}
