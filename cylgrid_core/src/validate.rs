//! Dimensional consistency between a grid and its quantities.

use crate::error::{GridError, Result};
use crate::quantity::Quantity;
use crate::types::{ExternalLink, GridShape};

/// Resolves external references to the shape of the array they point at.
///
/// The grid itself never opens other containers; whoever owns the storage
/// layer supplies an implementation.
pub trait ArrayResolver {
    /// Shape of the array behind `link`.
    ///
    /// # Errors
    /// `UnresolvedLink` if the target cannot be opened, `InvalidValue` if it
    /// is not an array.
    fn resolve_shape(&self, link: &ExternalLink) -> Result<Vec<usize>>;
}

/// Check every quantity against the grid shape.
///
/// Stops at the first offending quantity.
pub fn check_array_dimensions<'a, I>(
    shape: GridShape,
    quantities: I,
    resolver: &dyn ArrayResolver,
) -> Result<()>
where
    I: IntoIterator<Item = (&'a String, &'a Quantity)>,
{
    for (name, quantity) in quantities {
        check_quantity(name, quantity, shape, resolver)?;
    }
    Ok(())
}

/// Check a single quantity against the grid shape.
pub fn check_quantity(
    name: &str,
    quantity: &Quantity,
    shape: GridShape,
    resolver: &dyn ArrayResolver,
) -> Result<()> {
    match quantity {
        Quantity::Single(array) => check_shape(name, array.shape(), shape),
        Quantity::MultiComponent(components) => components
            .iter()
            .try_for_each(|component| check_shape(name, component.shape(), shape)),
        Quantity::ExternalRef(link) => {
            let resolved = resolver.resolve_shape(link)?;
            match resolved.len() {
                3 => check_shape(name, &resolved, shape),
                // Leading axis counts components
                4 => check_shape(name, &resolved[1..], shape),
                ndim => Err(GridError::UnsupportedRank {
                    name: name.to_string(),
                    ndim,
                }),
            }
        }
    }
}

fn check_shape(name: &str, got: &[usize], expected: GridShape) -> Result<()> {
    if got != expected {
        return Err(GridError::ShapeMismatch {
            name: name.to_string(),
            expected: expected.to_vec(),
            got: got.to_vec(),
        });
    }
    Ok(())
}
