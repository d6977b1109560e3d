//! End-to-end use of the grid API: build, attach quantities, view, validate.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use approx::assert_relative_eq;
use cylgrid_core::prelude::*;
use ndarray::Array3;

/// Resolver for links into a fixed set of in-memory shapes.
struct Shapes(BTreeMap<&'static str, Vec<usize>>);

impl ArrayResolver for Shapes {
    fn resolve_shape(&self, link: &ExternalLink) -> Result<Vec<usize>> {
        self.0
            .get(link.path.as_str())
            .cloned()
            .ok_or_else(|| GridError::UnresolvedLink {
                filename: link.filename.display().to_string(),
                path: link.path.clone(),
                message: "no such dataset".into(),
            })
    }
}

fn reference_grid() -> CylindricalPolarGrid {
    CylindricalPolarGrid::new(&[0.0, 1.0, 2.0], &[0.0, 1.0], &[0.0, PI]).unwrap()
}

#[test]
fn test_reference_fixture() {
    let grid = reference_grid();

    assert_eq!(grid.shape(), [1, 1, 2]);
    assert_eq!(grid.geometry().w()[0], 0.5);
    assert_relative_eq!(grid.volumes().sum(), (4.0 - 0.0) / 2.0 * 1.0 * PI, max_relative = 1e-12);
}

#[test]
fn test_view_append_builds_component_list() {
    let mut grid = reference_grid();
    let arr1 = Array3::from_elem((1, 1, 2), 1.0);
    let arr2 = Array3::from_elem((1, 1, 2), 2.0);
    grid.insert("density", vec![arr1.clone()]);

    grid.view("density").unwrap().append(&arr2).unwrap();

    assert_eq!(
        grid.get("density"),
        Some(&Quantity::MultiComponent(vec![arr1, arr2]))
    );
    assert_eq!(grid.n_dust().unwrap(), Some(2));
}

#[test]
fn test_validation_covers_every_variant() {
    let mut grid = reference_grid();
    grid.insert("temperature", Array3::<f64>::zeros((1, 1, 2)));
    grid.insert("density", vec![Array3::<f64>::zeros((1, 1, 2)); 2]);
    grid.insert_link("energy", ExternalLink::new("previous.cyl", "/Quantities/energy"));

    let mut shapes = BTreeMap::new();
    shapes.insert("/Quantities/energy", vec![2, 1, 1, 2]);
    let resolver = Shapes(shapes);

    assert!(grid.check_array_dimensions(&resolver).is_ok());

    grid.insert("broken", Array3::<f64>::zeros((2, 1, 2)));
    let err = grid.check_array_dimensions(&resolver).unwrap_err();
    assert_eq!(
        err,
        GridError::ShapeMismatch {
            name: "broken".into(),
            expected: vec![1, 1, 2],
            got: vec![2, 1, 2],
        }
    );
}

#[test]
fn test_reset_walls_flags_stale_quantities() {
    let mut grid = reference_grid();
    grid.insert("density", Array3::<f64>::zeros((1, 1, 2)));
    let resolver = Shapes(BTreeMap::new());
    assert!(grid.check_array_dimensions(&resolver).is_ok());

    grid.set_walls(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0], &[0.0, PI]).unwrap();
    assert_eq!(grid.shape(), [1, 1, 3]);
    assert!(matches!(
        grid.check_array_dimensions(&resolver),
        Err(GridError::ShapeMismatch { .. })
    ));
}
