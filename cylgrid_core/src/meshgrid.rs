//! Outer-product broadcast of per-axis coordinates.

use ndarray::{Array3, ArrayView1};

/// Broadcast three 1-D arrays into three 3-D arrays of shape
/// `[p.len(), z.len(), w.len()]`.
///
/// Element `[k, j, i]` of the returned arrays holds `w[i]`, `z[j]` and `p[k]`
/// respectively, so every cell's coordinates can be read by index.
pub fn meshgrid_3d(
    w: ArrayView1<'_, f64>,
    z: ArrayView1<'_, f64>,
    p: ArrayView1<'_, f64>,
) -> (Array3<f64>, Array3<f64>, Array3<f64>) {
    let shape = (p.len(), z.len(), w.len());
    let gw = Array3::from_shape_fn(shape, |(_, _, i)| w[i]);
    let gz = Array3::from_shape_fn(shape, |(_, j, _)| z[j]);
    let gp = Array3::from_shape_fn(shape, |(k, _, _)| p[k]);
    (gw, gz, gp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_meshgrid_shape_and_values() {
        let w = array![1.0, 2.0, 3.0];
        let z = array![10.0, 20.0];
        let p = array![0.5];

        let (gw, gz, gp) = meshgrid_3d(w.view(), z.view(), p.view());

        assert_eq!(gw.shape(), &[1, 2, 3]);
        assert_eq!(gz.shape(), &[1, 2, 3]);
        assert_eq!(gp.shape(), &[1, 2, 3]);

        assert_eq!(gw[[0, 1, 2]], 3.0);
        assert_eq!(gz[[0, 1, 2]], 20.0);
        assert_eq!(gp[[0, 1, 2]], 0.5);
        assert_eq!(gz[[0, 0, 2]], 10.0);
    }

    #[test]
    fn test_meshgrid_is_constant_along_other_axes() {
        let w = array![1.0, 2.0];
        let z = array![3.0, 4.0, 5.0];
        let p = array![6.0, 7.0];

        let (gw, _, gp) = meshgrid_3d(w.view(), z.view(), p.view());

        for k in 0..2 {
            for j in 0..3 {
                assert_eq!(gw[[k, j, 1]], 2.0);
                assert_eq!(gp[[k, j, 0]], p[k]);
            }
        }
    }
}
