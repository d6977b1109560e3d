//! Geometry fingerprint.
//!
//! A BLAKE3 digest of the raw wall positions, used to tie stored field data to
//! the geometry it was computed on. It is an equality proxy only.

use ndarray::ArrayView1;

/// Length of a fingerprint in hex characters.
pub const FINGERPRINT_LEN: usize = 64;

/// Hash the three wall arrays in radius, height, azimuth order.
///
/// Each value contributes its little-endian `f64` bytes, so the digest only
/// depends on the exact bit patterns of the walls.
pub fn fingerprint(
    w_wall: ArrayView1<'_, f64>,
    z_wall: ArrayView1<'_, f64>,
    p_wall: ArrayView1<'_, f64>,
) -> String {
    let mut hasher = blake3::Hasher::new();
    for value in w_wall.iter().chain(z_wall.iter()).chain(p_wall.iter()) {
        hasher.update(&value.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}
