//! Pure geometry primitives: triangle measures and ray-triangle
//! intersection (`spec.md` section 4.1). Free functions over `glam::DVec3`,
//! no mesh-wide state.

mod ray;
mod triangle;

pub use ray::{ray_triangle_intersect, RayHit};
pub use triangle::{triangle_area, triangle_centroid, triangle_normal};

use glam::DVec3;

/// Signed volume of a closed, outward-oriented triangular polyhedron:
/// the sum over faces of `(v0 x v1) . v2 / 6`. Positive iff face windings
/// are consistently outward.
pub fn polyhedron_volume(nodes: &[DVec3], faces: &[[usize; 3]]) -> f64 {
    faces
        .iter()
        .map(|&[a, b, c]| nodes[a].cross(nodes[b]).dot(nodes[c]) / 6.0)
        .sum()
}

/// Equivalent radius of a body with the given (positive) volume:
/// `(3V / 4*pi)^(1/3)`.
pub fn equivalent_radius(volume: f64) -> f64 {
    (3.0 * volume / (4.0 * std::f64::consts::PI)).cbrt()
}
