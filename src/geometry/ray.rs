//! Moller-Trumbore ray-triangle intersection.

use crate::constants::RAY_PARALLEL_EPS;
use glam::DVec3;

/// A non-negative parametric hit distance along the ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub t: f64,
}

/// Intersects the ray `origin + t * dir` (`t >= 0`) against the triangle
/// `(v0, v1, v2)`.
///
/// `eps` rejects rays that are numerically parallel to the triangle's
/// plane (back-face or edge-on hits relative to `dir` included), so the
/// same routine doubles as a one-sided shadow test: a ray cast from a lit
/// facet toward a blocker only needs forward hits, which is exactly what
/// `t >= 0` selects.
pub fn ray_triangle_intersect(
    origin: DVec3,
    dir: DVec3,
    v0: DVec3,
    v1: DVec3,
    v2: DVec3,
    eps: f64,
) -> Option<RayHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let pvec = dir.cross(edge2);
    let det = edge1.dot(pvec);

    if det.abs() < eps {
        return None;
    }
    let inv_det = 1.0 / det;

    let tvec = origin - v0;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);
    let v = dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;
    if t < 0.0 {
        return None;
    }
    Some(RayHit { t })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy_triangle() -> (DVec3, DVec3, DVec3) {
        (
            DVec3::new(-1.0, -1.0, 0.0),
            DVec3::new(1.0, -1.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn hits_triangle_from_above() {
        let (v0, v1, v2) = xy_triangle();
        let origin = DVec3::new(0.0, 0.0, 5.0);
        let dir = DVec3::new(0.0, 0.0, -1.0);
        let hit = ray_triangle_intersect(origin, dir, v0, v1, v2, RAY_PARALLEL_EPS);
        assert_eq!(hit, Some(RayHit { t: 5.0 }));
    }

    #[test]
    fn misses_triangle_outside_its_bounds() {
        let (v0, v1, v2) = xy_triangle();
        let origin = DVec3::new(5.0, 5.0, 5.0);
        let dir = DVec3::new(0.0, 0.0, -1.0);
        assert!(ray_triangle_intersect(origin, dir, v0, v1, v2, RAY_PARALLEL_EPS).is_none());
    }

    #[test]
    fn rejects_ray_behind_origin() {
        let (v0, v1, v2) = xy_triangle();
        let origin = DVec3::new(0.0, 0.0, -5.0);
        let dir = DVec3::new(0.0, 0.0, -1.0); // pointing away from the triangle
        assert!(ray_triangle_intersect(origin, dir, v0, v1, v2, RAY_PARALLEL_EPS).is_none());
    }

    #[test]
    fn rejects_parallel_ray() {
        let (v0, v1, v2) = xy_triangle();
        let origin = DVec3::new(0.0, 0.0, 1.0);
        let dir = DVec3::new(1.0, 0.0, 0.0); // parallel to the xy-plane triangle
        assert!(ray_triangle_intersect(origin, dir, v0, v1, v2, RAY_PARALLEL_EPS).is_none());
    }
}
