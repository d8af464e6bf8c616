//! Centroid, normal, and area of a single triangle.

use glam::DVec3;

/// Centroid of the three vertices.
#[inline]
pub fn triangle_centroid(v0: DVec3, v1: DVec3, v2: DVec3) -> DVec3 {
    (v0 + v1 + v2) / 3.0
}

/// Outward unit normal via `(v1 - v0) x (v2 - v0)`, normalized.
///
/// Returns the zero vector for a degenerate (zero-area) triangle; callers
/// should check [`triangle_area`] before trusting the normal.
#[inline]
pub fn triangle_normal(v0: DVec3, v1: DVec3, v2: DVec3) -> DVec3 {
    let cross = (v1 - v0).cross(v2 - v0);
    let len = cross.length();
    if len > 0.0 {
        cross / len
    } else {
        DVec3::ZERO
    }
}

/// Triangle area, `0.5 * |(v1 - v0) x (v2 - v0)|`.
#[inline]
pub fn triangle_area(v0: DVec3, v1: DVec3, v2: DVec3) -> f64 {
    0.5 * (v1 - v0).cross(v2 - v0).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_right_triangle_area_is_half() {
        let v0 = DVec3::new(0.0, 0.0, 0.0);
        let v1 = DVec3::new(1.0, 0.0, 0.0);
        let v2 = DVec3::new(0.0, 1.0, 0.0);
        assert!((triangle_area(v0, v1, v2) - 0.5).abs() < 1e-15);
    }

    #[test]
    fn normal_of_xy_triangle_points_plus_z() {
        let v0 = DVec3::new(0.0, 0.0, 0.0);
        let v1 = DVec3::new(1.0, 0.0, 0.0);
        let v2 = DVec3::new(0.0, 1.0, 0.0);
        let n = triangle_normal(v0, v1, v2);
        assert!((n - DVec3::Z).length() < 1e-15);
    }

    #[test]
    fn degenerate_triangle_has_zero_area_and_normal() {
        let v0 = DVec3::new(0.0, 0.0, 0.0);
        let v1 = DVec3::new(1.0, 0.0, 0.0);
        let v2 = DVec3::new(2.0, 0.0, 0.0);
        assert_eq!(triangle_area(v0, v1, v2), 0.0);
        assert_eq!(triangle_normal(v0, v1, v2), DVec3::ZERO);
    }

    #[test]
    fn centroid_of_unit_triangle() {
        let v0 = DVec3::new(0.0, 0.0, 0.0);
        let v1 = DVec3::new(3.0, 0.0, 0.0);
        let v2 = DVec3::new(0.0, 3.0, 0.0);
        let c = triangle_centroid(v0, v1, v2);
        assert!((c - DVec3::new(1.0, 1.0, 0.0)).length() < 1e-15);
    }
}
