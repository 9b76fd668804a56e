//! Geometric helpers shared by the clipping and explode controllers.

use crate::bounds::Aabb3;
use crate::math::Vec3;

/// One of the three world axes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    #[default]
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }

    pub fn component(self, v: Vec3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

/// Arithmetic mean of `points`; `None` when empty.
pub fn centroid(points: &[Vec3]) -> Option<Vec3> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Vec3::ZERO, |acc, p| acc + *p);
    Some(sum * (1.0 / points.len() as f64))
}

/// Unit vector pointing from `from` to `to`.
///
/// Returns `None` when the two points coincide; callers decide the fallback.
pub fn direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    (to - from).try_normalize()
}

/// Uniform scale that makes the largest extent of `bounds` equal `target_size`.
///
/// Degenerate (empty or flat-in-every-axis) bounds keep scale 1.
pub fn fit_scale(bounds: &Aabb3, target_size: f64) -> f64 {
    let extent = bounds.max_extent();
    if extent <= f64::EPSILON || !extent.is_finite() {
        return 1.0;
    }
    target_size / extent
}

/// Linear position of `t` (0..1) inside `bounds` along `axis`.
pub fn lerp_along(bounds: &Aabb3, axis: Axis, t: f64) -> f64 {
    let lo = axis.component(bounds.min);
    let hi = axis.component(bounds.max);
    lo + t * (hi - lo)
}

#[cfg(test)]
mod tests {
    use super::{Axis, centroid, direction, fit_scale, lerp_along};
    use crate::bounds::Aabb3;
    use crate::math::Vec3;

    #[test]
    fn centroid_of_points() {
        let c = centroid(&[Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 4.0, -2.0)]).unwrap();
        assert_eq!(c, Vec3::new(1.0, 2.0, -1.0));
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn direction_is_unit_or_none() {
        let d = direction(Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0)).unwrap();
        assert_eq!(d, Vec3::Y);
        assert_eq!(direction(Vec3::ONE, Vec3::ONE), None);
    }

    #[test]
    fn fit_scale_uses_largest_extent() {
        let b = Aabb3::new(Vec3::ZERO, Vec3::new(6.0, 1.0, 2.0));
        assert_eq!(fit_scale(&b, 3.0), 0.5);
        assert_eq!(fit_scale(&Aabb3::empty(), 3.0), 1.0);
    }

    #[test]
    fn lerp_along_axis() {
        let b = Aabb3::new(Vec3::splat(-1.0), Vec3::new(1.0, 3.0, 1.0));
        assert_eq!(lerp_along(&b, Axis::X, 0.5), 0.0);
        assert_eq!(lerp_along(&b, Axis::Y, 1.0), 3.0);
        assert_eq!(lerp_along(&b, Axis::Y, 0.0), -1.0);
    }
}
