use crate::math::{Mat4, Vec3};

/// Axis-aligned bounding box.
///
/// An empty box has `min = +inf` and `max = -inf`; expanding it with a point
/// yields a degenerate box around that point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb3 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb3 {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Aabb3 { min, max }
    }

    pub fn empty() -> Self {
        Aabb3 {
            min: Vec3::splat(f64::INFINITY),
            max: Vec3::splat(f64::NEG_INFINITY),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut out = Self::empty();
        for p in points {
            out.expand(p);
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn expand(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Aabb3) -> Aabb3 {
        Aabb3 {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        self.max - self.min
    }

    pub fn max_extent(&self) -> f64 {
        let s = self.size();
        s.x.max(s.y).max(s.z)
    }

    pub fn diagonal_length(&self) -> f64 {
        self.size().length()
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Bounds of this box after an affine transform (re-fitted around the
    /// transformed corners).
    pub fn transformed(&self, m: &Mat4) -> Aabb3 {
        if self.is_empty() {
            return *self;
        }
        Aabb3::from_points(self.corners().into_iter().map(|c| m.transform_point(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb3;
    use crate::math::{Mat4, Vec3};

    fn unit() -> Aabb3 {
        Aabb3::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn empty_box_has_no_size() {
        let b = Aabb3::empty();
        assert!(b.is_empty());
        assert_eq!(b.size(), Vec3::ZERO);
    }

    #[test]
    fn union_and_expand() {
        let mut b = Aabb3::empty();
        b.expand(Vec3::new(1.0, 2.0, 3.0));
        assert!(!b.is_empty());
        let u = b.union(&unit());
        assert_eq!(u.min, Vec3::splat(-1.0));
        assert_eq!(u.max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn diagonal_of_unit_cube() {
        let b = unit();
        assert!((b.diagonal_length() - 12f64.sqrt()).abs() < 1e-12);
        assert_eq!(b.center(), Vec3::ZERO);
        assert_eq!(b.max_extent(), 2.0);
    }

    #[test]
    fn transformed_refits_rotated_box() {
        let b = Aabb3::new(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let m = Mat4::from_rotation_z(std::f64::consts::FRAC_PI_2);
        let t = b.transformed(&m);
        assert!((t.min.x - -1.0).abs() < 1e-12);
        assert!((t.max.y - 2.0).abs() < 1e-12);
    }

    #[test]
    fn contains_point_inside() {
        assert!(unit().contains(Vec3::new(0.5, 0.0, -0.5)));
        assert!(!unit().contains(Vec3::new(2.0, 0.0, 0.0)));
    }
}
