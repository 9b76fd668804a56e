use foundation::bounds::Aabb3;
use foundation::math::{Mat4, Vec3};

/// Plane in Hessian form: points with `normal·p + constant >= 0` are on the
/// kept side.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f64,
}

impl Plane {
    pub fn new(normal: Vec3, constant: f64) -> Self {
        Self { normal, constant }
    }

    pub fn normalize(self) -> Self {
        let l2 = self.normal.length_squared();
        if l2 <= 0.0 {
            return self;
        }
        let inv = 1.0 / l2.sqrt();
        Self {
            normal: self.normal * inv,
            constant: self.constant * inv,
        }
    }

    /// Signed distance; negative means the point is on the removed side.
    pub fn distance(&self, p: Vec3) -> f64 {
        self.normal.dot(p) + self.constant
    }
}

/// View frustum as 6 planes.
///
/// Convention:
/// - A point `p` is inside iff `plane.distance(p) >= 0` for all planes.
/// - Planes are expected to be in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frustum {
    pub left: Plane,
    pub right: Plane,
    pub bottom: Plane,
    pub top: Plane,
    pub near: Plane,
    pub far: Plane,
}

impl Frustum {
    pub fn new(
        left: Plane,
        right: Plane,
        bottom: Plane,
        top: Plane,
        near: Plane,
        far: Plane,
    ) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
            near,
            far,
        }
    }

    pub fn normalize(self) -> Self {
        Self {
            left: self.left.normalize(),
            right: self.right.normalize(),
            bottom: self.bottom.normalize(),
            top: self.top.normalize(),
            near: self.near.normalize(),
            far: self.far.normalize(),
        }
    }

    pub fn planes(&self) -> [Plane; 6] {
        [
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        ]
    }

    /// Build a frustum from a row-major view-projection matrix.
    ///
    /// This expects the clip-space convention where visible points satisfy:
    /// - `-w <= x <= w`
    /// - `-w <= y <= w`
    /// - `0 <= z <= w` (z0)
    pub fn from_view_proj_row_major(view_proj: &Mat4) -> Self {
        let [r0, r1, r2, r3] = view_proj.m;
        let plane = |a: [f64; 4], b: [f64; 4], sign: f64| {
            Plane::new(
                Vec3::new(a[0] + sign * b[0], a[1] + sign * b[1], a[2] + sign * b[2]),
                a[3] + sign * b[3],
            )
        };

        // Left/right: r3 +/- r0, bottom/top: r3 +/- r1, near: r2 (z0), far: r3 - r2.
        let left = plane(r3, r0, 1.0);
        let right = plane(r3, r0, -1.0);
        let bottom = plane(r3, r1, 1.0);
        let top = plane(r3, r1, -1.0);
        let near = Plane::new(Vec3::new(r2[0], r2[1], r2[2]), r2[3]);
        let far = plane(r3, r2, -1.0);

        Self::new(left, right, bottom, top, near, far).normalize()
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        self.planes().iter().all(|plane| plane.distance(p) >= 0.0)
    }

    pub fn intersects_aabb(&self, aabb: &Aabb3) -> bool {
        // p-vertex test: pick the corner furthest along each plane normal.
        for plane in self.planes() {
            let pick = |n: f64, lo: f64, hi: f64| if n >= 0.0 { hi } else { lo };
            let p = Vec3::new(
                pick(plane.normal.x, aabb.min.x, aabb.max.x),
                pick(plane.normal.y, aabb.min.y, aabb.max.y),
                pick(plane.normal.z, aabb.min.z, aabb.max.z),
            );
            if plane.distance(p) < 0.0 {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{Frustum, Plane};
    use foundation::bounds::Aabb3;
    use foundation::math::{Mat4, Vec3};

    fn unit_cube_frustum() -> Frustum {
        // Cube: -1<=x<=1, -1<=y<=1, -1<=z<=1
        let left = Plane::new(Vec3::new(1.0, 0.0, 0.0), 1.0); // x >= -1
        let right = Plane::new(Vec3::new(-1.0, 0.0, 0.0), 1.0); // x <= 1
        let bottom = Plane::new(Vec3::new(0.0, 1.0, 0.0), 1.0); // y >= -1
        let top = Plane::new(Vec3::new(0.0, -1.0, 0.0), 1.0); // y <= 1
        let near = Plane::new(Vec3::new(0.0, 0.0, 1.0), 1.0); // z >= -1
        let far = Plane::new(Vec3::new(0.0, 0.0, -1.0), 1.0); // z <= 1
        Frustum::new(left, right, bottom, top, near, far)
    }

    #[test]
    fn plane_distance_is_signed() {
        let p = Plane::new(Vec3::new(-1.0, 0.0, 0.0), 0.5);
        assert_eq!(p.distance(Vec3::new(0.0, 3.0, 3.0)), 0.5);
        assert_eq!(p.distance(Vec3::new(1.0, 0.0, 0.0)), -0.5);
    }

    #[test]
    fn intersects_aabb_basic() {
        let f = unit_cube_frustum();
        assert!(f.intersects_aabb(&Aabb3::new(Vec3::splat(-0.5), Vec3::splat(0.5))));
        assert!(!f.intersects_aabb(&Aabb3::new(Vec3::splat(2.0), Vec3::splat(3.0))));
    }

    #[test]
    fn perspective_frustum_rejects_points_behind_camera() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 8.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh_z0(60f64.to_radians(), 16.0 / 9.0, 0.1, 200.0);
        let f = Frustum::from_view_proj_row_major(&proj.mul(&view));

        assert!(f.contains_point(Vec3::ZERO));
        assert!(!f.contains_point(Vec3::new(0.0, 0.0, 9.0)));
        assert!(!f.contains_point(Vec3::new(0.0, 0.0, -300.0)));
        assert!(!f.contains_point(Vec3::new(100.0, 0.0, 0.0)));
    }
}
