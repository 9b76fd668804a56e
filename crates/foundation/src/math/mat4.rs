use super::Vec3;

/// Row-major 4x4 matrix acting on column vectors: `p' = M * p`.
///
/// `m[row][col]`; translation lives in the last column. This is the layout
/// expected by `Frustum::from_view_proj_row_major`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    pub m: [[f64; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_rows(m: [[f64; 4]; 4]) -> Self {
        Self { m }
    }

    pub fn from_translation(t: Vec3) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0][3] = t.x;
        out.m[1][3] = t.y;
        out.m[2][3] = t.z;
        out
    }

    pub fn from_scale(s: Vec3) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0][0] = s.x;
        out.m[1][1] = s.y;
        out.m[2][2] = s.z;
        out
    }

    pub fn from_rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn from_rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn from_rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Intrinsic XYZ Euler rotation (`Rx * Ry * Rz`).
    pub fn from_euler_xyz(euler: Vec3) -> Self {
        Self::from_rotation_x(euler.x)
            .mul(&Self::from_rotation_y(euler.y))
            .mul(&Self::from_rotation_z(euler.z))
    }

    /// `T * R * S`
    pub fn from_trs(translation: Vec3, euler: Vec3, scale: Vec3) -> Self {
        Self::from_translation(translation)
            .mul(&Self::from_euler_xyz(euler))
            .mul(&Self::from_scale(scale))
    }

    /// Right-handed perspective projection with clip-space depth in `[0, 1]`.
    pub fn perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Self {
        let f = 1.0 / (0.5 * fov_y_rad).tan();
        Self::from_rows([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, far / (near - far), (near * far) / (near - far)],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    /// Right-handed view matrix looking from `eye` towards `target`.
    pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let f = (target - eye).try_normalize().unwrap_or(-Vec3::Z);
        let s = f.cross(up).try_normalize().unwrap_or(Vec3::X);
        let u = s.cross(f);
        Self::from_rows([
            [s.x, s.y, s.z, -s.dot(eye)],
            [u.x, u.y, u.z, -u.dot(eye)],
            [-f.x, -f.y, -f.z, f.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn mul(&self, other: &Mat4) -> Mat4 {
        let mut out = [[0.0f64; 4]; 4];
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, cell) in out_row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.m[row][k] * other.m[k][col]).sum();
            }
        }
        Mat4 { m: out }
    }

    pub fn transform_vec4(&self, v: [f64; 4]) -> [f64; 4] {
        let mut out = [0.0f64; 4];
        for (row, cell) in out.iter_mut().enumerate() {
            *cell = self.m[row][0] * v[0]
                + self.m[row][1] * v[1]
                + self.m[row][2] * v[2]
                + self.m[row][3] * v[3];
        }
        out
    }

    /// Affine point transform (ignores the projective row).
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let v = self.transform_vec4([p.x, p.y, p.z, 1.0]);
        Vec3::new(v[0], v[1], v[2])
    }

    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::Mat4;
    use crate::math::Vec3;

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        let diff = (a - b).length();
        assert!(diff <= eps, "expected {a:?} ~= {b:?} (diff {diff})");
    }

    #[test]
    fn trs_applies_scale_then_rotation_then_translation() {
        let m = Mat4::from_trs(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2),
            Vec3::splat(2.0),
        );
        // (1,0,0) -> scale (2,0,0) -> rotZ 90 (0,2,0) -> translate (10,2,0)
        assert_vec_close(m.transform_point(Vec3::X), Vec3::new(10.0, 2.0, 0.0), 1e-12);
    }

    #[test]
    fn identity_is_neutral_for_mul() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.mul(&Mat4::IDENTITY), m);
        assert_eq!(Mat4::IDENTITY.mul(&m), m);
    }

    #[test]
    fn perspective_maps_near_and_far_to_unit_depth_range() {
        let p = Mat4::perspective_rh_z0(1.0, 1.5, 0.1, 200.0);
        let near = p.transform_vec4([0.0, 0.0, -0.1, 1.0]);
        let far = p.transform_vec4([0.0, 0.0, -200.0, 1.0]);
        assert!((near[2] / near[3]).abs() < 1e-9);
        assert!((far[2] / far[3] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn look_at_puts_target_on_negative_z() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 8.0), Vec3::ZERO, Vec3::Y);
        assert_vec_close(view.transform_point(Vec3::ZERO), Vec3::new(0.0, 0.0, -8.0), 1e-12);
    }
}
