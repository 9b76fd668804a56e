use foundation::math::{Mat4, Vec3};

/// Local transform relative to the parent node.
///
/// Rotation is an intrinsic XYZ Euler triple in radians. `offset` is an
/// extra translation added to `position`; clips and loaders write
/// `position`, view effects such as the exploded view write `offset`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub offset: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            offset: Vec3::ZERO,
        }
    }

    pub fn translate(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_uniform_scale(self, s: f64) -> Self {
        self.with_scale(Vec3::splat(s))
    }

    /// Where the node sits in its parent: `position` plus `offset`.
    pub fn placed_position(&self) -> Vec3 {
        self.position + self.offset
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_trs(self.placed_position(), self.rotation, self.scale)
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.rotation.is_finite()
            && self.scale.is_finite()
            && self.offset.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::Transform;
    use foundation::math::Vec3;

    #[test]
    fn identity_is_origin() {
        let transform = Transform::identity();
        assert_eq!(transform.position, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(transform.scale, Vec3::ONE);
    }

    #[test]
    fn matrix_translates_points() {
        let t = Transform::translate(Vec3::new(1.0, 2.0, 3.0)).with_uniform_scale(2.0);
        assert_eq!(t.matrix().transform_point(Vec3::ONE), Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn offset_adds_to_position() {
        let mut t = Transform::translate(Vec3::new(1.0, 0.0, 0.0));
        t.offset = Vec3::new(0.5, -1.0, 0.0);
        assert_eq!(t.placed_position(), Vec3::new(1.5, -1.0, 0.0));
        assert_eq!(t.matrix().transform_point(Vec3::ZERO), Vec3::new(1.5, -1.0, 0.0));
        t.position = Vec3::ZERO;
        assert_eq!(t.matrix().transform_point(Vec3::ZERO), Vec3::new(0.5, -1.0, 0.0));
    }
}
