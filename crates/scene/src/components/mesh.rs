use foundation::bounds::Aabb3;
use foundation::math::Vec3;

use crate::clipping::SharedClipPlane;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape3D {
    Box { size: Vec3 },
    Sphere { radius: f64 },
    /// Y-aligned cylinder centered on the origin.
    Cylinder { radius: f64, height: f64 },
}

impl Shape3D {
    /// Local-space bounds of the shape.
    pub fn bounds(&self) -> Aabb3 {
        let half = match *self {
            Shape3D::Box { size } => size * 0.5,
            Shape3D::Sphere { radius } => Vec3::splat(radius),
            Shape3D::Cylinder { radius, height } => Vec3::new(radius, height * 0.5, radius),
        };
        Aabb3::new(-half, half)
    }
}

/// Surface attributes. Materials that clip all reference the same plane
/// instance, so one mutation updates every surface.
#[derive(Debug, Clone)]
pub struct Material {
    pub color: u32,
    pub metalness: f64,
    pub roughness: f64,
    pub opacity: f64,
    pub clipping_plane: Option<SharedClipPlane>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            metalness: 0.0,
            roughness: 0.5,
            opacity: 1.0,
            clipping_plane: None,
        }
    }
}

impl Material {
    pub fn colored(color: u32) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    pub fn metal(color: u32, metalness: f64, roughness: f64) -> Self {
        Self {
            color,
            metalness,
            roughness,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub shape: Shape3D,
    pub material: Material,
}

impl Mesh {
    pub fn new(shape: Shape3D, material: Material) -> Self {
        Self { shape, material }
    }

    pub fn cube(size: f64) -> Self {
        Self::new(
            Shape3D::Box {
                size: Vec3::splat(size),
            },
            Material::default(),
        )
    }

    pub fn local_bounds(&self) -> Aabb3 {
        self.shape.bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::{Mesh, Shape3D};
    use foundation::math::Vec3;

    #[test]
    fn cylinder_bounds_are_y_aligned() {
        let b = Shape3D::Cylinder {
            radius: 0.5,
            height: 4.0,
        }
        .bounds();
        assert_eq!(b.min, Vec3::new(-0.5, -2.0, -0.5));
        assert_eq!(b.max, Vec3::new(0.5, 2.0, 0.5));
    }

    #[test]
    fn cube_mesh_has_centered_bounds() {
        let mesh = Mesh::cube(2.0);
        assert_eq!(mesh.local_bounds().min, Vec3::splat(-1.0));
        assert!(mesh.material.clipping_plane.is_none());
    }
}
