use foundation::math::{Mat4, Vec3};
use scene::components::Shape3D;
use scene::entity::NodeId;
use scene::graph::SceneGraph;
use scene::visibility::{Frustum, Plane};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera3D {
    pub fn look_at(position: Vec3, target: Vec3, fov_y_rad: f64, near: f64, far: f64) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fov_y_rad,
            aspect: 1.0,
            near,
            far,
        }
    }

    pub fn with_aspect(mut self, aspect: f64) -> Self {
        self.aspect = aspect;
        self
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_z0(self.fov_y_rad, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection().mul(&self.view())
    }

    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_proj_row_major(&self.view_proj())
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.target.is_finite()
            && self.aspect.is_finite()
            && self.fov_y_rad.is_finite()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointLight {
    pub color: u32,
    pub intensity: f64,
    /// Cutoff distance; 0 means unlimited.
    pub distance: f64,
    pub position: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: u32,
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Lights {
    pub ambient: Option<AmbientLight>,
    pub points: Vec<PointLight>,
}

/// Frame-wide output settings.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderSettings {
    pub exposure: f64,
    pub fog_color: u32,
    pub fog_density: f64,
    /// Device pixels per logical pixel, already capped by the caller.
    pub pixel_ratio: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            fog_color: 0x000000,
            fog_density: 0.0,
            pixel_ratio: 1.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RenderCommand {
    DrawMesh {
        node: NodeId,
        world: Mat4,
        shape: Shape3D,
        color: u32,
        opacity: f64,
        clip: Option<Plane>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub index: u64,
    pub camera: Camera3D,
    pub view_proj: Mat4,
    pub lights: Lights,
    pub settings: RenderSettings,
    pub commands: Vec<RenderCommand>,
}

impl RenderFrame {
    pub fn draw_count(&self) -> usize {
        self.commands.len()
    }
}

pub struct Renderer;

impl Renderer {
    /// Collects draw commands for every visible mesh, in node order.
    ///
    /// Clip planes are snapshotted from each material's shared plane so the
    /// frame is self-contained once built.
    pub fn collect_3d(
        graph: &SceneGraph,
        camera: Camera3D,
        lights: &Lights,
        settings: RenderSettings,
        index: u64,
    ) -> RenderFrame {
        let mut commands = Vec::new();
        for id in graph.ids() {
            let Some(mesh) = graph.mesh(id) else {
                continue;
            };
            if !graph.is_visible(id) {
                continue;
            }
            commands.push(RenderCommand::DrawMesh {
                node: id,
                world: graph.world_matrix(id),
                shape: mesh.shape,
                color: mesh.material.color,
                opacity: mesh.material.opacity,
                clip: mesh.material.clipping_plane.as_ref().map(|p| p.get()),
            });
        }

        RenderFrame {
            index,
            camera,
            view_proj: camera.view_proj(),
            lights: lights.clone(),
            settings,
            commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Camera3D, Lights, RenderCommand, RenderSettings, Renderer};
    use foundation::math::Vec3;
    use scene::SharedClipPlane;
    use scene::components::{Mesh, Transform};
    use scene::graph::SceneGraph;
    use scene::visibility::Plane;

    fn camera() -> Camera3D {
        Camera3D::look_at(
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, 0.0),
            1.0,
            0.1,
            1000.0,
        )
    }

    #[test]
    fn collect_3d_commands() {
        let mut graph = SceneGraph::new();
        let root = graph.add_node("root", Transform::identity());
        graph.add_mesh(root, "cube", Transform::identity(), Mesh::cube(1.0));

        let frame = Renderer::collect_3d(
            &graph,
            camera(),
            &Lights::default(),
            RenderSettings::default(),
            0,
        );
        assert!(matches!(
            frame.commands.as_slice(),
            [RenderCommand::DrawMesh { clip: None, .. }]
        ));
    }

    #[test]
    fn hidden_meshes_are_skipped() {
        let mut graph = SceneGraph::new();
        let root = graph.add_node("root", Transform::identity());
        graph.add_mesh(root, "cube", Transform::identity(), Mesh::cube(1.0));
        graph.node_mut(root).unwrap().visible = false;

        let frame = Renderer::collect_3d(
            &graph,
            camera(),
            &Lights::default(),
            RenderSettings::default(),
            0,
        );
        assert_eq!(frame.draw_count(), 0);
    }

    #[test]
    fn clip_plane_is_snapshotted() {
        let plane = SharedClipPlane::new(Plane::new(-Vec3::X, 0.5));
        let mut graph = SceneGraph::new();
        let root = graph.add_node("root", Transform::identity());
        let mut mesh = Mesh::cube(1.0);
        mesh.material.clipping_plane = Some(plane.clone());
        graph.add_mesh(root, "cube", Transform::identity(), mesh);

        let frame = Renderer::collect_3d(
            &graph,
            camera(),
            &Lights::default(),
            RenderSettings::default(),
            3,
        );
        plane.set(Plane::new(-Vec3::X, 9.0));

        assert_eq!(frame.index, 3);
        match frame.commands[0] {
            RenderCommand::DrawMesh { clip, .. } => {
                assert_eq!(clip, Some(Plane::new(-Vec3::X, 0.5)))
            }
        }
    }

    #[test]
    fn aspect_changes_projection() {
        let wide = camera().with_aspect(2.0).projection();
        let square = camera().projection();
        assert!(wide.m[0][0] < square.m[0][0]);
        assert_eq!(wide.m[1][1], square.m[1][1]);
    }
}
