use foundation::bounds::Aabb3;
use foundation::math::{Vec2, Vec3};
use gpu::{AmbientLight, Camera3D, Lights, PointLight};
use runtime::inbox::Viewport;
use scene::asset::{AssetError, LoadedAsset};
use scene::components::{Material, Mesh, Shape3D, Transform};
use scene::entity::NodeId;
use scene::graph::SceneGraph;

use crate::config::EngineConfig;

pub const MODEL_PIVOT: &str = "model_pivot";
/// Decorative sphere waiting below the hero, scaled up by the first scroll
/// section.
pub const FEATURE_ORB: &str = "feature_orb";

const ORB_COLOR: u32 = 0xec4899;

/// Per-frame mutable state, owned by the engine and lent to each controller
/// for its update.
#[derive(Debug, Clone)]
pub struct SceneState {
    pub graph: SceneGraph,
    /// Parent of the model root. Carries the entrance scale and the float.
    pub pivot: NodeId,
    pub model_root: Option<NodeId>,
    /// Stage decoration outside the model; survives model loads.
    pub orb: NodeId,
    pub camera: Camera3D,
    /// Extra rotation of the look direction about world y, radians.
    pub camera_yaw: f64,
    pub pointer: Vec2,
    pub viewport: Viewport,
    pub lights: Lights,
}

impl SceneState {
    pub fn new(config: &EngineConfig, viewport: Viewport) -> Self {
        let mut graph = SceneGraph::new();
        let pivot = graph.add_node(MODEL_PIVOT, Transform::identity().with_uniform_scale(0.0));
        let orb = add_orb(
            &mut graph,
            Transform::translate(Vec3::new(0.0, -18.0, 0.0)).with_uniform_scale(0.5),
            Mesh::new(Shape3D::Sphere { radius: 1.5 }, Material::colored(ORB_COLOR)),
        );
        let cam = &config.camera;
        let camera = Camera3D::look_at(
            cam.start_position(),
            Vec3::new(0.0, 0.0, config.pointer.look_z),
            cam.fov_y_deg.to_radians(),
            cam.near,
            cam.far,
        )
        .with_aspect(viewport.aspect());

        let lights = Lights {
            ambient: Some(AmbientLight {
                color: config.lights.ambient_color,
                intensity: config.lights.ambient_intensity,
            }),
            points: config
                .lights
                .orbit
                .iter()
                .map(|l| PointLight {
                    color: l.color,
                    intensity: l.intensity,
                    distance: l.distance,
                    position: Vec3::from(l.base),
                })
                .collect(),
        };

        Self {
            graph,
            pivot,
            model_root: None,
            orb,
            camera,
            camera_yaw: 0.0,
            pointer: Vec2::ZERO,
            viewport,
            lights,
        }
    }

    /// Takes over the asset's graph and hangs its root under a fresh pivot
    /// that keeps the current pivot transform. The orb moves across as is.
    pub fn adopt(&mut self, asset: LoadedAsset) -> NodeId {
        let pivot_transform = self.graph.transform(self.pivot).unwrap_or_default();
        let orb_transform = self.graph.transform(self.orb).unwrap_or_default();
        let orb_mesh = self.graph.mesh(self.orb).cloned();
        let mut graph = asset.graph;
        let pivot = graph.add_node(MODEL_PIVOT, pivot_transform);
        graph.set_parent(asset.root, Some(pivot));
        let orb = graph.add_node(FEATURE_ORB, orb_transform);
        if let Some(node) = graph.node_mut(orb) {
            node.mesh = orb_mesh;
        }
        self.graph = graph;
        self.pivot = pivot;
        self.orb = orb;
        self.model_root = Some(asset.root);
        asset.root
    }
}

fn add_orb(graph: &mut SceneGraph, transform: Transform, mesh: Mesh) -> NodeId {
    let orb = graph.add_node(FEATURE_ORB, transform);
    if let Some(node) = graph.node_mut(orb) {
        node.mesh = Some(mesh);
    }
    orb
}

/// Model-dependent data produced once when the asset arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub root: NodeId,
    /// Pivot-space bounds after scaling and centering.
    pub bounds: Aabb3,
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loaded(ModelInfo),
    Error(AssetError),
}

impl LoadState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded(_))
    }

    pub fn model(&self) -> Option<&ModelInfo> {
        match self {
            LoadState::Loaded(info) => Some(info),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FEATURE_ORB, LoadState, MODEL_PIVOT, SceneState};
    use crate::config::EngineConfig;
    use foundation::math::Vec3;
    use runtime::inbox::Viewport;
    use scene::prefabs::actuator_asset;

    #[test]
    fn starts_with_hidden_pivot_and_configured_camera() {
        let state = SceneState::new(&EngineConfig::default(), Viewport::new(800.0, 400.0, 1.0));
        assert_eq!(state.graph.len(), 2);
        assert_eq!(state.graph.name(state.pivot), Some(MODEL_PIVOT));
        assert_eq!(state.graph.name(state.orb), Some(FEATURE_ORB));
        assert_eq!(state.graph.transform(state.orb).unwrap().scale, Vec3::splat(0.5));
        assert_eq!(state.graph.transform(state.pivot).unwrap().scale, Vec3::ZERO);
        assert_eq!(state.camera.position, Vec3::new(0.0, 0.0, 8.0));
        assert_eq!(state.camera.aspect, 2.0);
        assert_eq!(state.lights.points.len(), 4);
        assert!(state.model_root.is_none());
    }

    #[test]
    fn adopt_parents_root_under_new_pivot() {
        let mut state = SceneState::new(&EngineConfig::default(), Viewport::default());
        state.graph.transform_mut(state.orb).unwrap().scale = Vec3::splat(1.25);
        let asset = actuator_asset();
        let count = asset.graph.len();
        let root = state.adopt(asset);

        assert_eq!(state.graph.len(), count + 2);
        assert_eq!(state.graph.find_by_name(FEATURE_ORB), Some(state.orb));
        assert_eq!(state.graph.transform(state.orb).unwrap().scale, Vec3::splat(1.25));
        assert!(state.graph.mesh(state.orb).is_some());
        assert_eq!(state.graph.parent(state.orb), None);
        assert_eq!(state.graph.parent(root), Some(state.pivot));
        assert_eq!(state.graph.transform(state.pivot).unwrap().scale, Vec3::ZERO);
        assert_eq!(state.model_root, Some(root));
    }

    #[test]
    fn load_state_defaults_to_unloaded() {
        let s = LoadState::default();
        assert!(!s.is_loaded());
        assert!(s.model().is_none());
    }
}
