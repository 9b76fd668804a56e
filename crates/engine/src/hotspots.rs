//! Screen-space positions for named scene anchors.

use foundation::math::{Mat4, Vec3};
use gpu::Camera3D;
use runtime::inbox::Viewport;
use scene::entity::NodeId;
use scene::graph::SceneGraph;
use scene::visibility::Frustum;
use serde::Serialize;
use tracing::debug;

use crate::clipping::ClippingController;
use crate::config::HotspotConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct HotspotAnchor {
    pub id: String,
    pub node: NodeId,
}

/// Position in CSS pixels, origin top-left.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotspotScreenPosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub visible: bool,
}

/// Receives the full list of positions once per rendered frame.
pub trait HotspotObserver {
    fn on_hotspots(&mut self, positions: &[HotspotScreenPosition]);
}

impl<F> HotspotObserver for F
where
    F: FnMut(&[HotspotScreenPosition]),
{
    fn on_hotspots(&mut self, positions: &[HotspotScreenPosition]) {
        self(positions)
    }
}

#[derive(Default)]
pub struct HotspotProjector {
    anchors: Vec<HotspotAnchor>,
    observer: Option<Box<dyn HotspotObserver>>,
}

impl std::fmt::Debug for HotspotProjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotspotProjector")
            .field("anchors", &self.anchors)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl HotspotProjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up each configured node by exact name. Names missing from the
    /// graph are dropped.
    pub fn resolve(&mut self, configs: &[HotspotConfig], graph: &SceneGraph) {
        self.anchors = configs
            .iter()
            .filter_map(|c| match graph.find_by_name(&c.node) {
                Some(node) => Some(HotspotAnchor {
                    id: c.id.clone(),
                    node,
                }),
                None => {
                    debug!(id = %c.id, node = %c.node, "hotspot node not in asset");
                    None
                }
            })
            .collect();
    }

    pub fn anchors(&self) -> &[HotspotAnchor] {
        &self.anchors
    }

    pub fn anchor_count(&self, id: &str) -> usize {
        self.anchors.iter().filter(|a| a.id == id).count()
    }

    /// Replaces any previously registered observer.
    pub fn set_observer(&mut self, observer: Box<dyn HotspotObserver>) {
        self.observer = Some(observer);
    }

    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    pub fn project(
        &self,
        graph: &SceneGraph,
        camera: &Camera3D,
        viewport: &Viewport,
        clipping: &ClippingController,
    ) -> Vec<HotspotScreenPosition> {
        let view_proj = camera.view_proj();
        let frustum = Frustum::from_view_proj_row_major(&view_proj);
        self.anchors
            .iter()
            .filter_map(|a| {
                let world = graph.world_position(a.node)?;
                let (x, y) = to_screen(&view_proj, world, viewport);
                let visible = frustum.contains_point(world) && !clipping.is_clipped(world);
                Some(HotspotScreenPosition {
                    id: a.id.clone(),
                    x,
                    y,
                    visible,
                })
            })
            .collect()
    }

    /// Projects and hands the list to the observer, if any.
    pub fn publish(
        &mut self,
        graph: &SceneGraph,
        camera: &Camera3D,
        viewport: &Viewport,
        clipping: &ClippingController,
    ) -> usize {
        let positions = self.project(graph, camera, viewport, clipping);
        if let Some(observer) = self.observer.as_mut() {
            observer.on_hotspots(&positions);
        }
        positions.len()
    }
}

/// World point to CSS pixels. Points behind the camera still get a
/// coordinate; visibility is decided by the frustum test.
fn to_screen(view_proj: &Mat4, p: Vec3, viewport: &Viewport) -> (f64, f64) {
    let [cx, cy, _, cw] = view_proj.transform_vec4([p.x, p.y, p.z, 1.0]);
    let w = if cw.abs() < 1e-12 { 1e-12 } else { cw };
    let (nx, ny) = (cx / w, cy / w);
    (
        (nx * 0.5 + 0.5) * viewport.width,
        (1.0 - (ny * 0.5 + 0.5)) * viewport.height,
    )
}
