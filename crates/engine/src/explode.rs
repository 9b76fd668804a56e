//! Exploded view.
//!
//! Parts are the children of the shallowest node with more than one child,
//! found by descending through single-child wrapper groups. Each part moves
//! along the ray from the assembly centroid through its own centroid.
//!
//! The displacement lives in each part's `Transform::offset`, in the
//! assembly's local space, so whatever poses `position` (the actuator clip)
//! keeps working underneath it.

use std::f64::consts::TAU;

use foundation::geometry::{centroid, direction};
use foundation::math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scene::entity::NodeId;
use scene::graph::SceneGraph;
use tracing::debug;

use crate::tween::{Ease, Tween};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ExplodePart {
    pub node: NodeId,
    /// Local position captured at load.
    pub original_position: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

#[derive(Debug)]
pub struct ExplodeController {
    enabled: bool,
    intensity: f64,
    radius: f64,
    assembly: Option<NodeId>,
    parts: Vec<ExplodePart>,
    tweens: Vec<Option<Tween<Vec3>>>,
    tween_duration_s: f64,
}

impl ExplodeController {
    pub fn new(tween_duration_s: f64) -> Self {
        Self {
            enabled: false,
            intensity: 0.0,
            radius: 0.0,
            assembly: None,
            parts: Vec::new(),
            tweens: Vec::new(),
            tween_duration_s,
        }
    }

    /// One-time decomposition of the loaded model. The radius is half the
    /// diagonal of the assembly's bounds in its own local space, the space
    /// part offsets are applied in.
    pub fn attach(&mut self, graph: &SceneGraph, model_root: NodeId) {
        let Some(assembly) = find_assembly(graph, model_root) else {
            debug!("model has no multi-part assembly; explode disabled");
            self.radius = 0.0;
            self.assembly = None;
            self.parts.clear();
            self.tweens.clear();
            return;
        };
        let bounds = graph.subtree_bounds(assembly, Some(assembly));
        self.radius = if bounds.is_empty() {
            0.0
        } else {
            bounds.diagonal_length() * 0.5
        };
        self.assembly = Some(assembly);
        self.parts = compute_parts(graph, assembly);
        self.tweens = vec![None; self.parts.len()];
        debug!(parts = self.parts.len(), radius = self.radius, "explode parts ready");

        if self.enabled {
            self.retarget(graph);
        }
    }

    pub fn parts(&self) -> &[ExplodePart] {
        &self.parts
    }

    pub fn assembly(&self) -> Option<NodeId> {
        self.assembly
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True while any part is still moving.
    pub fn is_animating(&self) -> bool {
        self.tweens.iter().any(Option::is_some)
    }

    /// Offset `part` rests at once its tween completes.
    pub fn target_offset(&self, part: &ExplodePart) -> Vec3 {
        if !self.enabled {
            return Vec3::ZERO;
        }
        part.direction * (self.intensity / 100.0 * self.radius)
    }

    /// Where `part` rests with its pose at the load-time position.
    pub fn target(&self, part: &ExplodePart) -> Vec3 {
        part.original_position + self.target_offset(part)
    }

    pub fn set_enabled(&mut self, enabled: bool, graph: &SceneGraph) {
        self.enabled = enabled;
        if !enabled {
            self.intensity = 0.0;
        }
        debug!(enabled, "explode toggled");
        self.retarget(graph);
    }

    /// Nominally 0..=100. Stored only while disabled.
    pub fn set_intensity(&mut self, intensity: f64, graph: &SceneGraph) {
        self.intensity = intensity;
        if self.enabled {
            self.retarget(graph);
        }
    }

    /// Advances in-flight tweens and writes part offsets.
    pub fn update(&mut self, dt_s: f64, graph: &mut SceneGraph) {
        for (part, slot) in self.parts.iter().zip(self.tweens.iter_mut()) {
            let Some(tween) = slot.as_mut() else {
                continue;
            };
            let offset = tween.advance(dt_s);
            if let Some(t) = graph.transform_mut(part.node) {
                t.offset = offset;
            }
            if tween.is_finished() {
                *slot = None;
            }
        }
    }

    /// Starts a fresh tween per part from its current offset. Replaces any
    /// tween already in flight.
    fn retarget(&mut self, graph: &SceneGraph) {
        for i in 0..self.parts.len() {
            let part = self.parts[i];
            let from = graph
                .transform(part.node)
                .map(|t| t.offset)
                .unwrap_or(Vec3::ZERO);
            let to = self.target_offset(&part);
            self.tweens[i] = Some(Tween::new(from, to, self.tween_duration_s, Ease::OutCubic));
        }
    }
}

/// Descends single-child wrappers until a node with several children.
fn find_assembly(graph: &SceneGraph, root: NodeId) -> Option<NodeId> {
    let mut node = root;
    loop {
        match graph.children(node) {
            [only] if !graph.children(*only).is_empty() => node = *only,
            children if children.len() >= 2 => return Some(node),
            _ => return None,
        }
    }
}

fn compute_parts(graph: &SceneGraph, assembly: NodeId) -> Vec<ExplodePart> {
    let nodes = graph.children(assembly);
    let centers: Vec<Vec3> = nodes
        .iter()
        .map(|&n| {
            let b = graph.subtree_bounds(n, Some(assembly));
            if b.is_empty() {
                graph.transform(n).map(|t| t.position).unwrap_or(Vec3::ZERO)
            } else {
                b.center()
            }
        })
        .collect();
    let assembly_center = centroid(&centers).unwrap_or(Vec3::ZERO);

    nodes
        .iter()
        .zip(&centers)
        .enumerate()
        .map(|(i, (&node, &center))| ExplodePart {
            node,
            original_position: graph.transform(node).map(|t| t.position).unwrap_or(Vec3::ZERO),
            direction: direction(assembly_center, center).unwrap_or_else(|| fallback_direction(i)),
        })
        .collect()
}

/// Reproducible random unit vector for a part sitting on the centroid.
fn fallback_direction(part_index: usize) -> Vec3 {
    let mut rng = StdRng::seed_from_u64(part_index as u64);
    let z: f64 = rng.random_range(-1.0..=1.0);
    let theta: f64 = rng.random_range(0.0..TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}

#[cfg(test)]
mod tests {
    use super::{ExplodeController, fallback_direction, find_assembly};
    use foundation::math::Vec3;
    use scene::components::{Mesh, Transform};
    use scene::graph::SceneGraph;
    use scene::prefabs::actuator_asset;

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() <= eps, "{a} != {b} (eps {eps})");
    }

    fn loaded() -> (SceneGraph, ExplodeController) {
        let asset = actuator_asset();
        let mut c = ExplodeController::new(0.8);
        c.attach(&asset.graph, asset.root);
        (asset.graph, c)
    }

    fn settle(c: &mut ExplodeController, g: &mut SceneGraph) {
        for _ in 0..100 {
            c.update(1.0 / 60.0, g);
        }
        assert!(!c.is_animating());
    }

    fn position(g: &SceneGraph, c: &ExplodeController, i: usize) -> Vec3 {
        g.transform(c.parts()[i].node).unwrap().placed_position()
    }

    #[test]
    fn discovers_parts_below_wrappers() {
        let (g, c) = loaded();
        let body = g.find_by_name("body").unwrap();
        assert_eq!(c.assembly(), Some(body));
        let names: Vec<_> = c.parts().iter().map(|p| g.name(p.node).unwrap()).collect();
        assert_eq!(names, ["housing", "piston", "end_cap", "valve"]);
    }

    #[test]
    fn directions_are_unit_length() {
        let (_, c) = loaded();
        for p in c.parts() {
            assert_close(p.direction.length(), 1.0, 1e-9);
        }
    }

    #[test]
    fn leaf_chain_has_no_parts() {
        let mut g = SceneGraph::new();
        let root = g.add_node("root", Transform::identity());
        g.add_mesh(root, "only", Transform::identity(), Mesh::cube(1.0));
        assert_eq!(find_assembly(&g, root), None);

        let mut c = ExplodeController::new(0.8);
        c.attach(&g, root);
        assert!(c.parts().is_empty());
        c.set_enabled(true, &g);
        c.set_intensity(100.0, &g);
        c.update(1.0, &mut g);
    }

    #[test]
    fn coincident_centroid_gets_unit_fallback() {
        // Two concentric parts: both centroids sit on the assembly centroid.
        let mut g = SceneGraph::new();
        let root = g.add_node("root", Transform::identity());
        g.add_mesh(root, "inner", Transform::identity(), Mesh::cube(1.0));
        g.add_mesh(root, "outer", Transform::identity(), Mesh::cube(2.0));
        let mut c = ExplodeController::new(0.8);
        c.attach(&g, root);

        assert_eq!(c.parts().len(), 2);
        for p in c.parts() {
            assert_close(p.direction.length(), 1.0, 1e-9);
        }
        assert_ne!(c.parts()[0].direction, c.parts()[1].direction);
        assert_eq!(fallback_direction(3), fallback_direction(3));
    }

    #[test]
    fn full_intensity_reaches_radius() {
        let (mut g, mut c) = loaded();
        c.set_enabled(true, &g);
        c.set_intensity(100.0, &g);
        settle(&mut c, &mut g);
        for (i, p) in c.parts().to_vec().iter().enumerate() {
            let expected = p.original_position + p.direction * c.radius();
            assert!(position(&g, &c, i).distance(expected) < 1e-9);
        }
    }

    #[test]
    fn intensity_is_monotonic_in_distance() {
        let (mut g, mut c) = loaded();
        c.set_enabled(true, &g);
        let mut last = vec![0.0; c.parts().len()];
        for step in [10.0, 25.0, 50.0, 75.0, 100.0] {
            c.set_intensity(step, &g);
            settle(&mut c, &mut g);
            for (i, p) in c.parts().to_vec().iter().enumerate() {
                let d = position(&g, &c, i).distance(p.original_position);
                assert!(d >= last[i]);
                last[i] = d;
            }
        }
    }

    #[test]
    fn disabling_returns_home_and_clears_intensity() {
        let (mut g, mut c) = loaded();
        c.set_enabled(true, &g);
        c.set_intensity(80.0, &g);
        settle(&mut c, &mut g);
        c.set_enabled(false, &g);
        assert_eq!(c.intensity(), 0.0);
        settle(&mut c, &mut g);
        for (i, p) in c.parts().to_vec().iter().enumerate() {
            assert!(position(&g, &c, i).distance(p.original_position) < 1e-9);
        }
    }

    #[test]
    fn intensity_while_disabled_is_only_stored() {
        let (mut g, mut c) = loaded();
        c.set_intensity(75.0, &g);
        assert!(!c.is_animating());
        c.update(1.0, &mut g);
        for (i, p) in c.parts().to_vec().iter().enumerate() {
            assert_eq!(position(&g, &c, i), p.original_position);
        }
        assert_eq!(c.intensity(), 75.0);
    }

    #[test]
    fn retarget_starts_from_current_position() {
        let (mut g, mut c) = loaded();
        c.set_enabled(true, &g);
        c.set_intensity(100.0, &g);
        c.update(0.2, &mut g);
        let mid = position(&g, &c, 1);
        c.set_intensity(0.0, &g);
        // No jump on retarget: the first tiny step stays near `mid`.
        c.update(1e-6, &mut g);
        assert!(position(&g, &c, 1).distance(mid) < 1e-3);
        settle(&mut c, &mut g);
        assert!(position(&g, &c, 1).distance(c.parts()[1].original_position) < 1e-9);
    }

    #[test]
    fn enabled_before_attach_explodes_on_load() {
        let asset = actuator_asset();
        let mut g = asset.graph;
        let mut c = ExplodeController::new(0.8);
        c.set_enabled(true, &g);
        c.set_intensity(50.0, &g);
        c.attach(&g, asset.root);
        assert!(c.is_animating());
        settle(&mut c, &mut g);
        let p = c.parts()[0];
        let expected = p.original_position + p.direction * (0.5 * c.radius());
        assert!(position(&g, &c, 0).distance(expected) < 1e-9);
    }

    #[test]
    fn offset_rides_on_top_of_a_reposed_part() {
        let (mut g, mut c) = loaded();
        c.set_enabled(true, &g);
        c.set_intensity(100.0, &g);
        settle(&mut c, &mut g);

        let piston = c.parts()[1];
        let posed = Vec3::new(1.8, 0.0, 0.0);
        g.transform_mut(piston.node).unwrap().position = posed;
        c.update(1.0 / 60.0, &mut g);
        let expected = posed + piston.direction * c.radius();
        assert!(position(&g, &c, 1).distance(expected) < 1e-9);

        g.transform_mut(piston.node).unwrap().position = piston.original_position;
        assert!(position(&g, &c, 1).distance(c.target(&piston)) < 1e-9);
    }

    #[test]
    fn radius_is_measured_in_assembly_space() {
        let (g, c) = loaded();
        let body = c.assembly().unwrap();
        let local = g.subtree_bounds(body, Some(body));
        assert_close(c.radius(), local.diagonal_length() * 0.5, 1e-12);

        // Scaling a wrapper above the assembly leaves the radius alone.
        let mut scaled = g.clone();
        let root = scaled.find_by_name("actuator").unwrap();
        scaled.transform_mut(root).unwrap().scale = Vec3::splat(0.01);
        let mut c2 = ExplodeController::new(0.8);
        c2.attach(&scaled, root);
        assert_close(c2.radius(), c.radius(), 1e-12);
    }
}
