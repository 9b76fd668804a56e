//! Scroll binding layer.
//!
//! Each binding maps one page region's normalized progress onto camera and
//! model channels. Bindings never blend: updates are applied in the order
//! they were written, so where two regions drive the same channel the most
//! recent write wins.

use std::f64::consts::TAU;

use runtime::inbox::ScrollUpdate;
use scene::entity::NodeId;
use scene::graph::SceneGraph;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ScrollBindingConfig;
use crate::state::SceneState;

/// How progress (0..1) maps to a channel value.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScrollLaw {
    Linear {
        from: f64,
        to: f64,
    },
    /// `base + amplitude * sin(2π * cycles * p + phase)`.
    Sine {
        base: f64,
        amplitude: f64,
        cycles: f64,
        #[serde(default)]
        phase: f64,
    },
}

impl ScrollLaw {
    pub fn eval(&self, progress: f64) -> f64 {
        match *self {
            ScrollLaw::Linear { from, to } => from + (to - from) * progress,
            ScrollLaw::Sine {
                base,
                amplitude,
                cycles,
                phase,
            } => base + amplitude * (TAU * cycles * progress + phase).sin(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollTarget {
    CameraX,
    CameraY,
    CameraZ,
    CameraYaw,
    /// Rotation about y of the loaded model's root.
    ModelRotationY,
    NodeRotationY(String),
    /// Uniform scale of a named node.
    NodeScale(String),
}

impl ScrollTarget {
    fn node_name(&self) -> Option<&str> {
        match self {
            ScrollTarget::NodeRotationY(name) | ScrollTarget::NodeScale(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Channel {
    target: ScrollTarget,
    law: ScrollLaw,
    node: Option<NodeId>,
}

#[derive(Debug, Clone)]
struct Binding {
    region: String,
    channels: Vec<Channel>,
    last: Option<(u64, f64)>,
}

#[derive(Debug, Clone, Default)]
pub struct ScrollBindings {
    bindings: Vec<Binding>,
}

impl ScrollBindings {
    pub fn from_config(configs: &[ScrollBindingConfig]) -> Self {
        let bindings = configs
            .iter()
            .map(|c| Binding {
                region: c.region.clone(),
                channels: c
                    .channels
                    .iter()
                    .map(|ch| Channel {
                        target: ch.target.clone(),
                        law: ch.law,
                        node: None,
                    })
                    .collect(),
                last: None,
            })
            .collect();
        Self { bindings }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Binds named node channels against the loaded graph. Unknown names stay
    /// unbound and are skipped when applied.
    pub fn resolve(&mut self, graph: &SceneGraph) {
        for binding in &mut self.bindings {
            for ch in &mut binding.channels {
                let Some(name) = ch.target.node_name() else {
                    continue;
                };
                ch.node = graph.find_by_name(name);
                if ch.node.is_none() {
                    debug!(region = %binding.region, node = name, "scroll target not in asset");
                }
            }
        }
    }

    /// Applies one progress update. Returns `false` when the region has no
    /// binding or the progress is not a number.
    pub fn apply(&mut self, update: &ScrollUpdate, state: &mut SceneState) -> bool {
        if !update.progress.is_finite() {
            debug!(region = %update.region, "ignoring non-finite scroll progress");
            return false;
        }
        let progress = update.progress.clamp(0.0, 1.0);
        let Some(binding) = self.bindings.iter_mut().find(|b| b.region == update.region) else {
            return false;
        };
        binding.last = Some((update.seq, progress));
        write_channels(&binding.channels, progress, state);
        true
    }

    /// Replays every binding's last progress in write order. Used once the
    /// model arrives so node channels catch up with the page position.
    pub fn reapply(&self, state: &mut SceneState) {
        let mut written: Vec<(u64, f64, &Binding)> = self
            .bindings
            .iter()
            .filter_map(|b| b.last.map(|(seq, p)| (seq, p, b)))
            .collect();
        written.sort_by_key(|(seq, _, _)| *seq);
        for (_, progress, binding) in written {
            write_channels(&binding.channels, progress, state);
        }
    }

    /// Region of the most recent write.
    pub fn active_region(&self) -> Option<&str> {
        self.bindings
            .iter()
            .filter_map(|b| b.last.map(|(seq, _)| (seq, b.region.as_str())))
            .max_by_key(|(seq, _)| *seq)
            .map(|(_, region)| region)
    }
}

fn write_channels(channels: &[Channel], progress: f64, state: &mut SceneState) {
    for ch in channels {
        let value = ch.law.eval(progress);
        match &ch.target {
            ScrollTarget::CameraX => state.camera.position.x = value,
            ScrollTarget::CameraY => state.camera.position.y = value,
            ScrollTarget::CameraZ => state.camera.position.z = value,
            ScrollTarget::CameraYaw => state.camera_yaw = value,
            ScrollTarget::ModelRotationY => {
                if let Some(t) = state.model_root.and_then(|r| state.graph.transform_mut(r)) {
                    t.rotation.y = value;
                }
            }
            ScrollTarget::NodeRotationY(_) => {
                if let Some(t) = ch.node.and_then(|n| state.graph.transform_mut(n)) {
                    t.rotation.y = value;
                }
            }
            ScrollTarget::NodeScale(_) => {
                if let Some(t) = ch.node.and_then(|n| state.graph.transform_mut(n)) {
                    t.scale = foundation::math::Vec3::splat(value);
                }
            }
        }
    }
}
