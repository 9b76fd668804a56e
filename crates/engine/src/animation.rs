//! One-shot clip playback.
//!
//! At most one clip plays at a time. `play` always rewinds to zero, so a
//! second trigger restarts the clip instead of layering another playback.

use scene::animation::{AnimationClip, Track};
use scene::entity::NodeId;
use scene::graph::SceneGraph;
use tracing::debug;

#[derive(Debug, Clone)]
struct BoundClip {
    clip: AnimationClip,
    /// Track index paired with its resolved node.
    targets: Vec<(usize, NodeId)>,
}

impl BoundClip {
    fn bind(clip: &AnimationClip, graph: &SceneGraph) -> Self {
        let targets = clip
            .tracks
            .iter()
            .enumerate()
            .filter_map(|(i, track)| match graph.find_by_name(&track.node_name) {
                Some(node) => Some((i, node)),
                None => {
                    debug!(clip = %clip.name, node = %track.node_name, "track target missing");
                    None
                }
            })
            .collect();
        Self {
            clip: clip.clone(),
            targets,
        }
    }

    fn pose(&self, t: f64, graph: &mut SceneGraph) {
        for &(i, node) in &self.targets {
            let track: &Track = &self.clip.tracks[i];
            let (Some(value), Some(transform)) = (track.sample(t), graph.transform_mut(node)) else {
                continue;
            };
            track.property.apply(transform, value);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    clip: usize,
    pub time_s: f64,
    pub playing: bool,
}

#[derive(Debug, Default)]
pub struct AnimationDriver {
    clips: Vec<BoundClip>,
    active: Option<Playback>,
    starts: u64,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the asset's clips to graph nodes by exact name.
    pub fn attach(&mut self, clips: &[AnimationClip], graph: &SceneGraph) {
        self.clips = clips.iter().map(|c| BoundClip::bind(c, graph)).collect();
        self.active = None;
    }

    pub fn has_clip(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Rewinds `name` to zero and starts it once. Unknown names do nothing.
    pub fn play(&mut self, name: &str) -> bool {
        let Some(clip) = self.find(name) else {
            debug!(clip = name, "no such clip; play ignored");
            return false;
        };
        self.active = Some(Playback {
            clip,
            time_s: 0.0,
            playing: true,
        });
        self.starts += 1;
        true
    }

    pub fn is_playing(&self) -> bool {
        self.active.is_some_and(|p| p.playing)
    }

    pub fn playback(&self) -> Option<Playback> {
        self.active
    }

    pub fn active_clip(&self) -> Option<&str> {
        self.active.map(|p| self.clips[p.clip].clip.name.as_str())
    }

    /// Number of times playback was (re)started.
    pub fn starts(&self) -> u64 {
        self.starts
    }

    /// Advances the playing clip and writes its pose. The last pose is held
    /// once the clip ends.
    pub fn advance(&mut self, dt_s: f64, graph: &mut SceneGraph) {
        let Some(playback) = self.active.as_mut() else {
            return;
        };
        if !playback.playing {
            return;
        }
        let bound = &self.clips[playback.clip];
        if dt_s.is_finite() && dt_s > 0.0 {
            playback.time_s += dt_s;
        }
        if playback.time_s >= bound.clip.duration {
            playback.time_s = bound.clip.duration;
            playback.playing = false;
        }
        bound.pose(playback.time_s, graph);
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.clips.iter().position(|b| b.clip.name == name)
    }
}
