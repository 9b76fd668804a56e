//! Keyframe animation data.
//!
//! Clips arrive with the parsed asset. Tracks address nodes by name; binding
//! a track to a `NodeId` happens once, when the asset is handed to the
//! engine.

use foundation::math::Vec3;

use crate::components::Transform;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TrackProperty {
    Position,
    Rotation,
    Scale,
}

impl TrackProperty {
    pub fn apply(self, transform: &mut Transform, value: Vec3) {
        match self {
            TrackProperty::Position => transform.position = value,
            TrackProperty::Rotation => transform.rotation = value,
            TrackProperty::Scale => transform.scale = value,
        }
    }
}

/// Linearly interpolated vector track. `times` must be ascending and the same
/// length as `values`.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub node_name: String,
    pub property: TrackProperty,
    pub times: Vec<f64>,
    pub values: Vec<Vec3>,
}

impl Track {
    pub fn new(
        node_name: impl Into<String>,
        property: TrackProperty,
        keys: impl IntoIterator<Item = (f64, Vec3)>,
    ) -> Self {
        let (times, values) = keys.into_iter().unzip();
        Self {
            node_name: node_name.into(),
            property,
            times,
            values,
        }
    }

    pub fn end_time(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Value at `t`, clamped to the first/last key outside the keyed range.
    pub fn sample(&self, t: f64) -> Option<Vec3> {
        let n = self.times.len().min(self.values.len());
        if n == 0 {
            return None;
        }
        if t <= self.times[0] {
            return Some(self.values[0]);
        }
        if t >= self.times[n - 1] {
            return Some(self.values[n - 1]);
        }
        // First key strictly after t; guaranteed in 1..n by the checks above.
        let hi = self.times[..n].partition_point(|k| *k <= t);
        let lo = hi - 1;
        let span = self.times[hi] - self.times[lo];
        let u = if span > 0.0 {
            (t - self.times[lo]) / span
        } else {
            1.0
        };
        Some(self.values[lo].lerp(self.values[hi], u))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    /// Seconds.
    pub duration: f64,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Duration is taken from the longest track.
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks.iter().map(Track::end_time).fold(0.0, f64::max);
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AnimationClip, Track, TrackProperty};
    use crate::components::Transform;
    use foundation::math::Vec3;

    fn track() -> Track {
        Track::new(
            "piston",
            TrackProperty::Position,
            [
                (0.0, Vec3::ZERO),
                (1.0, Vec3::new(2.0, 0.0, 0.0)),
                (3.0, Vec3::new(2.0, 4.0, 0.0)),
            ],
        )
    }

    #[test]
    fn sample_interpolates_between_keys() {
        let t = track();
        assert_eq!(t.sample(0.5), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(t.sample(2.0), Some(Vec3::new(2.0, 2.0, 0.0)));
        assert_eq!(t.sample(1.0), Some(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn sample_clamps_outside_range() {
        let t = track();
        assert_eq!(t.sample(-1.0), Some(Vec3::ZERO));
        assert_eq!(t.sample(10.0), Some(Vec3::new(2.0, 4.0, 0.0)));
        assert_eq!(Track::new("x", TrackProperty::Scale, []).sample(0.0), None);
    }

    #[test]
    fn clip_duration_is_longest_track() {
        let short = Track::new("a", TrackProperty::Scale, [(0.0, Vec3::ONE), (0.5, Vec3::ONE)]);
        let clip = AnimationClip::new("actuate", vec![short, track()]);
        assert_eq!(clip.duration, 3.0);
    }

    #[test]
    fn property_writes_matching_channel() {
        let mut tr = Transform::identity();
        TrackProperty::Rotation.apply(&mut tr, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(tr.rotation, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(tr.position, Vec3::ZERO);
    }
}
