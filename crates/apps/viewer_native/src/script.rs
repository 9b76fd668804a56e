//! Scripted host activity, expressed as fractions of the run length so the
//! same story plays at any `--frames`.

use engine::lifecycle::AssetSlot;
use engine::{ControlHandle, InputHandle};
use foundation::geometry::Axis;
use runtime::inbox::Viewport;
use scene::prefabs::actuator_asset;

const SECTIONS: [&str; 3] = ["section-features", "section-showcase", "section-cta"];

pub struct Script {
    frames: u64,
}

impl Script {
    pub fn new(frames: u64) -> Self {
        Self { frames }
    }

    fn at(&self, fraction: f64) -> u64 {
        (self.frames as f64 * fraction).round() as u64
    }

    /// Position of frame `i` in the run, 0..1.
    fn progress(&self, i: u64) -> f64 {
        if self.frames <= 1 {
            return 0.0;
        }
        i as f64 / (self.frames - 1) as f64
    }

    pub fn apply(
        &self,
        i: u64,
        controls: &ControlHandle,
        input: &InputHandle,
        slot: &AssetSlot,
        viewport: &Viewport,
    ) {
        // The loader answers a few frames after mount.
        if i == self.at(0.01).max(1) {
            slot.complete(Ok(actuator_asset()));
        }

        // Pointer drifts in a slow figure eight.
        let t = self.progress(i) * std::f64::consts::TAU;
        let px = (0.5 + 0.4 * t.sin()) * viewport.width;
        let py = (0.5 + 0.3 * (2.0 * t).sin()) * viewport.height;
        input.pointer_moved_px(px, py, viewport);

        // Page scroll: the first 10% sits at the hero, then three sections.
        let p = self.progress(i);
        if p >= 0.1 {
            let scrolled = (p - 0.1) / 0.9 * SECTIONS.len() as f64;
            let section = (scrolled.floor() as usize).min(SECTIONS.len() - 1);
            let local = (scrolled - section as f64).clamp(0.0, 1.0);
            input.scroll_progress(SECTIONS[section], local);
        }

        if i == self.at(0.15) {
            controls.set_cutaway_axis(Axis::X);
            controls.set_cutaway_enabled(true);
        }
        if i >= self.at(0.15) && i < self.at(0.3) {
            let span = (self.at(0.3) - self.at(0.15)).max(1) as f64;
            let k = (i - self.at(0.15)) as f64 / span;
            controls.set_cutaway_position(100.0 - 60.0 * k);
        }
        if i == self.at(0.35) {
            controls.set_cutaway_enabled(false);
            controls.set_explode_enabled(true);
            controls.set_explode_intensity(60.0);
        }
        if i == self.at(0.5) {
            controls.play_actuator_cycle();
        }
        if i == self.at(0.6) {
            controls.set_explode_enabled(false);
        }
        if i == self.at(0.75) {
            controls.set_cutaway_axis(Axis::Y);
            controls.set_cutaway_position(50.0);
            controls.set_cutaway_enabled(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Script;

    #[test]
    fn marks_scale_with_run_length() {
        let s = Script::new(600);
        assert_eq!(s.at(0.5), 300);
        assert_eq!(s.progress(599), 1.0);
        assert_eq!(Script::new(1).progress(0), 0.0);
    }
}
