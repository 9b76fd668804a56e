//! Handles that UI and input callbacks hold.
//!
//! Both only write into the shared inbox; the frame loop applies what they
//! wrote at the start of the next frame. After teardown the inbox is closed
//! and every call is silently dropped.

use std::cell::RefCell;
use std::rc::Rc;

use foundation::geometry::Axis;
use foundation::math::Vec2;
use runtime::inbox::{InputInbox, Viewport};

#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    PlayActuatorCycle,
    SetCutawayEnabled(bool),
    SetCutawayPosition(f64),
    SetCutawayAxis(Axis),
    SetExplodeEnabled(bool),
    SetExplodeIntensity(f64),
}

pub type SharedInbox = Rc<RefCell<InputInbox<ControlCommand>>>;

#[derive(Debug, Clone)]
pub struct ControlHandle {
    inbox: SharedInbox,
}

impl ControlHandle {
    pub fn new(inbox: SharedInbox) -> Self {
        Self { inbox }
    }

    fn push(&self, command: ControlCommand) {
        self.inbox.borrow_mut().push_command(command);
    }

    pub fn play_actuator_cycle(&self) {
        self.push(ControlCommand::PlayActuatorCycle);
    }

    pub fn set_cutaway_enabled(&self, enabled: bool) {
        self.push(ControlCommand::SetCutawayEnabled(enabled));
    }

    pub fn set_cutaway_position(&self, value: f64) {
        self.push(ControlCommand::SetCutawayPosition(value));
    }

    pub fn set_cutaway_axis(&self, axis: Axis) {
        self.push(ControlCommand::SetCutawayAxis(axis));
    }

    pub fn set_explode_enabled(&self, enabled: bool) {
        self.push(ControlCommand::SetExplodeEnabled(enabled));
    }

    pub fn set_explode_intensity(&self, value: f64) {
        self.push(ControlCommand::SetExplodeIntensity(value));
    }
}

/// Pointer, resize and scroll listeners.
#[derive(Debug, Clone)]
pub struct InputHandle {
    inbox: SharedInbox,
}

impl InputHandle {
    pub fn new(inbox: SharedInbox) -> Self {
        Self { inbox }
    }

    /// Pointer in normalized device units, -1..1 per axis, y up.
    pub fn pointer_moved(&self, normalized: Vec2) {
        self.inbox.borrow_mut().push_pointer(normalized);
    }

    /// Pointer in CSS pixels relative to the viewport's top-left corner.
    pub fn pointer_moved_px(&self, x: f64, y: f64, viewport: &Viewport) {
        self.pointer_moved(normalize_pointer(x, y, viewport));
    }

    pub fn resized(&self, viewport: Viewport) {
        self.inbox.borrow_mut().push_viewport(viewport);
    }

    pub fn scroll_progress(&self, region: &str, progress: f64) {
        self.inbox.borrow_mut().push_scroll(region, progress);
    }
}

pub fn normalize_pointer(x: f64, y: f64, viewport: &Viewport) -> Vec2 {
    let w = viewport.width.max(1.0);
    let h = viewport.height.max(1.0);
    Vec2::new(x / w * 2.0 - 1.0, -(y / h) * 2.0 + 1.0)
}

#[cfg(test)]
mod tests {
    use super::{ControlCommand, ControlHandle, InputHandle, SharedInbox, normalize_pointer};
    use foundation::geometry::Axis;
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;
    use runtime::inbox::Viewport;

    #[test]
    fn commands_queue_in_call_order() {
        let inbox = SharedInbox::default();
        let controls = ControlHandle::new(inbox.clone());
        let clone = controls.clone();
        controls.set_cutaway_axis(Axis::Z);
        clone.set_cutaway_position(30.0);
        controls.play_actuator_cycle();
        controls.set_explode_enabled(true);
        controls.set_explode_intensity(60.0);
        controls.set_cutaway_enabled(false);

        let drained = inbox.borrow_mut().drain();
        assert_eq!(
            drained.commands,
            vec![
                ControlCommand::SetCutawayAxis(Axis::Z),
                ControlCommand::SetCutawayPosition(30.0),
                ControlCommand::PlayActuatorCycle,
                ControlCommand::SetExplodeEnabled(true),
                ControlCommand::SetExplodeIntensity(60.0),
                ControlCommand::SetCutawayEnabled(false),
            ]
        );
    }

    #[test]
    fn closed_inbox_drops_everything() {
        let inbox = SharedInbox::default();
        let controls = ControlHandle::new(inbox.clone());
        let input = InputHandle::new(inbox.clone());
        inbox.borrow_mut().close();
        controls.play_actuator_cycle();
        input.pointer_moved(Vec2::new(0.5, 0.5));
        input.scroll_progress("section-cta", 0.4);
        assert!(inbox.borrow_mut().drain().is_empty());
    }

    #[test]
    fn pixel_pointer_is_normalized_y_up() {
        let vp = Viewport::new(800.0, 600.0, 1.0);
        assert_eq!(normalize_pointer(400.0, 300.0, &vp), Vec2::new(0.0, 0.0));
        assert_eq!(normalize_pointer(0.0, 0.0, &vp), Vec2::new(-1.0, 1.0));
        assert_eq!(normalize_pointer(800.0, 600.0, &vp), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn input_handle_feeds_latest_values() {
        let inbox = SharedInbox::default();
        let input = InputHandle::new(inbox.clone());
        let vp = Viewport::new(200.0, 100.0, 1.0);
        input.pointer_moved_px(150.0, 25.0, &vp);
        input.resized(vp);
        input.scroll_progress("section-features", 0.25);

        let drained = inbox.borrow_mut().drain();
        assert_eq!(drained.pointer, Some(Vec2::new(0.5, 0.5)));
        assert_eq!(drained.viewport, Some(vp));
        assert_eq!(drained.scroll[0].progress, 0.25);
    }
}
