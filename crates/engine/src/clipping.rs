//! Cutaway clipping plane.
//!
//! The controller owns one [`SharedClipPlane`]; every model material holds a
//! clone of the same handle, so a single `set` is seen by all of them.

use foundation::bounds::Aabb3;
use foundation::geometry::{Axis, lerp_along};
use foundation::math::Vec3;
use scene::clipping::SharedClipPlane;
use scene::visibility::Plane;
use tracing::debug;

/// Plane constant used while the cutaway is off; far outside any model.
pub const DISABLED_CONSTANT: f64 = 1.0e9;

/// Slider value that leaves the whole model visible.
pub const SLIDER_OPEN: f64 = 100.0;

#[derive(Debug)]
pub struct ClippingController {
    plane: SharedClipPlane,
    axis: Axis,
    enabled: bool,
    slider: f64,
    bounds: Option<Aabb3>,
}

impl Default for ClippingController {
    fn default() -> Self {
        Self::new()
    }
}

impl ClippingController {
    pub fn new() -> Self {
        let axis = Axis::default();
        Self {
            plane: SharedClipPlane::new(Plane::new(-axis.unit(), DISABLED_CONSTANT)),
            axis,
            enabled: false,
            slider: SLIDER_OPEN,
            bounds: None,
        }
    }

    /// Hands over the model bounds once the asset is ready and reapplies any
    /// state set before that.
    pub fn attach_bounds(&mut self, bounds: Aabb3) {
        self.bounds = Some(bounds);
        self.apply();
    }

    /// Handle to share with materials.
    pub fn plane(&self) -> SharedClipPlane {
        self.plane.clone()
    }

    pub fn current(&self) -> Plane {
        self.plane.get()
    }

    pub fn constant(&self) -> f64 {
        self.plane.get().constant
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn slider(&self) -> f64 {
        self.slider
    }

    pub fn set_axis(&mut self, axis: Axis) {
        self.axis = axis;
        self.slider = SLIDER_OPEN;
        debug!(?axis, "cutaway axis");
        self.apply();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        debug!(enabled, "cutaway toggled");
        self.apply();
    }

    /// Slider position, nominally 0..=100. Out-of-range values extrapolate.
    pub fn set_position(&mut self, value: f64) {
        self.slider = value;
        self.apply();
    }

    /// True when the cutaway is on and `p` lies on the removed side.
    pub fn is_clipped(&self, p: Vec3) -> bool {
        self.enabled && self.plane.get().distance(p) < 0.0
    }

    fn apply(&self) {
        let normal = -self.axis.unit();
        let constant = match (self.enabled, &self.bounds) {
            (true, Some(bounds)) => lerp_along(bounds, self.axis, self.slider / 100.0),
            // Enabled before load: nothing to cut against yet.
            _ => DISABLED_CONSTANT,
        };
        self.plane.set(Plane::new(normal, constant));
    }
}
