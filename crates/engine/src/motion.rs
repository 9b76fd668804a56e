//! Continuous motion that runs every frame regardless of model state.
//!
//! Idle motion is a pure function of elapsed time. Pointer easing is the one
//! stateful writer: it closes a fixed fraction of the gap each frame.

use foundation::math::{Vec2, Vec3};

use crate::config::{IdleConfig, OrbitLightConfig, PointerConfig, Wave};
use crate::state::SceneState;

/// Vertical float offset of the model pivot.
pub fn float_offset(idle: &IdleConfig, elapsed_s: f64) -> f64 {
    (elapsed_s * idle.float_speed).sin() * idle.float_amplitude
}

pub fn orbit_light_position(light: &OrbitLightConfig, elapsed_s: f64, camera_y: f64) -> Vec3 {
    let axis = |wave: Option<Wave>, base: f64| wave.map_or(base, |w| w.at(elapsed_s));
    let x = axis(light.x, light.base[0]);
    let mut y = axis(light.y, light.base[1]);
    let z = axis(light.z, light.base[2]);
    if light.follow_camera_y {
        y += camera_y;
    }
    Vec3::new(x, y, z)
}

/// Camera x after one frame of easing toward `pointer.x * scale`.
pub fn ease_camera_x(camera_x: f64, pointer: Vec2, pointer_cfg: &PointerConfig) -> f64 {
    camera_x + (pointer.x * pointer_cfg.scale - camera_x) * pointer_cfg.blend
}

/// Where the camera looks, before any scroll yaw.
pub fn look_target(camera: Vec3, pointer: Vec2, pointer_cfg: &PointerConfig) -> Vec3 {
    Vec3::new(
        camera.x * pointer_cfg.look_x_factor,
        camera.y + pointer.y * pointer_cfg.look_y_offset,
        pointer_cfg.look_z,
    )
}

/// Rotates `target` about the vertical line through `eye`.
pub fn apply_yaw(eye: Vec3, target: Vec3, yaw: f64) -> Vec3 {
    if yaw == 0.0 {
        return target;
    }
    let d = target - eye;
    let (s, c) = yaw.sin_cos();
    eye + Vec3::new(d.x * c + d.z * s, d.y, -d.x * s + d.z * c)
}

/// Pivot float, orb spin and light orbits; depends on elapsed time and
/// camera height only.
pub fn apply_idle_motion(
    state: &mut SceneState,
    idle: &IdleConfig,
    lights: &[OrbitLightConfig],
    elapsed_s: f64,
) {
    let float = float_offset(idle, elapsed_s);
    if let Some(t) = state.graph.transform_mut(state.pivot) {
        t.position.y = float;
    }
    if let Some(t) = state.graph.transform_mut(state.orb) {
        t.rotation.x = elapsed_s * idle.orb_spin[0];
        t.rotation.y = elapsed_s * idle.orb_spin[1];
    }

    let camera_y = state.camera.position.y;
    for (light, cfg) in state.lights.points.iter_mut().zip(lights) {
        light.position = orbit_light_position(cfg, elapsed_s, camera_y);
    }
}

/// Eases camera x toward the pointer and re-aims the camera.
pub fn apply_pointer_easing(state: &mut SceneState, pointer_cfg: &PointerConfig) {
    let cam = &mut state.camera;
    cam.position.x = ease_camera_x(cam.position.x, state.pointer, pointer_cfg);
    let target = look_target(cam.position, state.pointer, pointer_cfg);
    cam.target = apply_yaw(cam.position, target, state.camera_yaw);
}
