//! Per-frame orchestration.
//!
//! A frame runs, in order:
//! 1. input drained from the inbox (viewport, pointer, control commands,
//!    scroll progress in write order);
//! 2. clip playback, explode tweens and the entrance tween;
//! 3. idle motion (float, orbiting lights);
//! 4. pointer easing and camera aim;
//! 5. hotspot projection and observer notification;
//! 6. frame collection and submit.
//!
//! A failing frame returns a [`FrameError`] and leaves the engine ready for
//! the next one.

use foundation::geometry::{Axis, fit_scale};
use foundation::math::{Vec2, Vec3};
use gpu::{Camera3D, RenderSettings, RenderSurface, Renderer, SurfaceError};
use runtime::event_bus::EventBus;
use runtime::frame::Frame;
use runtime::inbox::{InboxDrain, ScrollUpdate, Viewport};
use scene::asset::{AssetError, LoadedAsset};
use tracing::{debug, error, info};

use crate::animation::AnimationDriver;
use crate::clipping::ClippingController;
use crate::config::EngineConfig;
use crate::controls::ControlCommand;
use crate::error::FrameError;
use crate::events::EngineEvent;
use crate::explode::ExplodeController;
use crate::hotspots::{HotspotObserver, HotspotProjector};
use crate::motion;
use crate::scroll::ScrollBindings;
use crate::state::{LoadState, ModelInfo, SceneState};
use crate::tween::{Ease, Tween};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameReport {
    pub frame: Frame,
    pub draw_count: usize,
    pub hotspots: usize,
}

pub struct Engine {
    config: EngineConfig,
    state: SceneState,
    load: LoadState,
    clipping: ClippingController,
    explode: ExplodeController,
    hotspots: HotspotProjector,
    animation: AnimationDriver,
    scroll: ScrollBindings,
    entrance: Option<Tween<f64>>,
    last_good_camera: Camera3D,
    surface: Box<dyn RenderSurface>,
    events: EventBus<EngineEvent>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("load", &self.load)
            .field("nodes", &self.state.graph.len())
            .field("clipping", &self.clipping)
            .field("explode", &self.explode)
            .field("hotspots", &self.hotspots)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(config: EngineConfig, viewport: Viewport, surface: Box<dyn RenderSurface>) -> Self {
        let state = SceneState::new(&config, viewport);
        let explode = ExplodeController::new(config.explode.tween_duration_s);
        let scroll = ScrollBindings::from_config(&config.scroll_bindings);
        let mut engine = Self {
            last_good_camera: state.camera,
            config,
            state,
            load: LoadState::Unloaded,
            clipping: ClippingController::new(),
            explode,
            hotspots: HotspotProjector::new(),
            animation: AnimationDriver::new(),
            scroll,
            entrance: None,
            surface,
            events: EventBus::new(),
        };
        engine.scroll.resolve(&engine.state.graph);
        if let Err(e) = engine.resize_surface() {
            error!(error = %e, "initial surface resize failed");
        }
        engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn clipping(&self) -> &ClippingController {
        &self.clipping
    }

    pub fn explode(&self) -> &ExplodeController {
        &self.explode
    }

    pub fn hotspots(&self) -> &HotspotProjector {
        &self.hotspots
    }

    pub fn animation(&self) -> &AnimationDriver {
        &self.animation
    }

    pub fn scroll(&self) -> &ScrollBindings {
        &self.scroll
    }

    pub fn events(&self) -> &EventBus<EngineEvent> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus<EngineEvent> {
        &mut self.events
    }

    // Control surface. Safe to call in any load state: cutaway and explode
    // settings are kept and applied when the model arrives.

    pub fn play_actuator_cycle(&mut self) -> bool {
        let name = self.config.actuator_clip.clone();
        self.animation.play(&name)
    }

    pub fn set_cutaway_enabled(&mut self, enabled: bool) {
        self.clipping.set_enabled(enabled);
    }

    pub fn set_cutaway_position(&mut self, value: f64) {
        self.clipping.set_position(value);
    }

    pub fn set_cutaway_axis(&mut self, axis: Axis) {
        self.clipping.set_axis(axis);
    }

    pub fn set_explode_enabled(&mut self, enabled: bool) {
        self.explode.set_enabled(enabled, &self.state.graph);
    }

    pub fn set_explode_intensity(&mut self, value: f64) {
        self.explode.set_intensity(value, &self.state.graph);
    }

    pub fn apply_command(&mut self, command: ControlCommand) {
        debug!(?command, "control");
        match command {
            ControlCommand::PlayActuatorCycle => {
                self.play_actuator_cycle();
            }
            ControlCommand::SetCutawayEnabled(on) => self.set_cutaway_enabled(on),
            ControlCommand::SetCutawayPosition(v) => self.set_cutaway_position(v),
            ControlCommand::SetCutawayAxis(axis) => self.set_cutaway_axis(axis),
            ControlCommand::SetExplodeEnabled(on) => self.set_explode_enabled(on),
            ControlCommand::SetExplodeIntensity(v) => self.set_explode_intensity(v),
        }
    }

    /// Replaces the hotspot observer.
    pub fn set_hotspot_observer(&mut self, observer: Box<dyn HotspotObserver>) {
        self.hotspots.set_observer(observer);
    }

    pub fn set_pointer(&mut self, normalized: Vec2) {
        self.state.pointer = normalized;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<(), SurfaceError> {
        self.state.viewport = viewport;
        self.state.camera.aspect = viewport.aspect();
        self.resize_surface()
    }

    pub fn apply_scroll(&mut self, update: &ScrollUpdate) -> bool {
        self.scroll.apply(update, &mut self.state)
    }

    /// One-time handoff of everything that depends on the model.
    pub fn on_asset_ready(&mut self, asset: LoadedAsset, frame_index: u64) {
        let clips = asset.clips.clone();
        let root = self.state.adopt(asset);
        let pivot = self.state.pivot;
        let graph = &mut self.state.graph;

        let raw = graph.subtree_bounds(root, Some(pivot));
        let scale = fit_scale(&raw, self.config.model.target_size);
        if let Some(t) = graph.transform_mut(root) {
            t.scale = t.scale * scale;
        }
        let scaled = graph.subtree_bounds(root, Some(pivot));
        let center = if scaled.is_empty() { Vec3::ZERO } else { scaled.center() };
        if let Some(t) = graph.transform_mut(root) {
            t.position = t.position - center;
        }
        let bounds = graph.subtree_bounds(root, Some(pivot));

        let plane = self.clipping.plane();
        graph.for_each_mesh_mut(root, |_, mesh| {
            mesh.material.clipping_plane = Some(plane.clone());
        });
        self.clipping.attach_bounds(bounds);
        self.explode.attach(&self.state.graph, root);
        self.hotspots.resolve(&self.config.hotspots, &self.state.graph);
        self.animation.attach(&clips, &self.state.graph);
        self.scroll.resolve(&self.state.graph);
        self.scroll.reapply(&mut self.state);

        let model = &self.config.model;
        self.entrance = Some(Tween::new(
            0.0,
            1.0,
            model.entrance_duration_s,
            Ease::OutElastic {
                amplitude: model.entrance_amplitude,
                period: model.entrance_period,
            },
        ));

        self.load = LoadState::Loaded(ModelInfo {
            root,
            bounds,
            scale,
        });
        let parts = self.explode.parts().len();
        let anchors = self.hotspots.anchors().len();
        info!(parts, anchors, clips = clips.len(), scale, "model ready");
        self.events.emit(
            frame_index,
            EngineEvent::AssetReady {
                parts,
                anchors,
                clips: clips.len(),
            },
        );
    }

    /// The scene stays empty and the controls keep storing settings.
    pub fn on_asset_failed(&mut self, err: AssetError, frame_index: u64) {
        error!(error = %err, "model load failed");
        self.events.emit(
            frame_index,
            EngineEvent::AssetFailed {
                reason: err.to_string(),
            },
        );
        if !self.load.is_loaded() {
            self.load = LoadState::Error(err);
        }
    }

    pub fn tick(
        &mut self,
        frame: Frame,
        input: InboxDrain<ControlCommand>,
    ) -> Result<FrameReport, FrameError> {
        self.apply_input(frame, input)?;
        self.advance(frame.dt_s);

        motion::apply_idle_motion(
            &mut self.state,
            &self.config.idle,
            &self.config.lights.orbit,
            frame.time.seconds(),
        );
        motion::apply_pointer_easing(&mut self.state, &self.config.pointer);
        if !self.state.camera.is_finite() {
            self.state.camera = self.last_good_camera;
            self.state.pointer = Vec2::ZERO;
            return Err(FrameError::NonFiniteCamera);
        }
        self.last_good_camera = self.state.camera;

        let hotspots = self.hotspots.publish(
            &self.state.graph,
            &self.state.camera,
            &self.state.viewport,
            &self.clipping,
        );

        let render_frame = Renderer::collect_3d(
            &self.state.graph,
            self.state.camera,
            &self.state.lights,
            self.render_settings(),
            frame.index,
        );
        let draw_count = render_frame.draw_count();
        self.surface.submit(render_frame)?;

        Ok(FrameReport {
            frame,
            draw_count,
            hotspots,
        })
    }

    /// Releases the surface and the observer. Called once by the lifecycle.
    pub fn dispose(&mut self) {
        self.hotspots.clear_observer();
        self.entrance = None;
        self.surface.dispose();
    }

    pub fn render_settings(&self) -> RenderSettings {
        let r = &self.config.render;
        RenderSettings {
            exposure: r.exposure,
            fog_color: r.fog_color,
            fog_density: r.fog_density,
            pixel_ratio: self.state.viewport.pixel_ratio.min(r.max_pixel_ratio).max(0.0),
        }
    }

    fn apply_input(
        &mut self,
        frame: Frame,
        input: InboxDrain<ControlCommand>,
    ) -> Result<(), FrameError> {
        let resized = input.viewport.map(|v| self.set_viewport(v));
        if let Some(p) = input.pointer {
            self.set_pointer(p);
        }
        if input.dropped_commands > 0 {
            self.events.emit_in(
                frame,
                EngineEvent::CommandsDropped {
                    count: input.dropped_commands,
                },
            );
        }
        for command in input.commands {
            self.apply_command(command);
        }
        for update in &input.scroll {
            self.apply_scroll(update);
        }
        resized.transpose()?;
        Ok(())
    }

    fn advance(&mut self, dt_s: f64) {
        self.animation.advance(dt_s, &mut self.state.graph);
        self.explode.update(dt_s, &mut self.state.graph);
        if let Some(tween) = self.entrance.as_mut() {
            let s = tween.advance(dt_s);
            if let Some(t) = self.state.graph.transform_mut(self.state.pivot) {
                t.scale = Vec3::splat(s);
            }
            if tween.is_finished() {
                self.entrance = None;
            }
        }
    }

    fn resize_surface(&mut self) -> Result<(), SurfaceError> {
        let vp = self.state.viewport;
        let ratio = self.render_settings().pixel_ratio;
        let w = (vp.width * ratio).round().max(1.0) as u32;
        let h = (vp.height * ratio).round().max(1.0) as u32;
        self.surface.resize(w, h)
    }
}
