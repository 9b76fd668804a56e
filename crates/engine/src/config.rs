//! Engine configuration.
//!
//! Every field has a default, so a partial JSON document only overrides what
//! it names.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::path::Path;

use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::scroll::{ScrollLaw, ScrollTarget};
use crate::state::FEATURE_ORB;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub camera: CameraConfig,
    pub pointer: PointerConfig,
    pub idle: IdleConfig,
    pub lights: LightsConfig,
    pub model: ModelConfig,
    pub explode: ExplodeConfig,
    /// Clip started by the actuator control.
    pub actuator_clip: String,
    pub hotspots: Vec<HotspotConfig>,
    pub scroll_bindings: Vec<ScrollBindingConfig>,
    pub render: RenderConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            pointer: PointerConfig::default(),
            idle: IdleConfig::default(),
            lights: LightsConfig::default(),
            model: ModelConfig::default(),
            explode: ExplodeConfig::default(),
            actuator_clip: "actuate".to_string(),
            hotspots: Vec::new(),
            scroll_bindings: default_scroll_bindings(),
            render: RenderConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Io { path: String, reason: String },
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, reason } => write!(f, "cannot read config {path}: {reason}"),
            ConfigError::Parse(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
    pub position: [f64; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 60.0,
            near: 0.1,
            far: 200.0,
            position: [0.0, 0.0, 8.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    /// Camera x chases `pointer.x * scale`.
    pub scale: f64,
    /// Fraction of the remaining gap closed per frame.
    pub blend: f64,
    pub look_x_factor: f64,
    pub look_y_offset: f64,
    pub look_z: f64,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            scale: 1.2,
            blend: 0.02,
            look_x_factor: 0.3,
            look_y_offset: 0.6,
            look_z: -2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    /// Radians per second of the vertical float.
    pub float_speed: f64,
    pub float_amplitude: f64,
    /// Orb spin in radians per second about x and y.
    pub orb_spin: [f64; 2],
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            float_speed: 0.8,
            float_amplitude: 0.3,
            orb_spin: [0.15, 0.3],
        }
    }
}

/// `amplitude * sin(speed * t + phase)`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wave {
    pub amplitude: f64,
    pub speed: f64,
    #[serde(default)]
    pub phase: f64,
}

impl Wave {
    pub fn sin(amplitude: f64, speed: f64) -> Self {
        Self {
            amplitude,
            speed,
            phase: 0.0,
        }
    }

    pub fn cos(amplitude: f64, speed: f64) -> Self {
        Self {
            amplitude,
            speed,
            phase: FRAC_PI_2,
        }
    }

    pub fn at(&self, t: f64) -> f64 {
        self.amplitude * (self.speed * t + self.phase).sin()
    }
}

/// A point light whose coordinates are either fixed or driven by a wave.
///
/// With `follow_camera_y`, the y coordinate is relative to the camera height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitLightConfig {
    pub color: u32,
    pub intensity: f64,
    #[serde(default)]
    pub distance: f64,
    pub base: [f64; 3],
    #[serde(default)]
    pub x: Option<Wave>,
    #[serde(default)]
    pub y: Option<Wave>,
    #[serde(default)]
    pub z: Option<Wave>,
    #[serde(default)]
    pub follow_camera_y: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightsConfig {
    pub ambient_color: u32,
    pub ambient_intensity: f64,
    pub orbit: Vec<OrbitLightConfig>,
}

impl Default for LightsConfig {
    fn default() -> Self {
        Self {
            ambient_color: 0x1a1a2e,
            ambient_intensity: 0.6,
            orbit: vec![
                OrbitLightConfig {
                    color: 0x6366f1,
                    intensity: 100.0,
                    distance: 50.0,
                    base: [5.0, 5.0, 5.0],
                    x: Some(Wave::sin(5.0, 0.3)),
                    y: None,
                    z: Some(Wave::cos(5.0, 0.3)),
                    follow_camera_y: false,
                },
                OrbitLightConfig {
                    color: 0xec4899,
                    intensity: 80.0,
                    distance: 50.0,
                    base: [-5.0, -3.0, 3.0],
                    x: Some(Wave::cos(-5.0, 0.2)),
                    y: None,
                    z: Some(Wave::sin(3.0, 0.2)),
                    follow_camera_y: false,
                },
                OrbitLightConfig {
                    color: 0x06b6d4,
                    intensity: 60.0,
                    distance: 50.0,
                    base: [0.0, 5.0, -5.0],
                    x: None,
                    y: Some(Wave::sin(5.0, 0.25)),
                    z: None,
                    follow_camera_y: true,
                },
                OrbitLightConfig {
                    color: 0xf59e0b,
                    intensity: 50.0,
                    distance: 40.0,
                    base: [3.0, -5.0, 2.0],
                    x: None,
                    y: None,
                    z: None,
                    follow_camera_y: true,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Largest extent of the model after normalization.
    pub target_size: f64,
    pub entrance_duration_s: f64,
    pub entrance_amplitude: f64,
    pub entrance_period: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            target_size: 3.0,
            entrance_duration_s: 1.4,
            entrance_amplitude: 1.0,
            entrance_period: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplodeConfig {
    pub tween_duration_s: f64,
}

impl Default for ExplodeConfig {
    fn default() -> Self {
        Self {
            tween_duration_s: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotspotConfig {
    pub id: String,
    /// Exact node name in the loaded asset.
    pub node: String,
}

impl HotspotConfig {
    pub fn new(id: impl Into<String>, node: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node: node.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollChannelConfig {
    pub target: ScrollTarget,
    pub law: ScrollLaw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollBindingConfig {
    pub region: String,
    pub channels: Vec<ScrollChannelConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub exposure: f64,
    pub fog_color: u32,
    pub fog_density: f64,
    pub max_pixel_ratio: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            exposure: 1.3,
            fog_color: 0x05020e,
            fog_density: 0.02,
            max_pixel_ratio: 2.0,
        }
    }
}

impl CameraConfig {
    pub fn start_position(&self) -> Vec3 {
        Vec3::from(self.position)
    }
}

fn channel(target: ScrollTarget, law: ScrollLaw) -> ScrollChannelConfig {
    ScrollChannelConfig { target, law }
}

fn linear(from: f64, to: f64) -> ScrollLaw {
    ScrollLaw::Linear { from, to }
}

/// The three page sections of the landing page.
pub fn default_scroll_bindings() -> Vec<ScrollBindingConfig> {
    vec![
        ScrollBindingConfig {
            region: "section-features".into(),
            channels: vec![
                channel(ScrollTarget::CameraY, linear(0.0, -18.0)),
                channel(ScrollTarget::CameraZ, linear(8.0, 5.0)),
                channel(ScrollTarget::NodeScale(FEATURE_ORB.into()), linear(0.5, 2.0)),
            ],
        },
        ScrollBindingConfig {
            region: "section-showcase".into(),
            channels: vec![
                channel(ScrollTarget::CameraY, linear(-18.0, -38.0)),
                channel(ScrollTarget::CameraZ, linear(5.0, 7.0)),
                channel(ScrollTarget::ModelRotationY, linear(0.0, TAU)),
            ],
        },
        ScrollBindingConfig {
            region: "section-cta".into(),
            channels: vec![
                channel(ScrollTarget::CameraY, linear(-38.0, -58.0)),
                channel(ScrollTarget::CameraZ, linear(7.0, 5.0)),
                channel(ScrollTarget::ModelRotationY, linear(0.0, PI)),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig, Wave};
    use crate::scroll::{ScrollLaw, ScrollTarget};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_document_is_default() {
        let cfg = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.actuator_clip, "actuate");
        assert_eq!(cfg.lights.orbit.len(), 4);
        assert_eq!(cfg.scroll_bindings.len(), 3);
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let cfg = EngineConfig::from_json_str(
            r#"{
                "camera": { "fov_y_deg": 45.0 },
                "hotspots": [ { "id": "rod", "node": "rod_tip" } ],
                "scroll_bindings": [
                    { "region": "hero", "channels": [
                        { "target": "camera_y", "law": { "kind": "linear", "from": 0.0, "to": -4.0 } },
                        { "target": { "node_scale": "valve" },
                          "law": { "kind": "sine", "base": 1.0, "amplitude": 0.5, "cycles": 2.0 } }
                    ] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(cfg.camera.fov_y_deg, 45.0);
        assert_eq!(cfg.camera.far, 200.0);
        assert_eq!(cfg.hotspots[0].node, "rod_tip");
        let channels = &cfg.scroll_bindings[0].channels;
        assert_eq!(channels[0].target, ScrollTarget::CameraY);
        assert_eq!(channels[1].target, ScrollTarget::NodeScale("valve".into()));
        assert_eq!(
            channels[1].law,
            ScrollLaw::Sine {
                base: 1.0,
                amplitude: 0.5,
                cycles: 2.0,
                phase: 0.0
            }
        );
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = EngineConfig::from_json_str("{ \"camera\": 3 }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = EngineConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn default_scroll_sections_are_continuous() {
        let cfg = EngineConfig::default();
        let end_of = |i: usize| match cfg.scroll_bindings[i].channels[0].law {
            ScrollLaw::Linear { to, .. } => to,
            ScrollLaw::Sine { .. } => unreachable!(),
        };
        let start_of = |i: usize| match cfg.scroll_bindings[i].channels[0].law {
            ScrollLaw::Linear { from, .. } => from,
            ScrollLaw::Sine { .. } => unreachable!(),
        };
        assert_eq!(end_of(0), start_of(1));
        assert_eq!(end_of(1), start_of(2));
    }

    #[test]
    fn feature_section_grows_the_orb() {
        let cfg = EngineConfig::default();
        let features = &cfg.scroll_bindings[0];
        assert_eq!(features.region, "section-features");
        let orb = features
            .channels
            .iter()
            .find(|c| c.target == ScrollTarget::NodeScale("feature_orb".into()))
            .unwrap();
        assert_eq!(orb.law.eval(0.0), 0.5);
        assert_eq!(orb.law.eval(1.0), 2.0);
    }

    #[test]
    fn cos_wave_leads_sin_by_quarter_turn() {
        let w = Wave::cos(5.0, 0.3);
        assert!((w.at(0.0) - 5.0).abs() < 1e-12);
        assert!(Wave::sin(5.0, 0.3).at(0.0).abs() < 1e-12);
    }
}
