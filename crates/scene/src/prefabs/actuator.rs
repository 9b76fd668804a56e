//! Procedural linear-actuator assembly used by the demo viewer and tests.
//!
//! Hierarchy:
//! ```text
//! actuator
//! └─ assembly
//!    └─ body
//!       ├─ housing
//!       ├─ piston ─ piston_head, rod, rod_tip (hotspot anchor)
//!       ├─ end_cap
//!       └─ valve ─ valve_port (hotspot anchor)
//! ```

use foundation::math::Vec3;

use crate::animation::{AnimationClip, Track, TrackProperty};
use crate::asset::LoadedAsset;
use crate::components::{Material, Mesh, Shape3D, Transform};
use crate::graph::SceneGraph;

pub const ACTUATE_CLIP: &str = "actuate";

const HOUSING_COLOR: u32 = 0x1e1b4b;
const PISTON_COLOR: u32 = 0xf59e0b;
const CAP_COLOR: u32 = 0x8b5cf6;
const VALVE_COLOR: u32 = 0x06b6d4;

pub fn actuator_asset() -> LoadedAsset {
    let mut g = SceneGraph::new();
    let root = g.add_node("actuator", Transform::identity());
    let assembly = g.add_child(root, "assembly", Transform::identity());
    let body = g.add_child(assembly, "body", Transform::identity());

    g.add_mesh(
        body,
        "housing",
        Transform::identity(),
        Mesh::new(
            Shape3D::Box {
                size: Vec3::new(4.0, 1.2, 1.2),
            },
            Material::metal(HOUSING_COLOR, 0.9, 0.1),
        ),
    );

    let piston = g.add_child(body, "piston", Transform::translate(Vec3::new(1.0, 0.0, 0.0)));
    g.add_mesh(
        piston,
        "piston_head",
        Transform::identity(),
        Mesh::new(
            Shape3D::Box {
                size: Vec3::new(0.4, 1.0, 1.0),
            },
            Material::metal(PISTON_COLOR, 0.8, 0.15),
        ),
    );
    g.add_mesh(
        piston,
        "rod",
        Transform::translate(Vec3::new(1.5, 0.0, 0.0)),
        Mesh::new(
            Shape3D::Box {
                size: Vec3::new(3.0, 0.2, 0.2),
            },
            Material::metal(PISTON_COLOR, 0.8, 0.15),
        ),
    );
    g.add_child(
        piston,
        "rod_tip",
        Transform::translate(Vec3::new(3.0, 0.0, 0.0)),
    );

    g.add_mesh(
        body,
        "end_cap",
        Transform::translate(Vec3::new(-2.2, 0.0, 0.0)),
        Mesh::new(
            Shape3D::Box {
                size: Vec3::new(0.4, 1.4, 1.4),
            },
            Material::colored(CAP_COLOR),
        ),
    );

    let valve = g.add_mesh(
        body,
        "valve",
        Transform::translate(Vec3::new(-1.0, 0.9, 0.0)),
        Mesh::new(
            Shape3D::Cylinder {
                radius: 0.25,
                height: 0.6,
            },
            Material::colored(VALVE_COLOR),
        ),
    );
    g.add_child(
        valve,
        "valve_port",
        Transform::translate(Vec3::new(0.0, 0.3, 0.0)),
    );

    let clips = vec![actuate_clip()];
    // Root is valid by construction.
    LoadedAsset {
        graph: g,
        root,
        clips,
    }
}

/// Piston stroke out and back with a valve quarter turn; the final pose is
/// the valve turned and the piston home.
fn actuate_clip() -> AnimationClip {
    AnimationClip::new(
        ACTUATE_CLIP,
        vec![
            Track::new(
                "piston",
                TrackProperty::Position,
                [
                    (0.0, Vec3::new(1.0, 0.0, 0.0)),
                    (0.6, Vec3::new(1.8, 0.0, 0.0)),
                    (1.2, Vec3::new(1.0, 0.0, 0.0)),
                ],
            ),
            Track::new(
                "valve",
                TrackProperty::Rotation,
                [
                    (0.0, Vec3::ZERO),
                    (1.2, Vec3::new(0.0, std::f64::consts::FRAC_PI_2, 0.0)),
                ],
            ),
        ],
    )
}
