pub mod animation;
pub mod asset;
pub mod clipping;
pub mod components;
pub mod entity;
pub mod graph;
pub mod prefabs;
pub mod visibility;

pub use asset::*;
pub use clipping::*;
pub use entity::*;
pub use graph::*;
