pub mod bounds;
pub mod geometry;
pub mod handles;
pub mod math;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use geometry::*;
pub use handles::*;
pub use time::*;
