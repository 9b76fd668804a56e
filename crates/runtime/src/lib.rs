pub mod event_bus;
pub mod frame;
pub mod inbox;

pub use event_bus::*;
pub use frame::*;
pub use inbox::*;
