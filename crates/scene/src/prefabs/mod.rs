pub mod actuator;

pub use actuator::*;
