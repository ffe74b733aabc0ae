//! Hardware abstraction traits
//!
//! These traits define the interface between the control logic
//! and the actuator implementations in `tornado-drivers`.

pub mod exhaust;
pub mod motor;

pub use exhaust::ExhaustActuator;
pub use motor::{ActuatorError, Direction, MotorActuator};
