//! Actuator driver implementations
//!
//! Concrete implementations of the actuator traits defined in
//! tornado-core, on top of `embedded-hal` 1.0 pins and PWM channels:
//!
//! - Motor controller board (PWM speed, direction, enable, stop)
//! - Exhaust solenoid and igniter

#![no_std]
#![deny(unsafe_code)]

pub mod exhaust;
pub mod line;
pub mod motor;

pub use exhaust::Exhaust;
pub use line::{Line, Polarity};
pub use motor::{PwmMotor, PwmMotorConfig};
