//! Motor drivers
//!
//! - PWM motor controller board with direction, enable and stop lines

pub mod pwm;

pub use pwm::{PwmMotor, PwmMotorConfig};
