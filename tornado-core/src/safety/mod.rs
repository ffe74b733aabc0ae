//! Safety interlock
//!
//! Derives every actuator output from the current safety flags, each tick.

pub mod interlock;

pub use interlock::{ActuationOutputs, ExhaustOutputs, MotorOutputs, DEFAULT_PWM_MAX};
