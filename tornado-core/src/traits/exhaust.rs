//! Exhaust actuator trait
//!
//! The exhaust subsystem is a fuel solenoid and a spark igniter that are
//! always switched together.

use super::ActuatorError;
use crate::safety::ExhaustOutputs;

/// Trait for the exhaust solenoid / igniter pair
pub trait ExhaustActuator {
    /// Drive both exhaust lines to the given state
    fn apply(&mut self, outputs: &ExhaustOutputs) -> Result<(), ActuatorError>;

    /// Check if the exhaust is currently firing
    fn is_firing(&self) -> bool;
}
