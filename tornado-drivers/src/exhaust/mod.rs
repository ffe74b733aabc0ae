//! Exhaust driver
//!
//! The fuel solenoid and the spark igniter are switched together; there is
//! no state where one fires without the other.

use embedded_hal::digital::OutputPin;
use tornado_core::safety::ExhaustOutputs;
use tornado_core::traits::{ActuatorError, ExhaustActuator};

use crate::line::{Line, Polarity};

/// Solenoid and igniter pair
pub struct Exhaust<Solenoid, Igniter> {
    solenoid: Line<Solenoid>,
    igniter: Line<Igniter>,
}

impl<Solenoid: OutputPin, Igniter: OutputPin> Exhaust<Solenoid, Igniter> {
    /// Take both lines (active high) and switch them off
    pub fn new(solenoid: Solenoid, igniter: Igniter) -> Result<Self, ActuatorError> {
        Self::with_polarity(solenoid, igniter, Polarity::ActiveHigh)
    }

    /// Take both lines with the given polarity and switch them off
    pub fn with_polarity(solenoid: Solenoid, igniter: Igniter, polarity: Polarity) -> Result<Self, ActuatorError> {
        Ok(Self {
            solenoid: Line::new(solenoid, polarity)?,
            igniter: Line::new(igniter, polarity)?,
        })
    }
}

impl<Solenoid: OutputPin, Igniter: OutputPin> ExhaustActuator for Exhaust<Solenoid, Igniter> {
    fn apply(&mut self, outputs: &ExhaustOutputs) -> Result<(), ActuatorError> {
        // Igniter off before the solenoid, on after it
        if outputs.is_firing() {
            self.solenoid.set(true)?;
            self.igniter.set(true)
        } else {
            self.igniter.set(false)?;
            self.solenoid.set(false)
        }
    }

    fn is_firing(&self) -> bool {
        self.solenoid.is_asserted() && self.igniter.is_asserted()
    }
}
