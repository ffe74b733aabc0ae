//! Motor actuator traits
//!
//! The motor controller board is driven by a PWM speed input plus three
//! digital lines (direction, enable, stop). Implementations receive the
//! complete set of line states every tick from the safety interlock.

use crate::safety::MotorOutputs;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Motor rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Forward rotation
    #[default]
    Forward,
    /// Reverse rotation
    Reverse,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    /// Check if this is the forward direction
    pub fn is_forward(self) -> bool {
        self == Direction::Forward
    }
}

impl From<bool> for Direction {
    /// `true` maps to forward, matching the direction line level
    fn from(forward: bool) -> Self {
        if forward {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }
}

/// Errors that can occur while driving actuator lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// PWM channel rejected the duty cycle
    Pwm,
    /// A digital output line could not be driven
    Pin,
}

/// Trait for the motor controller outputs
///
/// Implementations must write every line on every call. Outputs are never
/// cached between ticks: the interlock re-derives them from the current
/// state and the driver applies them as given.
pub trait MotorActuator {
    /// Drive the motor lines to the given state
    fn apply(&mut self, outputs: &MotorOutputs) -> Result<(), ActuatorError>;

    /// Force the safe state (stop asserted, enable released, zero duty)
    fn force_safe(&mut self) -> Result<(), ActuatorError> {
        self.apply(&MotorOutputs::SAFE)
    }
}
