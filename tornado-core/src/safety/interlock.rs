//! Safety interlock implementation
//!
//! Outputs are recomputed from scratch from the state record on every tick.
//! There are no modes and nothing is carried over from the previous tick, so
//! a safety flag change is reflected in the very next evaluation.
//!
//! This is also the only place where the exhaust request is checked against
//! the enable and emergency stop flags.

use libm::roundf;

use crate::state::{ControlState, MAX_SPEED};
use crate::traits::Direction;

/// Full-scale PWM duty for 8-bit resolution
pub const DEFAULT_PWM_MAX: u16 = 255;

/// Motor controller line states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorOutputs {
    /// Force-stop line asserted
    pub stop: bool,
    /// Enable line asserted
    pub enable: bool,
    /// Direction line, `None` leaves it at its last level
    pub direction: Option<Direction>,
    /// PWM duty (0..=pwm_max)
    pub duty: u16,
}

impl MotorOutputs {
    /// Stop asserted, enable released, zero duty
    pub const SAFE: Self = Self {
        stop: true,
        enable: false,
        direction: None,
        duty: 0,
    };
}

/// Exhaust line states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ExhaustOutputs {
    /// Fuel solenoid open
    pub solenoid: bool,
    /// Spark igniter on
    pub igniter: bool,
}

impl ExhaustOutputs {
    /// Both lines off
    pub const OFF: Self = Self {
        solenoid: false,
        igniter: false,
    };

    /// Both lines on
    pub const FIRING: Self = Self {
        solenoid: true,
        igniter: true,
    };

    /// Check if the pair is firing
    pub fn is_firing(&self) -> bool {
        self.solenoid && self.igniter
    }
}

/// Complete set of actuator outputs for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuationOutputs {
    pub motor: MotorOutputs,
    pub exhaust: ExhaustOutputs,
}

impl ActuationOutputs {
    /// Everything off
    pub const SAFE: Self = Self {
        motor: MotorOutputs::SAFE,
        exhaust: ExhaustOutputs::OFF,
    };

    /// Derive the outputs for the given state
    pub fn evaluate(state: &ControlState, pwm_max: u16) -> Self {
        Self {
            motor: motor_outputs(state, pwm_max),
            exhaust: exhaust_outputs(state),
        }
    }
}

/// Derive the motor line states
pub fn motor_outputs(state: &ControlState, pwm_max: u16) -> MotorOutputs {
    if state.emergency_stop || !state.enabled {
        return MotorOutputs::SAFE;
    }

    MotorOutputs {
        stop: false,
        enable: true,
        direction: Some(state.current_direction),
        duty: speed_to_duty(state.current_speed, pwm_max),
    }
}

/// Derive the exhaust line states
pub fn exhaust_outputs(state: &ControlState) -> ExhaustOutputs {
    if state.firing_thrusters && state.enabled && !state.emergency_stop {
        ExhaustOutputs::FIRING
    } else {
        ExhaustOutputs::OFF
    }
}

/// Convert a speed percentage to a PWM duty
pub fn speed_to_duty(speed: f32, pwm_max: u16) -> u16 {
    let fraction = (speed / MAX_SPEED).clamp(0.0, 1.0);
    roundf(fraction * pwm_max as f32) as u16
}
