//! Status snapshot
//!
//! Read-only copy of the control state published after every tick and
//! rendered by each transport in its own format.

use crate::state::ControlState;
use crate::traits::Direction;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Status as seen by transports
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StatusSnapshot {
    pub current_speed: f32,
    pub target_speed: f32,
    pub current_direction: Direction,
    pub target_direction: Direction,
    /// Enabled and no emergency stop
    pub enabled: bool,
    /// Exhaust requested (gating is reported separately by `enabled`)
    pub firing: bool,
    pub emergency_stop: bool,
    pub approximate_velocity: f32,
    pub timestamp_ms: u32,
}

impl StatusSnapshot {
    /// Startup status, before the first tick
    pub const INITIAL: Self = Self::from_state(&ControlState::new(0));

    pub const fn from_state(state: &ControlState) -> Self {
        Self {
            current_speed: state.current_speed,
            target_speed: state.target_speed,
            current_direction: state.current_direction,
            target_direction: state.target_direction,
            enabled: state.enabled && !state.emergency_stop,
            firing: state.firing_thrusters,
            emergency_stop: state.emergency_stop,
            approximate_velocity: state.approximate_velocity,
            timestamp_ms: state.last_update_ms,
        }
    }
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl From<&ControlState> for StatusSnapshot {
    fn from(state: &ControlState) -> Self {
        Self::from_state(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_enable_reported() {
        let mut state = ControlState::new(42);
        state.enabled = true;
        state.emergency_stop = true;
        state.firing_thrusters = true;

        let status = StatusSnapshot::from(&state);
        assert!(!status.enabled);
        assert!(status.emergency_stop);
        assert!(status.firing);
        assert_eq!(status.timestamp_ms, 42);
    }

    #[test]
    fn test_initial() {
        let status = StatusSnapshot::default();
        assert_eq!(status.current_speed, 0.0);
        assert_eq!(status.current_direction, Direction::Forward);
        assert!(!status.enabled);
    }
}
