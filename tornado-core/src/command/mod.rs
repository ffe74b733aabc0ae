//! Transport-agnostic command surface
//!
//! Every transport (physical controls, serial, BLE, classic radio, HTTP)
//! turns its input into [`Command`]s. The control loop applies them to the
//! state store in arrival order, before the motion controller runs.

use crate::state::{SpeedUpdate, StateStore};
use crate::traits::Direction;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a command came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Source {
    /// Potentiometer, buttons and enable switch
    Physical,
    /// Wired serial terminal
    Serial,
    /// Low-energy wireless GATT service
    Ble,
    /// Classic serial-over-radio
    Bluetooth,
    /// HTTP control API
    Http,
}

/// A state change request
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Command {
    /// Set the requested speed (percent, clamped)
    SetTargetSpeed(f32),
    /// Change the requested speed by a delta (percent, clamped)
    AdjustTargetSpeed(f32),
    /// Set the requested direction
    SetDirection(Direction),
    /// Flip the requested direction (only while effectively enabled)
    ToggleDirection,
    /// Set the operator enable flag
    SetEnabled(bool),
    /// Set or clear the emergency stop
    SetEmergencyStop(bool),
    /// Set the exhaust request without any gating
    SetFiring(bool),
    /// Start firing, only while effectively enabled
    RequestFire,
}

impl Command {
    /// Check if this command touches a safety flag
    pub fn is_safety(&self) -> bool {
        matches!(self, Command::SetEnabled(_) | Command::SetEmergencyStop(_))
    }
}

/// A command tagged with its origin
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourcedCommand {
    pub source: Source,
    pub command: Command,
}

impl SourcedCommand {
    pub const fn new(source: Source, command: Command) -> Self {
        Self { source, command }
    }
}

/// Why a command was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IgnoreReason {
    /// Disabled or emergency stop active
    NotEnabled,
}

/// Result of applying a command
///
/// Ignoring is a no-op at the transport level, never a failure.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// State was written
    Applied,
    /// Target speed was written; carries the requested and stored values
    Speed(SpeedUpdate),
    /// Nothing was written
    Ignored(IgnoreReason),
}

/// Apply one command to the store
pub fn apply(store: &mut StateStore, command: Command) -> Outcome {
    match command {
        Command::SetTargetSpeed(speed) => Outcome::Speed(store.set_target_speed(speed)),
        Command::AdjustTargetSpeed(delta) => {
            let speed = store.target_speed() + delta;
            Outcome::Speed(store.set_target_speed(speed))
        }
        Command::SetDirection(direction) => {
            store.set_target_direction(direction);
            Outcome::Applied
        }
        Command::ToggleDirection => {
            if !store.effective_enable() {
                return Outcome::Ignored(IgnoreReason::NotEnabled);
            }
            store.set_target_direction(store.target_direction().opposite());
            Outcome::Applied
        }
        Command::SetEnabled(enabled) => {
            store.set_enabled(enabled);
            Outcome::Applied
        }
        Command::SetEmergencyStop(active) => {
            store.set_emergency_stop(active);
            Outcome::Applied
        }
        Command::SetFiring(firing) => {
            store.set_firing_thrusters(firing);
            Outcome::Applied
        }
        Command::RequestFire => {
            if !store.effective_enable() {
                return Outcome::Ignored(IgnoreReason::NotEnabled);
            }
            store.set_firing_thrusters(true);
            Outcome::Applied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_is_relative_and_clamped() {
        let mut store = StateStore::new(0);
        store.set_enabled(true);

        apply(&mut store, Command::AdjustTargetSpeed(10.0));
        apply(&mut store, Command::AdjustTargetSpeed(10.0));
        assert_eq!(store.target_speed(), 20.0);

        store.set_target_speed(95.0);
        let outcome = apply(&mut store, Command::AdjustTargetSpeed(10.0));
        assert_eq!(store.target_speed(), 100.0);
        assert!(matches!(outcome, Outcome::Speed(update) if update.was_clamped()));

        store.set_target_speed(5.0);
        apply(&mut store, Command::AdjustTargetSpeed(-10.0));
        assert_eq!(store.target_speed(), 0.0);
    }

    #[test]
    fn test_toggle_requires_enable() {
        let mut store = StateStore::new(0);

        let outcome = apply(&mut store, Command::ToggleDirection);
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::NotEnabled));
        assert_eq!(store.target_direction(), Direction::Forward);

        store.set_enabled(true);
        apply(&mut store, Command::ToggleDirection);
        assert_eq!(store.target_direction(), Direction::Reverse);
        apply(&mut store, Command::ToggleDirection);
        assert_eq!(store.target_direction(), Direction::Forward);
    }

    #[test]
    fn test_set_direction_is_ungated() {
        let mut store = StateStore::new(0);
        apply(&mut store, Command::SetDirection(Direction::Reverse));
        assert_eq!(store.target_direction(), Direction::Reverse);
    }

    #[test]
    fn test_request_fire_requires_enable() {
        let mut store = StateStore::new(0);

        let outcome = apply(&mut store, Command::RequestFire);
        assert_eq!(outcome, Outcome::Ignored(IgnoreReason::NotEnabled));
        assert!(!store.is_firing_thrusters());

        store.set_enabled(true);
        assert_eq!(apply(&mut store, Command::RequestFire), Outcome::Applied);
        assert!(store.is_firing_thrusters());
    }

    #[test]
    fn test_set_firing_is_ungated() {
        let mut store = StateStore::new(0);
        store.set_emergency_stop(true);

        apply(&mut store, Command::SetFiring(true));
        assert!(store.is_firing_thrusters());
    }

    #[test]
    fn test_safety_commands() {
        let mut store = StateStore::new(0);
        apply(&mut store, Command::SetEnabled(true));
        apply(&mut store, Command::SetTargetSpeed(70.0));

        apply(&mut store, Command::SetEmergencyStop(true));
        assert_eq!(store.target_speed(), 0.0);
        assert!(Command::SetEmergencyStop(true).is_safety());
        assert!(!Command::RequestFire.is_safety());
    }
}
