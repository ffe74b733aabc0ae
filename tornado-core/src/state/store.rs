//! State store implementation
//!
//! Owns the control-state record. Setters clamp or accept any value, so no
//! operation can fail, and all of them are idempotent.

use crate::traits::Direction;

/// Lowest speed percentage
pub const MIN_SPEED: f32 = 0.0;

/// Highest speed percentage (percent of maximum actuation)
pub const MAX_SPEED: f32 = 100.0;

/// Snapshot of the control-state record
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlState {
    /// Requested speed (0-100%)
    pub target_speed: f32,
    /// Applied speed, moved toward the target by the motion controller (0-100%)
    pub current_speed: f32,
    /// Requested direction
    pub target_direction: Direction,
    /// Applied direction
    pub current_direction: Direction,
    /// Operator permission flag
    pub enabled: bool,
    /// Safety override flag
    pub emergency_stop: bool,
    /// Requested exhaust state (not gated here)
    pub firing_thrusters: bool,
    /// Time of the last motion controller tick (ms)
    pub last_update_ms: u32,
    /// Heuristic velocity estimate (relative units, never negative)
    pub approximate_velocity: f32,
}

impl ControlState {
    /// Initial state at startup: stopped, forward, disabled
    pub const fn new(now_ms: u32) -> Self {
        Self {
            target_speed: 0.0,
            current_speed: 0.0,
            target_direction: Direction::Forward,
            current_direction: Direction::Forward,
            enabled: false,
            emergency_stop: false,
            firing_thrusters: false,
            last_update_ms: now_ms,
            approximate_velocity: 0.0,
        }
    }

    /// Operator enable and no emergency stop
    pub fn effective_enable(&self) -> bool {
        self.enabled && !self.emergency_stop
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Result of a target speed write
///
/// `applied` is what was stored; it differs from `requested` only when the
/// request was out of range. The caller may report that, but the value is
/// clamped either way.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpeedUpdate {
    /// Speed passed to the setter
    pub requested: f32,
    /// Speed actually stored
    pub applied: f32,
}

impl SpeedUpdate {
    /// Check if the request had to be clamped
    pub fn was_clamped(&self) -> bool {
        // NaN requests always report as clamped
        self.requested != self.applied
    }
}

/// Clamp a speed into the valid range
///
/// NaN maps to zero rather than propagating into the controller.
pub fn clamp_speed(speed: f32) -> f32 {
    if speed.is_nan() {
        MIN_SPEED
    } else {
        speed.clamp(MIN_SPEED, MAX_SPEED)
    }
}

/// Owner of the control-state record
#[derive(Debug, Clone)]
pub struct StateStore {
    state: ControlState,
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl StateStore {
    /// Create the store with the startup state
    pub fn new(now_ms: u32) -> Self {
        Self {
            state: ControlState::new(now_ms),
        }
    }

    /// Set the requested speed, clamped to 0-100%
    pub fn set_target_speed(&mut self, speed: f32) -> SpeedUpdate {
        let applied = clamp_speed(speed);
        self.state.target_speed = applied;
        SpeedUpdate {
            requested: speed,
            applied,
        }
    }

    /// Set the requested direction
    pub fn set_target_direction(&mut self, direction: Direction) {
        self.state.target_direction = direction;
    }

    /// Set the operator enable flag
    ///
    /// Disabling zeroes the requested speed in the same call.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.state.enabled = enabled;
        if !enabled {
            self.state.target_speed = 0.0;
        }
    }

    /// Set or clear the emergency stop
    ///
    /// Activating zeroes the requested speed in the same call. Clearing does
    /// nothing else: the applied speed has to ramp back through the
    /// motion controller.
    pub fn set_emergency_stop(&mut self, active: bool) {
        self.state.emergency_stop = active;
        if active {
            self.state.target_speed = 0.0;
        }
    }

    /// Set the exhaust request
    pub fn set_firing_thrusters(&mut self, firing: bool) {
        self.state.firing_thrusters = firing;
    }

    pub fn target_speed(&self) -> f32 {
        self.state.target_speed
    }

    pub fn current_speed(&self) -> f32 {
        self.state.current_speed
    }

    pub fn target_direction(&self) -> Direction {
        self.state.target_direction
    }

    pub fn current_direction(&self) -> Direction {
        self.state.current_direction
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn is_emergency_stop(&self) -> bool {
        self.state.emergency_stop
    }

    pub fn is_firing_thrusters(&self) -> bool {
        self.state.firing_thrusters
    }

    pub fn last_update_ms(&self) -> u32 {
        self.state.last_update_ms
    }

    pub fn approximate_velocity(&self) -> f32 {
        self.state.approximate_velocity
    }

    /// Operator enable and no emergency stop
    ///
    /// This, not the raw flags, gates direction adoption and actuation.
    pub fn effective_enable(&self) -> bool {
        self.state.effective_enable()
    }

    /// Copy of the whole record
    pub fn snapshot(&self) -> ControlState {
        self.state
    }

    // Motion controller writers

    pub(crate) fn set_current_speed(&mut self, speed: f32) {
        self.state.current_speed = clamp_speed(speed);
    }

    pub(crate) fn set_current_direction(&mut self, direction: Direction) {
        self.state.current_direction = direction;
    }

    pub(crate) fn set_approximate_velocity(&mut self, velocity: f32) {
        self.state.approximate_velocity = velocity;
    }

    pub(crate) fn set_last_update_ms(&mut self, now_ms: u32) {
        self.state.last_update_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_initial_state() {
        let store = StateStore::new(1234);

        assert_eq!(store.target_speed(), 0.0);
        assert_eq!(store.current_speed(), 0.0);
        assert_eq!(store.target_direction(), Direction::Forward);
        assert_eq!(store.current_direction(), Direction::Forward);
        assert!(!store.is_enabled());
        assert!(!store.is_emergency_stop());
        assert!(!store.is_firing_thrusters());
        assert!(!store.effective_enable());
        assert_eq!(store.last_update_ms(), 1234);
        assert_eq!(store.approximate_velocity(), 0.0);
    }

    #[test]
    fn test_target_speed_clamping() {
        let mut store = StateStore::new(0);

        let update = store.set_target_speed(150.0);
        assert_eq!(store.target_speed(), 100.0);
        assert!(update.was_clamped());

        let update = store.set_target_speed(-20.0);
        assert_eq!(store.target_speed(), 0.0);
        assert!(update.was_clamped());

        let update = store.set_target_speed(42.5);
        assert_eq!(store.target_speed(), 42.5);
        assert!(!update.was_clamped());
    }

    #[test]
    fn test_nan_speed_maps_to_zero() {
        let mut store = StateStore::new(0);
        store.set_target_speed(50.0);

        let update = store.set_target_speed(f32::NAN);
        assert_eq!(store.target_speed(), 0.0);
        assert!(update.was_clamped());
    }

    #[test]
    fn test_disable_zeroes_target() {
        let mut store = StateStore::new(0);
        store.set_enabled(true);
        store.set_target_speed(80.0);

        store.set_enabled(false);
        assert_eq!(store.target_speed(), 0.0);
        assert!(!store.is_enabled());
    }

    #[test]
    fn test_enable_keeps_target() {
        let mut store = StateStore::new(0);
        store.set_target_speed(30.0);
        store.set_enabled(true);
        assert_eq!(store.target_speed(), 30.0);
    }

    #[test]
    fn test_emergency_stop_zeroes_target() {
        let mut store = StateStore::new(0);
        store.set_enabled(true);
        store.set_target_speed(80.0);

        store.set_emergency_stop(true);
        assert_eq!(store.target_speed(), 0.0);
        assert!(store.is_emergency_stop());
        assert!(!store.effective_enable());
    }

    #[test]
    fn test_clearing_emergency_stop_has_no_side_effect() {
        let mut store = StateStore::new(0);
        store.set_enabled(true);
        store.set_current_speed(40.0);
        store.set_emergency_stop(true);

        store.set_emergency_stop(false);
        assert_eq!(store.target_speed(), 0.0);
        assert_eq!(store.current_speed(), 40.0);
        assert!(store.effective_enable());
    }

    #[test]
    fn test_firing_is_not_gated() {
        let mut store = StateStore::new(0);
        store.set_emergency_stop(true);

        store.set_firing_thrusters(true);
        assert!(store.is_firing_thrusters());
    }

    #[test]
    fn test_effective_enable() {
        let mut store = StateStore::new(0);
        assert!(!store.effective_enable());

        store.set_enabled(true);
        assert!(store.effective_enable());

        store.set_emergency_stop(true);
        assert!(!store.effective_enable());

        store.set_emergency_stop(false);
        assert!(store.effective_enable());
    }

    #[test]
    fn test_snapshot_matches_getters() {
        let mut store = StateStore::new(10);
        store.set_enabled(true);
        store.set_target_speed(25.0);
        store.set_target_direction(Direction::Reverse);

        let snap = store.snapshot();
        assert_eq!(snap.target_speed, 25.0);
        assert_eq!(snap.target_direction, Direction::Reverse);
        assert!(snap.enabled);
        assert!(snap.effective_enable());
    }

    proptest! {
        #[test]
        fn prop_target_speed_always_in_range(speed in proptest::num::f32::ANY) {
            let mut store = StateStore::new(0);
            store.set_target_speed(speed);
            let target = store.target_speed();
            prop_assert!((MIN_SPEED..=MAX_SPEED).contains(&target));
        }

        #[test]
        fn prop_setters_are_idempotent(speed in -500.0f32..500.0, enabled: bool, estop: bool) {
            let mut once = StateStore::new(0);
            once.set_target_speed(speed);
            once.set_enabled(enabled);
            once.set_emergency_stop(estop);

            let mut twice = once.clone();
            twice.set_enabled(enabled);
            twice.set_emergency_stop(estop);

            prop_assert_eq!(once.snapshot(), twice.snapshot());
        }
    }
}
