//! Motion controller with a logarithmic acceleration curve
//!
//! Once per control tick the applied speed moves toward the effective target
//! (the requested speed while effectively enabled, zero otherwise). The
//! allowed change per tick is `max_acceleration * dt` scaled by a concave
//! curve of the distance to the target: at least 30% of the linear cap near
//! the target, up to 100% when the full range separates them.
//!
//! ```text
//! diff            = target - current
//! curve_factor    = log10(1 + 9 * |diff| / 100)
//! adjusted_change = max_acceleration * dt * (0.3 + 0.7 * curve_factor)
//! current        += clamp(diff, -adjusted_change, +adjusted_change)
//! ```
//!
//! Emergency stop and disable therefore never drop the speed instantly; the
//! applied speed ramps down through the same curve.

use libm::log10f;

use crate::state::{StateStore, MAX_SPEED};

/// Default acceleration rate in percentage points per second
pub const DEFAULT_MAX_ACCELERATION: f32 = 5.0;

/// Distance to the target below which the speed snaps onto it
pub const SNAP_THRESHOLD: f32 = 0.1;

/// Share of the linear cap that is always allowed
const MIN_RATE_SHARE: f32 = 0.3;

/// Share of the linear cap scaled by the curve factor
const CURVE_RATE_SHARE: f32 = 0.7;

/// Velocity estimator gain
const VELOCITY_GAIN: f32 = 0.01;

/// Advance `current` toward `target` for a time step of `dt_s` seconds
///
/// Returns `current` unchanged for a non-positive time step, and exactly
/// `target` once they are closer than [`SNAP_THRESHOLD`].
pub fn accelerated_speed(current: f32, target: f32, dt_s: f32, max_acceleration: f32) -> f32 {
    if !(dt_s > 0.0) {
        return current;
    }

    let diff = target - current;
    if diff.abs() < SNAP_THRESHOLD {
        return target;
    }

    let max_change = max_acceleration * dt_s;
    let normalized_rate = diff.abs() / MAX_SPEED;
    let curve_factor = log10f(1.0 + normalized_rate * 9.0);
    let adjusted_max_change = max_change * (MIN_RATE_SHARE + CURVE_RATE_SHARE * curve_factor);

    let change = diff.clamp(-adjusted_max_change, adjusted_max_change);
    current + change
}

/// Motion controller
///
/// Sole writer of the applied speed, applied direction, velocity estimate
/// and tick timestamp in the [`StateStore`].
#[derive(Debug, Clone)]
pub struct MotionController {
    /// Acceleration rate in percentage points per second
    max_acceleration: f32,
}

impl Default for MotionController {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionController {
    /// Create a controller with the default acceleration rate
    pub fn new() -> Self {
        Self {
            max_acceleration: DEFAULT_MAX_ACCELERATION,
        }
    }

    /// Create a controller with a custom acceleration rate
    pub fn with_acceleration(max_acceleration: f32) -> Self {
        Self { max_acceleration }
    }

    /// Get the acceleration rate (percentage points per second)
    pub fn max_acceleration(&self) -> f32 {
        self.max_acceleration
    }

    /// Run one tick at time `now_ms`
    ///
    /// The time step is measured from the previous tick, so a stalled loop
    /// produces one proportionally larger step.
    pub fn tick(&self, store: &mut StateStore, now_ms: u32) {
        let dt_s = now_ms.wrapping_sub(store.last_update_ms()) as f32 / 1000.0;
        self.advance(store, dt_s, now_ms);
    }

    /// Run one tick with an explicit time step
    pub fn advance(&self, store: &mut StateStore, dt_s: f32, now_ms: u32) {
        if !(dt_s > 0.0) || !dt_s.is_finite() {
            return;
        }

        let effective_target = if store.effective_enable() {
            store.set_current_direction(store.target_direction());
            store.target_speed()
        } else {
            0.0
        };

        let current = accelerated_speed(
            store.current_speed(),
            effective_target,
            dt_s,
            self.max_acceleration,
        );
        store.set_current_speed(current);
        store.set_last_update_ms(now_ms);

        // Leaky estimator without physical calibration. Keep the arithmetic.
        let velocity = store.approximate_velocity();
        let speed_change = store.current_speed() - (velocity * 100.0 / MAX_SPEED);
        let velocity = velocity + speed_change * dt_s * VELOCITY_GAIN;
        store.set_approximate_velocity(velocity.max(0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Direction;
    use proptest::prelude::*;

    fn enabled_store(target: f32) -> StateStore {
        let mut store = StateStore::new(0);
        store.set_enabled(true);
        store.set_target_speed(target);
        store
    }

    #[test]
    fn test_curve_full_range_step() {
        // diff = 100 -> curve factor log10(10) = 1 -> full linear cap
        let next = accelerated_speed(0.0, 100.0, 1.0, 5.0);
        assert!((next - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_curve_small_deviation_is_throttled() {
        // diff = 1 -> curve factor log10(1.09) ~= 0.0374 -> ~32.6% of the cap
        let next = accelerated_speed(50.0, 51.0, 0.1, 5.0);
        let expected = 0.5 * (0.3 + 0.7 * log10f(1.09));
        assert!((next - 50.0 - expected).abs() < 1e-4);
        assert!(next - 50.0 >= 0.5 * 0.3);
    }

    #[test]
    fn test_curve_snaps_near_target() {
        assert_eq!(accelerated_speed(99.95, 100.0, 0.05, 5.0), 100.0);
        assert_eq!(accelerated_speed(0.05, 0.0, 0.05, 5.0), 0.0);
    }

    #[test]
    fn test_curve_ignores_non_positive_dt() {
        assert_eq!(accelerated_speed(10.0, 100.0, 0.0, 5.0), 10.0);
        assert_eq!(accelerated_speed(10.0, 100.0, -1.0, 5.0), 10.0);
    }

    #[test]
    fn test_curve_never_passes_small_target() {
        // Cap exceeds the distance, so the step lands on the target
        let next = accelerated_speed(10.0, 10.5, 1.0, 5.0);
        assert_eq!(next, 10.5);
    }

    #[test]
    fn test_curve_decelerates() {
        let next = accelerated_speed(100.0, 0.0, 1.0, 5.0);
        assert!((next - 95.0).abs() < 1e-4);
    }

    #[test]
    fn test_tick_example_from_rest() {
        let controller = MotionController::with_acceleration(5.0);
        let mut store = enabled_store(100.0);

        controller.tick(&mut store, 1000);

        assert!((store.current_speed() - 5.0).abs() < 1e-4);
        assert_eq!(store.last_update_ms(), 1000);
    }

    #[test]
    fn test_tick_without_elapsed_time_is_noop() {
        let controller = MotionController::new();
        let mut store = enabled_store(100.0);
        store.set_last_update_ms(500);

        controller.tick(&mut store, 500);

        assert_eq!(store.current_speed(), 0.0);
        assert_eq!(store.approximate_velocity(), 0.0);
        assert_eq!(store.last_update_ms(), 500);
    }

    #[test]
    fn test_snap_to_target() {
        let controller = MotionController::new();
        let mut store = enabled_store(100.0);
        store.set_current_speed(99.95);

        controller.advance(&mut store, 0.05, 50);
        assert_eq!(store.current_speed(), 100.0);
        assert_eq!(store.last_update_ms(), 50);
    }

    #[test]
    fn test_direction_adopted_while_enabled() {
        let controller = MotionController::new();
        let mut store = enabled_store(20.0);
        store.set_target_direction(Direction::Reverse);

        controller.advance(&mut store, 0.05, 50);
        assert_eq!(store.current_direction(), Direction::Reverse);
    }

    #[test]
    fn test_direction_frozen_while_disabled() {
        let controller = MotionController::new();
        let mut store = StateStore::new(0);
        store.set_target_direction(Direction::Reverse);

        controller.advance(&mut store, 0.05, 50);
        assert_eq!(store.current_direction(), Direction::Forward);

        store.set_enabled(true);
        store.set_emergency_stop(true);
        controller.advance(&mut store, 0.05, 100);
        assert_eq!(store.current_direction(), Direction::Forward);
    }

    #[test]
    fn test_emergency_stop_ramps_down() {
        let controller = MotionController::new();
        let mut store = enabled_store(80.0);
        store.set_current_speed(80.0);

        store.set_emergency_stop(true);
        controller.advance(&mut store, 0.05, 50);

        // Not an instantaneous drop
        assert!(store.current_speed() < 80.0);
        assert!(store.current_speed() > 79.0);
    }

    #[test]
    fn test_disabled_ramps_toward_zero_even_with_target() {
        let controller = MotionController::new();
        let mut store = enabled_store(60.0);
        store.set_current_speed(60.0);
        store.set_enabled(false);
        // Transport wrote a target while disabled
        store.set_target_speed(60.0);

        controller.advance(&mut store, 1.0, 1000);
        assert!(store.current_speed() < 60.0);
    }

    #[test]
    fn test_velocity_estimate() {
        let controller = MotionController::new();
        let mut store = enabled_store(100.0);
        store.set_current_speed(50.0);

        controller.advance(&mut store, 1.0, 1000);

        // current ~= 50 + 5 * (0.3 + 0.7 * log10(5.5)); velocity = current * 1.0 * 0.01
        let current = store.current_speed();
        assert!((store.approximate_velocity() - current * 0.01).abs() < 1e-5);
    }

    #[test]
    fn test_velocity_never_negative() {
        let controller = MotionController::new();
        let mut store = StateStore::new(0);
        store.set_approximate_velocity(0.001);

        // current is 0, so the estimator pulls velocity down
        controller.advance(&mut store, 500.0, 500_000);
        assert_eq!(store.approximate_velocity(), 0.0);
    }

    #[test]
    fn test_tick_handles_timer_wrap() {
        let controller = MotionController::with_acceleration(5.0);
        let mut store = enabled_store(100.0);
        store.set_last_update_ms(u32::MAX - 499);

        controller.tick(&mut store, 500);

        // 1000 ms elapsed across the wrap
        assert!((store.current_speed() - 5.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_rate_is_bounded(
            current in 0.0f32..=100.0,
            target in 0.0f32..=100.0,
            dt in 0.001f32..2.0,
            rate in 0.5f32..50.0,
        ) {
            let next = accelerated_speed(current, target, dt, rate);
            let snapped = (target - current).abs() < SNAP_THRESHOLD;
            if !snapped {
                prop_assert!((next - current).abs() <= rate * dt * 1.0001);
            }
        }

        #[test]
        fn prop_never_overshoots(
            current in 0.0f32..=100.0,
            target in 0.0f32..=100.0,
            dt in 0.001f32..2.0,
        ) {
            let next = accelerated_speed(current, target, dt, DEFAULT_MAX_ACCELERATION);
            let lo = current.min(target);
            let hi = current.max(target);
            prop_assert!(next >= lo - 1e-4 && next <= hi + 1e-4);
        }

        #[test]
        fn prop_speed_stays_in_range(
            target in -50.0f32..150.0,
            steps in proptest::collection::vec(1u32..5000, 1..50),
        ) {
            let controller = MotionController::new();
            let mut store = enabled_store(target);
            let mut now = 0u32;
            for step in steps {
                now += step;
                controller.tick(&mut store, now);
                let speed = store.current_speed();
                prop_assert!((0.0..=100.0).contains(&speed));
                prop_assert!(store.approximate_velocity() >= 0.0);
            }
        }

        #[test]
        fn prop_converges_to_target(target in 0.0f32..=100.0, start in 0.0f32..=100.0) {
            let controller = MotionController::new();
            let mut store = enabled_store(target);
            store.set_current_speed(start);

            // 50 ms ticks; the slowest approach is 30% of 5 %/s
            let mut now = 0u32;
            for _ in 0..20_000 {
                now += 50;
                controller.tick(&mut store, now);
                if (store.current_speed() - target).abs() < SNAP_THRESHOLD {
                    break;
                }
            }
            prop_assert!((store.current_speed() - target).abs() < SNAP_THRESHOLD);
        }
    }
}
