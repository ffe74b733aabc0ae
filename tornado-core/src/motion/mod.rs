//! Motion control
//!
//! Rate-limited, curve-shaped speed ramping toward the effective target.

pub mod controller;

pub use controller::{
    accelerated_speed, MotionController, DEFAULT_MAX_ACCELERATION, SNAP_THRESHOLD,
};
