//! Control state
//!
//! The single mutable control-state record and its clamped setters.
//! Every transport writes through the store; the motion controller is the
//! only writer of the applied speed, direction and velocity estimate.

pub mod store;

pub use store::{ControlState, SpeedUpdate, StateStore, MAX_SPEED, MIN_SPEED};
