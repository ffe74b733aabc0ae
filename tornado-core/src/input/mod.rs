//! Physical inputs
//!
//! Debounced front-panel controls: speed pot, direction button, fire
//! button and enable switch.

pub mod debounce;
pub mod physical;

pub use debounce::{DebounceState, Debouncer};
pub use physical::{InputSample, PhysicalInputs, MAX_PHYSICAL_COMMANDS};
