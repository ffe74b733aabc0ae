//! Embassy async tasks
//!
//! The control task owns the control state and the actuators. The serial
//! tasks only exchange commands and status with it through channels.

pub mod control;
pub mod serial;

pub use control::{control_task, ControlHardware};
pub use serial::{serial_rx_task, serial_tx_task};
