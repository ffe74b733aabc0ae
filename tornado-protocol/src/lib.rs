//! Space Tornado text protocol
//!
//! Every text transport (wired serial, BLE GATT writes, classic
//! serial-over-radio) speaks a variant of the same single-character
//! command language and reports status as a short text line.
//!
//! # Commands
//!
//! ```text
//! +  -     speed up / down by the configured increment
//! D  R     forward / reverse
//! F        fire
//! X        emergency stop
//! ?        status
//! S<n>     set speed (BLE)
//! C        clear emergency stop (BLE)
//! ```
//!
//! Parsing produces [`tornado_core::command::Command`]s; the control loop
//! decides whether they take effect.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod status;

pub use command::{
    parse_byte, parse_message, Dialect, LineBuffer, Request, SerialDecoder, SERIAL_COMMAND_TIMEOUT_MS,
};
pub use status::{StatusLine, STATUS_LINE_LEN};
