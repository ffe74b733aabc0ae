//! Text command parsing
//!
//! Serial and classic radio input is parsed one byte at a time as it
//! arrives. BLE writes arrive as whole messages; the first byte selects the
//! command and the rest carries the argument of `S<n>`.

use heapless::Vec;
use tornado_core::command::{Command, Source};
use tornado_core::traits::Direction;

/// Silence after which the serial line buffer is discarded (ms)
pub const SERIAL_COMMAND_TIMEOUT_MS: u32 = 1000;

/// Serial line buffer capacity
pub const LINE_BUFFER_LEN: usize = 64;

/// Transport command dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dialect {
    /// Wired serial terminal
    Serial,
    /// BLE command characteristic
    Ble,
    /// Classic serial-over-radio
    Classic,
}

impl Dialect {
    /// Command source tag for this dialect
    pub fn source(self) -> Source {
        match self {
            Dialect::Serial => Source::Serial,
            Dialect::Ble => Source::Ble,
            Dialect::Classic => Source::Bluetooth,
        }
    }
}

/// A parsed text request
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Request {
    /// State change for the control loop
    Command(Command),
    /// Status query, answered by the transport from the latest status
    Status,
}

/// Parse a single command byte
///
/// `increment` is the `+`/`-` step. Unknown bytes, line endings and the
/// BLE-only `S` parse to `None`.
pub fn parse_byte(dialect: Dialect, byte: u8, increment: f32) -> Option<Request> {
    let command = match (byte, dialect) {
        (b'+', _) => Command::AdjustTargetSpeed(increment),
        (b'-', _) => Command::AdjustTargetSpeed(-increment),
        (b'D' | b'd', _) => Command::SetDirection(Direction::Forward),
        (b'R' | b'r', _) => Command::SetDirection(Direction::Reverse),
        (b'F', _) => Command::RequestFire,
        (b'f', Dialect::Ble) => Command::SetFiring(false),
        (b'f', _) => Command::RequestFire,
        (b'X' | b'x', _) => Command::SetEmergencyStop(true),
        (b'C' | b'c', Dialect::Ble) => Command::SetEmergencyStop(false),
        (b'?', _) => return Some(Request::Status),
        _ => return None,
    };
    Some(Request::Command(command))
}

/// Parse one whole message
///
/// Used for BLE writes. `S<n>` sets the speed (clamped by the store); a
/// missing or malformed number parses to `None`. Other messages are
/// parsed from their first byte.
pub fn parse_message(dialect: Dialect, message: &[u8], increment: f32) -> Option<Request> {
    let (&first, rest) = message.split_first()?;

    if dialect == Dialect::Ble && matches!(first, b'S' | b's') {
        let text = core::str::from_utf8(rest).ok()?.trim();
        let speed = text.parse::<f32>().ok()?;
        return Some(Request::Command(Command::SetTargetSpeed(speed)));
    }

    parse_byte(dialect, first, increment)
}

/// Printable input that is not a command, kept until the line goes quiet
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    bytes: Vec<u8, LINE_BUFFER_LEN>,
    last_input_ms: u32,
}

impl LineBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            last_input_ms: 0,
        }
    }

    /// Record input activity without storing a byte
    pub fn touch(&mut self, now_ms: u32) {
        self.last_input_ms = now_ms;
    }

    /// Store a printable ASCII byte; anything else is dropped
    pub fn push(&mut self, byte: u8, now_ms: u32) {
        self.last_input_ms = now_ms;
        if (32..127).contains(&byte) {
            // Full buffer drops the byte
            let _ = self.bytes.push(byte);
        }
    }

    /// Discard the contents after `SERIAL_COMMAND_TIMEOUT_MS` of silence
    ///
    /// Returns true if anything was discarded.
    pub fn expire(&mut self, now_ms: u32) -> bool {
        if !self.bytes.is_empty() && now_ms.wrapping_sub(self.last_input_ms) > SERIAL_COMMAND_TIMEOUT_MS {
            self.bytes.clear();
            return true;
        }
        false
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Byte-stream decoder for the serial and classic radio transports
#[derive(Debug, Clone)]
pub struct SerialDecoder {
    dialect: Dialect,
    increment: f32,
    line: LineBuffer,
}

impl SerialDecoder {
    pub const fn new(dialect: Dialect, increment: f32) -> Self {
        Self {
            dialect,
            increment,
            line: LineBuffer::new(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Feed one received byte
    pub fn feed(&mut self, byte: u8, now_ms: u32) -> Option<Request> {
        match parse_byte(self.dialect, byte, self.increment) {
            Some(request) => {
                self.line.touch(now_ms);
                Some(request)
            }
            None if matches!(byte, b'\r' | b'\n') => {
                self.line.touch(now_ms);
                None
            }
            None => {
                self.line.push(byte, now_ms);
                None
            }
        }
    }

    /// Periodic housekeeping; returns true if stale input was dropped
    pub fn poll(&mut self, now_ms: u32) -> bool {
        self.line.expire(now_ms)
    }

    /// Pending non-command input
    pub fn pending(&self) -> &[u8] {
        self.line.as_bytes()
    }
}
