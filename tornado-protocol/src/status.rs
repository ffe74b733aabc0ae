//! Status line formatting
//!
//! Each transport reports status in its own text shape. All of them render
//! from the same [`StatusSnapshot`].

use core::fmt::{self, Write};

use heapless::String;
use tornado_core::status::StatusSnapshot;
use tornado_core::traits::Direction;

/// Capacity of a formatted status line
pub const STATUS_LINE_LEN: usize = 128;

/// A formatted status line
pub type StatusLine = String<STATUS_LINE_LEN>;

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}

fn long_direction(direction: Direction) -> &'static str {
    match direction {
        Direction::Forward => "FORWARD",
        Direction::Reverse => "REVERSE",
    }
}

fn short_direction(direction: Direction) -> &'static str {
    match direction {
        Direction::Forward => "FWD",
        Direction::Reverse => "REV",
    }
}

/// Compact notify form: `S:50.0,T:60.0,D:1,E:1,F:0`
pub fn write_compact<W: Write>(w: &mut W, status: &StatusSnapshot) -> fmt::Result {
    write!(
        w,
        "S:{:.1},T:{:.1},D:{},E:{},F:{}",
        status.current_speed,
        status.target_speed,
        status.current_direction.is_forward() as u8,
        status.enabled as u8,
        status.firing as u8,
    )
}

/// Serial periodic report
pub fn write_report<W: Write>(w: &mut W, status: &StatusSnapshot) -> fmt::Result {
    write!(
        w,
        "Status - Speed: {:.1}%/{:.1}% (target/current), Dir: {}, Velocity: {:.2}, Enabled: {}, Firing: {}",
        status.target_speed,
        status.current_speed,
        long_direction(status.current_direction),
        status.approximate_velocity,
        yes_no(status.enabled),
        yes_no(status.firing),
    )
}

/// Classic radio reply to `?`
pub fn write_query_reply<W: Write>(w: &mut W, status: &StatusSnapshot) -> fmt::Result {
    write!(
        w,
        "Speed: {:.1}%/{:.1}%, Dir: {}, En: {}, Fire: {}",
        status.target_speed,
        status.current_speed,
        short_direction(status.current_direction),
        yes_no(status.enabled),
        yes_no(status.firing),
    )
}

/// Classic radio periodic heartbeat, prefixed with uptime in seconds
pub fn write_heartbeat<W: Write>(w: &mut W, status: &StatusSnapshot, uptime_s: u32) -> fmt::Result {
    write!(
        w,
        "[{}s] Speed: {:.1}%, Dir: {}, En: {}",
        uptime_s,
        status.current_speed,
        short_direction(status.current_direction),
        yes_no(status.enabled),
    )
}

/// Render into a fresh line, truncating on overflow
pub fn format_line<F>(render: F) -> StatusLine
where
    F: FnOnce(&mut StatusLine) -> fmt::Result,
{
    let mut line = StatusLine::new();
    // Overflow leaves a truncated line
    let _ = render(&mut line);
    line
}
