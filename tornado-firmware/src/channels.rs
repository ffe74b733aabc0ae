//! Inter-task communication channels
//!
//! Every transport pushes commands into one ordered channel; the control
//! task is its only consumer and drains it once per tick. Status flows back
//! through a published snapshot that any task may read.

use core::cell::Cell;

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use tornado_core::command::SourcedCommand;
use tornado_core::status::StatusSnapshot;

/// Channel capacity for queued transport commands
const COMMAND_CHANNEL_SIZE: usize = 16;

/// Commands from every transport, in arrival order
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, SourcedCommand, COMMAND_CHANNEL_SIZE> = Channel::new();

/// Status after the most recent control tick
pub static LATEST_STATUS: Mutex<CriticalSectionRawMutex, Cell<StatusSnapshot>> =
    Mutex::new(Cell::new(StatusSnapshot::INITIAL));

/// Signal that a serial client asked for status
pub static STATUS_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Queue a command for the next tick, dropping it if the queue is full
pub fn submit(command: SourcedCommand) {
    if COMMAND_CHANNEL.try_send(command).is_err() {
        warn!("Command channel full, dropping {:?}", command);
    }
}

/// Publish the status produced by a tick
pub fn publish_status(status: StatusSnapshot) {
    LATEST_STATUS.lock(|cell| cell.set(status));
}

/// Read the latest published status
pub fn latest_status() -> StatusSnapshot {
    LATEST_STATUS.lock(|cell| cell.get())
}
