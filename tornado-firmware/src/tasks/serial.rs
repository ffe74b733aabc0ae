//! Serial terminal tasks
//!
//! RX parses single-character commands and queues them for the control
//! task. TX prints the periodic status report and answers `?`.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embassy_time::{with_timeout, Duration, Instant, Timer};
use embedded_io_async::{Read, Write};

use tornado_core::command::SourcedCommand;
use tornado_protocol::command::{Dialect, Request, SerialDecoder};
use tornado_protocol::status::{format_line, write_report};

use crate::channels::{latest_status, submit, STATUS_REQUEST};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// How often the RX task wakes without input to expire the line buffer
const RX_POLL_MS: u64 = 250;

/// Serial RX task - turns received bytes into commands
#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx, speed_increment: f32) {
    info!("Serial RX task started");

    let mut decoder = SerialDecoder::new(Dialect::Serial, speed_increment);
    let source = decoder.dialect().source();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match with_timeout(Duration::from_millis(RX_POLL_MS), rx.read(&mut buf)).await {
            Ok(Ok(n)) => {
                trace!("RX: {} bytes", n);
                let now = now_ms();
                for &byte in &buf[..n] {
                    match decoder.feed(byte, now) {
                        Some(Request::Command(command)) => submit(SourcedCommand::new(source, command)),
                        Some(Request::Status) => STATUS_REQUEST.signal(()),
                        None => {}
                    }
                }
            }
            Ok(Err(e)) => {
                warn!("UART read error: {:?}", e);
            }
            Err(_) => {
                // Quiet line
            }
        }

        if decoder.poll(now_ms()) {
            debug!("Discarded stale serial input");
        }
    }
}

/// Serial TX task - periodic status report and replies to `?`
#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx, status_interval_ms: u32) {
    info!("Serial TX task started");

    let interval = Duration::from_millis(status_interval_ms as u64);

    loop {
        match select(Timer::after(interval), STATUS_REQUEST.wait()).await {
            Either::First(()) => trace!("Periodic status"),
            Either::Second(()) => debug!("Status requested"),
        }

        let status = latest_status();
        let line = format_line(|w| write_report(w, &status));

        if let Err(e) = write_line(&mut tx, line.as_bytes()).await {
            warn!("Failed to send status: {:?}", e);
        }
    }
}

async fn write_line(tx: &mut BufferedUartTx, line: &[u8]) -> Result<(), embassy_rp::uart::Error> {
    tx.write_all(line).await?;
    tx.write_all(b"\r\n").await
}

fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}
