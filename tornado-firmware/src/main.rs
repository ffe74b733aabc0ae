//! Space Tornado - Motion Control Firmware
//!
//! Firmware binary for the RP2040 motion controller. One control task owns
//! the control state and the actuators; transports feed it commands over a
//! channel and read back the published status.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::{DMA_CH0, FLASH, UART0};
use embassy_rp::pwm::Pwm;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use embassy_rp::Peri;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tornado_core::config::ControlConfig;
use tornado_drivers::{Exhaust, PwmMotor, PwmMotorConfig};
use tornado_hal_rp2040::flash::Rp2040FlashStorage;
use tornado_hal_rp2040::pwm::motor_pwm_config;

use crate::config::{log_config_summary, parse_config, ConfigPersistence, ConfigSource};
use crate::tasks::ControlHardware;

/// Embedded default configuration (compiled into firmware)
/// Edit tornado.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../tornado.toml");

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Space Tornado firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let (config, source) = load_config(p.FLASH, p.DMA_CH0).await;
    log_config_summary(&config, source);

    // Motor board: PWM on GPIO8 (slice 4 A), direction GPIO10, stop GPIO11,
    // enable GPIO12 (active low). Lines start in the safe state.
    let pwm = Pwm::new_output_a(p.PWM_SLICE4, p.PIN_8, motor_pwm_config(config.pwm_max));
    let (motor_pwm, _) = pwm.split();
    let motor = unwrap!(PwmMotor::new(
        unwrap!(motor_pwm),
        Output::new(p.PIN_10, Level::High),
        Output::new(p.PIN_12, Level::High),
        Output::new(p.PIN_11, Level::High),
        PwmMotorConfig::default(),
    ));

    // Exhaust: solenoid GPIO14, igniter GPIO15
    let exhaust = unwrap!(Exhaust::new(
        Output::new(p.PIN_14, Level::Low),
        Output::new(p.PIN_15, Level::Low),
    ));

    info!("Actuators initialized (safe state)");

    // Front panel: pot on ADC0 (GPIO26), buttons and switch pulled up
    let hw = ControlHardware {
        motor,
        exhaust,
        adc: Adc::new(p.ADC, Irqs, adc::Config::default()),
        speed_pot: adc::Channel::new_pin(p.PIN_26, Pull::None),
        direction_button: Input::new(p.PIN_2, Pull::Up),
        fire_button: Input::new(p.PIN_3, Pull::Up),
        enable_switch: Input::new(p.PIN_4, Pull::Up),
    };

    // Serial terminal on UART0 (GPIO0 TX, GPIO1 RX), 115200 baud default
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();

    info!("UART initialized for serial commands");

    spawner.spawn(tasks::control_task(hw, config)).unwrap();
    spawner
        .spawn(tasks::serial_rx_task(rx, config.speed_increment))
        .unwrap();
    spawner
        .spawn(tasks::serial_tx_task(tx, config.status_interval_ms))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Load configuration
///
/// Flash (binary, then TOML), then the embedded TOML, then built-in
/// defaults.
async fn load_config(flash: Peri<'static, FLASH>, dma: Peri<'static, DMA_CH0>) -> (ControlConfig, ConfigSource) {
    let mut persistence = ConfigPersistence::new(Rp2040FlashStorage::new(flash, dma));

    match persistence.load().await {
        Ok(loaded) => return loaded,
        Err(e) => info!("No valid configuration in flash ({:?}), using embedded defaults", e),
    }

    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => (config, ConfigSource::Embedded),
        Err(e) => {
            // Only reachable if tornado.toml is broken; build.rs checks it
            error!("Failed to parse embedded config: {:?}", e);
            (ControlConfig::default(), ConfigSource::Default)
        }
    }
}
