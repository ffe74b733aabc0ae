//! Control task
//!
//! Runs the control loop at a fixed period: sample the front panel, drain
//! queued transport commands, advance the motion controller, then write
//! every actuator line from the interlock outputs.

use defmt::*;
use embassy_rp::adc::{self, Adc};
use embassy_rp::gpio::{Input, Output};
use embassy_rp::pwm::PwmOutput;
use embassy_time::{Duration, Instant, Ticker};

use tornado_core::config::ControlConfig;
use tornado_core::control::{ControlLoop, Transitions};
use tornado_core::input::InputSample;
use tornado_core::traits::{ExhaustActuator, MotorActuator};
use tornado_drivers::{Exhaust, PwmMotor};

use crate::channels::{publish_status, COMMAND_CHANNEL};

/// Motor board on one PWM channel and three GPIO lines
pub type Motor = PwmMotor<PwmOutput<'static>, Output<'static>, Output<'static>, Output<'static>>;

/// Solenoid and igniter on two GPIO lines
pub type ExhaustPair = Exhaust<Output<'static>, Output<'static>>;

/// Everything the control task drives or reads
pub struct ControlHardware {
    pub motor: Motor,
    pub exhaust: ExhaustPair,
    pub adc: Adc<'static, adc::Async>,
    pub speed_pot: adc::Channel<'static>,
    pub direction_button: Input<'static>,
    pub fire_button: Input<'static>,
    pub enable_switch: Input<'static>,
}

impl ControlHardware {
    /// Read every front-panel control once
    ///
    /// A failed ADC conversion repeats the previous pot reading.
    async fn sample(&mut self, last_pot: u16) -> InputSample {
        let speed_pot = match self.adc.read(&mut self.speed_pot).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Speed pot read failed: {:?}", e);
                last_pot
            }
        };

        InputSample::from_levels(
            speed_pot,
            self.direction_button.is_high(),
            self.fire_button.is_high(),
            self.enable_switch.is_high(),
        )
    }
}

/// Control task - sole owner of the control state
#[embassy_executor::task]
pub async fn control_task(mut hw: ControlHardware, config: ControlConfig) {
    info!("Control task started ({}ms tick)", config.tick_interval_ms);

    let mut control = ControlLoop::new(config, now_ms());
    let mut ticker = Ticker::every(Duration::from_millis(config.tick_interval_ms as u64));
    let mut last_pot: u16 = 0;

    loop {
        ticker.next().await;

        let sample = hw.sample(last_pot).await;
        last_pot = sample.speed_pot;
        trace!("Sample: {:?}", sample);

        let queued = core::iter::from_fn(|| COMMAND_CHANNEL.try_receive().ok()).inspect(|command| {
            if command.command.is_safety() {
                info!("Safety command from {:?}: {:?}", command.source, command.command);
            } else {
                debug!("Command from {:?}: {:?}", command.source, command.command);
            }
        });

        let report = control.tick(now_ms(), Some(sample), queued);

        if report.ignored > 0 {
            debug!("{} command(s) ignored while disabled", report.ignored);
        }
        log_transitions(&report.transitions);

        // Both are written every tick even if one fails
        if let Err(e) = hw.motor.apply(&report.outputs.motor) {
            error!("Motor output failed: {:?}", e);
        }
        if let Err(e) = hw.exhaust.apply(&report.outputs.exhaust) {
            error!("Exhaust output failed: {:?}", e);
        }

        publish_status(report.status);
    }
}

fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

fn log_transitions(transitions: &Transitions) {
    match transitions.emergency_stop {
        Some(true) => warn!("EMERGENCY STOP"),
        Some(false) => info!("Emergency stop cleared"),
        None => {}
    }
    match transitions.enabled {
        Some(true) => info!("Enabled"),
        Some(false) => warn!("Disabled"),
        None => {}
    }
    match transitions.firing {
        Some(true) => info!("Thrusters firing"),
        Some(false) => info!("Thrusters stopped"),
        None => {}
    }
}
