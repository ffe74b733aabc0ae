//! Physical control mapping
//!
//! Turns one raw sample of the front-panel controls into commands. The
//! buttons and the enable switch are wired with pull-ups, so a pressed
//! button or a closed switch reads low.

use heapless::Vec;

use crate::command::Command;
use crate::state::{StateStore, MAX_SPEED};

/// Maximum commands produced by one sample
pub const MAX_PHYSICAL_COMMANDS: usize = 4;

/// One reading of every physical control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSample {
    /// Raw speed pot reading
    pub speed_pot: u16,
    /// Direction button held
    pub direction_pressed: bool,
    /// Fire button held
    pub fire_pressed: bool,
    /// Enable switch closed
    pub enable_on: bool,
}

impl InputSample {
    /// Build a sample from raw pin levels (active low)
    pub fn from_levels(speed_pot: u16, direction_high: bool, fire_high: bool, enable_high: bool) -> Self {
        Self {
            speed_pot,
            direction_pressed: !direction_high,
            fire_pressed: !fire_high,
            enable_on: !enable_high,
        }
    }
}

/// Debounced front-panel controls
#[derive(Debug, Clone)]
pub struct PhysicalInputs {
    enable: super::Debouncer,
    direction: super::Debouncer,
    fire: super::Debouncer,
    adc_max: u16,
    primed: bool,
}

impl PhysicalInputs {
    pub fn new(debounce_ms: u32, adc_max: u16) -> Self {
        Self {
            enable: super::Debouncer::new(false, debounce_ms),
            direction: super::Debouncer::new(false, debounce_ms),
            fire: super::Debouncer::new(false, debounce_ms),
            adc_max,
            primed: false,
        }
    }

    /// Convert a raw pot reading to a speed percentage
    pub fn pot_to_speed(&self, raw: u16) -> f32 {
        if self.adc_max == 0 {
            return 0.0;
        }
        raw as f32 / self.adc_max as f32 * MAX_SPEED
    }

    /// Map one sample to commands, in application order
    ///
    /// Gating follows the enable state the commands will produce, so a
    /// switch change in this sample already applies to the pot and the
    /// fire button.
    pub fn sample(
        &mut self,
        sample: InputSample,
        now_ms: u32,
        store: &StateStore,
    ) -> Vec<Command, MAX_PHYSICAL_COMMANDS> {
        let mut commands = Vec::new();
        let mut enabled = store.is_enabled();

        // First sample adopts every control's current position, so a
        // button held at power-on is not a press
        if !self.primed {
            self.primed = true;
            self.enable.reset(sample.enable_on);
            self.direction.reset(sample.direction_pressed);
            self.fire.reset(sample.fire_pressed);
            enabled = sample.enable_on;
            let _ = commands.push(Command::SetEnabled(enabled));
        } else if let Some(on) = self.enable.update(sample.enable_on, now_ms) {
            enabled = on;
            let _ = commands.push(Command::SetEnabled(on));
        }

        let active = enabled && !store.is_emergency_stop();

        if active {
            let _ = commands.push(Command::SetTargetSpeed(self.pot_to_speed(sample.speed_pot)));
        }

        if self.direction.update(sample.direction_pressed, now_ms) == Some(true) {
            let _ = commands.push(Command::ToggleDirection);
        }

        let fire_edge = self.fire.update(sample.fire_pressed, now_ms);
        if active {
            if let Some(pressed) = fire_edge {
                let _ = commands.push(Command::SetFiring(pressed));
            }
        } else if store.is_firing_thrusters() {
            let _ = commands.push(Command::SetFiring(false));
        }

        commands
    }
}
