//! Control loop
//!
//! One tick: physical inputs, then queued transport commands in arrival
//! order, then the motion controller, then the safety interlock. The loop
//! is the only owner of the state store, so no locking is needed.

use crate::command::{apply, Outcome, SourcedCommand};
use crate::config::ControlConfig;
use crate::input::{InputSample, PhysicalInputs};
use crate::motion::MotionController;
use crate::safety::ActuationOutputs;
use crate::state::{ControlState, StateStore};
use crate::status::StatusSnapshot;

/// Safety flag changes observed during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transitions {
    /// New operator enable value, if it changed
    pub enabled: Option<bool>,
    /// New emergency stop value, if it changed
    pub emergency_stop: Option<bool>,
    /// New exhaust request value, if it changed
    pub firing: Option<bool>,
}

impl Transitions {
    fn between(before: &ControlState, after: &ControlState) -> Self {
        let changed = |old: bool, new: bool| (old != new).then_some(new);
        Self {
            enabled: changed(before.enabled, after.enabled),
            emergency_stop: changed(before.emergency_stop, after.emergency_stop),
            firing: changed(before.firing_thrusters, after.firing_thrusters),
        }
    }

    /// Check if nothing changed
    pub fn is_empty(&self) -> bool {
        self.enabled.is_none() && self.emergency_stop.is_none() && self.firing.is_none()
    }
}

/// Result of one control tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Outputs to write to the actuators
    pub outputs: ActuationOutputs,
    /// State after the tick
    pub status: StatusSnapshot,
    /// Safety flag changes made by this tick's commands
    pub transitions: Transitions,
    /// Queued commands applied, whatever their source
    ///
    /// Commands produced by `sample` are not counted.
    pub applied: u8,
    /// Queued commands ignored (gated by enable)
    pub ignored: u8,
}

/// The command arbiter and control loop
#[derive(Debug, Clone)]
pub struct ControlLoop {
    store: StateStore,
    motion: MotionController,
    inputs: PhysicalInputs,
    config: ControlConfig,
}

impl ControlLoop {
    /// Create a loop at startup time `now_ms`
    pub fn new(config: ControlConfig, now_ms: u32) -> Self {
        Self {
            store: StateStore::new(now_ms),
            motion: MotionController::with_acceleration(config.max_acceleration),
            inputs: PhysicalInputs::new(config.debounce_ms, config.adc_max),
            config,
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    /// Current status without running a tick
    pub fn status(&self) -> StatusSnapshot {
        StatusSnapshot::from(&self.store.snapshot())
    }

    /// Apply a single command outside a tick
    ///
    /// Takes effect on the actuators at the next tick's interlock evaluation.
    pub fn apply(&mut self, command: SourcedCommand) -> Outcome {
        apply(&mut self.store, command.command)
    }

    /// Run one control tick
    ///
    /// `sample` is `None` when the board has no physical controls.
    pub fn tick<I>(&mut self, now_ms: u32, sample: Option<InputSample>, commands: I) -> TickReport
    where
        I: IntoIterator<Item = SourcedCommand>,
    {
        let before = self.store.snapshot();

        if let Some(sample) = sample {
            for command in self.inputs.sample(sample, now_ms, &self.store) {
                apply(&mut self.store, command);
            }
        }

        let mut applied: u8 = 0;
        let mut ignored: u8 = 0;
        for command in commands {
            match self.apply(command) {
                Outcome::Ignored(_) => ignored = ignored.saturating_add(1),
                _ => applied = applied.saturating_add(1),
            }
        }

        self.motion.tick(&mut self.store, now_ms);

        let state = self.store.snapshot();
        TickReport {
            outputs: ActuationOutputs::evaluate(&state, self.config.pwm_max),
            status: StatusSnapshot::from(&state),
            transitions: Transitions::between(&before, &state),
            applied,
            ignored,
        }
    }
}
