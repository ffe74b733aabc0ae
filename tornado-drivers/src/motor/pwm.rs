//! PWM motor controller driver
//!
//! Drives a motor controller board that takes a PWM speed input and three
//! digital lines. Every `apply` rewrites every line from the given outputs;
//! nothing is compared against what was written before.
//!
//! ```ignore
//! let mut motor = PwmMotor::new(pwm, dir, enable, stop, PwmMotorConfig::default())?;
//!
//! // Each control tick:
//! motor.apply(&report.outputs.motor)?;
//! ```

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use tornado_core::safety::MotorOutputs;
use tornado_core::traits::{ActuatorError, Direction, MotorActuator};

use crate::line::{Line, Polarity};

/// Line polarities of the motor controller board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmMotorConfig {
    /// Level meaning forward on the direction line
    pub direction: Polarity,
    pub enable: Polarity,
    pub stop: Polarity,
}

impl Default for PwmMotorConfig {
    /// Direction high = forward, enable active low, stop active high
    fn default() -> Self {
        Self {
            direction: Polarity::ActiveHigh,
            enable: Polarity::ActiveLow,
            stop: Polarity::ActiveHigh,
        }
    }
}

/// PWM motor controller
pub struct PwmMotor<Pwm, Dir, En, Stop> {
    pwm: Pwm,
    direction: Line<Dir>,
    enable: Line<En>,
    stop: Line<Stop>,
    duty: u16,
}

impl<Pwm, Dir, En, Stop> PwmMotor<Pwm, Dir, En, Stop>
where
    Pwm: SetDutyCycle,
    Dir: OutputPin,
    En: OutputPin,
    Stop: OutputPin,
{
    /// Take ownership of the lines and force the safe state
    ///
    /// The direction line starts at forward.
    pub fn new(pwm: Pwm, direction: Dir, enable: En, stop: Stop, config: PwmMotorConfig) -> Result<Self, ActuatorError> {
        let mut direction = Line::new(direction, config.direction)?;
        direction.set(true)?;

        let mut motor = Self {
            pwm,
            direction,
            enable: Line::new(enable, config.enable)?,
            stop: Line::new(stop, config.stop)?,
            duty: 0,
        };
        motor.force_safe()?;
        Ok(motor)
    }

    /// Last duty written
    pub fn duty(&self) -> u16 {
        self.duty
    }

    /// Direction line state
    pub fn direction(&self) -> Direction {
        Direction::from(self.direction.is_asserted())
    }

    pub fn is_enabled(&self) -> bool {
        self.enable.is_asserted()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_asserted()
    }
}

impl<Pwm, Dir, En, Stop> MotorActuator for PwmMotor<Pwm, Dir, En, Stop>
where
    Pwm: SetDutyCycle,
    Dir: OutputPin,
    En: OutputPin,
    Stop: OutputPin,
{
    fn apply(&mut self, outputs: &MotorOutputs) -> Result<(), ActuatorError> {
        // Stop first, duty last
        self.stop.set(outputs.stop)?;
        self.enable.set(outputs.enable)?;
        if let Some(direction) = outputs.direction {
            self.direction.set(direction.is_forward())?;
        }

        let duty = outputs.duty.min(self.pwm.max_duty_cycle());
        self.pwm.set_duty_cycle(duty).map_err(|_| ActuatorError::Pwm)?;
        self.duty = duty;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::mock::{MockPin, MockPwm};
    use proptest::prelude::*;
    use tornado_core::safety::DEFAULT_PWM_MAX;

    type TestMotor = PwmMotor<MockPwm, MockPin, MockPin, MockPin>;

    fn motor() -> TestMotor {
        PwmMotor::new(
            MockPwm::new(DEFAULT_PWM_MAX),
            MockPin::default(),
            MockPin::default(),
            MockPin::default(),
            PwmMotorConfig::default(),
        )
        .unwrap()
    }

    fn running(duty: u16, direction: Direction) -> MotorOutputs {
        MotorOutputs {
            stop: false,
            enable: true,
            direction: Some(direction),
            duty,
        }
    }

    #[test]
    fn test_starts_safe() {
        let motor = motor();
        assert!(motor.is_stopped());
        assert!(!motor.is_enabled());
        assert_eq!(motor.duty(), 0);
        assert_eq!(motor.pwm.duty, 0);

        // Enable is active low, so released means high
        assert!(motor.enable.into_inner().high.get());
    }

    #[test]
    fn test_running_levels() {
        let mut motor = motor();
        motor.apply(&running(128, Direction::Reverse)).unwrap();

        assert_eq!(motor.pwm.duty, 128);
        assert!(motor.is_enabled());
        assert!(!motor.is_stopped());
        assert_eq!(motor.direction(), Direction::Reverse);

        let PwmMotor {
            direction, enable, stop, ..
        } = motor;
        assert!(!direction.into_inner().high.get());
        assert!(!enable.into_inner().high.get());
        assert!(!stop.into_inner().high.get());
    }

    #[test]
    fn test_safe_leaves_direction() {
        let mut motor = motor();
        motor.apply(&running(200, Direction::Reverse)).unwrap();
        motor.apply(&MotorOutputs::SAFE).unwrap();

        assert_eq!(motor.direction(), Direction::Reverse);
        assert_eq!(motor.pwm.duty, 0);
        assert!(motor.is_stopped());
        assert!(!motor.is_enabled());
    }

    #[test]
    fn test_duty_clamped_to_channel() {
        let mut motor = motor();
        motor.apply(&running(1000, Direction::Forward)).unwrap();
        assert_eq!(motor.duty(), DEFAULT_PWM_MAX);
    }

    #[test]
    fn test_rewrites_unchanged_outputs() {
        let mut motor = motor();
        let outputs = running(50, Direction::Forward);
        motor.apply(&outputs).unwrap();
        let before = motor.stop.is_asserted();
        motor.apply(&outputs).unwrap();
        assert_eq!(motor.stop.is_asserted(), before);

        let PwmMotor { stop, .. } = motor;
        // Construction, force_safe, and two applies
        assert_eq!(stop.into_inner().writes.get(), 4);
    }

    #[test]
    fn test_pin_failure_propagates() {
        let result = PwmMotor::new(
            MockPwm::new(DEFAULT_PWM_MAX),
            MockPin::default(),
            MockPin::default(),
            MockPin::failing(),
            PwmMotorConfig::default(),
        );
        assert!(matches!(result, Err(ActuatorError::Pin)));
    }

    fn line_writes(motor: &TestMotor) -> (u32, u32, u32) {
        (
            motor.stop.pin().writes.get(),
            motor.enable.pin().writes.get(),
            motor.direction.pin().writes.get(),
        )
    }

    fn arb_outputs() -> impl Strategy<Value = MotorOutputs> {
        (
            any::<bool>(),
            any::<bool>(),
            prop::option::of(prop_oneof![Just(Direction::Forward), Just(Direction::Reverse)]),
            any::<u16>(),
        )
            .prop_map(|(stop, enable, direction, duty)| MotorOutputs {
                stop,
                enable,
                direction,
                duty,
            })
    }

    proptest! {
        #[test]
        fn prop_duty_within_channel(pwm_max in 1u16..=4096, sequence in prop::collection::vec(arb_outputs(), 1..20)) {
            let mut motor = PwmMotor::new(
                MockPwm::new(pwm_max),
                MockPin::default(),
                MockPin::default(),
                MockPin::default(),
                PwmMotorConfig::default(),
            )
            .unwrap();

            for outputs in sequence {
                motor.apply(&outputs).unwrap();
                prop_assert!(motor.duty() <= pwm_max);
                prop_assert_eq!(motor.pwm.duty, outputs.duty.min(pwm_max));
            }
        }

        #[test]
        fn prop_every_apply_writes_lines(sequence in prop::collection::vec(arb_outputs(), 1..20)) {
            let mut motor = motor();

            for outputs in sequence {
                let (stop, enable, direction) = line_writes(&motor);
                motor.apply(&outputs).unwrap();

                prop_assert_eq!(motor.is_stopped(), outputs.stop);
                prop_assert_eq!(motor.is_enabled(), outputs.enable);
                prop_assert_eq!(line_writes(&motor).0, stop + 1);
                prop_assert_eq!(line_writes(&motor).1, enable + 1);
                let expected = direction + u32::from(outputs.direction.is_some());
                prop_assert_eq!(line_writes(&motor).2, expected);
            }
        }
    }
}
