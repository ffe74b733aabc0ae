//! Motor PWM configuration
//!
//! The motor board takes a PWM speed input. The slice counter wraps at
//! `pwm_max`, so a duty value from the interlock maps one-to-one onto
//! the compare register.

use embassy_rp::pwm::Config;

/// System clock after `embassy_rp::init` with the default config
pub const SYS_CLOCK_HZ: u32 = 125_000_000;

/// Motor PWM frequency
pub const MOTOR_PWM_FREQUENCY_HZ: u32 = 5_000;

/// Integer clock divider for a given wrap value and frequency
///
/// Clamped to the 8-bit integer range of the divider register.
pub fn clock_divider(top: u16, frequency_hz: u32) -> u8 {
    let period = (top as u32 + 1).saturating_mul(frequency_hz.max(1));
    let divider = SYS_CLOCK_HZ / period.max(1);
    divider.clamp(1, u8::MAX as u32) as u8
}

/// Slice configuration for the motor speed output, starting at zero duty
pub fn motor_pwm_config(pwm_max: u16) -> Config {
    let mut config = Config::default();
    config.top = pwm_max;
    config.divider = clock_divider(pwm_max, MOTOR_PWM_FREQUENCY_HZ).into();
    config.compare_a = 0;
    config.compare_b = 0;
    config
}
