//! Configuration type definitions
//!
//! `ControlConfig` holds every tunable constant of the control loop. It is
//! stored in flash as postcard-serialized binary data, with TOML as the
//! human-editable source.

use crate::motion::DEFAULT_MAX_ACCELERATION;
use crate::safety::DEFAULT_PWM_MAX;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default `+`/`-` speed step (percentage points)
pub const DEFAULT_SPEED_INCREMENT: f32 = 10.0;

/// Default button and switch debounce time (ms)
pub const DEFAULT_DEBOUNCE_MS: u32 = 50;

/// Default control loop period (ms)
pub const DEFAULT_TICK_INTERVAL_MS: u32 = 10;

/// Default speed pot full-scale reading (12-bit ADC)
pub const DEFAULT_ADC_MAX: u16 = 4095;

/// Default period of the serial status report (ms)
pub const DEFAULT_STATUS_INTERVAL_MS: u32 = 2000;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Acceleration must be finite and positive
    InvalidAcceleration,
    /// PWM full scale must be non-zero
    InvalidPwmMax,
    /// ADC full scale must be non-zero
    InvalidAdcMax,
    /// Tick interval must be non-zero
    InvalidTickInterval,
    /// Speed increment must be finite and positive
    InvalidSpeedIncrement,
}

/// Control loop configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControlConfig {
    /// Speed ramp rate (percentage points per second)
    pub max_acceleration: f32,
    /// Duty value at 100% speed
    pub pwm_max: u16,
    /// Step applied by the `+`/`-` text commands
    pub speed_increment: f32,
    /// Time a button or switch must hold a level before it counts
    pub debounce_ms: u32,
    /// Control loop period
    pub tick_interval_ms: u32,
    /// Speed pot reading at full travel
    pub adc_max: u16,
    /// Serial periodic status report interval
    pub status_interval_ms: u32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            max_acceleration: DEFAULT_MAX_ACCELERATION,
            pwm_max: DEFAULT_PWM_MAX,
            speed_increment: DEFAULT_SPEED_INCREMENT,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            adc_max: DEFAULT_ADC_MAX,
            status_interval_ms: DEFAULT_STATUS_INTERVAL_MS,
        }
    }
}

impl ControlConfig {
    /// Check every field is usable by the control loop
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.max_acceleration.is_finite() || self.max_acceleration <= 0.0 {
            return Err(ConfigError::InvalidAcceleration);
        }
        if self.pwm_max == 0 {
            return Err(ConfigError::InvalidPwmMax);
        }
        if !self.speed_increment.is_finite() || self.speed_increment <= 0.0 {
            return Err(ConfigError::InvalidSpeedIncrement);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidTickInterval);
        }
        if self.adc_max == 0 {
            return Err(ConfigError::InvalidAdcMax);
        }
        Ok(())
    }

    /// Control loop period in seconds
    pub fn tick_interval_s(&self) -> f32 {
        self.tick_interval_ms as f32 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ControlConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.max_acceleration, 5.0);
        assert_eq!(config.pwm_max, 255);
        assert_eq!(config.adc_max, 4095);
    }

    #[test]
    fn test_rejects_bad_acceleration() {
        for accel in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = ControlConfig {
                max_acceleration: accel,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::InvalidAcceleration));
        }
    }

    #[test]
    fn test_rejects_zero_scales() {
        let config = ControlConfig {
            pwm_max: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidPwmMax));

        let config = ControlConfig {
            adc_max: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidAdcMax));

        let config = ControlConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidTickInterval));

        let config = ControlConfig {
            speed_increment: -10.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidSpeedIncrement));
    }

    #[test]
    fn test_tick_interval_seconds() {
        let config = ControlConfig::default();
        assert!((config.tick_interval_s() - 0.01).abs() < 1e-6);
    }
}
