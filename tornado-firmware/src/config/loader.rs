//! Configuration persistence
//!
//! Loads the control configuration from flash storage, trying the binary
//! form first and then the TOML text. The caller falls back to embedded
//! defaults when neither is present or valid.

use core::str;
use defmt::*;

use tornado_core::config::{ConfigError, ControlConfig};
use tornado_hal::flash::{FlashError, FlashStorage, StorageKey, MAX_VALUE_LEN};

use super::toml::{parse_config, ParseError};

/// Configuration loading errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigLoadError {
    /// Flash operation failed
    Flash(FlashError),
    /// Postcard deserialization failed
    Deserialize,
    /// TOML parsing failed
    TomlParse(ParseError),
    /// Invalid UTF-8 in TOML data
    InvalidUtf8,
    /// Stored values rejected by validation
    Invalid(ConfigError),
}

impl From<FlashError> for ConfigLoadError {
    fn from(e: FlashError) -> Self {
        ConfigLoadError::Flash(e)
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigSource {
    FlashBinary,
    FlashToml,
    Embedded,
    Default,
}

/// Configuration persistence manager
pub struct ConfigPersistence<S> {
    storage: S,
}

impl<S: FlashStorage> ConfigPersistence<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load configuration from flash
    ///
    /// Binary postcard form first, then TOML text.
    pub async fn load(&mut self) -> Result<(ControlConfig, ConfigSource), ConfigLoadError> {
        info!("Loading configuration from flash...");

        match self.load_binary().await {
            Ok(config) => return Ok((config, ConfigSource::FlashBinary)),
            Err(ConfigLoadError::Flash(FlashError::NotFound)) => {
                debug!("No binary config found, trying TOML");
            }
            Err(e) => {
                warn!("Failed to load binary config: {:?}, trying TOML", e);
            }
        }

        let config = self.load_toml().await?;
        Ok((config, ConfigSource::FlashToml))
    }

    async fn load_binary(&mut self) -> Result<ControlConfig, ConfigLoadError> {
        let mut buffer = [0u8; MAX_VALUE_LEN];
        let len = self.storage.read(StorageKey::ControlConfig, &mut buffer).await?;

        debug!("Read {} bytes of binary config from flash", len);

        let config: ControlConfig = postcard::from_bytes(&buffer[..len]).map_err(|_| ConfigLoadError::Deserialize)?;
        config.validate().map_err(ConfigLoadError::Invalid)?;

        Ok(config)
    }

    async fn load_toml(&mut self) -> Result<ControlConfig, ConfigLoadError> {
        let mut buffer = [0u8; MAX_VALUE_LEN];
        let len = self.storage.read(StorageKey::ControlConfigToml, &mut buffer).await?;

        debug!("Read {} bytes of TOML from flash", len);

        let text = str::from_utf8(&buffer[..len]).map_err(|_| ConfigLoadError::InvalidUtf8)?;
        parse_config(text).map_err(ConfigLoadError::TomlParse)
    }
}

/// Log the active configuration
pub fn log_config_summary(config: &ControlConfig, source: ConfigSource) {
    info!("Configuration loaded from {:?}", source);
    debug!("  max_acceleration: {} %/s", config.max_acceleration);
    debug!("  pwm_max: {}", config.pwm_max);
    debug!("  speed_increment: {}", config.speed_increment);
    debug!("  debounce: {} ms", config.debounce_ms);
    debug!("  tick: {} ms", config.tick_interval_ms);
    debug!("  adc_max: {}", config.adc_max);
    debug!("  status interval: {} ms", config.status_interval_ms);
}
