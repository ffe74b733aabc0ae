//! Minimal TOML parser for the control configuration
//!
//! Handles only what `tornado.toml` needs, not the full TOML grammar.
//!
//! Supported:
//! - `[section]` headers
//! - `key = value` pairs with integer and float values
//! - Comments (`# ...`), whole-line and trailing
//!
//! Sections other than `[control]` are skipped so the same file can carry
//! settings for other tools. Keys missing from `[control]` keep their
//! defaults.

use tornado_core::config::{ConfigError, ControlConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Malformed section header
    InvalidSection,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Value does not parse as the key's type
    InvalidValue,
    /// Key not known in `[control]`
    UnknownKey,
    /// Values parse but are not usable
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Invalid(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Control,
    Other,
}

/// Parse TOML text into a validated `ControlConfig`
pub fn parse_config(input: &str) -> Result<ControlConfig, ParseError> {
    let mut config = ControlConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header.strip_suffix(']').ok_or(ParseError::InvalidSection)?.trim();
            if name.is_empty() {
                return Err(ParseError::InvalidSection);
            }
            section = if name == "control" { Section::Control } else { Section::Other };
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine)?;
        if section == Section::Control {
            apply_value(&mut config, key, value)?;
        }
    }

    config.validate()?;
    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_float(value: &str) -> Result<f32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    // TOML allows underscores between digits
    let mut digits: heapless::String<16> = heapless::String::new();
    for c in value.chars().filter(|c| *c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

fn apply_value(config: &mut ControlConfig, key: &str, value: &str) -> Result<(), ParseError> {
    match key {
        "max_acceleration" => config.max_acceleration = parse_float(value)?,
        "pwm_max" => config.pwm_max = parse_int(value)?,
        "speed_increment" => config.speed_increment = parse_float(value)?,
        "debounce_ms" => config.debounce_ms = parse_int(value)?,
        "tick_interval_ms" => config.tick_interval_ms = parse_int(value)?,
        "adc_max" => config.adc_max = parse_int(value)?,
        "status_interval_ms" => config.status_interval_ms = parse_int(value)?,
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}
