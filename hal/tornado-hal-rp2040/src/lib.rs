//! RP2040-specific HAL for the Space Tornado firmware
//!
//! - Flash storage driver (implements `tornado_hal::FlashStorage`)
//! - Motor PWM slice configuration

#![no_std]

pub mod flash;
pub mod pwm;

pub use tornado_hal::{FlashStorage as FlashStorageTrait, StorageKey};
