//! Space Tornado hardware abstraction layer
//!
//! Chip-independent traits implemented by the chip-specific HAL crates.
//! The pin and PWM abstractions come from `embedded-hal`; this crate only
//! adds what that one lacks, persistent key-value storage.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  tornado-firmware                       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tornado-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           ┌───────────────────┐
//!           │ tornado-hal-rp2040│
//!           └───────────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod flash;

pub use flash::{FlashError, FlashStorage, StorageKey};
