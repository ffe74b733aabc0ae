//! Board-agnostic control core for the Space Tornado motion controller
//!
//! This crate contains all control logic that does not depend on
//! specific hardware implementations:
//!
//! - Control state record with clamped setters (the state store)
//! - Motion controller (logarithmic acceleration curve)
//! - Safety interlock (per-tick actuator output derivation)
//! - Transport-agnostic command surface and the control loop arbiter
//! - Debounced physical input handling
//! - Actuator traits and configuration type definitions

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod config;
pub mod control;
pub mod input;
pub mod motion;
pub mod safety;
pub mod state;
pub mod status;
pub mod traits;
