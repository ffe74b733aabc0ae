//! Configuration types
//!
//! Board-agnostic control tuning, stored in flash as postcard binary data
//! or TOML text.

pub mod types;

pub use types::*;
