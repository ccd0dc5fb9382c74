//! Compile-time configuration.
//!
//! The target chip is picked with Cargo features: `rp2040` (default) or
//! `rp2350`. When both are enabled `rp2350` wins.

use crate::peripheral::Chip;

#[cfg(feature = "rp2350")]
pub const TARGET_CHIP: Chip = Chip::Rp2350;

#[cfg(not(feature = "rp2350"))]
pub const TARGET_CHIP: Chip = Chip::Rp2040;

/// LED pin used by boards that do not define `PICO_DEFAULT_LED_PIN`.
pub const DEFAULT_LED_PIN: u32 = 6;

pub use crate::align::POINTER_WIDTH;
