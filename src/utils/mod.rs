//! Helpers that sit outside the integer core.

pub mod alphabet;
