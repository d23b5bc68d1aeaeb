#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod control;
pub mod engine;
pub mod midi;
pub mod notes;
pub mod timer;

/// Full-scale value of the virtual potentiometers, in ohms.
pub const POT_MAX: i32 = 470_000;

/// Power-on setting of the astable potentiometer, in ohms.
pub const DEFAULT_POT_A: i32 = 100_000;

/// Power-on setting of the monostable potentiometer, in ohms.
pub const DEFAULT_POT_B: i32 = 80_000;
