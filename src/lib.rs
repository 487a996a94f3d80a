//! A slider-driven classroom kiosk for 16x2 RGB character LCDs.
//!
//! Three demo programs (a calculator, an N-th prime finder and a bubble-vs-merge sort
//! race) run on one timed state-machine engine and are picked from a menu.
#![cfg_attr(not(test), no_std)]

pub mod animation;
pub mod calculator;
pub mod config;
mod display;
mod error;
pub mod mapping;
pub mod primes;
pub mod program_select;
pub mod rgb_lcd;
pub mod scroll;
mod shared_constants;
pub mod shell;
mod slider;
pub mod sort_race;
pub mod state_machine;
mod timebase;
mod virtual_display;

// Re-export commonly used items
pub use config::{Config, WinnerPolicy};
pub use display::{CharDisplay, Line, line, truncate_with_ellipsis, write_line};
pub use error::{Error, Result};
pub use rgb_lcd::RgbLcd;
pub use shared_constants::*;
pub use shell::{Active, Shell};
pub use slider::{AnalogChannel, Slider};
pub use timebase::Timebase;
pub use virtual_display::{GLYPH_PLACEHOLDER, VirtualLcd};
