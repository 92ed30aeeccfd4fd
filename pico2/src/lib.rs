//! Wristband board library - testable modules for the Pico 2 firmware.
//!
//! This library contains the drivers and adapters that can be tested on the
//! host machine. The binary (`main.rs`) uses this library and adds the
//! Embassy-specific code (peripherals, tasks, the tick loop).
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test -p wristband-pico2 --lib --target x86_64-unknown-linux-gnu  # Linux/macOS
//! cargo test -p wristband-pico2 --lib --target x86_64-pc-windows-msvc    # Windows
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the actual firmware runs as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

// === Pure logic modules (testable on host, no ARM dependencies) ===

// Configuration
pub mod config;

// Sensors
pub mod cst816;
pub mod max30102;
pub mod ppg;
pub mod pulse;

// Serial link framing
pub mod line_buffer;

#[cfg(test)]
mod fake_i2c;
