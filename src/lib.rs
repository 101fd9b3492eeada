#![cfg_attr(not(test), no_std)]

//! SPI board support for the Kendryte K210.
//!
//! This crate binds the conventional `begin` / `begin_transaction` /
//! `transfer` / `end_transaction` SPI lifecycle to the K210's four SPI
//! controllers. It is split into two layers:
//!
//! - [`engine`] — the register-level transfer engine: frame-width
//!   selection, FIFO chunking and busy-wait polling against one
//!   controller's register file.
//! - [`bus`] — the per-bus session façade that owns pin assignment and
//!   transaction settings and maps byte/halfword/buffer transfers onto
//!   the engine.
//!
//! Hardware access is isolated behind two traits so the engine runs
//! unchanged against simulated hardware in tests and the memory-mapped
//! controller on the chip: [`traits::SpiRegisters`] for the controller
//! register file, and [`traits::BoardSupport`] for the board bring-up
//! collaborators (clock tree, power domains, pin mux, chip-select GPIO).

pub mod bus;
pub mod config;
pub mod engine;
pub mod traits;

// Chip backend (feature-gated)
#[cfg(feature = "k210")]
pub mod k210;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use bus::SpiBus;
pub use config::{BusId, FrameFormat, PinAssignment, SpiBitOrder, SpiMode, SpiSettings};
pub use engine::FrameWidth;
pub use traits::{BoardSupport, SpiRegisters};
