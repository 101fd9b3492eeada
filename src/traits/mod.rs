//! Hardware access traits
//!
//! The transfer engine and bus façade never touch hardware directly;
//! everything goes through these two traits. `SpiRegisters` is the
//! register file of one SPI controller, `BoardSupport` is the board
//! bring-up collaborator surface (clock tree, DMA init, power domains,
//! pin mux, chip-select GPIO).

pub mod board;
pub mod registers;

// Re-export commonly used types
pub use board::{
    BoardSupport, GpioDriveMode, GpioLevel, Pll, PowerBank, PowerVoltage, SpiPinRole,
};
pub use registers::{SpiRegisters, Status, FIFO_DEPTH};
