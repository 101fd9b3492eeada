//! SPI controller register interface
//!
//! This module defines the typed register-access surface the transfer
//! engine drives, plus the layout constants of the controller's control
//! and status registers. Implementations exist for the memory-mapped
//! controller (`k210` feature) and for the simulated register file used
//! in tests (`mock` feature).

use bitflags::bitflags;

// ============================================================================
// Controller geometry and field layout
// ============================================================================

/// FIFO depth in entries, per direction.
pub const FIFO_DEPTH: usize = 32;

/// Width mask of the transfer-mode (TMOD) field in ctrl0.
pub const TRANSFER_MODE_MASK: u32 = 0x3;

/// TMOD value selecting simultaneous transmit and receive.
pub const TRANSFER_MODE_DUPLEX: u32 = 0x0;

/// Mask of the data-frame-size field in ctrl0.
///
/// The field holds the configured frame bit length, zero-based; the
/// default 8-bit configuration stores 7.
pub const DATA_BITS_MASK: u32 = 0x1F;

bitflags! {
    /// Status register bits tested by the transfer engine.
    ///
    /// The engine's idle condition is `(sr & 0x05) == 0x04`: the shift
    /// logic reports not-busy while the transmit FIFO reports empty.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u32 {
        /// Shift logic is clocking a frame.
        const BUSY = 1 << 0;
        /// Transmit FIFO is fully drained.
        const TX_FIFO_EMPTY = 1 << 2;
    }
}

/// Register file of one SPI controller.
///
/// Each method maps to exactly one volatile register access, so the
/// engine's polling loops observe hardware state changes between calls.
///
/// # Safety Invariants
///
/// - Only one handle per physical controller; the `k210` backend
///   enforces this by consuming the PAC peripheral singleton.
/// - No concurrent access from multiple contexts; the transfer path is
///   synchronous and unguarded by design.
pub trait SpiRegisters {
    /// Read the control register (mode, frame format, frame size fields).
    fn read_ctrl0(&self) -> u32;

    /// Write the control register.
    fn write_ctrl0(&mut self, value: u32);

    /// Write the frame-count register: the zero-based number of frames
    /// the controller clocks for the coming transfer.
    fn write_frame_count(&mut self, frames: u32);

    /// Enable or disable the controller.
    fn write_enable(&mut self, enabled: bool);

    /// Write the one-hot slave-select register. Bit position = line id;
    /// zero deasserts every line.
    fn write_chip_select(&mut self, mask: u32);

    /// Read the status register.
    fn read_status(&self) -> Status;

    /// Current transmit FIFO fill level in entries.
    fn read_tx_fifo_level(&self) -> u32;

    /// Current receive FIFO fill level in entries.
    fn read_rx_fifo_level(&self) -> u32;

    /// Pop one received frame from the data register.
    fn read_data(&self) -> u32;

    /// Push one transmit frame into the data register.
    fn write_data(&mut self, frame: u32);
}
