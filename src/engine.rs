//! Register-level transfer engine
//!
//! Executes one synchronous transfer over a controller's FIFOs: selects
//! the frame width from the configured data-bit-length, chunks the byte
//! buffer into FIFO-sized bursts, and busy-wait polls the fill-level and
//! status registers between bursts. The engine runs to completion before
//! returning; there is no queuing and no reentrancy.
//!
//! The busy-wait loops carry no timeout. A wedged bus blocks the caller
//! indefinitely; that is the documented failure model of this binding,
//! not an oversight.

use crate::config::BusId;
use crate::traits::registers::{
    SpiRegisters, Status, DATA_BITS_MASK, FIFO_DEPTH, TRANSFER_MODE_DUPLEX, TRANSFER_MODE_MASK,
};

/// Bytes per frame, derived per transfer from hardware state and never
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameWidth {
    /// One byte per frame (frame lengths up to 8 bits)
    Byte,
    /// Two bytes per frame (9..=16 bits)
    HalfWord,
    /// Four bytes per frame (17..=32 bits)
    Word,
}

impl FrameWidth {
    /// Derive the frame width from the ctrl0 data-frame-size field.
    ///
    /// The field is zero-based (7 for 8-bit frames), so the thresholds
    /// are strict: below 8 is a byte, below 16 a halfword, anything
    /// larger a word.
    pub fn from_bit_length(bits: u32) -> Self {
        if bits < 8 {
            FrameWidth::Byte
        } else if bits < 16 {
            FrameWidth::HalfWord
        } else {
            FrameWidth::Word
        }
    }

    /// Bytes occupied by one frame in a transfer buffer.
    pub fn bytes(self) -> usize {
        match self {
            FrameWidth::Byte => 1,
            FrameWidth::HalfWord => 2,
            FrameWidth::Word => 4,
        }
    }

    /// Assemble one wire frame from `buffer` at `offset`.
    ///
    /// Multi-byte frames map little-endian: the byte at the lower offset
    /// lands in the low bits of the frame. An absent buffer yields zero
    /// dummy frames for receive-only transfers.
    fn load(self, buffer: Option<&[u8]>, offset: usize) -> u32 {
        let Some(buf) = buffer else { return 0 };
        match self {
            FrameWidth::Byte => u32::from(buf[offset]),
            FrameWidth::HalfWord => {
                u32::from(u16::from_le_bytes([buf[offset], buf[offset + 1]]))
            }
            FrameWidth::Word => u32::from_le_bytes([
                buf[offset],
                buf[offset + 1],
                buf[offset + 2],
                buf[offset + 3],
            ]),
        }
    }

    /// Scatter one received frame into `buffer` at `offset`, inverse of
    /// [`load`](Self::load).
    fn store(self, buffer: &mut [u8], offset: usize, frame: u32) {
        match self {
            FrameWidth::Byte => buffer[offset] = frame as u8,
            FrameWidth::HalfWord => {
                buffer[offset..offset + 2].copy_from_slice(&(frame as u16).to_le_bytes())
            }
            FrameWidth::Word => {
                buffer[offset..offset + 4].copy_from_slice(&frame.to_le_bytes())
            }
        }
    }
}

/// Run one synchronous transfer of `tx`/`rx` over `bus` with chip-select
/// line `chip_select` held active throughout.
///
/// Either buffer may be absent: a missing `rx` makes the transfer
/// transmit-only, a missing `tx` clocks zero dummy frames out while
/// receiving. When both are present they must be the same length. The
/// length is in bytes and must be a positive whole number of frames at
/// the currently configured frame width.
///
/// Misuse is a programming bug, not a runtime condition: an invalid
/// controller, a zero or partial-frame length, or mismatched buffers
/// halt with an assertion rather than returning an error.
pub fn send_receive<R: SpiRegisters>(
    regs: &mut R,
    bus: BusId,
    chip_select: u32,
    tx: Option<&[u8]>,
    rx: Option<&mut [u8]>,
) {
    assert!(
        bus.supports_standard_transfer(),
        "spi2 is the slave controller; standard transfers are not supported"
    );

    let tx_len = tx.map_or(0, |buf| buf.len());
    let rx_len = rx.as_deref().map_or(0, |buf| buf.len());
    if tx.is_some() && rx.is_some() {
        assert!(
            tx_len == rx_len,
            "full-duplex transfer buffers must be the same length"
        );
    }
    let len = tx_len.max(rx_len);
    assert!(len > 0, "zero-length transfer");

    set_transfer_mode(regs, bus, TRANSFER_MODE_DUPLEX);

    let data_bits = (regs.read_ctrl0() >> bus.data_bits_shift()) & DATA_BITS_MASK;
    let width = FrameWidth::from_bit_length(data_bits);
    // A trailing partial frame would round to a zero-length burst and
    // spin forever; surface it as the precondition failure it is.
    assert!(
        len % width.bytes() == 0,
        "transfer length must be a whole number of frames"
    );

    regs.write_frame_count((len / width.bytes() - 1) as u32);
    regs.write_enable(true);
    regs.write_chip_select(1 << chip_select);

    drain_transmit(regs, tx, len, width);
    wait_until_idle(regs);
    if let Some(rx) = rx {
        fill_receive(regs, rx, width);
    }

    regs.write_chip_select(0);
    regs.write_enable(false);
}

/// Program the TMOD field of ctrl0, leaving every other field intact.
fn set_transfer_mode<R: SpiRegisters>(regs: &mut R, bus: BusId, mode: u32) {
    let shift = bus.transfer_mode_shift();
    let ctrl0 = regs.read_ctrl0();
    regs.write_ctrl0((ctrl0 & !(TRANSFER_MODE_MASK << shift)) | (mode << shift));
}

/// Push `len` bytes of `tx` into the transmit FIFO in whole-frame bursts.
///
/// The fill level is re-read on every pass: the controller drains the
/// FIFO concurrently, so headroom from a previous pass is stale. Each
/// burst is clamped to the remaining bytes and rounded down to a whole
/// multiple of the frame width; a remainder below one frame is deferred
/// to a later pass, never split.
fn drain_transmit<R: SpiRegisters>(regs: &mut R, tx: Option<&[u8]>, len: usize, width: FrameWidth) {
    let mut offset = 0;
    let mut remaining = len;
    while remaining > 0 {
        let headroom = FIFO_DEPTH.saturating_sub(regs.read_tx_fifo_level() as usize);
        let burst = headroom.min(remaining);
        let burst = burst - burst % width.bytes();
        for _ in 0..burst / width.bytes() {
            regs.write_data(width.load(tx, offset));
            offset += width.bytes();
        }
        remaining -= burst;
    }
}

/// Block until the controller reports not-busy with an empty transmit
/// FIFO, i.e. `(sr & 0x05) == 0x04`.
fn wait_until_idle<R: SpiRegisters>(regs: &mut R) {
    let mask = Status::BUSY | Status::TX_FIFO_EMPTY;
    while regs.read_status() & mask != Status::TX_FIFO_EMPTY {}
}

/// Pull every expected frame out of the receive FIFO into `rx`, with the
/// same whole-frame burst arithmetic as the transmit side.
fn fill_receive<R: SpiRegisters>(regs: &mut R, rx: &mut [u8], width: FrameWidth) {
    let mut offset = 0;
    let mut remaining = rx.len();
    while remaining > 0 {
        let available = (regs.read_rx_fifo_level() as usize).min(remaining);
        let burst = available - available % width.bytes();
        for _ in 0..burst / width.bytes() {
            width.store(rx, offset, regs.read_data());
            offset += width.bytes();
        }
        remaining -= burst;
    }
}
