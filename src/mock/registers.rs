//! Mock SPI controller for testing
//!
//! Simulates the controller register file with real FIFO behavior so the
//! engine's busy-wait loops terminate and its burst arithmetic is
//! observable. Every level/status read first "clocks" the shift
//! register, draining up to a configurable number of frames per poll;
//! frames pushed between two polls form one burst in the burst log.

use core::cell::RefCell;

use heapless::{Deque, Vec};

use crate::config::BusId;
use crate::traits::registers::{SpiRegisters, Status, DATA_BITS_MASK, FIFO_DEPTH};

/// Frames the wire log can hold.
pub const WIRE_CAPACITY: usize = 128;

const BURST_CAPACITY: usize = 64;
const EVENT_CAPACITY: usize = 32;

#[derive(Debug, Default)]
struct State {
    ctrl0: u32,
    frame_count: u32,
    enabled: bool,
    chip_select: u32,
    tx_fifo: Deque<u32, FIFO_DEPTH>,
    rx_fifo: Deque<u32, FIFO_DEPTH>,
    /// Every frame ever pushed through the data register, in order.
    wire: Vec<u32, WIRE_CAPACITY>,
    /// Frames pushed between consecutive polls.
    bursts: Vec<usize, BURST_CAPACITY>,
    current_burst: usize,
    /// Chip-select register writes, in order.
    select_events: Vec<u32, EVENT_CAPACITY>,
    /// Enable register writes, in order.
    enable_events: Vec<bool, EVENT_CAPACITY>,
    overrun: bool,
    accesses: usize,
}

impl State {
    fn close_burst(&mut self) {
        if self.current_burst > 0 {
            let _ = self.bursts.push(self.current_burst);
            self.current_burst = 0;
        }
    }

    fn clock_shift(&mut self, loopback: bool, limit: usize) {
        self.close_burst();
        let mut shifted = 0;
        while shifted < limit {
            let Some(frame) = self.tx_fifo.pop_front() else {
                break;
            };
            if loopback && self.rx_fifo.push_back(frame).is_err() {
                self.overrun = true;
            }
            shifted += 1;
        }
    }
}

/// Mock SPI controller register file
///
/// Defaults to 8-bit frames on every controller, discarding transmitted
/// frames. [`loopback`](Self::loopback) wires the transmit side back
/// into the receive FIFO; [`preload_rx`](Self::preload_rx) stages
/// receive data directly.
#[derive(Debug)]
pub struct MockRegisters {
    state: RefCell<State>,
    loopback: bool,
    /// Frames the simulated shift register drains per poll.
    drain_limit: usize,
}

impl MockRegisters {
    /// Create a mock controller that discards transmitted frames.
    pub fn new() -> Self {
        let state = State {
            // 8-bit frames (zero-based field) at both field placements,
            // so the default works for every controller.
            ctrl0: (7 << 16) | 7,
            ..State::default()
        };
        Self {
            state: RefCell::new(state),
            loopback: false,
            drain_limit: usize::MAX,
        }
    }

    /// Create a mock controller with MISO wired back to MOSI.
    pub fn loopback() -> Self {
        Self {
            loopback: true,
            ..Self::new()
        }
    }

    /// Limit how many frames the shift register drains per poll,
    /// forcing the engine through multiple refill passes.
    pub fn with_drain_limit(mut self, limit: usize) -> Self {
        self.drain_limit = limit;
        self
    }

    /// Configure the frame bit length `bits` for `bus`, the way the
    /// vendor init call would (the field stores the length zero-based).
    pub fn set_data_bit_length(&self, bus: BusId, bits: u32) {
        let shift = bus.data_bits_shift();
        let mut state = self.state.borrow_mut();
        state.ctrl0 = (state.ctrl0 & !(DATA_BITS_MASK << shift)) | ((bits - 1) << shift);
    }

    /// Stage frames for the receive FIFO.
    pub fn preload_rx(&self, frames: &[u32]) {
        let mut state = self.state.borrow_mut();
        for &frame in frames {
            let _ = state.rx_fifo.push_back(frame);
        }
    }

    /// Every frame pushed through the data register, in order.
    pub fn wire(&self) -> Vec<u32, WIRE_CAPACITY> {
        self.state.borrow().wire.clone()
    }

    /// Frames pushed between consecutive polls.
    pub fn bursts(&self) -> Vec<usize, BURST_CAPACITY> {
        self.state.borrow().bursts.clone()
    }

    /// Chip-select register writes, in order.
    pub fn select_events(&self) -> Vec<u32, EVENT_CAPACITY> {
        self.state.borrow().select_events.clone()
    }

    /// Enable register writes, in order.
    pub fn enable_events(&self) -> Vec<bool, EVENT_CAPACITY> {
        self.state.borrow().enable_events.clone()
    }

    pub fn ctrl0(&self) -> u32 {
        self.state.borrow().ctrl0
    }

    /// Last value written to the frame-count register.
    pub fn frame_count(&self) -> u32 {
        self.state.borrow().frame_count
    }

    pub fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    pub fn chip_select(&self) -> u32 {
        self.state.borrow().chip_select
    }

    /// Whether either FIFO was pushed past its depth.
    pub fn overrun(&self) -> bool {
        self.state.borrow().overrun
    }

    /// Total register accesses, for asserting that an operation touched
    /// no hardware.
    pub fn accesses(&self) -> usize {
        self.state.borrow().accesses
    }
}

impl Default for MockRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl SpiRegisters for MockRegisters {
    fn read_ctrl0(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.accesses += 1;
        state.ctrl0
    }

    fn write_ctrl0(&mut self, value: u32) {
        let mut state = self.state.borrow_mut();
        state.accesses += 1;
        state.ctrl0 = value;
    }

    fn write_frame_count(&mut self, frames: u32) {
        let mut state = self.state.borrow_mut();
        state.accesses += 1;
        state.frame_count = frames;
    }

    fn write_enable(&mut self, enabled: bool) {
        let mut state = self.state.borrow_mut();
        state.accesses += 1;
        state.enabled = enabled;
        let _ = state.enable_events.push(enabled);
    }

    fn write_chip_select(&mut self, mask: u32) {
        let mut state = self.state.borrow_mut();
        state.accesses += 1;
        state.chip_select = mask;
        let _ = state.select_events.push(mask);
    }

    fn read_status(&self) -> Status {
        let mut state = self.state.borrow_mut();
        state.accesses += 1;
        state.clock_shift(self.loopback, self.drain_limit);
        if state.tx_fifo.is_empty() {
            Status::TX_FIFO_EMPTY
        } else {
            Status::BUSY
        }
    }

    fn read_tx_fifo_level(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.accesses += 1;
        state.clock_shift(self.loopback, self.drain_limit);
        state.tx_fifo.len() as u32
    }

    fn read_rx_fifo_level(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.accesses += 1;
        state.rx_fifo.len() as u32
    }

    fn read_data(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        state.accesses += 1;
        state.rx_fifo.pop_front().unwrap_or(0)
    }

    fn write_data(&mut self, frame: u32) {
        let mut state = self.state.borrow_mut();
        state.accesses += 1;
        let _ = state.wire.push(frame);
        if state.tx_fifo.push_back(frame).is_err() {
            state.overrun = true;
        }
        state.current_burst += 1;
    }
}
