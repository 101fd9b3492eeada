//! Recording board-support stub for testing

use heapless::Vec;

use crate::config::{BusId, FrameFormat, SpiBitOrder, SpiMode};
use crate::traits::board::{
    BoardSupport, GpioDriveMode, GpioLevel, Pll, PowerBank, PowerVoltage, SpiPinRole,
};

/// Board bring-up calls the mock can hold.
pub const CALL_CAPACITY: usize = 32;

/// One recorded board-support call with its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCall {
    SetPllFrequency { pll: Pll, frequency_hz: u32 },
    InitDma,
    SetPowerDomain { bank: PowerBank, voltage: PowerVoltage },
    SetPinFunction { pin: u8, bus: BusId, role: SpiPinRole },
    SetGpioLevel { pin: u8, level: GpioLevel },
    SetGpioMode { pin: u8, mode: GpioDriveMode },
    SpiInit {
        bus: BusId,
        mode: SpiMode,
        format: FrameFormat,
        data_bits: u32,
        order: SpiBitOrder,
    },
    SpiSetClockRate { bus: BusId, divider: u32 },
}

/// Board-support stub that records every call in order.
#[derive(Debug, Default)]
pub struct MockBoard {
    calls: Vec<BoardCall, CALL_CAPACITY>,
}

impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded call, in order.
    pub fn calls(&self) -> Vec<BoardCall, CALL_CAPACITY> {
        self.calls.clone()
    }

    fn record(&mut self, call: BoardCall) {
        let _ = self.calls.push(call);
    }
}

impl BoardSupport for MockBoard {
    fn set_pll_frequency(&mut self, pll: Pll, frequency_hz: u32) {
        self.record(BoardCall::SetPllFrequency { pll, frequency_hz });
    }

    fn init_dma(&mut self) {
        self.record(BoardCall::InitDma);
    }

    fn set_power_domain(&mut self, bank: PowerBank, voltage: PowerVoltage) {
        self.record(BoardCall::SetPowerDomain { bank, voltage });
    }

    fn set_pin_function(&mut self, pin: u8, bus: BusId, role: SpiPinRole) {
        self.record(BoardCall::SetPinFunction { pin, bus, role });
    }

    fn set_gpio_level(&mut self, pin: u8, level: GpioLevel) {
        self.record(BoardCall::SetGpioLevel { pin, level });
    }

    fn set_gpio_mode(&mut self, pin: u8, mode: GpioDriveMode) {
        self.record(BoardCall::SetGpioMode { pin, mode });
    }

    fn spi_init(
        &mut self,
        bus: BusId,
        mode: SpiMode,
        format: FrameFormat,
        data_bits: u32,
        order: SpiBitOrder,
    ) {
        self.record(BoardCall::SpiInit {
            bus,
            mode,
            format,
            data_bits,
            order,
        });
    }

    fn spi_set_clock_rate(&mut self, bus: BusId, divider: u32) {
        self.record(BoardCall::SpiSetClockRate { bus, divider });
    }
}
