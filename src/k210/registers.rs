//! Memory-mapped register file of the K210 SPI controllers.

use k210_pac as pac;

use crate::config::BusId;
use crate::traits::registers::{SpiRegisters, Status};

/// Register handle for one memory-mapped SPI controller.
///
/// Constructed by consuming the PAC peripheral singleton, so bus
/// uniqueness holds by construction: the PAC hands out each peripheral
/// exactly once.
pub struct K210Registers {
    regs: &'static pac::spi0::RegisterBlock,
    bus: BusId,
}

impl K210Registers {
    /// Take ownership of the SPI0 controller.
    pub fn spi0(peripheral: pac::SPI0) -> Self {
        let _ = peripheral;
        Self {
            regs: unsafe { &*pac::SPI0::ptr() },
            bus: BusId::Spi0,
        }
    }

    /// Take ownership of the SPI1 controller.
    pub fn spi1(peripheral: pac::SPI1) -> Self {
        let _ = peripheral;
        Self {
            regs: unsafe { &*pac::SPI1::ptr() },
            bus: BusId::Spi1,
        }
    }

    /// Take ownership of the SPI3 controller.
    pub fn spi3(peripheral: pac::SPI3) -> Self {
        let _ = peripheral;
        Self {
            regs: unsafe { &*pac::SPI3::ptr() },
            bus: BusId::Spi3,
        }
    }

    /// Controller this handle is bound to.
    pub fn bus(&self) -> BusId {
        self.bus
    }
}

impl SpiRegisters for K210Registers {
    fn read_ctrl0(&self) -> u32 {
        self.regs.ctrlr0.read().bits()
    }

    fn write_ctrl0(&mut self, value: u32) {
        self.regs.ctrlr0.write(|w| unsafe { w.bits(value) });
    }

    fn write_frame_count(&mut self, frames: u32) {
        self.regs.ctrlr1.write(|w| unsafe { w.bits(frames) });
    }

    fn write_enable(&mut self, enabled: bool) {
        self.regs
            .ssienr
            .write(|w| unsafe { w.bits(u32::from(enabled)) });
    }

    fn write_chip_select(&mut self, mask: u32) {
        self.regs.ser.write(|w| unsafe { w.bits(mask) });
    }

    fn read_status(&self) -> Status {
        Status::from_bits_truncate(self.regs.sr.read().bits())
    }

    fn read_tx_fifo_level(&self) -> u32 {
        self.regs.txflr.read().bits()
    }

    fn read_rx_fifo_level(&self) -> u32 {
        self.regs.rxflr.read().bits()
    }

    fn read_data(&self) -> u32 {
        self.regs.dr[0].read().bits()
    }

    fn write_data(&mut self, frame: u32) {
        self.regs.dr[0].write(|w| unsafe { w.bits(frame) });
    }
}
