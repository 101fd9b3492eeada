//! Board support collaborator interface
//!
//! Bus bring-up leans on a handful of board services that are not part
//! of the SPI block itself: PLL configuration, DMA subsystem init, I/O
//! power domains, pin-function multiplexing, chip-select GPIO drive and
//! the vendor low-level controller init. This module models them as one
//! injected trait so the façade stays testable and the vendor calls stay
//! out of the core.
//!
//! Every method is fire-and-forget; none of the underlying vendor calls
//! report failure to the caller.

use crate::config::{BusId, FrameFormat, SpiBitOrder, SpiMode};

/// Phase-locked loops of the clock tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pll {
    Pll0,
    Pll1,
    Pll2,
}

/// I/O power banks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerBank {
    Bank0,
    Bank1,
    Bank2,
    Bank3,
    Bank4,
    Bank5,
    Bank6,
    Bank7,
}

impl PowerBank {
    /// All banks, in configuration order.
    pub const ALL: [PowerBank; 8] = [
        PowerBank::Bank0,
        PowerBank::Bank1,
        PowerBank::Bank2,
        PowerBank::Bank3,
        PowerBank::Bank4,
        PowerBank::Bank5,
        PowerBank::Bank6,
        PowerBank::Bank7,
    ];

    /// Supply level per the Maix board bank table: banks 0-5 run the
    /// 3.3 V domain, banks 6-7 the 1.8 V domain.
    pub fn default_voltage(self) -> PowerVoltage {
        match self {
            PowerBank::Bank6 | PowerBank::Bank7 => PowerVoltage::V18,
            _ => PowerVoltage::V33,
        }
    }
}

/// Selectable I/O supply levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerVoltage {
    /// 3.3 V
    V33,
    /// 1.8 V
    V18,
}

/// Role a pad plays on the SPI bus, used to pick its mux function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiPinRole {
    Sclk,
    Mosi,
    Miso,
    ChipSelect,
}

/// GPIO output level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioLevel {
    Low,
    High,
}

/// GPIO drive mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioDriveMode {
    Input,
    InputPullUp,
    InputPullDown,
    Output,
}

/// Board bring-up services consumed by the bus façade.
///
/// On hardware this is backed by the vendor sysctl/fpioa/gpiohs drivers;
/// the firmware wires its own implementation in. Tests use the recording
/// mock.
pub trait BoardSupport {
    /// Set a PLL output frequency in Hz.
    fn set_pll_frequency(&mut self, pll: Pll, frequency_hz: u32);

    /// Initialize the DMA subsystem.
    ///
    /// The synchronous transfer path never uses DMA, but the shared
    /// bring-up sequence requires the subsystem to be initialized.
    fn init_dma(&mut self);

    /// Select the supply level of one I/O power bank.
    fn set_power_domain(&mut self, bank: PowerBank, voltage: PowerVoltage);

    /// Route a pad to the SPI function matching `role` for `bus`.
    fn set_pin_function(&mut self, pin: u8, bus: BusId, role: SpiPinRole);

    /// Drive a GPIO pad to a level.
    fn set_gpio_level(&mut self, pin: u8, level: GpioLevel);

    /// Configure a GPIO pad's drive mode.
    fn set_gpio_mode(&mut self, pin: u8, mode: GpioDriveMode);

    /// Vendor low-level controller init: work mode, frame format and
    /// default frame bit length, bit order.
    fn spi_init(
        &mut self,
        bus: BusId,
        mode: SpiMode,
        format: FrameFormat,
        data_bits: u32,
        order: SpiBitOrder,
    );

    /// Apply the clock divider / rate setting to a controller.
    fn spi_set_clock_rate(&mut self, bus: BusId, divider: u32);
}
