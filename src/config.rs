//! Bus identifiers and transaction configuration types.
//!
//! [`SpiSettings`] is the mutable configuration snapshot held by the bus
//! façade. It is replaced wholesale by `begin_transaction` and only
//! reaches hardware on the next bring-up; the transfer path reads it,
//! never writes it.

/// SPI mode (Clock Polarity and Phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    /// CPOL=0, CPHA=0
    Mode0,
    /// CPOL=0, CPHA=1
    Mode1,
    /// CPOL=1, CPHA=0
    Mode2,
    /// CPOL=1, CPHA=1
    Mode3,
}

impl SpiMode {
    /// Map an Arduino-style numeric data mode to `SpiMode`.
    ///
    /// Only the low two bits are significant, matching the convention
    /// that mode constants are 0..=3.
    pub fn from_index(mode: u8) -> Self {
        match mode & 0x03 {
            0 => SpiMode::Mode0,
            1 => SpiMode::Mode1,
            2 => SpiMode::Mode2,
            _ => SpiMode::Mode3,
        }
    }

    /// Numeric work-mode index understood by the controller init call.
    pub fn index(self) -> u8 {
        match self {
            SpiMode::Mode0 => 0,
            SpiMode::Mode1 => 1,
            SpiMode::Mode2 => 2,
            SpiMode::Mode3 => 3,
        }
    }
}

/// SPI bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiBitOrder {
    /// Most significant bit first
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}

/// Frame format of the controller.
///
/// The bus façade always initializes the controller in `Standard`
/// (single-lane full-duplex) format; the multi-lane formats exist on the
/// hardware but are not exercised by the synchronous transfer path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameFormat {
    /// Single-lane full duplex
    Standard,
    /// Dual-lane
    Dual,
    /// Quad-lane
    Quad,
    /// Octal-lane
    Octal,
}

/// One of the four SPI controllers on the chip.
///
/// `Spi2` is the slave-role controller; the standard master transfer
/// path rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusId {
    Spi0,
    Spi1,
    Spi2,
    Spi3,
}

impl BusId {
    /// Number of SPI controllers on the chip.
    pub const COUNT: usize = 4;

    /// Controller index (0..=3).
    pub fn index(self) -> usize {
        match self {
            BusId::Spi0 => 0,
            BusId::Spi1 => 1,
            BusId::Spi2 => 2,
            BusId::Spi3 => 3,
        }
    }

    /// Look up a controller by index.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(BusId::Spi0),
            1 => Some(BusId::Spi1),
            2 => Some(BusId::Spi2),
            3 => Some(BusId::Spi3),
            _ => None,
        }
    }

    /// Whether the standard master transfer path may use this controller.
    pub fn supports_standard_transfer(self) -> bool {
        !matches!(self, BusId::Spi2)
    }

    /// Bit position of the transfer-mode (TMOD) field in ctrl0.
    ///
    /// Controllers 0-2 place the field at bit 8, controller 3 at bit 10.
    pub(crate) fn transfer_mode_shift(self) -> u32 {
        match self {
            BusId::Spi3 => 10,
            _ => 8,
        }
    }

    /// Bit position of the data-frame-size field in ctrl0.
    ///
    /// Panics for the slave-only controller; callers must check
    /// [`supports_standard_transfer`](Self::supports_standard_transfer)
    /// first.
    pub(crate) fn data_bits_shift(self) -> u32 {
        match self {
            BusId::Spi0 | BusId::Spi1 => 16,
            BusId::Spi3 => 0,
            BusId::Spi2 => panic!("spi2 is slave-only"),
        }
    }
}

/// Physical pin assignment of one bus.
///
/// Pin numbers are FPIOA pad indices. The chip-select pad index doubles
/// as the controller's slave-select line number, matching the board
/// wiring convention this binding targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinAssignment {
    /// Serial clock pad
    pub sclk: u8,
    /// Controller-out pad
    pub mosi: u8,
    /// Controller-in pad
    pub miso: u8,
    /// Chip-select pad
    pub chip_select: u8,
}

/// Per-transaction bus configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiSettings {
    /// Value handed to the board clock-rate setter on bring-up.
    pub clock_divider: u32,
    /// Bit order of each frame on the wire.
    pub bit_order: SpiBitOrder,
    /// Clock polarity and phase.
    pub mode: SpiMode,
}

impl SpiSettings {
    pub fn new(clock_divider: u32, bit_order: SpiBitOrder, mode: SpiMode) -> Self {
        Self {
            clock_divider,
            bit_order,
            mode,
        }
    }
}

impl Default for SpiSettings {
    fn default() -> Self {
        Self {
            clock_divider: 4_000_000,
            bit_order: SpiBitOrder::MsbFirst,
            mode: SpiMode::Mode0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_round_trip() {
        for index in 0..4u8 {
            assert_eq!(SpiMode::from_index(index).index(), index);
        }
        // Numeric modes wrap at two bits
        assert_eq!(SpiMode::from_index(4), SpiMode::Mode0);
        assert_eq!(SpiMode::from_index(7), SpiMode::Mode3);
    }

    #[test]
    fn test_bus_id_index_round_trip() {
        for index in 0..BusId::COUNT {
            assert_eq!(BusId::from_index(index).unwrap().index(), index);
        }
        assert_eq!(BusId::from_index(4), None);
    }

    #[test]
    fn test_slave_bus_is_rejected() {
        assert!(BusId::Spi0.supports_standard_transfer());
        assert!(BusId::Spi1.supports_standard_transfer());
        assert!(!BusId::Spi2.supports_standard_transfer());
        assert!(BusId::Spi3.supports_standard_transfer());
    }

    #[test]
    fn test_field_placement_per_controller() {
        assert_eq!(BusId::Spi0.transfer_mode_shift(), 8);
        assert_eq!(BusId::Spi2.transfer_mode_shift(), 8);
        assert_eq!(BusId::Spi3.transfer_mode_shift(), 10);
        assert_eq!(BusId::Spi0.data_bits_shift(), 16);
        assert_eq!(BusId::Spi1.data_bits_shift(), 16);
        assert_eq!(BusId::Spi3.data_bits_shift(), 0);
    }

    #[test]
    fn test_default_settings() {
        let settings = SpiSettings::default();
        assert_eq!(settings.clock_divider, 4_000_000);
        assert_eq!(settings.bit_order, SpiBitOrder::MsbFirst);
        assert_eq!(settings.mode, SpiMode::Mode0);
    }
}
