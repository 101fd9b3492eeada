//! Bus/session façade
//!
//! One [`SpiBus`] per physical controller owns the pin assignment and
//! the current transaction settings and exposes the conventional
//! lifecycle: `begin` → `begin_transaction` → `transfer*` →
//! `end_transaction`. There is no way back to the unconfigured state;
//! `end` leaves the hardware as it stands.
//!
//! Every transfer call blocks until the hardware transaction completes.
//! The façade provides no internal locking: operations on one bus must
//! come from one logical thread of control, and a multi-threaded caller
//! must add its own mutual exclusion per bus.

use crate::config::{BusId, FrameFormat, PinAssignment, SpiBitOrder, SpiMode, SpiSettings};
use crate::engine;
use crate::traits::board::{BoardSupport, GpioDriveMode, GpioLevel, Pll, PowerBank, SpiPinRole};
use crate::traits::registers::{SpiRegisters, FIFO_DEPTH};

/// Target frequency programmed into PLL0 during bring-up.
pub const PLL0_OUTPUT_FREQ: u32 = 800_000_000;

/// Frame bit length the controller is initialized with; transfers derive
/// their width from this unless the application reconfigures it.
const DEFAULT_DATA_BITS: u32 = 8;

/// SPI bus façade over one controller.
///
/// `R` is the controller register file, `B` the board bring-up
/// collaborator. On hardware those are the memory-mapped controller and
/// the firmware's sysctl/fpioa/gpiohs binding; in tests, the recording
/// mocks.
///
/// Exactly one instance should exist per physical controller. The
/// `k210` backend enforces this by consuming the PAC peripheral
/// singleton in its constructor; with other register implementations it
/// is the caller's responsibility.
pub struct SpiBus<R: SpiRegisters, B: BoardSupport> {
    bus: BusId,
    regs: R,
    board: B,
    pins: Option<PinAssignment>,
    settings: SpiSettings,
}

impl<R: SpiRegisters, B: BoardSupport> SpiBus<R, B> {
    /// Create the façade in the unconfigured state with default
    /// settings. No hardware is touched until [`begin`](Self::begin).
    pub fn new(bus: BusId, regs: R, board: B) -> Self {
        Self {
            bus,
            regs,
            board,
            pins: None,
            settings: SpiSettings::default(),
        }
    }

    /// Store the pin assignment and run one-time hardware bring-up.
    ///
    /// Bring-up sets the PLL0 frequency, initializes the DMA subsystem
    /// (unused by the synchronous path but part of the shared init
    /// sequence), configures the I/O power banks, routes the four pads
    /// to their SPI functions, initializes the controller with the held
    /// mode and bit order at the default 8-bit standard frame, applies
    /// the held clock divider, and drives chip-select high as an output.
    ///
    /// Not idempotent: calling `begin` again re-runs the full sequence.
    pub fn begin(&mut self, pins: PinAssignment) {
        self.pins = Some(pins);
        self.init();
    }

    fn init(&mut self) {
        let pins = self.pins.expect("begin() stores the pin assignment");

        self.board.set_pll_frequency(Pll::Pll0, PLL0_OUTPUT_FREQ);
        self.board.init_dma();
        for bank in PowerBank::ALL {
            self.board.set_power_domain(bank, bank.default_voltage());
        }

        self.board
            .set_pin_function(pins.sclk, self.bus, SpiPinRole::Sclk);
        self.board
            .set_pin_function(pins.mosi, self.bus, SpiPinRole::Mosi);
        self.board
            .set_pin_function(pins.miso, self.bus, SpiPinRole::Miso);
        self.board
            .set_pin_function(pins.chip_select, self.bus, SpiPinRole::ChipSelect);

        self.board.spi_init(
            self.bus,
            self.settings.mode,
            FrameFormat::Standard,
            DEFAULT_DATA_BITS,
            self.settings.bit_order,
        );
        self.board
            .spi_set_clock_rate(self.bus, self.settings.clock_divider);

        self.board
            .set_gpio_level(pins.chip_select, GpioLevel::High);
        self.board
            .set_gpio_mode(pins.chip_select, GpioDriveMode::Output);

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "spi{}: bring-up complete, clock divider {}",
            self.bus.index(),
            self.settings.clock_divider
        );
    }

    /// Release nothing: the hardware is left configured.
    pub fn end(&mut self) {}

    /// Register an interrupt that performs SPI transactions, so
    /// `begin_transaction` can suspend it and `end_transaction` restore
    /// it.
    ///
    /// Interrupt coordination is not implemented on this binding; the
    /// call is accepted and ignored.
    pub fn using_interrupt(&mut self, _interrupt_number: u32) {}

    /// Inverse of [`using_interrupt`](Self::using_interrupt); also a
    /// no-op.
    pub fn not_using_interrupt(&mut self, _interrupt_number: u32) {}

    /// Replace the held settings wholesale.
    ///
    /// Touches no hardware register: clock divider, mode and bit order
    /// take effect on the next bring-up. This deferred application
    /// matches the board core this binding reproduces.
    pub fn begin_transaction(&mut self, settings: SpiSettings) {
        self.settings = settings;
    }

    /// Close a transaction. Nothing to undo on this binding.
    pub fn end_transaction(&mut self) {}

    /// Set the bit order of the next bring-up.
    pub fn set_bit_order(&mut self, order: SpiBitOrder) {
        self.settings.bit_order = order;
    }

    /// Set the clock polarity/phase of the next bring-up.
    pub fn set_data_mode(&mut self, mode: SpiMode) {
        self.settings.mode = mode;
    }

    /// Set the clock divider of the next bring-up.
    pub fn set_clock_divider(&mut self, divider: u32) {
        self.settings.clock_divider = divider;
    }

    /// Clock one byte out and return the byte clocked in.
    pub fn transfer(&mut self, data: u8) -> u8 {
        let cs = self.chip_select_line();
        let tx = [data];
        let mut rx = [0u8; 1];
        engine::send_receive(&mut self.regs, self.bus, cs, Some(&tx), Some(&mut rx));
        rx[0]
    }

    /// Clock a 16-bit value out low byte first and reassemble the two
    /// received bytes the same way (low byte into the low bits).
    pub fn transfer16(&mut self, data: u16) -> u16 {
        let cs = self.chip_select_line();
        let tx = data.to_le_bytes();
        let mut rx = [0u8; 2];
        engine::send_receive(&mut self.regs, self.bus, cs, Some(&tx), Some(&mut rx));
        u16::from_le_bytes(rx)
    }

    /// Transmit a buffer without receiving.
    ///
    /// The bulk path is half-duplex by design; anything the peripheral
    /// clocks back during the write is discarded.
    pub fn write(&mut self, buffer: &[u8]) {
        let cs = self.chip_select_line();
        engine::send_receive(&mut self.regs, self.bus, cs, Some(buffer), None);
    }

    /// Would enable the transfer-complete interrupt; not implemented on
    /// this binding.
    pub fn attach_interrupt(&mut self) {}

    /// Would disable the transfer-complete interrupt; not implemented on
    /// this binding.
    pub fn detach_interrupt(&mut self) {}

    /// Controller this façade is bound to.
    pub fn bus(&self) -> BusId {
        self.bus
    }

    /// Currently held transaction settings.
    pub fn settings(&self) -> SpiSettings {
        self.settings
    }

    /// Register handle, for inspection.
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Board handle, for inspection.
    pub fn board(&self) -> &B {
        &self.board
    }

    fn chip_select_line(&self) -> u32 {
        let pins = self
            .pins
            .expect("begin() must be called before transferring");
        u32::from(pins.chip_select)
    }
}

/// Blocking full-duplex transfer for device drivers written against
/// `embedded-hal`.
///
/// The in-place exchange is chunked to the FIFO depth: the engine drains
/// the receive FIFO only after the transmit side completes, so a chunk
/// larger than one FIFO would overrun the receive side.
impl<R: SpiRegisters, B: BoardSupport> embedded_hal::blocking::spi::Transfer<u8> for SpiBus<R, B> {
    type Error = core::convert::Infallible;

    fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], Self::Error> {
        let cs = self.chip_select_line();
        for chunk in words.chunks_mut(FIFO_DEPTH) {
            let mut tx = [0u8; FIFO_DEPTH];
            tx[..chunk.len()].copy_from_slice(chunk);
            engine::send_receive(
                &mut self.regs,
                self.bus,
                cs,
                Some(&tx[..chunk.len()]),
                Some(chunk),
            );
        }
        Ok(words)
    }
}

impl<R: SpiRegisters, B: BoardSupport> embedded_hal::blocking::spi::Write<u8> for SpiBus<R, B> {
    type Error = core::convert::Infallible;

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        // The trait contract permits an empty write; the native path
        // treats it as a precondition failure.
        if !words.is_empty() {
            SpiBus::write(self, words);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{BoardCall, MockBoard, MockRegisters};

    fn pins() -> PinAssignment {
        PinAssignment {
            sclk: 27,
            mosi: 28,
            miso: 26,
            chip_select: 29,
        }
    }

    fn loopback_bus() -> SpiBus<MockRegisters, MockBoard> {
        let mut spi = SpiBus::new(BusId::Spi0, MockRegisters::loopback(), MockBoard::new());
        spi.begin(pins());
        spi
    }

    #[test]
    fn test_begin_runs_board_bring_up_in_order() {
        let spi = loopback_bus();
        let calls = spi.board().calls();

        assert_eq!(
            calls[0],
            BoardCall::SetPllFrequency {
                pll: Pll::Pll0,
                frequency_hz: PLL0_OUTPUT_FREQ,
            }
        );
        assert_eq!(calls[1], BoardCall::InitDma);
        for (index, bank) in PowerBank::ALL.iter().enumerate() {
            assert_eq!(
                calls[2 + index],
                BoardCall::SetPowerDomain {
                    bank: *bank,
                    voltage: bank.default_voltage(),
                }
            );
        }
        assert_eq!(
            calls[10],
            BoardCall::SetPinFunction {
                pin: 27,
                bus: BusId::Spi0,
                role: SpiPinRole::Sclk,
            }
        );
        assert_eq!(
            calls[13],
            BoardCall::SetPinFunction {
                pin: 29,
                bus: BusId::Spi0,
                role: SpiPinRole::ChipSelect,
            }
        );
        assert_eq!(
            calls[14],
            BoardCall::SpiInit {
                bus: BusId::Spi0,
                mode: SpiMode::Mode0,
                format: FrameFormat::Standard,
                data_bits: DEFAULT_DATA_BITS,
                order: SpiBitOrder::MsbFirst,
            }
        );
        assert_eq!(
            calls[15],
            BoardCall::SpiSetClockRate {
                bus: BusId::Spi0,
                divider: 4_000_000,
            }
        );
        assert_eq!(
            calls[16],
            BoardCall::SetGpioLevel {
                pin: 29,
                level: GpioLevel::High,
            }
        );
        assert_eq!(
            calls[17],
            BoardCall::SetGpioMode {
                pin: 29,
                mode: GpioDriveMode::Output,
            }
        );
        assert_eq!(calls.len(), 18);
    }

    #[test]
    fn test_transaction_updates_settings_without_touching_hardware() {
        let mut spi = loopback_bus();
        let accesses_before = spi.registers().accesses();

        let settings = SpiSettings::new(1_000_000, SpiBitOrder::LsbFirst, SpiMode::Mode2);
        spi.begin_transaction(settings);
        spi.end_transaction();

        assert_eq!(spi.settings(), settings);
        assert_eq!(spi.registers().accesses(), accesses_before);
    }

    #[test]
    fn test_setters_feed_the_next_bring_up() {
        let mut spi = SpiBus::new(BusId::Spi1, MockRegisters::new(), MockBoard::new());
        spi.set_bit_order(SpiBitOrder::LsbFirst);
        spi.set_data_mode(SpiMode::Mode3);
        spi.set_clock_divider(500_000);
        spi.begin(pins());

        let calls = spi.board().calls();
        assert!(calls.contains(&BoardCall::SpiInit {
            bus: BusId::Spi1,
            mode: SpiMode::Mode3,
            format: FrameFormat::Standard,
            data_bits: DEFAULT_DATA_BITS,
            order: SpiBitOrder::LsbFirst,
        }));
        assert!(calls.contains(&BoardCall::SpiSetClockRate {
            bus: BusId::Spi1,
            divider: 500_000,
        }));
    }

    #[test]
    fn test_transfer_returns_received_byte_and_idles_the_bus() {
        let mut spi = loopback_bus();
        assert_eq!(spi.transfer(0x42), 0x42);
        assert_eq!(spi.registers().chip_select(), 0);
        assert!(!spi.registers().is_enabled());
    }

    #[test]
    fn test_transfer16_is_low_byte_first() {
        let regs = MockRegisters::new();
        regs.preload_rx(&[0x34, 0x12]);
        let mut spi = SpiBus::new(BusId::Spi0, regs, MockBoard::new());
        spi.begin(pins());

        assert_eq!(spi.transfer16(0xABCD), 0x1234);
        assert_eq!(spi.registers().wire().as_slice(), &[0xCD_u32, 0xAB]);
        assert_eq!(spi.registers().frame_count(), 1);
    }

    #[test]
    fn test_write_is_transmit_only() {
        let mut spi = loopback_bus();
        spi.write(&[0x01, 0x02, 0x03]);
        assert_eq!(spi.registers().wire().as_slice(), &[0x01_u32, 0x02, 0x03]);
        assert_eq!(spi.registers().chip_select(), 0);
        assert!(!spi.registers().is_enabled());
    }

    #[test]
    fn test_interrupt_hooks_are_inert() {
        let mut spi = loopback_bus();
        let accesses_before = spi.registers().accesses();
        let calls_before = spi.board().calls().len();

        spi.using_interrupt(4);
        spi.not_using_interrupt(4);
        spi.attach_interrupt();
        spi.detach_interrupt();
        spi.end();

        assert_eq!(spi.registers().accesses(), accesses_before);
        assert_eq!(spi.board().calls().len(), calls_before);
    }

    #[test]
    #[should_panic(expected = "begin() must be called")]
    fn test_transfer_before_begin_panics() {
        let mut spi = SpiBus::new(BusId::Spi0, MockRegisters::loopback(), MockBoard::new());
        spi.transfer(0x01);
    }

    #[test]
    fn test_embedded_hal_transfer_round_trips() {
        use embedded_hal::blocking::spi::Transfer;

        let mut spi = loopback_bus();
        let mut buf = [0xDEu8, 0xAD, 0xBE, 0xEF];
        Transfer::transfer(&mut spi, &mut buf).unwrap();
        assert_eq!(buf, [0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(spi.registers().wire().len(), 4);
    }

    #[test]
    fn test_embedded_hal_write_accepts_empty_buffers() {
        use embedded_hal::blocking::spi::Write;

        let mut spi = loopback_bus();
        let accesses_before = spi.registers().accesses();
        Write::write(&mut spi, &[]).unwrap();
        assert_eq!(spi.registers().accesses(), accesses_before);
    }
}
