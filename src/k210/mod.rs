//! K210 chip backend
//!
//! Memory-mapped implementation of [`SpiRegisters`] over the `k210-pac`
//! peripheral access crate. Each constructor consumes the corresponding
//! PAC peripheral singleton, so at most one handle per controller can
//! exist.
//!
//! [`SpiRegisters`]: crate::traits::SpiRegisters

mod registers;

pub use registers::K210Registers;
