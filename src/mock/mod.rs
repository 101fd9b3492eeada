//! Mock hardware for testing
//!
//! This module provides recording implementations of the two hardware
//! traits so the transfer engine and bus façade can be exercised without
//! a chip: a simulated controller register file with real FIFO
//! semantics, and a board-support stub that logs every bring-up call.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled

#![cfg(any(test, feature = "mock"))]

mod board;
mod registers;

pub use board::{BoardCall, MockBoard};
pub use registers::MockRegisters;
