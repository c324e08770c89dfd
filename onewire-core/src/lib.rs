#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
//! # onewire-core
//! Link and discovery layer for the 1-Wire bus.
//!
//! The [OneWire] trait captures the bit-level operations a bus master must provide (reset,
//! bit write, bit read) and builds the byte, touch, block and ROM-command operations on top
//! of them. Bus masters with hardware support for byte transfers may override the defaults.
//!
//! [OneWireSearch] discovers every device on the bus with a depth-first walk of the 64-bit
//! ROM space, and the [crc] module holds the 8-bit and 16-bit checksums used to validate
//! ROM codes and payloads.

pub mod consts;
pub mod crc;
mod error;
mod rom;
mod search;
mod traits;

pub use crc::{OneWireCrc, OneWireCrc16, crc8, crc16};
pub use error::OneWireError;
pub use rom::Rom;
pub use search::{DEFAULT_MAX_DEVICES, OneWireSearch, OneWireSearchKind};
pub use traits::{OneWire, OneWireStatus};

/// Result of 1-Wire operations.
pub type OneWireResult<T, E> = Result<T, OneWireError<E>>;
