#[allow(unused_imports)]
use crate::OneWireSearch;

/// Errors of a 1-Wire transaction, generic over the error of the bus hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneWireError<E> {
    /// Error from the pin or bridge driving the bus.
    Other(E),
    /// Indicates that no device answered a reset with a presence pulse.
    NoDevicePresent,
    /// Indicates that the bus was already held low when a reset was about to start.
    ShortCircuit,
    /// During a [search](OneWireSearch::search), both an ROM bit and its complement read 1:
    /// no device answered where at least one was expected. The pass is abandoned.
    BusProtocolViolation,
    /// A [search](OneWireSearch::search) found more devices than it was allowed to.
    DeviceLimitExceeded,
    /// A CRC computed over a ROM code or a payload does not match its trailing CRC.
    ChecksumMismatch,
    /// Indicates that the operation is not implemented by this bus master.
    Unimplemented,
}

impl<E> From<E> for OneWireError<E> {
    fn from(other: E) -> Self {
        Self::Other(other)
    }
}
