use core::fmt;

use crate::crc::crc8;

/// 64-bit ROM code of a 1-Wire device.
///
/// The value is stored little-endian, in the order the bits travel on the bus during a search:
///
/// | Bit | Description |
/// |-----|-------------|
/// | 0-7 | Family code (e.g., 0x28 for DS18B20) |
/// | 8-55 | Serial number, least significant byte first |
/// | 56-63 | CRC-8 of the first seven bytes |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rom(u64);

impl Rom {
    /// Wrap a raw ROM code.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Build a ROM code from its bytes in bus order (family code first).
    pub const fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_le_bytes(bytes))
    }

    /// Build a ROM code from a family code and a serial number, computing the CRC.
    pub fn with_serial(family: u8, serial: [u8; 6]) -> Self {
        let mut bytes = [family, 0, 0, 0, 0, 0, 0, 0];
        bytes[1..7].copy_from_slice(&serial);
        bytes[7] = crc8(&bytes[..7]);
        Self::from_bytes(bytes)
    }

    /// Raw 64-bit value.
    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// Bytes in bus order (family code first, CRC last).
    pub const fn to_bytes(&self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    /// Family code.
    pub const fn family(&self) -> u8 {
        self.to_bytes()[0]
    }

    /// Serial number, least significant byte first.
    pub fn serial(&self) -> [u8; 6] {
        let mut serial = [0; 6];
        serial.copy_from_slice(&self.to_bytes()[1..7]);
        serial
    }

    /// Stored CRC byte.
    pub const fn crc(&self) -> u8 {
        self.to_bytes()[7]
    }

    /// Whether the stored CRC matches the first seven bytes.
    pub fn is_valid(&self) -> bool {
        crc8(&self.to_bytes()[..7]) == self.crc()
    }
}

impl From<u64> for Rom {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<Rom> for u64 {
    fn from(rom: Rom) -> Self {
        rom.0
    }
}

impl From<[u8; 8]> for Rom {
    fn from(bytes: [u8; 8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl fmt::LowerHex for Rom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Rom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl fmt::Display for Rom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
