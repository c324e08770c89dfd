use crate::{
    OneWireCrc, OneWireError, OneWireResult, Rom,
    consts::{ONEWIRE_MATCH_ROM_CMD, ONEWIRE_READ_ROM_CMD, ONEWIRE_SKIP_ROM_CMD},
};

/// Status of the bus as observed during a reset.
pub trait OneWireStatus {
    /// Whether at least one device answered the reset with a presence pulse.
    fn presence(&self) -> bool;

    /// Whether the bus was found shorted to ground.
    fn shortcircuit(&self) -> bool {
        false
    }
}

impl OneWireStatus for bool {
    fn presence(&self) -> bool {
        *self
    }
}

/// A 1-Wire bus master.
///
/// A bus master provides [reset](OneWire::reset), [write_bit](OneWire::write_bit) and
/// [read_bit](OneWire::read_bit). Every other operation is built on top of them, least
/// significant bit first, and may be overridden by masters that transfer whole bytes in
/// hardware.
pub trait OneWire {
    /// What a [reset](OneWire::reset) reports.
    type Status: OneWireStatus;
    /// Error raised by the pin or bridge the master drives.
    type BusError;

    /// Issues a reset pulse and samples the presence window.
    ///
    /// An empty bus is not an error: it is reported through [OneWireStatus::presence].
    ///
    /// # Errors
    /// Only hardware failures.
    fn reset(&mut self) -> OneWireResult<Self::Status, Self::BusError>;

    /// Generates one write time slot.
    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError>;

    /// Generates one read time slot and returns the sampled level.
    ///
    /// The addressed devices must have been told to send something beforehand, otherwise
    /// the pull-up is read and the result is `true`.
    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError>;

    /// Writes a byte to the 1-Wire bus, least significant bit first.
    fn write_byte(&mut self, byte: u8) -> OneWireResult<(), Self::BusError> {
        let mut byte = byte;
        for _ in 0..8 {
            self.write_bit(byte & 0x1 == 0x1)?;
            byte >>= 1;
        }
        Ok(())
    }

    /// Reads a byte from the 1-Wire bus, least significant bit first.
    fn read_byte(&mut self) -> OneWireResult<u8, Self::BusError> {
        let mut byte = 0;
        for _ in 0..8 {
            byte >>= 1;
            if self.read_bit()? {
                byte |= 0x80;
            }
        }
        Ok(byte)
    }

    /// Writes a byte and samples the bus at the same time.
    ///
    /// Every `1` bit is sent as a read time slot, so a device may pull it down; every `0`
    /// bit is written and read back as `0`.
    fn touch_byte(&mut self, byte: u8) -> OneWireResult<u8, Self::BusError> {
        let mut byte = byte;
        let mut result = 0;
        for _ in 0..8 {
            result >>= 1;
            if byte & 0x1 == 0x1 {
                if self.read_bit()? {
                    result |= 0x80;
                }
            } else {
                self.write_bit(false)?;
            }
            byte >>= 1;
        }
        Ok(result)
    }

    /// [Touches](OneWire::touch_byte) every byte of `buf` in order, replacing it with the
    /// sampled value.
    fn block(&mut self, buf: &mut [u8]) -> OneWireResult<(), Self::BusError> {
        for byte in buf.iter_mut() {
            *byte = self.touch_byte(*byte)?;
        }
        Ok(())
    }

    /// Writes every byte of `bytes` to the bus.
    fn write_bytes(&mut self, bytes: &[u8]) -> OneWireResult<(), Self::BusError> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Fills `buf` with bytes read from the bus.
    fn read_bytes(&mut self, buf: &mut [u8]) -> OneWireResult<(), Self::BusError> {
        for byte in buf.iter_mut() {
            *byte = self.read_byte()?;
        }
        Ok(())
    }

    /// Fills `buf` with bytes read from the bus and checks that the last byte is the CRC-8
    /// of the others, as in a scratchpad read.
    ///
    /// # Errors
    /// [OneWireError::ChecksumMismatch] if the CRC does not match.
    fn read_validated(&mut self, buf: &mut [u8]) -> OneWireResult<(), Self::BusError> {
        self.read_bytes(buf)?;
        if OneWireCrc::validate(buf) {
            Ok(())
        } else {
            log::warn!("CRC mismatch on {} byte read", buf.len());
            Err(OneWireError::ChecksumMismatch)
        }
    }

    /// Selects the device with the given ROM code. Must follow a reset.
    fn match_rom(&mut self, rom: &Rom) -> OneWireResult<(), Self::BusError> {
        self.write_byte(ONEWIRE_MATCH_ROM_CMD)?;
        self.write_bytes(&rom.to_bytes())
    }

    /// Selects every device on the bus. Must follow a reset.
    fn skip_rom(&mut self) -> OneWireResult<(), Self::BusError> {
        self.write_byte(ONEWIRE_SKIP_ROM_CMD)
    }

    /// Reads the ROM code of the only device on the bus.
    ///
    /// # Errors
    /// [OneWireError::NoDevicePresent] if nothing answers the reset, and
    /// [OneWireError::ChecksumMismatch] if the ROM code does not check, which is also what
    /// happens when more than one device answers.
    fn read_rom(&mut self) -> OneWireResult<Rom, Self::BusError> {
        if !self.reset()?.presence() {
            return Err(OneWireError::NoDevicePresent);
        }
        self.write_byte(ONEWIRE_READ_ROM_CMD)?;
        let mut bytes = [0; 8];
        self.read_validated(&mut bytes)?;
        Ok(Rom::from_bytes(bytes))
    }

    /// Resets the bus and selects one device by its ROM code, or every device with `None`.
    ///
    /// Reading after selecting every device on a multi-drop bus yields the wired AND of
    /// their answers.
    ///
    /// # Errors
    /// [OneWireError::ShortCircuit] if the bus is held low, [OneWireError::NoDevicePresent]
    /// if nothing answers the reset.
    fn address(&mut self, rom: Option<&Rom>) -> OneWireResult<(), Self::BusError> {
        let status = self.reset()?;
        if status.shortcircuit() {
            return Err(OneWireError::ShortCircuit);
        }
        if !status.presence() {
            return Err(OneWireError::NoDevicePresent);
        }
        match rom {
            Some(rom) => self.match_rom(rom),
            None => self.skip_rom(),
        }
    }

    /// Whether the master runs at overdrive speed.
    fn get_overdrive_mode(&self) -> bool {
        false
    }

    /// Switches the master, and the devices that support it, to or from overdrive speed.
    ///
    /// # Errors
    /// [OneWireError::Unimplemented] unless the master supports overdrive.
    fn set_overdrive_mode(&mut self, _enable: bool) -> OneWireResult<(), Self::BusError> {
        Err(OneWireError::Unimplemented)
    }
}
