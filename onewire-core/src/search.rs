use heapless::Vec;

use crate::{
    OneWire, OneWireStatus, Rom,
    consts::{ONEWIRE_CONDITIONAL_SEARCH_CMD, ONEWIRE_SEARCH_CMD},
    error::OneWireError,
};

/// Number of devices a [`OneWireSearch`] accepts before giving up, unless configured otherwise.
pub const DEFAULT_MAX_DEVICES: usize = 50;

/// A structure for searching devices on a 1-Wire bus.
///
/// One [search](OneWireSearch::search) walks the binary tree of the 64-bit ROM space
/// depth-first, zero branch first. Every bus reset restarts the devices' vote, and a stack of
/// pending discrepancies steers each walk towards the branches not taken yet.
pub struct OneWireSearch<'a, T> {
    onewire: &'a mut T,
    kind: OneWireSearchKind,
    max_devices: usize,
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Type of search performed using [`OneWireSearch`].
pub enum OneWireSearchKind {
    /// Normal search
    Normal = ONEWIRE_SEARCH_CMD,
    /// Search only for devices with alarm
    Alarmed = ONEWIRE_CONDITIONAL_SEARCH_CMD,
}

impl<T> core::fmt::Debug for OneWireSearch<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OneWireSearch")
            .field("kind", &self.kind)
            .field("max_devices", &self.max_devices)
            .finish()
    }
}

impl<'a, T> OneWireSearch<'a, T> {
    /// Creates a new [`OneWireSearch`] instance.
    ///
    /// # Arguments
    /// * `onewire` - A mutable reference to a type that implements the `OneWire` trait.
    /// * `kind` - Whether every device or only devices in alarm state take part.
    pub fn new(onewire: &'a mut T, kind: OneWireSearchKind) -> Self {
        Self {
            onewire,
            kind,
            max_devices: DEFAULT_MAX_DEVICES,
        }
    }

    /// Sets the number of devices after which the search is abandoned with
    /// [`OneWireError::DeviceLimitExceeded`].
    pub fn with_max_devices(mut self, max_devices: usize) -> Self {
        self.max_devices = max_devices;
        self
    }
}

impl<T: OneWire> OneWireSearch<'_, T> {
    /// Searches for devices on the 1-Wire bus and returns every ROM code found, in the order
    /// they were found.
    ///
    /// The search gives up once more than `max_devices` devices were found while branches are
    /// still pending; the last walk completing the tree is always accepted. At most `N` ROM codes
    /// fit in the result. Each call is a self-contained pass starting from a fresh reset; a
    /// failed pass leaves nothing behind and can be retried.
    ///
    /// # Errors
    /// * [`OneWireError::NoDevicePresent`] if a reset is not answered.
    /// * [`OneWireError::ShortCircuit`] if the bus is held low.
    /// * [`OneWireError::BusProtocolViolation`] if no device answers a ROM bit.
    /// * [`OneWireError::ChecksumMismatch`] if a ROM code assembled from the bus does not check.
    /// * [`OneWireError::DeviceLimitExceeded`] if more than `max_devices` devices are found with
    ///   branches left to walk, or the result is full.
    pub fn search<const N: usize>(&mut self) -> Result<Vec<Rom, N>, OneWireError<T::BusError>> {
        let mut found: Vec<Rom, N> = Vec::new();
        // Positions where the zero branch was taken and the one branch is still pending,
        // strictly increasing from bottom to top.
        let mut stack: Vec<u8, 64> = Vec::new();
        let mut rom: u64 = 0;

        loop {
            let status = self.onewire.reset()?;
            if !status.presence() {
                return Err(OneWireError::NoDevicePresent);
            }
            if status.shortcircuit() {
                return Err(OneWireError::ShortCircuit);
            }
            self.onewire.write_byte(self.kind as u8)?;

            for id_bit_num in 0..64u8 {
                let mask = 1u64 << id_bit_num;
                let id_bit = self.onewire.read_bit()?;
                let complement_bit = self.onewire.read_bit()?;

                let dir = if id_bit && complement_bit {
                    if self.kind == OneWireSearchKind::Alarmed
                        && id_bit_num == 0
                        && found.is_empty()
                        && stack.is_empty()
                    {
                        log::debug!("No device in alarm state");
                        return Ok(found);
                    }
                    log::warn!("No device answered bit {id_bit_num} of the search");
                    return Err(OneWireError::BusProtocolViolation);
                } else if id_bit != complement_bit {
                    // Every remaining device agrees on this bit.
                    id_bit
                } else {
                    match stack.last().copied() {
                        Some(top) if id_bit_num == top => {
                            stack.pop();
                            true
                        }
                        // Follow the path of the previous walk.
                        Some(top) if id_bit_num < top => rom & mask != 0,
                        _ => {
                            log::trace!("Discrepancy at bit {id_bit_num}");
                            stack
                                .push(id_bit_num)
                                .map_err(|_| OneWireError::BusProtocolViolation)?;
                            false
                        }
                    }
                };

                self.onewire.write_bit(dir)?;
                if dir {
                    rom |= mask;
                } else {
                    rom &= !mask;
                }
            }

            let device = Rom::new(rom);
            if !device.is_valid() {
                log::warn!("Invalid CRC for ROM {device}");
                return Err(OneWireError::ChecksumMismatch);
            }
            log::debug!("Found device {device}");
            found.push(device).map_err(|_| {
                log::warn!("No room for more than {} devices", N);
                OneWireError::DeviceLimitExceeded
            })?;

            if stack.is_empty() {
                break;
            }
            if found.len() > self.max_devices {
                log::warn!("Search abandoned after {} devices", found.len());
                return Err(OneWireError::DeviceLimitExceeded);
            }
        }

        Ok(found)
    }
}
