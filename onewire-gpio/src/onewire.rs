use crate::{BusSpeed, BusStatus, OneWireGpio, OneWirePin};
use embedded_hal::delay::DelayNs;
use onewire_core::{OneWire, OneWireError, OneWireResult, consts::ONEWIRE_SKIP_ROM_CMD_OD};

impl<P: OneWirePin, D: DelayNs> OneWireGpio<P, D> {
    fn wait(&mut self, ns: u32) {
        if ns > 0 {
            self.delay.delay_ns(ns);
        }
    }

    /// Pull the bus low.
    fn drive_low(&mut self) -> Result<(), P::Error> {
        self.pin.set_output()?;
        self.pin.write_level(false)
    }

    /// Switch every overdrive-capable device, and the master, to overdrive speed.
    ///
    /// Resets at standard speed and, if anything answered, sends the Overdrive-Skip ROM
    /// command, switches to the overdrive profile and resets again.
    ///
    /// Unlike the bare command sequence, which would leave the overdrive profile active, the
    /// master goes back to standard speed when nothing answers the overdrive reset: no device
    /// switched, so the bus is still at standard speed.
    ///
    /// # Returns
    /// Whether any device answered the overdrive reset. On `false` the master stays at (or
    /// returns to) standard speed.
    pub fn skip_overdrive(&mut self) -> OneWireResult<bool, P::Error> {
        self.speed = BusSpeed::Standard;
        if !self.reset()?.presence_detect() {
            return Ok(false);
        }
        self.write_byte(ONEWIRE_SKIP_ROM_CMD_OD)?;
        self.speed = BusSpeed::Overdrive;
        if !self.reset()?.presence_detect() {
            log::warn!("No device answered at overdrive speed");
            self.speed = BusSpeed::Standard;
            return Ok(false);
        }
        log::debug!("Switched to overdrive speed");
        Ok(true)
    }
}

impl<P: OneWirePin, D: DelayNs> OneWire for OneWireGpio<P, D> {
    type Status = BusStatus;

    type BusError = P::Error;

    fn reset(&mut self) -> OneWireResult<Self::Status, Self::BusError> {
        let timing = self.speed.timing();
        self.wait(timing.reset_pre_delay);
        self.pin.set_input()?;
        let short = !self.pin.read_level()?;
        self.drive_low()?;
        self.wait(timing.reset_low_duration);
        self.pin.set_input()?;
        self.wait(timing.presence_sample_delay);
        let presence = !self.pin.read_level()?;
        self.wait(timing.presence_recovery_delay);
        if short {
            log::warn!("Bus held low before reset");
        }
        Ok(BusStatus::new()
            .with_presence_detect(presence)
            .with_short_detect(short)
            .with_overdrive_speed(self.speed == BusSpeed::Overdrive))
    }

    fn write_bit(&mut self, bit: bool) -> OneWireResult<(), Self::BusError> {
        let timing = self.speed.timing();
        if bit {
            self.drive_low()?;
            self.wait(timing.write_recovery_low);
            self.pin.set_input()?;
            self.wait(timing.write1_recovery_high);
        } else {
            self.drive_low()?;
            self.wait(timing.write0_low);
            self.pin.set_input()?;
            self.wait(timing.write0_recovery_high);
        }
        Ok(())
    }

    fn read_bit(&mut self) -> OneWireResult<bool, Self::BusError> {
        let timing = self.speed.timing();
        self.drive_low()?;
        self.wait(timing.write_recovery_low);
        self.pin.set_input()?;
        self.wait(timing.read_recovery_low);
        let bit = self.pin.read_level()?;
        self.wait(timing.read_sample_window);
        Ok(bit)
    }

    fn get_overdrive_mode(&self) -> bool {
        self.speed == BusSpeed::Overdrive
    }

    fn set_overdrive_mode(&mut self, enable: bool) -> OneWireResult<(), Self::BusError> {
        if enable == self.get_overdrive_mode() {
            return Ok(()); // No change needed
        }
        if enable {
            if !self.skip_overdrive()? {
                return Err(OneWireError::NoDevicePresent);
            }
        } else {
            // A standard length reset returns every device to standard speed.
            self.speed = BusSpeed::Standard;
            self.reset()?;
            log::debug!("Switched to standard speed");
        }
        Ok(())
    }
}
