#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]

/*! # onewire-gpio
 *
 * A bit-banged 1-Wire bus master. Every time slot is generated in software on a single
 * open-drain GPIO, timed with busy waits from a [`DelayNs`](embedded_hal::delay::DelayNs)
 * implementation. The master implements [`OneWire`], so byte transfers, ROM commands and the
 * [`OneWireSearch`] work on top of it.
 *
 * The pin is reached through the [`OneWirePin`] trait; [`OpenDrainPin`] adapts any
 * `embedded-hal` open-drain pin.
 */

pub use onewire_core::{
    OneWire, OneWireError, OneWireResult, OneWireSearch, OneWireSearchKind, OneWireStatus, Rom,
};
mod onewire;
mod pin;
mod status;
mod timing;

pub use pin::{DriveStrength, OneWirePin, OpenDrainPin, PullMode};
pub use status::BusStatus;
pub use timing::{BusSpeed, TimingProfile};

use embedded_hal::delay::DelayNs;

/// A 1-Wire bus master driving a GPIO.
///
/// Takes ownership of the bus pin (implementing [`OneWirePin`]) and a timer object implementing
/// the [`DelayNs`](embedded_hal::delay::DelayNs) trait. Nothing else may touch the pin while
/// the master exists.
pub struct OneWireGpio<P, D> {
    pub(crate) pin: P,
    pub(crate) delay: D,
    pub(crate) speed: BusSpeed,
}

/// Builder for creating a [`OneWireGpio`] instance with custom configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneWireGpioBuilder {
    pub(crate) speed: BusSpeed,
    pub(crate) strength: DriveStrength,
    pub(crate) mode: PullMode,
}

impl OneWireGpioBuilder {
    /// Sets the initial bus speed. Devices only follow a switch to overdrive after an
    /// overdrive skip command, see [`OneWireGpio::skip_overdrive`].
    pub fn with_speed(mut self, speed: BusSpeed) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the drive strength of the pin.
    pub fn with_drive_strength(mut self, strength: DriveStrength) -> Self {
        self.strength = strength;
        self
    }

    /// Sets the pull mode of the pin.
    pub fn with_pull_mode(mut self, mode: PullMode) -> Self {
        self.mode = mode;
        self
    }

    /// Configures the pin, releases the bus and builds the master.
    pub fn build<P: OneWirePin, D: DelayNs>(
        self,
        pin: P,
        delay: D,
    ) -> Result<OneWireGpio<P, D>, P::Error> {
        let mut dev = OneWireGpio {
            pin,
            delay,
            speed: self.speed,
        };
        dev.pin.configure_pull(self.strength, self.mode)?;
        dev.pin.set_input()?;
        Ok(dev)
    }
}

impl<P, D> OneWireGpio<P, D> {
    /// Current bus speed.
    pub fn speed(&self) -> BusSpeed {
        self.speed
    }

    /// Timing profile in use.
    pub fn timing(&self) -> &'static TimingProfile {
        self.speed.timing()
    }

    /// Give back the pin and the delay.
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

impl<P: OneWirePin, D: DelayNs> OneWireGpio<P, D> {
    /// Creates a master on standard speed with the default pin configuration.
    pub fn new(pin: P, delay: D) -> Result<Self, P::Error> {
        OneWireGpioBuilder::default().build(pin, delay)
    }
}
