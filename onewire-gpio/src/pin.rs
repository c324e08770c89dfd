use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Drive strength of the bus pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriveStrength {
    /// 2 mA
    Ma2,
    /// 4 mA
    #[default]
    Ma4,
    /// 8 mA
    Ma8,
}

/// Electrical configuration of the bus pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PullMode {
    /// Open drain, relying on an external pull-up resistor.
    OpenDrain,
    /// Open drain with the internal weak pull-up enabled.
    #[default]
    OpenDrainWeakPullUp,
}

/// The GPIO line carrying the 1-Wire bus.
///
/// The bus is open drain: the master only ever drives it low, and releases it by switching
/// the pin to input so the pull-up (or a device) sets the level.
pub trait OneWirePin: ErrorType {
    /// Switch the pin to output.
    fn set_output(&mut self) -> Result<(), Self::Error>;

    /// Switch the pin to input, releasing the bus.
    fn set_input(&mut self) -> Result<(), Self::Error>;

    /// Set the output level. Only meaningful while the pin is an output.
    fn write_level(&mut self, high: bool) -> Result<(), Self::Error>;

    /// Read the level of the bus.
    fn read_level(&mut self) -> Result<bool, Self::Error>;

    /// Configure drive strength and pull mode.
    fn configure_pull(
        &mut self,
        _strength: DriveStrength,
        _mode: PullMode,
    ) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Adapts a pin already configured as open drain by the HAL, which can be read while it
/// outputs high.
///
/// Releasing the bus drives the pin high; pulling it low drives it low. Direction changes and
/// pull configuration are left to the HAL.
#[derive(Debug)]
pub struct OpenDrainPin<P> {
    pin: P,
    output: bool,
}

impl<P> OpenDrainPin<P> {
    /// Wrap an open-drain pin.
    pub fn new(pin: P) -> Self {
        Self { pin, output: false }
    }

    /// Give the pin back.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: ErrorType> ErrorType for OpenDrainPin<P> {
    type Error = P::Error;
}

impl<P: InputPin + OutputPin> OneWirePin for OpenDrainPin<P> {
    fn set_output(&mut self) -> Result<(), Self::Error> {
        self.output = true;
        Ok(())
    }

    fn set_input(&mut self) -> Result<(), Self::Error> {
        self.output = false;
        self.pin.set_high()
    }

    fn write_level(&mut self, high: bool) -> Result<(), Self::Error> {
        if !self.output {
            return Ok(());
        }
        if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        }
    }

    fn read_level(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }
}
