use bitfield_struct::bitfield;
use onewire_core::OneWireStatus;

/// Bus status captured by a [reset](onewire_core::OneWire::reset).
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct BusStatus {
    /// A device pulled the bus low during the presence detect window.
    pub presence_detect: bool,
    /// The bus was already low before the reset pulse: the line is shorted
    /// or a device is holding it.
    pub short_detect: bool,
    /// The reset was issued with the overdrive timing profile.
    pub overdrive_speed: bool,
    #[bits(5)]
    __: u8,
}

impl OneWireStatus for BusStatus {
    fn presence(&self) -> bool {
        self.presence_detect()
    }

    fn shortcircuit(&self) -> bool {
        self.short_detect()
    }
}
