//! ROM command codes shared by all 1-Wire devices.

/// Search ROM: walk the ROM codes of every device on the bus.
pub const ONEWIRE_SEARCH_CMD: u8 = 0xf0;

/// Read ROM: read the ROM code of the only device on the bus.
/// Devices answer simultaneously, so this is meaningless on a multidrop bus.
pub const ONEWIRE_READ_ROM_CMD: u8 = 0x33;

/// Match ROM: the following 64 bits select a single device.
pub const ONEWIRE_MATCH_ROM_CMD: u8 = 0x55;

/// Alarm search: like [ONEWIRE_SEARCH_CMD], but only devices with an alarm
/// condition take part.
pub const ONEWIRE_CONDITIONAL_SEARCH_CMD: u8 = 0xec;

/// Skip ROM: address every device on the bus at once.
pub const ONEWIRE_SKIP_ROM_CMD: u8 = 0xcc;

/// Overdrive-Skip ROM: address every device like [ONEWIRE_SKIP_ROM_CMD] and switch the
/// overdrive-capable ones to overdrive speed. They stay there until a reset pulse of at
/// least 480μs.
pub const ONEWIRE_SKIP_ROM_CMD_OD: u8 = 0x3c;
