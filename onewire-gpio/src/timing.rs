//! Time slot durations for both bus speeds.

/// Durations of the phases of the 1-Wire time slots, in nanoseconds.
///
/// Values follow the recommended timings of Maxim application note 126. Only the two
/// profiles [`TimingProfile::STANDARD`] and [`TimingProfile::OVERDRIVE`] exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingProfile {
    /// Low time opening a write-one or read slot.
    pub write_recovery_low: u32,
    /// Released time completing a write-one slot.
    pub write1_recovery_high: u32,
    /// Low time of a write-zero slot.
    pub write0_low: u32,
    /// Released time completing a write-zero slot.
    pub write0_recovery_high: u32,
    /// Delay between releasing a read slot and sampling the bus.
    pub read_recovery_low: u32,
    /// Remainder of the read slot after sampling.
    pub read_sample_window: u32,
    /// Delay before a reset pulse.
    pub reset_pre_delay: u32,
    /// Length of the reset pulse.
    pub reset_low_duration: u32,
    /// Delay between releasing the reset pulse and sampling the presence pulse.
    pub presence_sample_delay: u32,
    /// Remainder of the presence detect cycle after sampling.
    pub presence_recovery_delay: u32,
}

impl TimingProfile {
    /// Standard speed.
    pub const STANDARD: Self = Self {
        write_recovery_low: 6_000,
        write1_recovery_high: 64_000,
        write0_low: 60_000,
        write0_recovery_high: 10_000,
        read_recovery_low: 9_000,
        read_sample_window: 55_000,
        reset_pre_delay: 0,
        reset_low_duration: 480_000,
        presence_sample_delay: 70_000,
        presence_recovery_delay: 410_000,
    };

    /// Overdrive speed.
    pub const OVERDRIVE: Self = Self {
        write_recovery_low: 1_500,
        write1_recovery_high: 7_500,
        write0_low: 7_500,
        write0_recovery_high: 2_500,
        read_recovery_low: 750,
        read_sample_window: 7_000,
        reset_pre_delay: 2_500,
        reset_low_duration: 70_000,
        presence_sample_delay: 8_500,
        presence_recovery_delay: 40_000,
    };

    /// All ten durations in table order.
    pub const fn durations(&self) -> [u32; 10] {
        [
            self.write_recovery_low,
            self.write1_recovery_high,
            self.write0_low,
            self.write0_recovery_high,
            self.read_recovery_low,
            self.read_sample_window,
            self.reset_pre_delay,
            self.reset_low_duration,
            self.presence_sample_delay,
            self.presence_recovery_delay,
        ]
    }
}

/// Speed of the 1-Wire bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BusSpeed {
    /// Standard speed, about 15 kbps.
    #[default]
    Standard,
    /// Overdrive speed, about 110 kbps.
    Overdrive,
}

impl BusSpeed {
    /// Timing profile for this speed.
    pub fn timing(self) -> &'static TimingProfile {
        match self {
            BusSpeed::Standard => &TimingProfile::STANDARD,
            BusSpeed::Overdrive => &TimingProfile::OVERDRIVE,
        }
    }
}
