//! Pin-level simulation of a 1-Wire bus.
//!
//! [`SimPin`] and [`SimDelay`] share one clock. Devices see the bus only through the length of
//! the low pulses the master generates: a long pulse is a reset, a short one opens a slot the
//! device may pull down (read) or sample as a one, a medium one is a written zero.

#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque, convert::Infallible, rc::Rc};

use embedded_hal::{delay::DelayNs, digital::ErrorType};
use onewire_gpio::{OneWirePin, Rom};

const SEARCH: u8 = 0xf0;
const ALARM_SEARCH: u8 = 0xec;
const READ_ROM: u8 = 0x33;
const MATCH_ROM: u8 = 0x55;
const SKIP_ROM: u8 = 0xcc;
const OVERDRIVE_SKIP: u8 = 0x3c;

/// Any pulse at least this long resets every device to standard speed.
const STANDARD_RESET_NS: u64 = 400_000;

fn reset_threshold(overdrive: bool) -> u64 {
    if overdrive { 48_000 } else { STANDARD_RESET_NS }
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Command { byte: u8, bits: u8 },
    Search { bit: u8, step: u8 },
    ReadRom { bit: u8 },
    MatchRom { bit: u8 },
    Selected { byte: u8, bits: u8 },
}

/// A device with a ROM code, answering the ROM commands.
#[derive(Debug, Clone)]
pub struct RomDevice {
    pub rom: u64,
    pub alarmed: bool,
    pub overdrive_capable: bool,
    pub overdrive: bool,
    /// Bytes received after being selected by a match or skip ROM command.
    pub received: Vec<u8>,
    phase: Phase,
}

impl RomDevice {
    pub fn new(rom: Rom) -> Self {
        Self {
            rom: rom.raw(),
            alarmed: false,
            overdrive_capable: false,
            overdrive: false,
            received: Vec::new(),
            phase: Phase::Idle,
        }
    }

    fn bit(&self, bit: u8) -> bool {
        (self.rom >> bit) & 0x1 == 0x1
    }

    fn reset(&mut self) {
        self.phase = Phase::Command { byte: 0, bits: 0 };
    }

    /// One time slot. Returns whether the device pulls the bus low.
    fn slot(&mut self, master: bool) -> bool {
        let (phase, pull) = match self.phase.clone() {
            Phase::Idle => (Phase::Idle, false),
            Phase::Command { byte, bits } => {
                let byte = byte | ((master as u8) << bits);
                let next = if bits < 7 {
                    Phase::Command { byte, bits: bits + 1 }
                } else {
                    self.command(byte)
                };
                (next, false)
            }
            Phase::Search { bit, step: 0 } => (Phase::Search { bit, step: 1 }, !self.bit(bit)),
            Phase::Search { bit, step: 1 } => (Phase::Search { bit, step: 2 }, self.bit(bit)),
            Phase::Search { bit, .. } => {
                let next = if master != self.bit(bit) || bit == 63 {
                    Phase::Idle
                } else {
                    Phase::Search { bit: bit + 1, step: 0 }
                };
                (next, false)
            }
            Phase::ReadRom { bit } => {
                let next = if bit == 63 {
                    Phase::Idle
                } else {
                    Phase::ReadRom { bit: bit + 1 }
                };
                (next, !self.bit(bit))
            }
            Phase::MatchRom { bit } => {
                let next = if master != self.bit(bit) {
                    Phase::Idle
                } else if bit == 63 {
                    Phase::Selected { byte: 0, bits: 0 }
                } else {
                    Phase::MatchRom { bit: bit + 1 }
                };
                (next, false)
            }
            Phase::Selected { byte, bits } => {
                let byte = byte | ((master as u8) << bits);
                let next = if bits < 7 {
                    Phase::Selected { byte, bits: bits + 1 }
                } else {
                    self.received.push(byte);
                    Phase::Selected { byte: 0, bits: 0 }
                };
                (next, false)
            }
        };
        self.phase = phase;
        pull
    }

    fn command(&mut self, cmd: u8) -> Phase {
        match cmd {
            SEARCH => Phase::Search { bit: 0, step: 0 },
            ALARM_SEARCH if self.alarmed => Phase::Search { bit: 0, step: 0 },
            READ_ROM => Phase::ReadRom { bit: 0 },
            MATCH_ROM => Phase::MatchRom { bit: 0 },
            SKIP_ROM => Phase::Selected { byte: 0, bits: 0 },
            OVERDRIVE_SKIP if self.overdrive_capable => {
                self.overdrive = true;
                Phase::Selected { byte: 0, bits: 0 }
            }
            _ => Phase::Idle,
        }
    }
}

/// Echoes back every group of `width` bits it receives.
#[derive(Debug, Clone)]
pub struct Loopback {
    width: usize,
    pending: VecDeque<bool>,
    sending: bool,
}

impl Loopback {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            pending: VecDeque::new(),
            sending: false,
        }
    }

    fn slot(&mut self, master: bool) -> bool {
        if self.sending {
            let bit = self.pending.pop_front().unwrap_or(true);
            self.sending = !self.pending.is_empty();
            !bit
        } else {
            self.pending.push_back(master);
            self.sending = self.pending.len() == self.width;
            false
        }
    }
}

#[derive(Debug, Clone)]
pub enum Device {
    Rom(RomDevice),
    Loopback(Loopback),
}

impl Device {
    fn overdrive(&self) -> bool {
        matches!(self, Device::Rom(dev) if dev.overdrive)
    }

    /// A pulse of `low_ns`. Returns whether the device pulls the bus low afterwards.
    fn pulse(&mut self, low_ns: u64) -> bool {
        let overdrive = self.overdrive();
        let zero_ns = if overdrive { 5_000 } else { 15_000 };
        if low_ns >= reset_threshold(overdrive) {
            match self {
                Device::Rom(dev) => {
                    if low_ns >= STANDARD_RESET_NS {
                        dev.overdrive = false;
                    }
                    dev.reset();
                }
                Device::Loopback(dev) => {
                    dev.pending.clear();
                    dev.sending = false;
                }
            }
            return true;
        }
        let master = low_ns < zero_ns;
        match self {
            Device::Rom(dev) => dev.slot(master),
            Device::Loopback(dev) => dev.slot(master),
        }
    }

    /// How long the device keeps the bus low after the master released it.
    fn hold_ns(&self) -> u64 {
        if self.overdrive() { 4_000 } else { 30_000 }
    }

    fn presence_hold_ns(&self) -> u64 {
        if self.overdrive() { 24_000 } else { 240_000 }
    }
}

#[derive(Debug, Default)]
struct BusState {
    now: u64,
    output: bool,
    master_low: bool,
    low_since: u64,
    held_until: u64,
    devices: Vec<Device>,
    resets: usize,
    /// Pulse lengths the master generated, oldest first.
    pulses: Vec<u64>,
}

impl BusState {
    fn pull(&mut self) {
        if !self.master_low {
            self.master_low = true;
            self.low_since = self.now;
            self.held_until = 0;
        }
    }

    fn release(&mut self) {
        if !self.master_low {
            return;
        }
        self.master_low = false;
        let low_ns = self.now - self.low_since;
        self.pulses.push(low_ns);
        if low_ns >= reset_threshold(self.devices.iter().any(Device::overdrive)) {
            self.resets += 1;
        }
        let mut hold = 0;
        for dev in self.devices.iter_mut() {
            let reset = low_ns >= reset_threshold(dev.overdrive());
            if dev.pulse(low_ns) {
                let ns = if reset {
                    dev.presence_hold_ns()
                } else {
                    dev.hold_ns()
                };
                hold = hold.max(ns);
            }
        }
        self.held_until = self.now + hold;
    }

    fn level(&self) -> bool {
        !(self.master_low || self.now < self.held_until)
    }
}

/// A simulated bus shared by a [`SimPin`] and a [`SimDelay`].
#[derive(Clone, Default)]
pub struct SimBus(Rc<RefCell<BusState>>);

impl SimBus {
    pub fn new(devices: Vec<Device>) -> Self {
        let state = BusState {
            devices,
            ..Default::default()
        };
        Self(Rc::new(RefCell::new(state)))
    }

    pub fn with_roms(roms: &[Rom]) -> Self {
        Self::new(roms.iter().map(|&rom| Device::Rom(RomDevice::new(rom))).collect())
    }

    pub fn pin(&self) -> SimPin {
        SimPin(self.0.clone())
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay(self.0.clone())
    }

    pub fn now(&self) -> u64 {
        self.0.borrow().now
    }

    pub fn resets(&self) -> usize {
        self.0.borrow().resets
    }

    pub fn pulses(&self) -> Vec<u64> {
        self.0.borrow().pulses.clone()
    }

    pub fn device(&self, index: usize) -> RomDevice {
        match &self.0.borrow().devices[index] {
            Device::Rom(dev) => dev.clone(),
            Device::Loopback(_) => panic!("device {index} is a loopback"),
        }
    }

    pub fn update(&self, index: usize, f: impl FnOnce(&mut RomDevice)) {
        if let Device::Rom(dev) = &mut self.0.borrow_mut().devices[index] {
            f(dev);
        }
    }

    /// Hold the bus low from the device side, as a shorted line would.
    pub fn short(&self) {
        self.0.borrow_mut().held_until = u64::MAX;
    }
}

pub struct SimPin(Rc<RefCell<BusState>>);

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OneWirePin for SimPin {
    fn set_output(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().output = true;
        Ok(())
    }

    fn set_input(&mut self) -> Result<(), Infallible> {
        let mut state = self.0.borrow_mut();
        state.output = false;
        state.release();
        Ok(())
    }

    fn write_level(&mut self, high: bool) -> Result<(), Infallible> {
        let mut state = self.0.borrow_mut();
        if state.output {
            if high {
                state.release();
            } else {
                state.pull();
            }
        }
        Ok(())
    }

    fn read_level(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.borrow().level())
    }
}

pub struct SimDelay(Rc<RefCell<BusState>>);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().now += ns as u64;
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
