//! LED indicators and the write-only sink they are sent through

use crate::controls::Slot;
use crate::state::{AuxSend, EqBand, FunctionBank};
use std::collections::HashMap;

/// Transport row LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportLed {
    Rewind,
    FastForward,
    Stop,
    Play,
    Record,
}

#[cfg(test)]
impl TransportLed {
    pub const ALL: [TransportLed; 5] = [
        TransportLed::Rewind,
        TransportLed::FastForward,
        TransportLed::Stop,
        TransportLed::Play,
        TransportLed::Record,
    ];
}

/// Indicator groups of the device LED map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedGroup {
    Transport,
    Mute,
    Select,
    Rec,
    Null,
    Solo,
    BankLeft,
    BankRight,
    Eq,
    Aux,
    Function,
    Assign,
}

/// One LED on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    Transport(TransportLed),
    Mute(Slot),
    Select(Slot),
    Rec(Slot),
    Null,
    Solo,
    BankLeft,
    BankRight,
    Eq(EqBand),
    Aux(AuxSend),
    Function(FunctionBank),
    Assign,
}

impl Indicator {
    /// (group, index) pair as consumed by the device output
    pub fn address(self) -> (LedGroup, u8) {
        match self {
            Indicator::Transport(led) => (LedGroup::Transport, led as u8),
            Indicator::Mute(slot) => (LedGroup::Mute, slot.index() as u8),
            Indicator::Select(slot) => (LedGroup::Select, slot.index() as u8),
            Indicator::Rec(slot) => (LedGroup::Rec, slot.index() as u8),
            Indicator::Null => (LedGroup::Null, 0),
            Indicator::Solo => (LedGroup::Solo, 0),
            Indicator::BankLeft => (LedGroup::BankLeft, 0),
            Indicator::BankRight => (LedGroup::BankRight, 0),
            Indicator::Eq(band) => (LedGroup::Eq, band.index() as u8),
            Indicator::Aux(aux) => (LedGroup::Aux, aux.index() as u8),
            Indicator::Function(fb) => (LedGroup::Function, fb.index() as u8),
            Indicator::Assign => (LedGroup::Assign, 0),
        }
    }
}

/// Write-only device output
///
/// LED writes are idempotent; callers may resend freely.
pub trait LedSink {
    fn set_led(&mut self, indicator: Indicator, on: bool);

    /// Ask the device to report the physical position of a fader strip
    /// (0-7 channel faders, 8 master)
    fn request_fader_dump(&mut self, _strip: u8) {}
}

/// In-memory sink recording every write
#[derive(Debug, Default)]
pub struct LedLog {
    writes: Vec<(Indicator, bool)>,
    state: HashMap<Indicator, bool>,
    dumps: Vec<u8>,
}

impl LedLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Device-visible state of one LED (off if never written)
    pub fn is_on(&self, indicator: Indicator) -> bool {
        self.state.get(&indicator).copied().unwrap_or(false)
    }

    /// Snapshot of every LED written so far
    pub fn state(&self) -> &HashMap<Indicator, bool> {
        &self.state
    }

    pub fn fader_dumps(&self) -> &[u8] {
        &self.dumps
    }

    /// Writes that touched `indicator`
    pub fn writes_to(&self, indicator: Indicator) -> usize {
        self.writes.iter().filter(|(i, _)| *i == indicator).count()
    }

    pub fn clear(&mut self) {
        self.writes.clear();
        self.dumps.clear();
    }
}

impl LedSink for LedLog {
    fn set_led(&mut self, indicator: Indicator, on: bool) {
        self.writes.push((indicator, on));
        self.state.insert(indicator, on);
    }

    fn request_fader_dump(&mut self, strip: u8) {
        self.dumps.push(strip);
    }
}
