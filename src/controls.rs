//! Physical controls of the US-428 surface
//!
//! Controls never hold host state. They relay edges and deltas to the router,
//! which keeps the last raw value of each so chorded gestures can poll them.

use crate::binding::BindingError;
use crate::state::{AuxSend, EqBand, FunctionBank};
use std::collections::HashMap;

/// Number of channel strips on the surface
pub const STRIP_COUNT: usize = 8;

/// Position of a channel strip (0-7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(u8);

impl Slot {
    pub const ALL: [Slot; STRIP_COUNT] = [
        Slot(0),
        Slot(1),
        Slot(2),
        Slot(3),
        Slot(4),
        Slot(5),
        Slot(6),
        Slot(7),
    ];

    pub fn new(index: usize) -> Result<Self, BindingError> {
        if index < STRIP_COUNT {
            Ok(Slot(index as u8))
        } else {
            Err(BindingError::SlotOutOfRange(index))
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0 + 1)
    }
}

/// How a control reports its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// 0 on release, >0 on press
    Button,
    /// Endless encoder, 7-bit two's-complement delta per message
    Relative,
    /// Fader, absolute 7-bit position
    Absolute,
}

/// Every physical input on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Control {
    Mute(Slot),
    Rec(Slot),
    Fader(Slot),
    MasterFader,
    Pan,
    JogWheel,
    EqGain,
    EqFreq,
    EqQ,
    EqButton(EqBand),
    Aux(AuxSend),
    Function(FunctionBank),
    Assign,
    Solo,
    RecMaster,
    Null,
    BankLeft,
    BankRight,
    Rewind,
    FastForward,
    Stop,
    Play,
    Record,
    LocateLeft,
    LocateRight,
    LocateSet,
}

impl Control {
    pub fn kind(self) -> ControlKind {
        match self {
            Control::Fader(_) | Control::MasterFader => ControlKind::Absolute,
            Control::Pan | Control::JogWheel | Control::EqGain | Control::EqFreq | Control::EqQ => {
                ControlKind::Relative
            }
            _ => ControlKind::Button,
        }
    }

    /// Buttons whose release edge carries meaning
    pub fn is_level_sensitive(self) -> bool {
        matches!(self, Control::FastForward | Control::Rewind)
    }

    /// Every control, in surface order
    pub fn all() -> Vec<Control> {
        let mut controls = Vec::with_capacity(64);
        controls.extend(Slot::ALL.iter().map(|&s| Control::Mute(s)));
        controls.extend(Slot::ALL.iter().map(|&s| Control::Rec(s)));
        controls.extend(Slot::ALL.iter().map(|&s| Control::Fader(s)));
        controls.extend([
            Control::MasterFader,
            Control::Pan,
            Control::JogWheel,
            Control::EqGain,
            Control::EqFreq,
            Control::EqQ,
        ]);
        controls.extend(EqBand::ALL.iter().map(|&b| Control::EqButton(b)));
        controls.extend(AuxSend::ALL.iter().map(|&a| Control::Aux(a)));
        controls.extend(FunctionBank::ALL.iter().map(|&f| Control::Function(f)));
        controls.extend([
            Control::Assign,
            Control::Solo,
            Control::RecMaster,
            Control::Null,
            Control::BankLeft,
            Control::BankRight,
            Control::Rewind,
            Control::FastForward,
            Control::Stop,
            Control::Play,
            Control::Record,
            Control::LocateLeft,
            Control::LocateRight,
            Control::LocateSet,
        ]);
        controls
    }
}

/// Decode a 7-bit two's-complement relative value
pub fn relative_delta(raw: u8) -> i32 {
    let raw = raw & 0x7F;
    if raw < 0x40 {
        raw as i32
    } else {
        raw as i32 - 0x80
    }
}

/// Last raw value seen from every control
///
/// Lets a handler poll another control out-of-band (stop held during rewind).
#[derive(Debug, Default)]
pub struct ControlStates {
    values: HashMap<Control, u8>,
}

impl ControlStates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new raw value, returning the previous one (0 if never seen)
    pub fn record(&mut self, control: Control, raw: u8) -> u8 {
        self.values.insert(control, raw).unwrap_or(0)
    }

    pub fn raw(&self, control: Control) -> u8 {
        self.values.get(&control).copied().unwrap_or(0)
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.raw(control) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_range() {
        assert_eq!(Slot::new(7).map(Slot::index).ok(), Some(7));
        assert!(matches!(Slot::new(8), Err(BindingError::SlotOutOfRange(8))));
    }

    #[test]
    fn test_relative_delta_twos_complement() {
        assert_eq!(relative_delta(0x01), 1);
        assert_eq!(relative_delta(0x3F), 63);
        assert_eq!(relative_delta(0x7F), -1);
        assert_eq!(relative_delta(0x41), -63);
        assert_eq!(relative_delta(0x00), 0);
    }

    #[test]
    fn test_control_kinds() {
        assert_eq!(Control::Fader(Slot::ALL[0]).kind(), ControlKind::Absolute);
        assert_eq!(Control::JogWheel.kind(), ControlKind::Relative);
        assert_eq!(Control::Stop.kind(), ControlKind::Button);
        assert!(Control::Rewind.is_level_sensitive());
        assert!(!Control::Play.is_level_sensitive());
    }

    #[test]
    fn test_control_states_polling() {
        let mut states = ControlStates::new();
        assert!(!states.is_held(Control::Stop));

        assert_eq!(states.record(Control::Stop, 127), 0);
        assert!(states.is_held(Control::Stop));

        assert_eq!(states.record(Control::Stop, 0), 127);
        assert!(!states.is_held(Control::Stop));
    }

    #[test]
    fn test_all_controls_unique() {
        let all = Control::all();
        let unique: std::collections::HashSet<_> = all.iter().collect();
        assert_eq!(all.len(), unique.len());
        assert_eq!(all.len(), 8 * 3 + 6 + 4 + 4 + 3 + 14);
    }
}
