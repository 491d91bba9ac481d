//! Control mapping for the US-428 CC layout
//!
//! Every physical control reports on one Control Change number of the
//! surface channel. The table below is the single source for both lookup
//! directions.

use crate::controls::{Control, Slot};
use crate::state::{AuxSend, EqBand, FunctionBank};
use std::collections::HashMap;
use std::sync::OnceLock;

const MUTE_BASE: u8 = 0;
const REC_BASE: u8 = 32;
const FADER_BASE: u8 = 64;
const EQ_BUTTON_BASE: u8 = 44;
const AUX_BASE: u8 = 48;
const FUNCTION_BASE: u8 = 53;

/// Fixed (cc, control) pairs outside the per-strip rows
const FIXED: [(u8, Control); 20] = [
    (16, Control::BankLeft),
    (17, Control::BankRight),
    (19, Control::Rewind),
    (20, Control::FastForward),
    (21, Control::Stop),
    (22, Control::Play),
    (23, Control::Record),
    (24, Control::LocateLeft),
    (25, Control::LocateRight),
    (26, Control::LocateSet),
    (40, Control::Null),
    (41, Control::RecMaster),
    (42, Control::Solo),
    (52, Control::Assign),
    (72, Control::EqGain),
    (73, Control::EqFreq),
    (74, Control::EqQ),
    (75, Control::MasterFader),
    (77, Control::Pan),
    (96, Control::JogWheel),
];

/// Bidirectional CC lookup
#[derive(Debug, Clone)]
pub struct ControlMap {
    by_cc: HashMap<u8, Control>,
    by_control: HashMap<Control, u8>,
}

impl ControlMap {
    fn build() -> Self {
        let mut pairs: Vec<(u8, Control)> = FIXED.to_vec();
        for slot in Slot::ALL {
            let offset = slot.index() as u8;
            pairs.push((MUTE_BASE + offset, Control::Mute(slot)));
            pairs.push((REC_BASE + offset, Control::Rec(slot)));
            pairs.push((FADER_BASE + offset, Control::Fader(slot)));
        }
        for band in EqBand::ALL {
            pairs.push((EQ_BUTTON_BASE + band.index() as u8, Control::EqButton(band)));
        }
        for aux in AuxSend::ALL {
            pairs.push((AUX_BASE + aux.index() as u8, Control::Aux(aux)));
        }
        for fb in FunctionBank::ALL {
            pairs.push((FUNCTION_BASE + fb.index() as u8, Control::Function(fb)));
        }

        Self {
            by_cc: pairs.iter().copied().collect(),
            by_control: pairs.iter().map(|&(cc, c)| (c, cc)).collect(),
        }
    }

    /// Control reporting on `cc`, `None` for unused numbers
    pub fn control_for_cc(&self, cc: u8) -> Option<Control> {
        self.by_cc.get(&cc).copied()
    }

    pub fn cc_for_control(&self, control: Control) -> Option<u8> {
        self.by_control.get(&control).copied()
    }

    pub fn len(&self) -> usize {
        self.by_cc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_cc.is_empty()
    }
}

static DEFAULT_MAP: OnceLock<ControlMap> = OnceLock::new();

/// Shared US-428 control map
pub fn us428_map() -> &'static ControlMap {
    DEFAULT_MAP.get_or_init(ControlMap::build)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_control_has_a_cc() {
        let map = us428_map();
        for control in Control::all() {
            assert!(
                map.cc_for_control(control).is_some(),
                "{:?} has no CC",
                control
            );
        }
        assert_eq!(map.len(), Control::all().len());
    }

    #[test]
    fn test_known_cc_numbers() {
        let map = us428_map();
        assert_eq!(map.control_for_cc(0), Some(Control::Mute(Slot::ALL[0])));
        assert_eq!(map.control_for_cc(39), Some(Control::Rec(Slot::ALL[7])));
        assert_eq!(map.control_for_cc(44), Some(Control::EqButton(EqBand::High)));
        assert_eq!(map.control_for_cc(47), Some(Control::EqButton(EqBand::Low)));
        assert_eq!(map.control_for_cc(51), Some(Control::Aux(AuxSend::Aux4)));
        assert_eq!(
            map.control_for_cc(54),
            Some(Control::Function(FunctionBank::F2))
        );
        assert_eq!(map.control_for_cc(71), Some(Control::Fader(Slot::ALL[7])));
        assert_eq!(map.control_for_cc(96), Some(Control::JogWheel));
    }

    #[test]
    fn test_unused_cc_numbers() {
        let map = us428_map();
        for cc in [8, 18, 27, 43, 76, 97, 127] {
            assert_eq!(map.control_for_cc(cc), None, "cc {}", cc);
        }
    }
}
