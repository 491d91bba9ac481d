//! Mode state - the single record holding every mode dimension
//!
//! Only the router writes to it. Every write returns a [`ModeChange`] so the
//! caller can re-activate dependent bindings and redraw LEDs before the next
//! event is dispatched.

use super::types::{
    AssignMode, AuxSend, Dimension, EqBand, FunctionBank, ModeChange, ModeValue, SoloMode,
};

/// Current value of each mode dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModeState {
    bank: FunctionBank,
    assign: AssignMode,
    solo: SoloMode,
    eq_band: EqBand,
    aux: AuxSend,
}

impl ModeState {
    /// Startup defaults: F1, Normal, Mute, Low, Aux1
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dimension: Dimension) -> ModeValue {
        match dimension {
            Dimension::FunctionBank => ModeValue::FunctionBank(self.bank),
            Dimension::AssignMode => ModeValue::AssignMode(self.assign),
            Dimension::SoloMode => ModeValue::SoloMode(self.solo),
            Dimension::EqBand => ModeValue::EqBand(self.eq_band),
            Dimension::Aux => ModeValue::Aux(self.aux),
        }
    }

    /// Write one dimension
    ///
    /// Re-selecting the current value still yields a change record; callers
    /// redraw unconditionally since LED writes are idempotent.
    pub fn set(&mut self, value: ModeValue) -> ModeChange {
        let previous = self.get(value.dimension());
        match value {
            ModeValue::FunctionBank(bank) => self.bank = bank,
            ModeValue::AssignMode(assign) => self.assign = assign,
            ModeValue::SoloMode(solo) => self.solo = solo,
            ModeValue::EqBand(band) => self.eq_band = band,
            ModeValue::Aux(aux) => self.aux = aux,
        }
        ModeChange {
            previous,
            current: value,
        }
    }

    pub fn toggle_assign(&mut self) -> ModeChange {
        self.set(ModeValue::AssignMode(self.assign.toggled()))
    }

    pub fn toggle_solo(&mut self) -> ModeChange {
        self.set(ModeValue::SoloMode(self.solo.toggled()))
    }

    pub fn bank(&self) -> FunctionBank {
        self.bank
    }

    pub fn assign(&self) -> AssignMode {
        self.assign
    }

    pub fn solo(&self) -> SoloMode {
        self.solo
    }

    pub fn eq_band(&self) -> EqBand {
        self.eq_band
    }

    pub fn aux(&self) -> AuxSend {
        self.aux
    }

    pub fn is_assign(&self) -> bool {
        self.assign == AssignMode::Assign
    }

    pub fn is_solo(&self) -> bool {
        self.solo == SoloMode::Solo
    }

    /// Every reachable combination of the five dimensions
    pub fn combinations() -> impl Iterator<Item = ModeState> {
        FunctionBank::ALL.into_iter().flat_map(|bank| {
            AssignMode::ALL.into_iter().flat_map(move |assign| {
                SoloMode::ALL.into_iter().flat_map(move |solo| {
                    EqBand::ALL.into_iter().flat_map(move |eq_band| {
                        AuxSend::ALL.into_iter().map(move |aux| ModeState {
                            bank,
                            assign,
                            solo,
                            eq_band,
                            aux,
                        })
                    })
                })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let modes = ModeState::new();
        assert_eq!(modes.bank(), FunctionBank::F1);
        assert_eq!(modes.assign(), AssignMode::Normal);
        assert_eq!(modes.solo(), SoloMode::Mute);
        assert_eq!(modes.eq_band(), EqBand::Low);
        assert_eq!(modes.aux(), AuxSend::Aux1);
    }

    #[test]
    fn test_set_reports_previous_value() {
        let mut modes = ModeState::new();
        let change = modes.set(ModeValue::FunctionBank(FunctionBank::F3));

        assert_eq!(change.previous, ModeValue::FunctionBank(FunctionBank::F1));
        assert_eq!(change.current, ModeValue::FunctionBank(FunctionBank::F3));
        assert_eq!(change.dimension(), Dimension::FunctionBank);
        assert!(change.is_transition());
        assert_eq!(modes.get(Dimension::FunctionBank), change.current);
    }

    #[test]
    fn test_dimensions_are_independent() {
        let mut modes = ModeState::new();
        modes.set(ModeValue::EqBand(EqBand::High));
        modes.toggle_assign();
        modes.toggle_solo();

        assert_eq!(modes.bank(), FunctionBank::F1);
        assert_eq!(modes.aux(), AuxSend::Aux1);
        assert_eq!(modes.eq_band(), EqBand::High);
        assert!(modes.is_assign());
        assert!(modes.is_solo());
    }

    #[test]
    fn test_reselect_is_not_a_transition() {
        let mut modes = ModeState::new();
        let change = modes.set(ModeValue::Aux(AuxSend::Aux1));
        assert!(!change.is_transition());
    }

    #[test]
    fn test_combinations_cover_product_space() {
        let all: std::collections::HashSet<_> = ModeState::combinations().collect();
        assert_eq!(all.len(), 3 * 2 * 2 * 4 * 4);
    }
}
