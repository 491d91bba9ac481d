//! Binding table - validated bindings plus the per-control active cache
//!
//! The cache is only ever rewritten from a mode transition, one control group
//! at a time, so a control is either fully on its old binding or fully on the
//! new one.

use super::{Binding, BindingError};
use crate::controls::Control;
use crate::state::{Dimension, ModeState};
use std::collections::HashMap;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct BindingTable {
    bindings: Vec<Binding>,
    by_control: HashMap<Control, Vec<usize>>,
    active: HashMap<Control, usize>,
}

impl BindingTable {
    /// Validate and index a binding list
    ///
    /// Fails if any control would have two live bindings under one of the
    /// reachable mode combinations.
    pub fn build(bindings: Vec<Binding>) -> Result<Self, BindingError> {
        let mut by_control: HashMap<Control, Vec<usize>> = HashMap::new();
        for (index, binding) in bindings.iter().enumerate() {
            by_control.entry(binding.control).or_default().push(index);
        }

        for (control, indices) in &by_control {
            if indices.len() < 2 {
                continue;
            }
            for modes in ModeState::combinations() {
                let live = indices
                    .iter()
                    .filter(|&&i| bindings[i].predicate.matches(&modes))
                    .count();
                if live > 1 {
                    return Err(BindingError::OverlappingBindings {
                        control: *control,
                        mode: format!("{:?}", modes),
                    });
                }
            }
        }

        Ok(Self {
            bindings,
            by_control,
            active: HashMap::new(),
        })
    }

    /// Binding that would be live for `control` under `modes`
    pub fn resolve(&self, control: Control, modes: &ModeState) -> Option<&Binding> {
        self.by_control
            .get(&control)?
            .iter()
            .map(|&i| &self.bindings[i])
            .find(|b| b.predicate.matches(modes))
    }

    /// Currently active binding of `control`
    pub fn active(&self, control: Control) -> Option<&Binding> {
        self.active.get(&control).map(|&i| &self.bindings[i])
    }

    /// Activate every control against `modes`
    pub fn activate_all(&mut self, modes: &ModeState) {
        let controls: Vec<Control> = self.by_control.keys().copied().collect();
        self.reactivate_controls(&controls, modes);
    }

    /// Re-activate the controls whose bindings depend on `dimension`
    ///
    /// Returns the controls that were re-activated.
    pub fn reactivate(&mut self, dimension: Dimension, modes: &ModeState) -> Vec<Control> {
        let controls = self.dependents(dimension);
        self.reactivate_controls(&controls, modes);
        controls
    }

    pub fn reactivate_controls(&mut self, controls: &[Control], modes: &ModeState) {
        for &control in controls {
            let next = self.by_control.get(&control).and_then(|indices| {
                indices
                    .iter()
                    .copied()
                    .find(|&i| self.bindings[i].predicate.matches(modes))
            });
            match next {
                Some(index) => {
                    self.active.insert(control, index);
                }
                None => {
                    if self.active.remove(&control).is_some() {
                        trace!("{:?} has no binding under {:?}", control, modes);
                    }
                }
            }
        }
    }

    /// Controls with at least one binding sensitive to `dimension`
    pub fn dependents(&self, dimension: Dimension) -> Vec<Control> {
        let mut controls: Vec<Control> = self
            .by_control
            .iter()
            .filter(|(_, indices)| {
                indices
                    .iter()
                    .any(|&i| self.bindings[i].predicate.depends_on(dimension))
            })
            .map(|(control, _)| *control)
            .collect();
        controls.sort_unstable();
        controls
    }

    pub fn bindings_for(&self, control: Control) -> impl Iterator<Item = &Binding> {
        self.by_control
            .get(&control)
            .into_iter()
            .flatten()
            .map(move |&i| &self.bindings[i])
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::ChannelBank;
    use crate::binding::{us428_bindings, AssignGroup, ModeAction, ModePredicate, Target};
    use crate::config::SurfaceOptions;
    use crate::host::{ChannelId, HostCommand};
    use crate::state::{AssignMode, AuxSend, ModeValue};
    use std::collections::HashSet;

    fn us428_table() -> BindingTable {
        let bank = ChannelBank::new((0..24).map(ChannelId).collect()).unwrap();
        BindingTable::build(us428_bindings(&bank, &SurfaceOptions::default())).unwrap()
    }

    #[test]
    fn test_us428_layout_has_no_overlaps() {
        let table = us428_table();
        assert!(!table.is_empty());
    }

    #[test]
    fn test_overlap_is_rejected() {
        let bindings = vec![
            Binding::always(Control::Stop, Target::Command(HostCommand::Stop)),
            Binding::new(
                Control::Stop,
                ModePredicate::always().assign(AssignMode::Assign),
                Target::Command(HostCommand::Cycle),
            ),
        ];
        let err = BindingTable::build(bindings).unwrap_err();
        assert!(matches!(
            err,
            BindingError::OverlappingBindings {
                control: Control::Stop,
                ..
            }
        ));
    }

    #[test]
    fn test_unbound_mode_leaves_control_inactive() {
        let bindings = vec![Binding::new(
            Control::Stop,
            ModePredicate::always().assign(AssignMode::Assign),
            Target::Command(HostCommand::Cycle),
        )];
        let mut table = BindingTable::build(bindings).unwrap();
        let mut modes = ModeState::new();

        table.activate_all(&modes);
        assert!(table.active(Control::Stop).is_none());

        modes.toggle_assign();
        table.reactivate(Dimension::AssignMode, &modes);
        assert!(table.active(Control::Stop).is_some());
    }

    #[test]
    fn test_active_cache_follows_reactivation() {
        let mut table = us428_table();
        let mut modes = ModeState::new();
        table.activate_all(&modes);

        let before = table.active(Control::JogWheel).copied();
        modes.set(ModeValue::Aux(AuxSend::Aux3));

        // Not yet re-activated: still on the old send
        assert_eq!(table.active(Control::JogWheel).copied(), before);

        table.reactivate(Dimension::Aux, &modes);
        assert_eq!(
            table.active(Control::JogWheel),
            table.resolve(Control::JogWheel, &modes)
        );
        assert_ne!(table.active(Control::JogWheel).copied(), before);
    }

    #[test]
    fn test_assign_groups_cover_assign_dependents() {
        let table = us428_table();
        let dependents: HashSet<Control> =
            table.dependents(Dimension::AssignMode).into_iter().collect();
        let grouped: HashSet<Control> = AssignGroup::ORDER
            .iter()
            .flat_map(|g| g.controls())
            .collect();
        assert_eq!(dependents, grouped);
    }

    #[test]
    fn test_dependents_in_surface_order() {
        let table = us428_table();
        let dependents = table.dependents(Dimension::FunctionBank);

        let mut sorted = dependents.clone();
        sorted.sort();
        assert_eq!(dependents, sorted);
        assert_eq!(dependents.first(), Some(&Control::Mute(crate::controls::Slot::ALL[0])));
        assert_eq!(dependents, table.dependents(Dimension::FunctionBank));
    }

    #[test]
    fn test_function_buttons_always_set_bank() {
        let table = us428_table();
        for modes in ModeState::combinations() {
            let binding = table
                .resolve(Control::Function(crate::state::FunctionBank::F2), &modes)
                .unwrap();
            assert_eq!(
                binding.target,
                Target::Mode(ModeAction::Set(ModeValue::FunctionBank(
                    crate::state::FunctionBank::F2
                )))
            );
        }
    }
}
