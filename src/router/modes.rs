//! Mode transitions and their side effects

use crate::binding::{AssignGroup, ModeAction};
use crate::host::Host;
use crate::state::{AssignMode, Dimension, ModeChange, ModeValue};
use crate::surface::LedSink;
use tracing::debug;

impl<H: Host, S: LedSink> super::Router<H, S> {
    /// Write one mode dimension and apply everything that depends on it
    pub fn set_mode(&mut self, value: ModeValue) -> ModeChange {
        let change = self.modes.set(value);
        self.on_mode_changed(change);
        change
    }

    pub(crate) fn apply_mode_action(&mut self, action: ModeAction) {
        let change = match action {
            ModeAction::Set(value) => self.modes.set(value),
            ModeAction::ToggleAssign => self.modes.toggle_assign(),
            ModeAction::ToggleSolo => self.modes.toggle_solo(),
        };
        self.on_mode_changed(change);
    }

    /// Re-activate bindings, redraw LEDs, then notify observers
    fn on_mode_changed(&mut self, change: ModeChange) {
        debug!("Mode {} → {}", change.previous, change.current);

        match change.dimension() {
            Dimension::AssignMode => self.run_assign_sequence(self.modes.assign()),
            // Bank and solo resolve the channel rows together
            Dimension::FunctionBank | Dimension::SoloMode => {
                let modes = self.modes;
                self.bindings.reactivate(Dimension::FunctionBank, &modes);
                self.bindings.reactivate(Dimension::SoloMode, &modes);
            }
            dimension => {
                let modes = self.modes;
                self.bindings.reactivate(dimension, &modes);
            }
        }

        self.on_mode_activated(&change);

        for listener in self.mode_listeners.iter_mut() {
            listener(&change);
        }
    }

    /// Activate each assign group in order, redrawing its LEDs as it goes
    fn run_assign_sequence(&mut self, assign: AssignMode) {
        let modes = self.modes;
        for group in AssignGroup::sequence(assign) {
            self.bindings.reactivate_controls(&group.controls(), &modes);
            self.redraw_group(group);
            debug!("Activated {:?} group for {:?}", group, assign);
        }
    }
}
