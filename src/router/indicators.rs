//! LED group redraws from mode state and host state
//!
//! Redraws resend every LED of a group. LED writes are idempotent, so a full
//! group is cheaper to reason about than a diff.

use crate::binding::AssignGroup;
use crate::controls::Control;
use crate::host::{Host, HostProperty, Parameter, TransportFlag};
use crate::state::{AuxSend, EqBand, FunctionBank};
use crate::surface::{Indicator, LedSink, TransportLed};
use tracing::debug;

impl<H: Host, S: LedSink> super::Router<H, S> {
    /// Redraw every LED on the surface
    pub fn redraw_all(&mut self) {
        self.redraw_functions();
        self.redraw_assign();
        self.redraw_solo();
        self.redraw_eq();
        self.redraw_aux();
        self.redraw_channel_rows();
        self.redraw_transport();
    }

    /// F1-F3: exactly one lit
    pub(crate) fn redraw_functions(&mut self) {
        let active = self.modes.bank();
        for fb in FunctionBank::ALL {
            self.leds.set_led(Indicator::Function(fb), fb == active);
        }
    }

    pub(crate) fn redraw_assign(&mut self) {
        let on = self.modes.is_assign();
        self.leds.set_led(Indicator::Assign, on);
    }

    pub(crate) fn redraw_solo(&mut self) {
        let on = self.modes.is_solo();
        self.leds.set_led(Indicator::Solo, on);
    }

    /// EQ LEDs: selected band in Normal, band-on states in Assign
    pub(crate) fn redraw_eq(&mut self) {
        let assign = self.modes.is_assign();
        let selected = self.modes.eq_band();
        for band in EqBand::ALL {
            let on = if assign {
                let parameter = if band == EqBand::Low && self.options.low_eq_prefilter {
                    Parameter::LowCutOn
                } else {
                    Parameter::EqOn(band)
                };
                self.selected_flag(parameter)
            } else {
                band == selected
            };
            self.leds.set_led(Indicator::Eq(band), on);
        }
    }

    /// Aux LEDs: selected send in Normal, send-on states in Assign
    pub(crate) fn redraw_aux(&mut self) {
        let assign = self.modes.is_assign();
        let selected = self.modes.aux();
        for aux in AuxSend::ALL {
            let on = if assign {
                self.selected_flag(Parameter::SendOn(aux))
            } else {
                aux == selected
            };
            self.leds.set_led(Indicator::Aux(aux), on);
        }
    }

    /// Mute/solo, rec and select rows for the windowed bank
    pub(crate) fn redraw_channel_rows(&mut self) {
        let row_parameter = if self.modes.is_solo() {
            Parameter::Solo
        } else {
            Parameter::Mute
        };
        let window: Vec<_> = self.bank.window(self.modes.bank()).collect();

        for (slot, channel) in window {
            let flag = |host: &H, parameter| {
                host.value(&HostProperty::mixer(channel, parameter))
                    .is_some_and(|v| v >= 0.5)
            };
            let mute_row = flag(&self.host, row_parameter);
            let rec = flag(&self.host, Parameter::RecordEnable);
            let select = flag(&self.host, Parameter::Selected);

            self.leds.set_led(Indicator::Mute(slot), mute_row);
            self.leds.set_led(Indicator::Rec(slot), rec);
            self.leds.set_led(Indicator::Select(slot), select);
        }
        debug!("Channel rows redrawn for {:?}", self.modes.bank());
    }

    pub(crate) fn redraw_transport(&mut self) {
        for flag in TransportFlag::ALL {
            let active = self.host.transport(flag);
            self.leds
                .set_led(super::feedback::transport_indicator(flag), active);
        }
        let stop = self.controls.is_held(Control::Stop);
        self.leds
            .set_led(Indicator::Transport(TransportLed::Stop), stop);
    }

    /// LEDs owned by one assign group
    pub(crate) fn redraw_group(&mut self, group: AssignGroup) {
        match group {
            AssignGroup::Aux => self.redraw_aux(),
            AssignGroup::Eq => self.redraw_eq(),
            AssignGroup::MasterFader
            | AssignGroup::Pan
            | AssignGroup::Locator
            | AssignGroup::JogWheel => {}
        }
    }

    fn selected_flag(&self, parameter: Parameter) -> bool {
        self.host
            .value(&HostProperty::selected(parameter))
            .is_some_and(|v| v >= 0.5)
    }
}
