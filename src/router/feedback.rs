//! Host feedback processing and LED visibility filtering
//!
//! Per-channel LEDs only ever show channels windowed under the live function
//! bank. Updates for anything off-screen are dropped here; the next bank
//! switch redraws from host state anyway.

use crate::host::{ChannelId, Host, HostChange, HostProperty, Parameter, Strip, TransportFlag};
use crate::state::{Dimension, EqBand, ModeChange};
use crate::surface::{Indicator, LedSink, TransportLed};
use tracing::trace;

impl<H: Host, S: LedSink> super::Router<H, S> {
    /// Drain the host's queued notifications into the feedback engine
    pub fn process_host_notifications(&mut self) {
        for change in self.host.drain_changes() {
            self.on_host_change(change);
        }
    }

    pub fn on_host_change(&mut self, change: HostChange) {
        match change {
            HostChange::Value { property, value } => self.on_host_value_changed(property, value),
            HostChange::Transport { flag, active } => self.on_transport_changed(flag, active),
        }
    }

    pub fn on_host_value_changed(&mut self, property: HostProperty, value: f64) {
        self.takeover.on_host_value(&property, value);
        if property.parameter == Parameter::Selected && property.strip != Strip::Selected {
            if value >= 0.5 {
                self.takeover.release_strip(Strip::Selected);
            }
            // Assign LEDs read the selected strip, which just moved
            if self.modes.is_assign() {
                self.redraw_aux();
                self.redraw_eq();
            }
        }

        let on = value >= 0.5;
        let indicator = match property.strip {
            Strip::Mixer(channel) => self.channel_indicator(channel, property.parameter),
            Strip::Selected => self.selected_indicator(property.parameter),
            Strip::MainOut | Strip::FirstFx => None,
        };

        match indicator {
            Some(indicator) => self.leds.set_led(indicator, on),
            None => trace!("No visible LED for {:?} = {}", property, value),
        }
    }

    pub fn on_transport_changed(&mut self, flag: TransportFlag, active: bool) {
        self.leds.set_led(transport_indicator(flag), active);
    }

    /// Redraw every LED whose meaning depends on the dimension that changed
    pub fn on_mode_activated(&mut self, change: &ModeChange) {
        match change.dimension() {
            Dimension::FunctionBank => {
                self.redraw_functions();
                self.redraw_channel_rows();
            }
            Dimension::SoloMode => {
                self.redraw_solo();
                self.redraw_channel_rows();
            }
            Dimension::AssignMode => self.redraw_assign(),
            Dimension::EqBand => self.redraw_eq(),
            Dimension::Aux => self.redraw_aux(),
        }
    }

    /// LED for a per-channel property, if that channel is on screen
    pub(crate) fn channel_indicator(
        &self,
        channel: ChannelId,
        parameter: Parameter,
    ) -> Option<Indicator> {
        let (bank, slot) = self.bank.locate(channel)?;
        if bank != self.modes.bank() {
            return None;
        }
        match parameter {
            Parameter::Mute if !self.modes.is_solo() => Some(Indicator::Mute(slot)),
            Parameter::Solo if self.modes.is_solo() => Some(Indicator::Mute(slot)),
            Parameter::RecordEnable => Some(Indicator::Rec(slot)),
            Parameter::Selected => Some(Indicator::Select(slot)),
            _ => None,
        }
    }

    /// LED for a selected-channel property; only the assign overlay shows them
    pub(crate) fn selected_indicator(&self, parameter: Parameter) -> Option<Indicator> {
        if !self.modes.is_assign() {
            return None;
        }
        let prefilter = self.options.low_eq_prefilter;
        match parameter {
            Parameter::SendOn(aux) => Some(Indicator::Aux(aux)),
            Parameter::EqOn(EqBand::Low) if prefilter => None,
            Parameter::EqOn(band) => Some(Indicator::Eq(band)),
            Parameter::LowCutOn if prefilter => Some(Indicator::Eq(EqBand::Low)),
            _ => None,
        }
    }
}

pub(crate) fn transport_indicator(flag: TransportFlag) -> Indicator {
    match flag {
        TransportFlag::Rewind => Indicator::Transport(TransportLed::Rewind),
        TransportFlag::Forward => Indicator::Transport(TransportLed::FastForward),
        TransportFlag::Start => Indicator::Transport(TransportLed::Play),
        TransportFlag::Record => Indicator::Transport(TransportLed::Record),
        TransportFlag::Metronome => Indicator::Null,
    }
}
