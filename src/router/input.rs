//! Surface input handling and routing

use crate::binding::Target;
use crate::controls::{relative_delta, Control};
use crate::host::{Host, HostProperty};
use crate::surface::{ControlEvent, Indicator, LedSink, TransportLed};
use tracing::{debug, trace};

impl<H: Host, S: LedSink> super::Router<H, S> {
    /// Process one decoded surface event
    pub fn on_event(&mut self, event: ControlEvent) {
        self.on_control_event(event.control, event.value);
    }

    /// Route a raw control value through the active binding
    ///
    /// Buttons act on the press edge only, except level-sensitive ones
    /// (fast-forward, rewind) which also act on release. A control without a
    /// binding under the current modes is ignored.
    pub fn on_control_event(&mut self, control: Control, raw: u8) {
        let previous = self.controls.record(control, raw);
        let pressed = raw > 0 && previous == 0;
        let level_changed = (raw > 0) != (previous > 0);

        self.echo_button_led(control, raw);

        let binding = self.bindings.active(control).copied();

        if control == Control::JogWheel {
            let emit = matches!(binding.map(|b| b.target), Some(Target::Zoom));
            let pulses = self.zoom.track(relative_delta(raw), emit);
            self.fire_zoom(&pulses);
        }

        let Some(binding) = binding else {
            trace!("{:?} unbound under {:?}", control, self.modes);
            return;
        };

        match binding.target {
            Target::Property {
                property,
                policy,
                range,
            } => self.apply_property(control, raw, &property, policy, range),
            Target::Toggle(property) => {
                if pressed {
                    self.toggle_property(&property);
                }
            }
            Target::Transport { flag, toggle: true } => {
                if pressed {
                    let active = !self.host.transport(flag);
                    let result = self.host.set_transport(flag, active);
                    self.host_write("transport toggle", result);
                }
            }
            Target::Transport { flag, toggle: false } => {
                if level_changed && control.is_level_sensitive() {
                    let result = self.host.set_transport(flag, raw > 0);
                    self.host_write("transport level", result);
                }
            }
            Target::Command(command) => {
                if pressed {
                    let result = self.host.command(command, 1);
                    self.host_write(command.name(), result);
                }
            }
            Target::RewindChord => self.on_rewind_event(raw, previous),
            Target::Mode(action) => {
                if pressed {
                    self.apply_mode_action(action);
                }
            }
            // Pulses already fired above
            Target::Zoom => {}
        }
    }

    fn toggle_property(&mut self, property: &HostProperty) {
        let Some(current) = self.host.value(property) else {
            debug!("Toggle of {:?} has no host value", property);
            return;
        };
        let next = if current >= 0.5 { 0.0 } else { 1.0 };
        let result = self.host.set_value(property, next);
        self.host_write("toggle", result);
    }

    /// LEDs that mirror the physical button rather than host state
    fn echo_button_led(&mut self, control: Control, raw: u8) {
        let indicator = match control {
            Control::Stop => Indicator::Transport(TransportLed::Stop),
            Control::BankLeft => Indicator::BankLeft,
            Control::BankRight => Indicator::BankRight,
            _ => return,
        };
        self.leds.set_led(indicator, raw > 0);
    }
}
