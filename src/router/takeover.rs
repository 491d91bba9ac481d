//! Value application for continuous controls
//!
//! Absolute faders use pickup: after a target change (or an outside change
//! of the host value) the fader only starts writing once its physical
//! position has reached or crossed the host value. Relative encoders have no
//! physical position to reconcile; scaled ones nudge the host value, jump
//! ones write their own accumulated position.

use crate::binding::{ValuePolicy, ValueRange};
use crate::controls::{relative_delta, Control, ControlKind};
use crate::host::{Host, HostProperty, Strip};
use crate::midi::convert;
use crate::surface::LedSink;
use std::collections::HashMap;
use tracing::trace;

/// Engagement of one control with the property it currently writes
#[derive(Debug, Clone, Copy)]
struct Engaged {
    property: HostProperty,
    written: f64,
}

#[derive(Debug)]
pub struct Takeover {
    /// Last normalized position per control, kept across target changes
    positions: HashMap<Control, f64>,
    engaged: HashMap<Control, Engaged>,
    tolerance: f64,
    step: f64,
}

impl Takeover {
    pub fn new(tolerance: f64, step: f64) -> Self {
        Self {
            positions: HashMap::new(),
            engaged: HashMap::new(),
            tolerance,
            step,
        }
    }

    /// New absolute position of `control`; returns the host value to write
    pub fn absolute(
        &mut self,
        control: Control,
        position: f64,
        property: &HostProperty,
        policy: ValuePolicy,
        range: ValueRange,
        host_value: Option<f64>,
    ) -> Option<f64> {
        let previous = self.positions.insert(control, position);
        let value = range.to_host(position);

        if policy == ValuePolicy::Jump || self.is_engaged(control, property) {
            return Some(self.engage(control, property, value));
        }

        let target = range.to_surface(host_value?);
        let reached = (position - target).abs() <= self.tolerance;
        let crossed = previous.is_some_and(|p| (p - target) * (position - target) <= 0.0);

        if reached || crossed {
            Some(self.engage(control, property, value))
        } else {
            None
        }
    }

    /// Relative delta of `control`; returns the host value to write
    pub fn relative(
        &mut self,
        control: Control,
        delta: i32,
        property: &HostProperty,
        policy: ValuePolicy,
        range: ValueRange,
        host_value: Option<f64>,
    ) -> Option<f64> {
        let current = range.to_surface(host_value?);
        let offset = f64::from(delta) * self.step;

        let position = match policy {
            ValuePolicy::Scaled => current + offset,
            ValuePolicy::Jump => self.positions.get(&control).copied().unwrap_or(current) + offset,
        }
        .clamp(0.0, 1.0);

        self.positions.insert(control, position);
        Some(self.engage(control, property, range.to_host(position)))
    }

    /// Host reported a value; drop pickup for controls it moved away from
    pub fn on_host_value(&mut self, property: &HostProperty, value: f64) {
        self.engaged.retain(|_, engaged| {
            engaged.property != *property || (engaged.written - value).abs() < 1e-6
        });
    }

    /// Release every control writing through `strip` (selection moved)
    pub fn release_strip(&mut self, strip: Strip) {
        self.engaged.retain(|_, engaged| engaged.property.strip != strip);
    }

    pub fn is_engaged(&self, control: Control, property: &HostProperty) -> bool {
        self.engaged
            .get(&control)
            .is_some_and(|e| e.property == *property)
    }

    fn engage(&mut self, control: Control, property: &HostProperty, value: f64) -> f64 {
        self.engaged.insert(
            control,
            Engaged {
                property: *property,
                written: value,
            },
        );
        value
    }
}

impl<H: Host, S: LedSink> super::Router<H, S> {
    /// Apply a continuous control to its host property
    pub(crate) fn apply_property(
        &mut self,
        control: Control,
        raw: u8,
        property: &HostProperty,
        policy: ValuePolicy,
        range: ValueRange,
    ) {
        let host_value = self.host.value(property);
        let next = match control.kind() {
            ControlKind::Absolute => self.takeover.absolute(
                control,
                convert::to_unit(raw),
                property,
                policy,
                range,
                host_value,
            ),
            ControlKind::Relative => self.takeover.relative(
                control,
                relative_delta(raw),
                property,
                policy,
                range,
                host_value,
            ),
            ControlKind::Button => None,
        };

        match next {
            Some(value) => {
                let result = self.host.set_value(property, value);
                self.host_write("property write", result);
            }
            None => trace!(
                "{:?} waiting for pickup of {:?} (host {:?})",
                control,
                property,
                host_value
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::Slot;
    use crate::host::{ChannelId, Parameter};

    fn volume(channel: u16) -> HostProperty {
        HostProperty::mixer(ChannelId(channel), Parameter::Volume)
    }

    fn fader() -> Control {
        Control::Fader(Slot::ALL[0])
    }

    #[test]
    fn test_fader_picks_up_when_crossing() {
        let mut takeover = Takeover::new(0.01, 0.01);
        let target = volume(0);
        let scaled = ValuePolicy::Scaled;
        let full = ValueRange::FULL;

        assert_eq!(takeover.absolute(fader(), 0.1, &target, scaled, full, Some(0.5)), None);
        assert_eq!(takeover.absolute(fader(), 0.3, &target, scaled, full, Some(0.5)), None);
        // Crossed 0.5 on the way up
        assert_eq!(
            takeover.absolute(fader(), 0.6, &target, scaled, full, Some(0.5)),
            Some(0.6)
        );
        // Engaged: follows freely now
        assert_eq!(
            takeover.absolute(fader(), 0.2, &target, scaled, full, Some(0.6)),
            Some(0.2)
        );
    }

    #[test]
    fn test_target_change_requires_new_pickup() {
        let mut takeover = Takeover::new(0.01, 0.01);
        let scaled = ValuePolicy::Scaled;
        let full = ValueRange::FULL;

        takeover.absolute(fader(), 0.5, &volume(0), scaled, full, Some(0.5));
        assert!(takeover.is_engaged(fader(), &volume(0)));

        // Same fader, other bank: host value far away
        assert_eq!(takeover.absolute(fader(), 0.55, &volume(8), scaled, full, Some(0.9)), None);
        assert_eq!(
            takeover.absolute(fader(), 0.95, &volume(8), scaled, full, Some(0.9)),
            Some(0.95)
        );
    }

    #[test]
    fn test_outside_change_releases_pickup() {
        let mut takeover = Takeover::new(0.01, 0.01);
        let scaled = ValuePolicy::Scaled;
        let full = ValueRange::FULL;

        takeover.absolute(fader(), 0.5, &volume(0), scaled, full, Some(0.5));
        // Echo of our own write keeps engagement
        takeover.on_host_value(&volume(0), 0.5);
        assert!(takeover.is_engaged(fader(), &volume(0)));

        takeover.on_host_value(&volume(0), 0.1);
        assert!(!takeover.is_engaged(fader(), &volume(0)));
    }

    #[test]
    fn test_jump_policy_writes_immediately() {
        let mut takeover = Takeover::new(0.01, 0.01);
        assert_eq!(
            takeover.absolute(fader(), 0.9, &volume(0), ValuePolicy::Jump, ValueRange::FULL, Some(0.1)),
            Some(0.9)
        );
    }

    #[test]
    fn test_relative_scaled_nudges_host_value() {
        let mut takeover = Takeover::new(0.01, 0.25);
        let pan = HostProperty::selected(Parameter::Pan);
        assert_eq!(
            takeover.relative(Control::Pan, 1, &pan, ValuePolicy::Scaled, ValueRange::FULL, Some(0.5)),
            Some(0.75)
        );
        assert_eq!(
            takeover.relative(Control::Pan, -4, &pan, ValuePolicy::Scaled, ValueRange::FULL, Some(0.75)),
            Some(0.0)
        );
        assert_eq!(
            takeover.relative(Control::Pan, 1, &pan, ValuePolicy::Scaled, ValueRange::FULL, None),
            None
        );
    }

    #[test]
    fn test_relative_jump_uses_own_position() {
        let mut takeover = Takeover::new(0.01, 0.25);
        let slope = HostProperty::selected(Parameter::LowCutSlope);
        let jump = ValuePolicy::Jump;

        assert_eq!(
            takeover.relative(Control::EqQ, 1, &slope, jump, ValueRange::FULL, Some(0.0)),
            Some(0.25)
        );
        // Host moved elsewhere, the knob keeps counting from itself
        assert_eq!(
            takeover.relative(Control::EqQ, 1, &slope, jump, ValueRange::FULL, Some(1.0)),
            Some(0.5)
        );
    }

    #[test]
    fn test_scaled_range_maps_into_host_space() {
        let mut takeover = Takeover::new(0.01, 0.01);
        let master = HostProperty::new(Strip::MainOut, Parameter::Volume);
        let range = ValueRange::new(0.0, 0.75);

        // Host at 0.75 is the top of the fader
        assert_eq!(
            takeover.absolute(Control::MasterFader, 1.0, &master, ValuePolicy::Scaled, range, Some(0.75)),
            Some(0.75)
        );
    }
}
