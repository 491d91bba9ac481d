//! Stop + rewind chord detection
//!
//! A rewind press while stop is held becomes one "Return to Zero". The chord
//! stays latched until rewind itself is released, so the order in which the
//! two buttons come up does not matter.

use crate::controls::Control;
use crate::host::{Host, HostCommand, TransportFlag};
use crate::surface::LedSink;
use tracing::{debug, trace};

/// What a rewind event turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewindAction {
    /// Chord completed: fire Return to Zero once
    ReturnToZero,
    /// Plain rewind, carrying the raw button value
    Forward(u8),
    /// Part of a chord already handled
    Suppressed,
}

#[derive(Debug, Default)]
pub struct TransportGesture {
    chorded: bool,
}

impl TransportGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a rewind event given the polled state of the stop button
    pub fn on_rewind(&mut self, raw: u8, previous: u8, stop_held: bool) -> RewindAction {
        let pressed = raw > 0 && previous == 0;

        if pressed && stop_held {
            self.chorded = true;
            return RewindAction::ReturnToZero;
        }

        if self.chorded {
            if raw == 0 {
                self.chorded = false;
            }
            return RewindAction::Suppressed;
        }

        RewindAction::Forward(raw)
    }

    pub fn is_chorded(&self) -> bool {
        self.chorded
    }
}

impl<H: Host, S: LedSink> super::Router<H, S> {
    /// Apply the rewind button through the chord detector
    pub(crate) fn on_rewind_event(&mut self, raw: u8, previous: u8) {
        let stop_held = self.controls.is_held(Control::Stop);
        match self.rewind.on_rewind(raw, previous, stop_held) {
            RewindAction::ReturnToZero => {
                debug!("Stop + rewind chord: return to zero");
                let result = self.host.command(HostCommand::ReturnToZero, 1);
                self.host_write("return to zero", result);
            }
            RewindAction::Forward(value) => {
                let result = self.host.set_transport(TransportFlag::Rewind, value > 0);
                self.host_write("rewind", result);
            }
            RewindAction::Suppressed => {
                trace!("Rewind {} suppressed by chord", raw);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewind_alone_forwards_value() {
        let mut gesture = TransportGesture::new();
        assert_eq!(gesture.on_rewind(127, 0, false), RewindAction::Forward(127));
        assert_eq!(gesture.on_rewind(0, 127, false), RewindAction::Forward(0));
    }

    #[test]
    fn test_chord_fires_once() {
        let mut gesture = TransportGesture::new();
        assert_eq!(gesture.on_rewind(127, 0, true), RewindAction::ReturnToZero);
        assert!(gesture.is_chorded());
        // Repeated level while held
        assert_eq!(gesture.on_rewind(127, 127, true), RewindAction::Suppressed);
        assert_eq!(gesture.on_rewind(0, 127, true), RewindAction::Suppressed);
        assert!(!gesture.is_chorded());
    }

    #[test]
    fn test_stop_released_first_keeps_chord() {
        let mut gesture = TransportGesture::new();
        gesture.on_rewind(127, 0, true);
        // Stop came up before rewind
        assert_eq!(gesture.on_rewind(0, 127, false), RewindAction::Suppressed);
        // Next plain rewind is ordinary again
        assert_eq!(gesture.on_rewind(100, 0, false), RewindAction::Forward(100));
    }
}
