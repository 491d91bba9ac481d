//! Jog-wheel zoom gesture
//!
//! Jog deltas accumulate into a position in `0.0..=1.0`. Each step is
//! quantized to `floor(position * 100)` and compared with the previous step.
//! The accumulator runs in every mode; pulses are only emitted when asked.
//!
//! The reset branch and the step branches are evaluated independently, so a
//! single event at the bottom of the range can yield both a reset and a
//! step pulse.

use crate::config::ZoomConfig;
use crate::host::{Host, HostCommand};
use crate::surface::LedSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomPulse {
    In,
    /// Zoom out, repeated `n` times
    Out(u32),
}

#[derive(Debug, Clone)]
pub struct JogZoom {
    position: f64,
    last: Option<i32>,
    threshold: i32,
    reset_magnitude: u32,
    step: f64,
}

impl JogZoom {
    pub fn new(config: &ZoomConfig, step: f64) -> Self {
        Self {
            position: 0.0,
            last: None,
            threshold: config.threshold,
            reset_magnitude: config.reset_magnitude,
            step,
        }
    }

    /// Feed one relative delta; returns the pulses to fire when `emit` is set
    pub fn track(&mut self, delta: i32, emit: bool) -> Vec<ZoomPulse> {
        self.position = (self.position + f64::from(delta) * self.step).clamp(0.0, 1.0);
        let next = (self.position * 100.0).floor() as i32;

        let mut pulses = Vec::new();
        if emit {
            if next <= self.threshold {
                pulses.push(ZoomPulse::Out(self.reset_magnitude));
            }
            // Unset compares below every position
            match self.last {
                Some(last) if next < last => pulses.push(ZoomPulse::Out(1)),
                Some(last) if next == last => {}
                _ => pulses.push(ZoomPulse::In),
            }
        }

        self.last = Some(next);
        pulses
    }

    pub fn last(&self) -> Option<i32> {
        self.last
    }
}

impl<H: Host, S: LedSink> super::Router<H, S> {
    pub(crate) fn fire_zoom(&mut self, pulses: &[ZoomPulse]) {
        for pulse in pulses {
            let (command, magnitude) = match *pulse {
                ZoomPulse::In => (HostCommand::ZoomIn, 1),
                ZoomPulse::Out(n) => (HostCommand::ZoomOut, n),
            };
            let result = self.host.command(command, magnitude);
            self.host_write("zoom", result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zoom() -> JogZoom {
        // 0.01 per detent: one quantized step per detent
        JogZoom::new(&ZoomConfig::default(), 0.01)
    }

    #[test]
    fn test_first_move_up_zooms_in() {
        let mut zoom = zoom();
        assert_eq!(zoom.track(5, true), vec![ZoomPulse::In]);
        assert_eq!(zoom.last(), Some(5));
        assert_eq!(zoom.track(1, true), vec![ZoomPulse::In]);
        assert_eq!(zoom.track(-2, true), vec![ZoomPulse::Out(1)]);
    }

    #[test]
    fn test_reset_and_step_can_fire_together() {
        let mut zoom = zoom();
        zoom.track(3, true);
        // Back to 0: reset plus the ordinary step down
        assert_eq!(
            zoom.track(-3, true),
            vec![ZoomPulse::Out(1000), ZoomPulse::Out(1)]
        );
        // Still at 0: reset only
        assert_eq!(zoom.track(-1, true), vec![ZoomPulse::Out(1000)]);
    }

    #[test]
    fn test_tracks_silently_when_not_emitting() {
        let mut zoom = zoom();
        assert!(zoom.track(10, false).is_empty());
        assert_eq!(zoom.last(), Some(10));

        // Continues from the silent position
        assert_eq!(zoom.track(1, true), vec![ZoomPulse::In]);
        assert_eq!(zoom.last(), Some(11));
    }

    #[test]
    fn test_sub_step_delta_is_quiet() {
        let mut zoom = JogZoom::new(&ZoomConfig::default(), 0.001);
        zoom.track(20, true);
        assert_eq!(zoom.last(), Some(2));
        assert!(zoom.track(1, true).is_empty());
    }
}
