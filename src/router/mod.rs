//! Router module - Core orchestration of surface events and mode transitions
//!
//! The Router is the single dispatch path of the gateway. It owns:
//! - Mode state and the binding table it selects from
//! - The host capability and the LED sink
//! - Gesture state (rewind chord, jog zoom, fader take-over)
//!
//! Every handler runs to completion before the next event is accepted, so a
//! mode toggle has re-activated its bindings and redrawn its LEDs before any
//! other control can observe it.

mod feedback;
mod indicators;
mod input;
mod modes;
mod takeover;
mod transport;
mod zoom;

pub use takeover::Takeover;
pub use transport::{RewindAction, TransportGesture};
pub use zoom::{JogZoom, ZoomPulse};


use crate::bank::ChannelBank;
use crate::binding::{us428_bindings, BindingError, BindingTable};
use crate::config::{AppConfig, SurfaceOptions};
use crate::controls::ControlStates;
use crate::host::{Host, HostError};
use crate::state::{ModeChange, ModeState};
use crate::surface::{Indicator, LedSink, FADER_STRIPS};
use tracing::{debug, info};

type ModeListener = Box<dyn FnMut(&ModeChange)>;

/// Main router mapping surface controls onto host targets
pub struct Router<H: Host, S: LedSink> {
    /// Host mixer and transport
    pub(crate) host: H,
    /// Device LED output
    pub(crate) leds: S,
    /// Current mode of every dimension
    pub(crate) modes: ModeState,
    /// 24-channel window index
    pub(crate) bank: ChannelBank,
    /// Validated bindings plus the active cache
    pub(crate) bindings: BindingTable,
    /// Last raw value of every control, for polled gestures
    pub(crate) controls: ControlStates,
    pub(crate) takeover: Takeover,
    pub(crate) rewind: TransportGesture,
    pub(crate) zoom: JogZoom,
    pub(crate) options: SurfaceOptions,
    /// Observers notified after each mode transition has been applied
    pub(crate) mode_listeners: Vec<ModeListener>,
}

impl<H: Host, S: LedSink> Router<H, S> {
    /// Build the router, acquiring the host channel list once
    ///
    /// Fails fast on a wrong-sized channel list or an inconsistent layout.
    pub fn new(config: &AppConfig, host: H, leds: S) -> Result<Self, BindingError> {
        let bank = ChannelBank::new(host.mixer_channels())?;
        let mut bindings = BindingTable::build(us428_bindings(&bank, &config.surface))?;
        let modes = ModeState::new();
        bindings.activate_all(&modes);

        info!(
            "Router ready: {} bindings over {} channels",
            bindings.len(),
            bank.handles().len()
        );

        Ok(Self {
            host,
            leds,
            modes,
            bank,
            bindings,
            controls: ControlStates::new(),
            takeover: Takeover::new(
                config.surface.takeover_tolerance,
                config.surface.relative_step,
            ),
            rewind: TransportGesture::new(),
            zoom: JogZoom::new(&config.zoom, config.surface.relative_step),
            options: config.surface.clone(),
            mode_listeners: Vec::new(),
        })
    }

    /// Bring the device in sync after it connected
    ///
    /// Requests the physical fader positions, then redraws every LED group.
    pub fn activate(&mut self) {
        for strip in 0..FADER_STRIPS {
            self.leds.request_fader_dump(strip);
        }
        self.redraw_all();
        self.leds.set_led(Indicator::BankLeft, false);
        self.leds.set_led(Indicator::BankRight, false);
        info!("Surface activated");
    }

    /// Register an observer for mode transitions
    pub fn subscribe_mode<F>(&mut self, listener: F)
    where
        F: FnMut(&ModeChange) + 'static,
    {
        self.mode_listeners.push(Box::new(listener));
    }

    pub fn modes(&self) -> &ModeState {
        &self.modes
    }

    pub fn bank(&self) -> &ChannelBank {
        &self.bank
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn leds(&self) -> &S {
        &self.leds
    }

    pub fn leds_mut(&mut self) -> &mut S {
        &mut self.leds
    }

    /// Swallow a rejected host write; the host's own notifications will
    /// correct any LED drift
    pub(crate) fn host_write(&self, what: &str, result: Result<(), HostError>) {
        if let Err(e) = result {
            debug!("Host rejected {}: {}", what, e);
        }
    }
}
