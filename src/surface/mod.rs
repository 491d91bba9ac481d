//! Tascam US-428 driver
//!
//! Owns the MIDI ports of the surface. Incoming bytes are forwarded from the
//! midir callback thread into a bounded channel; decoding and dispatch happen
//! on the consumer side so the router stays single-threaded.

pub mod codec;
pub mod leds;

pub use codec::{CodecError, ControlEvent, SurfaceCodec};
pub use leds::{Indicator, LedGroup, LedLog, LedSink, TransportLed};

use crate::config::MidiConfig;
use crate::midi::format_hex;
use midir::{MidiIO, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Port name fragments the US-428 shows up under
const PORT_PATTERNS: [&str; 3] = ["US-428", "US428", "Tascam"];

/// Number of fader strips the device reports on a dump request
pub const FADER_STRIPS: u8 = 9;

/// Error type for surface port operations
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("Failed to initialize MIDI input: {0}")]
    InputInit(String),

    #[error("Failed to initialize MIDI output: {0}")]
    OutputInit(String),

    #[error("No MIDI port found matching pattern: {0}")]
    PortNotFound(String),

    #[error("Failed to connect to MIDI port: {0}")]
    Connection(String),

    #[error("Not connected to output port")]
    NotConnected,

    #[error("Failed to send MIDI data: {0}")]
    Send(String),
}

/// Raw bytes received from the surface
#[derive(Debug, Clone)]
pub struct SurfaceEvent {
    pub raw: Vec<u8>,
}

pub struct Us428Driver {
    input_conn: Option<MidiInputConnection<()>>,
    output_conn: Option<Arc<Mutex<MidiOutputConnection>>>,
    event_tx: mpsc::Sender<SurfaceEvent>,
    event_rx: Option<mpsc::Receiver<SurfaceEvent>>,
    codec: SurfaceCodec,
    input_port_name: String,
    output_port_name: String,
}

impl Us428Driver {
    pub fn new(config: &MidiConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(1000);

        Self {
            input_conn: None,
            output_conn: None,
            event_tx,
            event_rx: Some(event_rx),
            codec: SurfaceCodec::new(config.channel),
            input_port_name: config.input_port.clone(),
            output_port_name: config.output_port.clone(),
        }
    }

    pub fn codec(&self) -> SurfaceCodec {
        self.codec
    }

    /// List available MIDI input ports
    pub fn list_input_ports() -> Result<Vec<String>, SurfaceError> {
        let midi_in = MidiInput::new("US428-GW-Scanner")
            .map_err(|e| SurfaceError::InputInit(e.to_string()))?;
        Ok(port_names(&midi_in))
    }

    /// List available MIDI output ports
    pub fn list_output_ports() -> Result<Vec<String>, SurfaceError> {
        let midi_out = MidiOutput::new("US428-GW-Scanner")
            .map_err(|e| SurfaceError::OutputInit(e.to_string()))?;
        Ok(port_names(&midi_out))
    }

    /// Connect to the surface ports
    pub fn connect(&mut self) -> Result<(), SurfaceError> {
        self.disconnect();

        info!(
            "Connecting to US-428 - Input: '{}', Output: '{}'",
            self.input_port_name, self.output_port_name
        );

        let midi_in = MidiInput::new("US428-GW-Input")
            .map_err(|e| SurfaceError::InputInit(e.to_string()))?;
        let (in_port, port_name) = find_port(&midi_in, &self.input_port_name)
            .ok_or_else(|| SurfaceError::PortNotFound(self.input_port_name.clone()))?;
        info!("Connecting to input port: {}", port_name);

        let event_tx = self.event_tx.clone();
        let input_conn = midi_in
            .connect(
                &in_port,
                "US428-GW",
                move |_timestamp, data, _| {
                    let event = SurfaceEvent {
                        raw: data.to_vec(),
                    };
                    // Never block the midir thread
                    if event_tx.try_send(event).is_err() {
                        debug!("Dropped surface input: {}", format_hex(data));
                    }
                },
                (),
            )
            .map_err(|e| SurfaceError::Connection(e.to_string()))?;
        self.input_conn = Some(input_conn);

        let midi_out = MidiOutput::new("US428-GW-Output")
            .map_err(|e| SurfaceError::OutputInit(e.to_string()))?;
        let (out_port, port_name) = find_port(&midi_out, &self.output_port_name)
            .ok_or_else(|| SurfaceError::PortNotFound(self.output_port_name.clone()))?;
        info!("Connecting to output port: {}", port_name);

        let output_conn = midi_out
            .connect(&out_port, "US428-GW")
            .map_err(|e| SurfaceError::Connection(e.to_string()))?;
        self.output_conn = Some(Arc::new(Mutex::new(output_conn)));

        info!("US-428 connected");
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if self.is_connected() {
            info!("US-428 disconnected");
        }
        self.input_conn = None;
        self.output_conn = None;
    }

    pub fn is_connected(&self) -> bool {
        self.input_conn.is_some() && self.output_conn.is_some()
    }

    /// Send raw MIDI bytes to the surface
    pub fn send_raw(&self, data: &[u8]) -> Result<(), SurfaceError> {
        let output = self.output_conn.as_ref().ok_or(SurfaceError::NotConnected)?;
        send(output, data)
    }

    /// Take the event receiver (for the dispatch loop to consume)
    pub fn take_event_receiver(&mut self) -> Option<mpsc::Receiver<SurfaceEvent>> {
        self.event_rx.take()
    }

    /// LED sink writing to the connected output port
    pub fn led_output(&self) -> Result<Us428Output, SurfaceError> {
        let conn = self.output_conn.clone().ok_or(SurfaceError::NotConnected)?;
        Ok(Us428Output {
            conn,
            codec: self.codec,
        })
    }
}

/// [`LedSink`] backed by the surface output port
pub struct Us428Output {
    conn: Arc<Mutex<MidiOutputConnection>>,
    codec: SurfaceCodec,
}

impl LedSink for Us428Output {
    fn set_led(&mut self, indicator: Indicator, on: bool) {
        let data = self.codec.encode_led(indicator, on);
        if let Err(e) = send(&self.conn, &data) {
            warn!("LED {:?} not sent: {}", indicator, e);
        }
    }

    fn request_fader_dump(&mut self, strip: u8) {
        let data = self.codec.encode_fader_dump(strip);
        if let Err(e) = send(&self.conn, &data) {
            warn!("Fader dump request {} not sent: {}", strip, e);
        }
    }
}

fn send(output: &Mutex<MidiOutputConnection>, data: &[u8]) -> Result<(), SurfaceError> {
    let mut conn = output
        .lock()
        .map_err(|_| SurfaceError::Send("output connection poisoned".to_string()))?;
    conn.send(data)
        .map_err(|e| SurfaceError::Send(e.to_string()))?;
    debug!("Sent: {}", format_hex(data));
    Ok(())
}

fn port_names<T: MidiIO>(io: &T) -> Vec<String> {
    io.ports()
        .iter()
        .filter_map(|port| io.port_name(port).ok())
        .collect()
}

/// Find a port by case-insensitive substring match
fn find_port<T: MidiIO>(io: &T, pattern: &str) -> Option<(T::Port, String)> {
    let pattern = pattern.to_lowercase();
    io.ports().into_iter().find_map(|port| {
        let name = io.port_name(&port).ok()?;
        if name.to_lowercase().contains(&pattern) {
            debug!("Found port '{}' matching pattern '{}'", name, pattern);
            Some((port, name))
        } else {
            None
        }
    })
}

/// Whether a port name looks like the US-428
pub fn is_us428_port(name: &str) -> bool {
    let name = name.to_lowercase();
    PORT_PATTERNS
        .iter()
        .any(|pattern| name.contains(&pattern.to_lowercase()))
}

/// Find the US-428 input/output pair among the available ports
pub fn find_us428_ports() -> Option<(String, String)> {
    let inputs = Us428Driver::list_input_ports().ok()?;
    let outputs = Us428Driver::list_output_ports().ok()?;

    let input = inputs.into_iter().find(|name| is_us428_port(name))?;
    let output = outputs.into_iter().find(|name| is_us428_port(name))?;
    Some((input, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_pattern_matching() {
        assert!(is_us428_port("US-428 Control"));
        assert!(is_us428_port("TASCAM US428 MIDI 1"));
        assert!(!is_us428_port("X-Touch"));
    }

    #[test]
    fn test_send_requires_connection() {
        let driver = Us428Driver::new(&MidiConfig::default());
        assert!(!driver.is_connected());
        assert!(matches!(
            driver.send_raw(&[0xF0, 0xF7]),
            Err(SurfaceError::NotConnected)
        ));
        assert!(matches!(
            driver.led_output(),
            Err(SurfaceError::NotConnected)
        ));
    }

    #[test]
    fn test_event_receiver_taken_once() {
        let mut driver = Us428Driver::new(&MidiConfig::default());
        assert!(driver.take_event_receiver().is_some());
        assert!(driver.take_event_receiver().is_none());
    }

    #[test]
    fn test_port_discovery_does_not_panic() {
        let _ = Us428Driver::list_input_ports();
        let _ = Us428Driver::list_output_ports();
        let _ = find_us428_ports();
    }
}
