//! US-428 wire format
//!
//! Input is Control Change on one channel. Output is a vendor SysEx
//! `F0 4E 00 12 <payload> F7` whose payload names the LED group, an optional
//! index, then `7F` (on) or `00` (off).

use super::leds::{Indicator, LedGroup};
use crate::control_mapping::us428_map;
use crate::controls::Control;
use crate::midi::{format_hex, MidiMessage};

const SYSEX_HEADER: [u8; 3] = [0x4E, 0x00, 0x12];
const LED_ON: u8 = 0x7F;
const LED_OFF: u8 = 0x00;
const FADER_DUMP: u8 = 0x10;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("malformed MIDI message: {0}")]
    Malformed(String),
}

/// Decoded input from one control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlEvent {
    pub control: Control,
    pub value: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct SurfaceCodec {
    channel: u8,
}

impl SurfaceCodec {
    pub fn new(channel: u8) -> Self {
        Self {
            channel: channel & 0x0F,
        }
    }

    /// Decode raw input bytes
    ///
    /// Messages on other channels, other message types and unused CC numbers
    /// decode to `None`.
    pub fn decode(&self, raw: &[u8]) -> Result<Option<ControlEvent>, CodecError> {
        let message =
            MidiMessage::parse(raw).ok_or_else(|| CodecError::Malformed(format_hex(raw)))?;

        Ok(match message {
            MidiMessage::ControlChange { channel, cc, value } if channel == self.channel => {
                us428_map()
                    .control_for_cc(cc)
                    .map(|control| ControlEvent { control, value })
            }
            _ => None,
        })
    }

    /// Encode an input event back into bytes, as the device would send it
    #[cfg(test)]
    pub fn encode_control(&self, event: ControlEvent) -> Option<Vec<u8>> {
        let cc = us428_map().cc_for_control(event.control)?;
        Some(
            MidiMessage::ControlChange {
                channel: self.channel,
                cc,
                value: event.value,
            }
            .encode(),
        )
    }

    pub fn encode_led(&self, indicator: Indicator, on: bool) -> Vec<u8> {
        let mut payload = led_address(indicator);
        payload.push(if on { LED_ON } else { LED_OFF });
        sysex(payload)
    }

    /// Request the physical position of one fader strip (8 = master)
    pub fn encode_fader_dump(&self, strip: u8) -> Vec<u8> {
        sysex(vec![FADER_DUMP, strip])
    }
}

fn led_address(indicator: Indicator) -> Vec<u8> {
    match indicator.address() {
        // Transport codes run 13-17 in TransportLed order
        (LedGroup::Transport, index) => vec![0x01, 0x13 + index],
        (LedGroup::Mute, index) => vec![0x02, index],
        (LedGroup::Select, index) => vec![0x03, index],
        (LedGroup::Rec, index) => vec![0x04, index],
        (LedGroup::Null, _) => vec![0x05],
        (LedGroup::Solo, _) => vec![0x06],
        (LedGroup::BankLeft, _) => vec![0x07],
        (LedGroup::BankRight, _) => vec![0x08],
        (LedGroup::Eq, index) => vec![0x09 + index],
        (LedGroup::Aux, index) => vec![0x0D, index],
        (LedGroup::Function, index) => vec![0x0E, index],
        (LedGroup::Assign, _) => vec![0x0F],
    }
}

fn sysex(payload: Vec<u8>) -> Vec<u8> {
    let mut data = SYSEX_HEADER.to_vec();
    data.extend(payload);
    MidiMessage::SysEx { data }.encode()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::Slot;
    use crate::surface::TransportLed;
    use crate::state::{AuxSend, EqBand, FunctionBank};

    #[test]
    fn test_decode_surface_channel_only() {
        let codec = SurfaceCodec::new(15);
        assert_eq!(
            codec.decode(&[0xBF, 54, 127]).unwrap(),
            Some(ControlEvent {
                control: Control::Function(FunctionBank::F2),
                value: 127
            })
        );
        assert_eq!(codec.decode(&[0xB0, 54, 127]).unwrap(), None);
        assert_eq!(codec.decode(&[0x9F, 54, 127]).unwrap(), None);
        assert_eq!(codec.decode(&[0xBF, 8, 127]).unwrap(), None);
    }

    #[test]
    fn test_decode_malformed_bytes() {
        let codec = SurfaceCodec::new(15);
        assert_eq!(
            codec.decode(&[0xBF, 54]),
            Err(CodecError::Malformed("BF 36".to_string()))
        );
    }

    #[test]
    fn test_encode_control_matches_device_bytes() {
        let codec = SurfaceCodec::new(15);
        let event = ControlEvent {
            control: Control::Fader(Slot::ALL[2]),
            value: 100,
        };
        assert_eq!(codec.encode_control(event), Some(vec![0xBF, 66, 100]));
    }

    #[test]
    fn test_led_sysex_layout() {
        let codec = SurfaceCodec::new(15);
        assert_eq!(
            codec.encode_led(Indicator::Transport(TransportLed::Play), true),
            vec![0xF0, 0x4E, 0x00, 0x12, 0x01, 0x16, 0x7F, 0xF7]
        );
        assert_eq!(
            codec.encode_led(Indicator::Mute(Slot::ALL[3]), false),
            vec![0xF0, 0x4E, 0x00, 0x12, 0x02, 0x03, 0x00, 0xF7]
        );
        assert_eq!(
            codec.encode_led(Indicator::Eq(EqBand::LowMid), true),
            vec![0xF0, 0x4E, 0x00, 0x12, 0x0B, 0x7F, 0xF7]
        );
        assert_eq!(
            codec.encode_led(Indicator::Aux(AuxSend::Aux4), true),
            vec![0xF0, 0x4E, 0x00, 0x12, 0x0D, 0x03, 0x7F, 0xF7]
        );
        assert_eq!(
            codec.encode_led(Indicator::Transport(TransportLed::Record), true),
            vec![0xF0, 0x4E, 0x00, 0x12, 0x01, 0x17, 0x7F, 0xF7]
        );
        assert_eq!(
            codec.encode_led(Indicator::Function(FunctionBank::F3), true),
            vec![0xF0, 0x4E, 0x00, 0x12, 0x0E, 0x02, 0x7F, 0xF7]
        );
        assert_eq!(
            codec.encode_led(Indicator::BankRight, true),
            vec![0xF0, 0x4E, 0x00, 0x12, 0x08, 0x7F, 0xF7]
        );
        assert_eq!(
            codec.encode_led(Indicator::Assign, false),
            vec![0xF0, 0x4E, 0x00, 0x12, 0x0F, 0x00, 0xF7]
        );
    }

    #[test]
    fn test_fader_dump_request() {
        let codec = SurfaceCodec::new(15);
        assert_eq!(
            codec.encode_fader_dump(8),
            vec![0xF0, 0x4E, 0x00, 0x12, 0x10, 0x08, 0xF7]
        );
    }
}
