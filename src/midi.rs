//! MIDI utilities and message types
//!
//! The US-428 only speaks Control Change towards the host and SysEx back
//! to the device; everything else is parsed just far enough to be skipped.

use std::fmt;

/// MIDI message types seen on the surface ports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidiMessage {
    /// Note Off: channel (0-15), note (0-127), velocity (0-127)
    NoteOff { channel: u8, note: u8, velocity: u8 },

    /// Note On: channel (0-15), note (0-127), velocity (1-127)
    NoteOn { channel: u8, note: u8, velocity: u8 },

    /// Control Change: channel (0-15), cc (0-127), value (0-127)
    ControlChange { channel: u8, cc: u8, value: u8 },

    /// Pitch Bend: channel (0-15), value (0-16383)
    PitchBend { channel: u8, value: u16 },

    /// System Exclusive payload without the F0/F7 framing
    SysEx { data: Vec<u8> },

    /// Any other status byte, kept for logging
    Other { status: u8 },
}

impl MidiMessage {
    /// Parse a MIDI message from raw bytes
    pub fn parse(data: &[u8]) -> Option<Self> {
        let (&status, rest) = data.split_first()?;

        // Running status is never produced by the surface
        if status < 0x80 {
            return None;
        }

        let channel = status & 0x0F;
        let byte = |i: usize| rest.get(i).map(|b| b & 0x7F);

        match status & 0xF0 {
            0x80 => Some(MidiMessage::NoteOff {
                channel,
                note: byte(0)?,
                velocity: byte(1)?,
            }),
            0x90 => {
                let note = byte(0)?;
                let velocity = byte(1)?;
                if velocity == 0 {
                    Some(MidiMessage::NoteOff { channel, note, velocity })
                } else {
                    Some(MidiMessage::NoteOn { channel, note, velocity })
                }
            }
            0xB0 => Some(MidiMessage::ControlChange {
                channel,
                cc: byte(0)?,
                value: byte(1)?,
            }),
            0xE0 => {
                let lsb = byte(0)? as u16;
                let msb = byte(1)? as u16;
                Some(MidiMessage::PitchBend {
                    channel,
                    value: (msb << 7) | lsb,
                })
            }
            0xF0 if status == 0xF0 => {
                let end = rest.iter().position(|&b| b == 0xF7)?;
                Some(MidiMessage::SysEx {
                    data: rest[..end].to_vec(),
                })
            }
            _ => Some(MidiMessage::Other { status }),
        }
    }

    /// Encode the message to MIDI bytes
    pub fn encode(&self) -> Vec<u8> {
        match *self {
            MidiMessage::NoteOff { channel, note, velocity } => {
                vec![0x80 | (channel & 0x0F), note & 0x7F, velocity & 0x7F]
            }
            MidiMessage::NoteOn { channel, note, velocity } => {
                vec![0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F]
            }
            MidiMessage::ControlChange { channel, cc, value } => {
                vec![0xB0 | (channel & 0x0F), cc & 0x7F, value & 0x7F]
            }
            MidiMessage::PitchBend { channel, value } => {
                vec![
                    0xE0 | (channel & 0x0F),
                    (value & 0x7F) as u8,
                    ((value >> 7) & 0x7F) as u8,
                ]
            }
            MidiMessage::SysEx { ref data } => {
                let mut bytes = Vec::with_capacity(data.len() + 2);
                bytes.push(0xF0);
                bytes.extend(data.iter().map(|b| b & 0x7F));
                bytes.push(0xF7);
                bytes
            }
            MidiMessage::Other { status } => vec![status],
        }
    }
}

impl fmt::Display for MidiMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MidiMessage::NoteOff { channel, note, velocity } => {
                write!(f, "NoteOff ch:{} n:{} v:{}", channel + 1, note, velocity)
            }
            MidiMessage::NoteOn { channel, note, velocity } => {
                write!(f, "NoteOn ch:{} n:{} v:{}", channel + 1, note, velocity)
            }
            MidiMessage::ControlChange { channel, cc, value } => {
                write!(f, "CC ch:{} cc:{} v:{}", channel + 1, cc, value)
            }
            MidiMessage::PitchBend { channel, value } => {
                write!(f, "PitchBend ch:{} v:{}", channel + 1, value)
            }
            MidiMessage::SysEx { ref data } => write!(f, "SysEx {}", format_hex(data)),
            MidiMessage::Other { status } => write!(f, "Status 0x{:02X}", status),
        }
    }
}

/// MIDI value conversion utilities
pub mod convert {
    /// 7-bit value to normalized `0.0..=1.0`
    pub fn to_unit(value: u8) -> f64 {
        f64::from(value.min(127)) / 127.0
    }
}

/// Format MIDI bytes as hex string for debugging
pub fn format_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_change_on_surface_channel() {
        let msg = MidiMessage::parse(&[0xBF, 53, 127]).unwrap();
        assert_eq!(
            msg,
            MidiMessage::ControlChange {
                channel: 15,
                cc: 53,
                value: 127
            }
        );
        assert_eq!(msg.encode(), vec![0xBF, 53, 127]);
    }

    #[test]
    fn test_note_on_velocity_zero_is_note_off() {
        let msg = MidiMessage::parse(&[0x90, 60, 0]).unwrap();
        assert_eq!(
            msg,
            MidiMessage::NoteOff {
                channel: 0,
                note: 60,
                velocity: 0
            }
        );
    }

    #[test]
    fn test_sysex_framing() {
        let raw = [0xF0, 0x4E, 0x00, 0x12, 0x0E, 0x01, 0x7F, 0xF7];
        let msg = MidiMessage::parse(&raw).unwrap();
        assert_eq!(
            msg,
            MidiMessage::SysEx {
                data: vec![0x4E, 0x00, 0x12, 0x0E, 0x01, 0x7F]
            }
        );
        assert_eq!(msg.encode(), raw.to_vec());
    }

    #[test]
    fn test_truncated_messages_are_rejected() {
        assert_eq!(MidiMessage::parse(&[]), None);
        assert_eq!(MidiMessage::parse(&[0xB0, 7]), None);
        assert_eq!(MidiMessage::parse(&[0xF0, 0x4E]), None);
        assert_eq!(MidiMessage::parse(&[0x40, 0x10]), None);
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(convert::to_unit(0), 0.0);
        assert_eq!(convert::to_unit(127), 1.0);
        assert_eq!(convert::to_unit(200), 1.0);
    }

    #[test]
    fn test_format_hex() {
        assert_eq!(format_hex(&[0xBF, 0x10, 0x7F]), "BF 10 7F");
    }
}
