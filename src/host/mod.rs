//! Host capability consumed by the routing core
//!
//! The host owns the mixer, channels and transport. The core only reads and
//! writes properties through [`Host`] and receives [`HostChange`]
//! notifications in return. Values are normalized to `0.0..=1.0`; boolean
//! properties use `0.0`/`1.0`.

pub mod sim;

pub use sim::SimHost;

use crate::state::{AuxSend, EqBand};

/// Opaque reference to a host mixer channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub u16);

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ch#{}", self.0)
    }
}

/// Which mixer strip a property lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strip {
    /// One of the windowed mixer channels
    Mixer(ChannelId),
    /// Whatever channel the host currently has selected
    Selected,
    /// Main stereo output
    MainOut,
    /// First FX return channel
    FirstFx,
}

/// A channel parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    Volume,
    Pan,
    Mute,
    Solo,
    RecordEnable,
    Selected,
    EditorOpen,
    EqGain(EqBand),
    EqFreq(EqBand),
    EqQ(EqBand),
    EqOn(EqBand),
    SendLevel(AuxSend),
    SendOn(AuxSend),
    PreFilterGain,
    LowCutFreq,
    LowCutSlope,
    LowCutOn,
}

impl Parameter {
    /// Value a fresh channel starts with
    pub fn default_value(self) -> f64 {
        match self {
            Parameter::Pan | Parameter::EqGain(_) | Parameter::EqFreq(_) | Parameter::EqQ(_) => {
                0.5
            }
            Parameter::PreFilterGain => 0.5,
            _ => 0.0,
        }
    }

    /// Parameters the feedback engine mirrors for the selected channel
    pub fn selected_indicators() -> impl Iterator<Item = Parameter> {
        AuxSend::ALL
            .into_iter()
            .map(Parameter::SendOn)
            .chain(EqBand::ALL.into_iter().map(Parameter::EqOn))
            .chain(std::iter::once(Parameter::LowCutOn))
    }
}

/// Fully qualified host property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostProperty {
    pub strip: Strip,
    pub parameter: Parameter,
}

impl HostProperty {
    pub fn new(strip: Strip, parameter: Parameter) -> Self {
        Self { strip, parameter }
    }

    pub fn mixer(channel: ChannelId, parameter: Parameter) -> Self {
        Self::new(Strip::Mixer(channel), parameter)
    }

    pub fn selected(parameter: Parameter) -> Self {
        Self::new(Strip::Selected, parameter)
    }
}

/// Level-triggered transport flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportFlag {
    Rewind,
    Forward,
    Start,
    Record,
    Metronome,
}

impl TransportFlag {
    pub const ALL: [TransportFlag; 5] = [
        TransportFlag::Rewind,
        TransportFlag::Forward,
        TransportFlag::Start,
        TransportFlag::Record,
        TransportFlag::Metronome,
    ];
}

/// Fire-once host commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostCommand {
    Stop,
    ReturnToZero,
    LocatePreviousMarker,
    LocateNextMarker,
    InsertMarker,
    SetLeftLocator,
    SetRightLocator,
    Cycle,
    ZoomIn,
    ZoomOut,
    BypassMainInserts,
    SelectPreviousTrack,
    SelectNextTrack,
}

impl HostCommand {
    /// Host command category
    pub fn category(self) -> &'static str {
        match self {
            HostCommand::ZoomIn | HostCommand::ZoomOut => "Zoom",
            HostCommand::BypassMainInserts => "Mixer",
            HostCommand::SelectPreviousTrack | HostCommand::SelectNextTrack => "Track Selection",
            _ => "Transport",
        }
    }

    /// Host command name within its category
    pub fn name(self) -> &'static str {
        match self {
            HostCommand::Stop => "Stop",
            HostCommand::ReturnToZero => "Return to Zero",
            HostCommand::LocatePreviousMarker => "Locate Previous Marker",
            HostCommand::LocateNextMarker => "Locate Next Marker",
            HostCommand::InsertMarker => "Insert Marker",
            HostCommand::SetLeftLocator => "Set Left Locator",
            HostCommand::SetRightLocator => "Set Right Locator",
            HostCommand::Cycle => "Cycle",
            HostCommand::ZoomIn => "Zoom In",
            HostCommand::ZoomOut => "Zoom Out",
            HostCommand::BypassMainInserts => "Bypass: Inserts on Main Mix",
            HostCommand::SelectPreviousTrack => "Previous Track",
            HostCommand::SelectNextTrack => "Next Track",
        }
    }
}

/// Change notification delivered by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostChange {
    Value { property: HostProperty, value: f64 },
    Transport { flag: TransportFlag, active: bool },
}

/// Host rejected a write
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("channel {0} no longer exists")]
    UnknownChannel(ChannelId),

    #[error("no channel is selected")]
    NoSelection,

    #[error("parameter {0:?} is locked")]
    Locked(HostProperty),
}

/// Host capability
///
/// All calls are synchronous and non-blocking; the host is always available
/// in-process. Writes may be rejected, which the router swallows.
pub trait Host {
    /// Ordered mixer channel handles, acquired once at startup
    fn mixer_channels(&self) -> Vec<ChannelId>;

    /// Current value, `None` if the strip does not resolve
    fn value(&self, property: &HostProperty) -> Option<f64>;

    fn set_value(&mut self, property: &HostProperty, value: f64) -> Result<(), HostError>;

    fn transport(&self, flag: TransportFlag) -> bool;

    fn set_transport(&mut self, flag: TransportFlag, active: bool) -> Result<(), HostError>;

    /// Fire a named command; `magnitude` repeats or scales it (zoom reset)
    fn command(&mut self, command: HostCommand, magnitude: u32) -> Result<(), HostError>;

    /// Take the change notifications queued since the last call
    fn drain_changes(&mut self) -> Vec<HostChange>;
}
