//! Mode dimension type definitions
//!
//! Each dimension is a closed enum that is always in exactly one state.
//! Dimensions are independent of each other; the surface's overall mode is
//! their product.

/// Which third of the 24-channel universe is windowed onto the 8 strips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum FunctionBank {
    #[default]
    F1,
    F2,
    F3,
}

impl FunctionBank {
    pub const ALL: [FunctionBank; 3] = [FunctionBank::F1, FunctionBank::F2, FunctionBank::F3];

    /// Zero-based bank index (F1 = 0)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Global overlay switch toggled by the ASGN button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AssignMode {
    #[default]
    Normal,
    Assign,
}

impl AssignMode {
    pub const ALL: [AssignMode; 2] = [AssignMode::Normal, AssignMode::Assign];

    pub fn toggled(self) -> Self {
        match self {
            AssignMode::Normal => AssignMode::Assign,
            AssignMode::Assign => AssignMode::Normal,
        }
    }
}

/// What the mute-button row shows and drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SoloMode {
    #[default]
    Mute,
    Solo,
}

impl SoloMode {
    pub const ALL: [SoloMode; 2] = [SoloMode::Mute, SoloMode::Solo];

    pub fn toggled(self) -> Self {
        match self {
            SoloMode::Mute => SoloMode::Solo,
            SoloMode::Solo => SoloMode::Mute,
        }
    }
}

/// EQ band addressed by the three shared EQ knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum EqBand {
    High,
    HighMid,
    LowMid,
    #[default]
    Low,
}

impl EqBand {
    pub const ALL: [EqBand; 4] = [EqBand::High, EqBand::HighMid, EqBand::LowMid, EqBand::Low];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Host EQ band number (band 1 is the lowest)
    pub fn host_band(self) -> u8 {
        match self {
            EqBand::High => 4,
            EqBand::HighMid => 3,
            EqBand::LowMid => 2,
            EqBand::Low => 1,
        }
    }
}

/// FX send addressed by the jog wheel in normal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum AuxSend {
    #[default]
    Aux1,
    Aux2,
    Aux3,
    Aux4,
}

impl AuxSend {
    pub const ALL: [AuxSend; 4] = [AuxSend::Aux1, AuxSend::Aux2, AuxSend::Aux3, AuxSend::Aux4];

    /// Zero-based send slot on the host channel
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Names one mode dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    FunctionBank,
    AssignMode,
    SoloMode,
    EqBand,
    Aux,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::FunctionBank,
        Dimension::AssignMode,
        Dimension::SoloMode,
        Dimension::EqBand,
        Dimension::Aux,
    ];
}

/// A value of one dimension, tagged with the dimension it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeValue {
    FunctionBank(FunctionBank),
    AssignMode(AssignMode),
    SoloMode(SoloMode),
    EqBand(EqBand),
    Aux(AuxSend),
}

impl ModeValue {
    pub fn dimension(&self) -> Dimension {
        match self {
            ModeValue::FunctionBank(_) => Dimension::FunctionBank,
            ModeValue::AssignMode(_) => Dimension::AssignMode,
            ModeValue::SoloMode(_) => Dimension::SoloMode,
            ModeValue::EqBand(_) => Dimension::EqBand,
            ModeValue::Aux(_) => Dimension::Aux,
        }
    }
}

impl std::fmt::Display for ModeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModeValue::FunctionBank(bank) => write!(f, "bank={:?}", bank),
            ModeValue::AssignMode(mode) => write!(f, "assign={:?}", mode),
            ModeValue::SoloMode(mode) => write!(f, "solo={:?}", mode),
            ModeValue::EqBand(band) => write!(f, "eq={:?}", band),
            ModeValue::Aux(aux) => write!(f, "aux={:?}", aux),
        }
    }
}

/// Result of a mode write: the outgoing and incoming value of one dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    pub previous: ModeValue,
    pub current: ModeValue,
}

impl ModeChange {
    pub fn dimension(&self) -> Dimension {
        self.current.dimension()
    }

    /// False when the write re-selected the value that was already active
    pub fn is_transition(&self) -> bool {
        self.previous != self.current
    }
}
