//! Binding table module - which target each control drives in each mode
//!
//! A binding is a static (control, mode predicate, target) triple. The full
//! US-428 set is declared once in [`layout`] and validated in [`table`] so no
//! two bindings of one control can ever be live under the same modes.

pub mod layout;
pub mod table;

pub use layout::us428_bindings;
pub use table::BindingTable;

use crate::controls::Control;
use crate::host::{ChannelId, HostCommand, HostProperty, TransportFlag};
use crate::state::{
    AssignMode, AuxSend, Dimension, EqBand, FunctionBank, ModeState, ModeValue, SoloMode,
};

/// Configuration defects caught while building the binding table
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindingError {
    #[error("expected {expected} mixer channels, host provided {found}")]
    ChannelCount { expected: usize, found: usize },

    #[error("channel {0} appears more than once in the channel list")]
    DuplicateChannel(ChannelId),

    #[error("slot index {0} is outside 0..8")]
    SlotOutOfRange(usize),

    #[error("control {control:?} has more than one binding active under {mode}")]
    OverlappingBindings { control: Control, mode: String },
}

/// How an incoming control value reaches a host property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValuePolicy {
    /// Host follows only once the control has picked up its current value
    Scaled,
    /// Host takes the incoming value immediately
    Jump,
}

/// Host value span covered by the full travel of a control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const FULL: ValueRange = ValueRange { min: 0.0, max: 1.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Map a normalized control position into host space
    pub fn to_host(&self, position: f64) -> f64 {
        self.min + position.clamp(0.0, 1.0) * (self.max - self.min)
    }

    /// Map a host value back onto the control's travel
    pub fn to_surface(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Mode writes a button can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeAction {
    Set(ModeValue),
    ToggleAssign,
    ToggleSolo,
}

/// What a binding drives
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// Continuous host property
    Property {
        property: HostProperty,
        policy: ValuePolicy,
        range: ValueRange,
    },
    /// Boolean host property flipped on each press
    Toggle(HostProperty),
    /// Transport flag; `toggle` flips on press, otherwise the flag follows
    /// the button level
    Transport { flag: TransportFlag, toggle: bool },
    /// Fire-once host command on press
    Command(HostCommand),
    /// Rewind, or Return to Zero when stop is held
    RewindChord,
    /// Mode variable
    Mode(ModeAction),
    /// Jog-wheel zoom gesture
    Zoom,
}

impl Target {
    pub fn scaled(property: HostProperty) -> Self {
        Target::Property {
            property,
            policy: ValuePolicy::Scaled,
            range: ValueRange::FULL,
        }
    }

    pub fn jump(property: HostProperty) -> Self {
        Target::Property {
            property,
            policy: ValuePolicy::Jump,
            range: ValueRange::FULL,
        }
    }

    /// Host property this target reads or writes, if any
    pub fn property(&self) -> Option<&HostProperty> {
        match self {
            Target::Property { property, .. } | Target::Toggle(property) => Some(property),
            _ => None,
        }
    }
}

/// Mode combinations under which a binding is live
///
/// `None` in a dimension means the binding does not care about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModePredicate {
    bank: Option<FunctionBank>,
    assign: Option<AssignMode>,
    solo: Option<SoloMode>,
    eq_band: Option<EqBand>,
    aux: Option<AuxSend>,
}

impl ModePredicate {
    /// Live in every mode
    pub fn always() -> Self {
        Self::default()
    }

    pub fn bank(mut self, bank: FunctionBank) -> Self {
        self.bank = Some(bank);
        self
    }

    pub fn assign(mut self, assign: AssignMode) -> Self {
        self.assign = Some(assign);
        self
    }

    pub fn solo(mut self, solo: SoloMode) -> Self {
        self.solo = Some(solo);
        self
    }

    pub fn eq_band(mut self, band: EqBand) -> Self {
        self.eq_band = Some(band);
        self
    }

    pub fn aux(mut self, aux: AuxSend) -> Self {
        self.aux = Some(aux);
        self
    }

    pub fn matches(&self, modes: &ModeState) -> bool {
        self.bank.map_or(true, |b| b == modes.bank())
            && self.assign.map_or(true, |a| a == modes.assign())
            && self.solo.map_or(true, |s| s == modes.solo())
            && self.eq_band.map_or(true, |e| e == modes.eq_band())
            && self.aux.map_or(true, |a| a == modes.aux())
    }

    /// Whether a change of `dimension` can change the outcome of `matches`
    pub fn depends_on(&self, dimension: Dimension) -> bool {
        match dimension {
            Dimension::FunctionBank => self.bank.is_some(),
            Dimension::AssignMode => self.assign.is_some(),
            Dimension::SoloMode => self.solo.is_some(),
            Dimension::EqBand => self.eq_band.is_some(),
            Dimension::Aux => self.aux.is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Binding {
    pub control: Control,
    pub predicate: ModePredicate,
    pub target: Target,
}

impl Binding {
    pub fn new(control: Control, predicate: ModePredicate, target: Target) -> Self {
        Self {
            control,
            predicate,
            target,
        }
    }

    /// Binding that is live in every mode
    pub fn always(control: Control, target: Target) -> Self {
        Self::new(control, ModePredicate::always(), target)
    }
}

/// Groups rebound by the assign overlay, in activation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignGroup {
    Aux,
    Eq,
    MasterFader,
    Pan,
    Locator,
    JogWheel,
}

impl AssignGroup {
    /// Order used when entering Assign; leaving runs it backwards
    pub const ORDER: [AssignGroup; 6] = [
        AssignGroup::Aux,
        AssignGroup::Eq,
        AssignGroup::MasterFader,
        AssignGroup::Pan,
        AssignGroup::Locator,
        AssignGroup::JogWheel,
    ];

    pub fn controls(self) -> Vec<Control> {
        match self {
            AssignGroup::Aux => AuxSend::ALL.into_iter().map(Control::Aux).collect(),
            AssignGroup::Eq => EqBand::ALL.into_iter().map(Control::EqButton).collect(),
            AssignGroup::MasterFader => vec![Control::MasterFader, Control::RecMaster],
            AssignGroup::Pan => vec![Control::Pan],
            AssignGroup::Locator => vec![
                Control::LocateLeft,
                Control::LocateRight,
                Control::LocateSet,
            ],
            AssignGroup::JogWheel => vec![Control::JogWheel],
        }
    }

    /// Activation sequence for a transition into `assign`
    pub fn sequence(assign: AssignMode) -> Vec<AssignGroup> {
        let mut order = Self::ORDER.to_vec();
        if assign == AssignMode::Normal {
            order.reverse();
        }
        order
    }
}
