//! Mode state module - the orthogonal mode dimensions of the surface
//!
//! The surface has five independent dimensions (function bank, assign
//! overlay, mute/solo row, selected EQ band, selected aux). Their product
//! decides which target every physical control currently drives.

mod mode;
mod types;

pub use mode::ModeState;
pub use types::{
    AssignMode, AuxSend, Dimension, EqBand, FunctionBank, ModeChange, ModeValue, SoloMode,
};
