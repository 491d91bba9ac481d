//! US-428 GW - mode-routing core for the Tascam US-428 control surface
//!
//! Decodes surface input, resolves each control through the binding active
//! under the current modes and drives the host mixer. Host state flows back
//! through the LED feedback engine.

pub mod bank;
pub mod binding;
pub mod config;
pub mod control_mapping;
pub mod controls;
pub mod host;
pub mod midi;
pub mod router;
pub mod state;
pub mod surface;

pub use bank::ChannelBank;
pub use binding::{Binding, BindingError, BindingTable};
pub use config::AppConfig;
pub use controls::Control;
pub use host::{Host, SimHost};
pub use router::Router;
pub use state::{ModeChange, ModeState, ModeValue};
pub use surface::{LedSink, SurfaceCodec, Us428Driver};
