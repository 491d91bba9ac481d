//! Configuration management for US-428 GW
//!
//! Handles loading, parsing and validation of the YAML configuration file.
//! Every field has a default, so a missing or partial file still yields a
//! usable surface.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub midi: MidiConfig,
    #[serde(default)]
    pub surface: SurfaceOptions,
    #[serde(default)]
    pub zoom: ZoomConfig,
}

/// MIDI port configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MidiConfig {
    /// Case-insensitive substring of the input port name
    #[serde(default = "default_port")]
    pub input_port: String,
    #[serde(default = "default_port")]
    pub output_port: String,
    /// 0-based channel the surface sends its CCs on
    #[serde(default = "default_channel")]
    pub channel: u8,
}

impl Default for MidiConfig {
    fn default() -> Self {
        Self {
            input_port: default_port(),
            output_port: default_port(),
            channel: default_channel(),
        }
    }
}

/// Behaviour switches of the surface layout
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SurfaceOptions {
    /// Leave the 8 channel faders and the master fader unbound
    #[serde(default)]
    pub disable_faders: bool,
    /// Low EQ band drives the pre-filter section instead of EQ band 1
    #[serde(default)]
    pub low_eq_prefilter: bool,
    /// Host volume reached at the top of the master fader (0.75 = 0 dB)
    #[serde(default = "default_master_fader_scale")]
    pub master_fader_scale: f64,
    /// Normalized change per encoder detent
    #[serde(default = "default_relative_step")]
    pub relative_step: f64,
    /// Pickup window around the host value for scaled take-over
    #[serde(default = "default_takeover_tolerance")]
    pub takeover_tolerance: f64,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            disable_faders: false,
            low_eq_prefilter: false,
            master_fader_scale: default_master_fader_scale(),
            relative_step: default_relative_step(),
            takeover_tolerance: default_takeover_tolerance(),
        }
    }
}

/// Jog-wheel zoom gesture tuning
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ZoomConfig {
    /// Positions at or below this fire the reset gesture
    #[serde(default)]
    pub threshold: i32,
    /// Magnitude of the reset "zoom out"
    #[serde(default = "default_reset_magnitude")]
    pub reset_magnitude: u32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            threshold: 0,
            reset_magnitude: default_reset_magnitude(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML config: {}", path))?;

        config.validate()?;

        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub async fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path).await
        } else {
            tracing::warn!("Config file '{}' not found, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        if self.midi.input_port.is_empty() {
            anyhow::bail!("MIDI input_port cannot be empty");
        }
        if self.midi.output_port.is_empty() {
            anyhow::bail!("MIDI output_port cannot be empty");
        }
        if self.midi.channel > 15 {
            anyhow::bail!(
                "MIDI channel {} is invalid (must be 0-15)",
                self.midi.channel
            );
        }

        let surface = &self.surface;
        if !(surface.master_fader_scale > 0.0 && surface.master_fader_scale <= 1.0) {
            anyhow::bail!(
                "master_fader_scale {} is invalid (must be in (0, 1])",
                surface.master_fader_scale
            );
        }
        if !(surface.relative_step > 0.0 && surface.relative_step <= 1.0) {
            anyhow::bail!(
                "relative_step {} is invalid (must be in (0, 1])",
                surface.relative_step
            );
        }
        if !(surface.takeover_tolerance >= 0.0 && surface.takeover_tolerance < 1.0) {
            anyhow::bail!(
                "takeover_tolerance {} is invalid (must be in [0, 1))",
                surface.takeover_tolerance
            );
        }

        Ok(())
    }
}

// Default value functions
fn default_port() -> String { "US-428 Control".to_string() }
fn default_channel() -> u8 { 15 }
fn default_master_fader_scale() -> f64 { 0.75 }
fn default_relative_step() -> f64 { 1.0 / 128.0 }
fn default_takeover_tolerance() -> f64 { 0.01 }
fn default_reset_magnitude() -> u32 { 1000 }
