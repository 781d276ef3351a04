//! Simulation settings
//!
//! Read once at startup. Nothing is written back: every session starts fresh.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_SUBSTEPS;
use crate::sim::{MotionParameters, StepMode, TrailSettings};

/// Failure to read settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("could not read settings file: {0}")]
    Io(#[from] std::io::Error),
}

/// Tunable configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Starting parameters for the track and every racer
    pub defaults: MotionParameters,
    /// Trail length and fade
    pub trail: TrailSettings,
    /// Frame to physics step mapping
    pub step_mode: StepMode,
    /// Cap on physics steps per frame (fixed-step mode)
    pub max_substeps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            defaults: MotionParameters::default(),
            trail: TrailSettings::default(),
            step_mode: StepMode::default(),
            max_substeps: MAX_SUBSTEPS,
        }
    }
}

impl Settings {
    /// Parse settings; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Clamp values into usable ranges
    pub fn sanitized(mut self) -> Self {
        self.defaults = self.defaults.clamped();
        self.max_substeps = self.max_substeps.clamp(1, 64);
        if !(self.trail.fade_step.is_finite() && self.trail.fade_step > 0.0) {
            self.trail.fade_step = TrailSettings::default().fade_step;
        }
        self
    }

    /// Element holding inline JSON settings
    #[allow(dead_code)]
    const ELEMENT_ID: &'static str = "motion-settings";

    /// Load settings embedded in the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        match json.map(|j| Self::from_json(&j)) {
            Some(Ok(settings)) => {
                log::info!("Loaded settings from page");
                settings
            }
            Some(Err(e)) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Environment variable naming a settings file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub const ENV_VAR: &'static str = "MOTION_RACE_SETTINGS";

    /// Load settings from the file named by `MOTION_RACE_SETTINGS` (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &str) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
