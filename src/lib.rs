//! Motion Race - force, friction and drag as a three-lane race
//!
//! Core modules:
//! - `sim`: Deterministic simulation (parameters, physics step, run state)
//! - `renderer`: 2D canvas drawing of lanes, trails and characters
//! - `controls`: Keyboard, button and slider mapping onto the simulation
//! - `roster`: The racing characters
//! - `settings`: Tunable configuration

pub mod controls;
pub mod renderer;
pub mod roster;
pub mod settings;
pub mod sim;

pub use roster::{Character, ROSTER};
pub use settings::Settings;

/// Simulation configuration constants
pub mod consts {
    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f32 = 9.8;
    /// Nominal display refresh rate the step size is tuned for
    pub const FRAME_RATE: f32 = 60.0;
    /// Base simulation timestep (one nominal frame), before time scaling
    pub const SIM_DT: f32 = 1.0 / FRAME_RATE;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest real frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Trail samples kept per object
    pub const TRAIL_CAPACITY: usize = 50;
    /// Opacity lost by every trail sample each tick
    pub const TRAIL_FADE_STEP: f32 = 0.02;

    /// Number of racing lanes
    pub const LANE_COUNT: usize = 3;
}
