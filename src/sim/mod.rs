//! Deterministic simulation module
//!
//! All race logic lives here. This module must be pure and deterministic:
//! - Fixed step size per tick
//! - Stable iteration order (lane order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod params;
pub mod race;
pub mod state;
pub mod tick;

pub use clock::{FrameClock, StepMode};
pub use params::{
    EditPermit, MotionParameters, ObjectParameters, ParamChange, ParamError, ParamField,
    ParamScope, ParameterStore, SliderRange, TrackParameters,
};
pub use race::{Race, Transition};
pub use state::{Kinematics, ObjectState, SimulationStatus, Trail, TrailSample, TrailSettings};
pub use tick::{ForceBreakdown, advance_object, forces, integrate, tick};
