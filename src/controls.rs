//! Input and control surface
//!
//! Platform-free mapping from keys, buttons and sliders onto the race. The DOM
//! wiring in `main.rs` only forwards events here.

use crate::sim::{ParamChange, ParamError, ParamField, ParamScope, Race, SimulationStatus, Transition};

/// A user command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start, pause, resume or restart depending on status
    Toggle,
    /// Back to Idle
    Reset,
    /// Pause if running
    Pause,
}

/// Map a keyboard event (`code`, `key`) to a command
pub fn command_for_key(code: &str, key: &str) -> Option<Command> {
    match code {
        "Space" | "Enter" | "NumpadEnter" => return Some(Command::Toggle),
        _ => {}
    }
    match key.to_ascii_lowercase().as_str() {
        "r" => Some(Command::Reset),
        "p" => Some(Command::Pause),
        _ => None,
    }
}

/// Apply a command to the race
pub fn apply(race: &mut Race, command: Command) -> Option<Transition> {
    match command {
        Command::Toggle => race.toggle(),
        Command::Reset => race.reset(),
        Command::Pause => race.pause(),
    }
}

/// Label for the start/pause/restart button
pub fn toggle_label(status: SimulationStatus) -> &'static str {
    match status {
        SimulationStatus::Finished => "Restart",
        SimulationStatus::Running => "Pause",
        SimulationStatus::Idle | SimulationStatus::Paused => "Start Race",
    }
}

/// CSS modifier for the toggle button
pub fn toggle_class(status: SimulationStatus) -> &'static str {
    match status {
        SimulationStatus::Finished => "btn-toggle restart",
        SimulationStatus::Running => "btn-toggle pause",
        SimulationStatus::Idle | SimulationStatus::Paused => "btn-toggle start",
    }
}

/// Per-racer sliders are only live while idle
pub fn object_sliders_enabled(status: SimulationStatus) -> bool {
    status == SimulationStatus::Idle
}

/// Which parameter set a slider writes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SliderTarget {
    Track,
    Object(String),
}

/// One slider row
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    pub target: SliderTarget,
    pub field: ParamField,
}

impl Slider {
    pub fn track(field: ParamField) -> Self {
        Self {
            target: SliderTarget::Track,
            field,
        }
    }

    pub fn object(id: &str, field: ParamField) -> Self {
        Self {
            target: SliderTarget::Object(id.to_string()),
            field,
        }
    }

    /// Element id for the `<input type="range">`
    pub fn element_id(&self) -> String {
        match &self.target {
            SliderTarget::Track => format!("slider-track-{}", self.field.key()),
            SliderTarget::Object(id) => format!("slider-{}-{}", id, self.field.key()),
        }
    }

    /// Value currently stored for this slider
    pub fn stored_value(&self, race: &Race) -> Option<f32> {
        match &self.target {
            SliderTarget::Track => Some(self.field.read(race.params().global())),
            SliderTarget::Object(id) => race.params().object(id)?.get(self.field),
        }
    }

    /// Human readable value with unit
    pub fn format_value(&self, value: f32) -> String {
        format!(
            "{:.*}{}",
            self.field.precision(),
            value,
            self.field.unit()
        )
    }

    pub fn enabled(&self, status: SimulationStatus) -> bool {
        match self.field.scope() {
            ParamScope::Track => true,
            ParamScope::Object => object_sliders_enabled(status),
        }
    }

    /// Forward a slider value to the race
    pub fn submit(&self, race: &mut Race, value: f32) -> Result<ParamChange, ParamError> {
        match &self.target {
            SliderTarget::Track => race.set_track_param(self.field, value),
            SliderTarget::Object(id) => race.set_object_param(id, self.field, value),
        }
    }
}

/// Every slider in sidebar order: track settings, then each racer
pub fn sidebar<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<Slider> {
    let mut sliders: Vec<Slider> = ParamField::TRACK.iter().map(|f| Slider::track(*f)).collect();
    for id in ids {
        sliders.extend(ParamField::OBJECT.iter().map(|f| Slider::object(id, *f)));
    }
    sliders
}
