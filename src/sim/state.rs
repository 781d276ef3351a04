//! Race state and core simulation types

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::params::MotionParameters;
use crate::consts::{TRAIL_CAPACITY, TRAIL_FADE_STEP};
use crate::roster::Character;

/// Coarse run state of the race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimulationStatus {
    /// Racers at the start line, per-racer parameters editable
    #[default]
    Idle,
    /// Physics advancing every frame
    Running,
    /// Frozen mid-race
    Paused,
    /// Every racer crossed the line
    Finished,
}

impl SimulationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimulationStatus::Idle => "IDLE",
            SimulationStatus::Running => "RUNNING",
            SimulationStatus::Paused => "PAUSED",
            SimulationStatus::Finished => "FINISHED",
        }
    }
}

/// Trail tuning (purely visual)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailSettings {
    /// Samples kept before the oldest is evicted
    pub capacity: usize,
    /// Opacity lost by every sample each tick
    pub fade_step: f32,
}

impl Default for TrailSettings {
    fn default() -> Self {
        Self {
            capacity: TRAIL_CAPACITY,
            fade_step: TRAIL_FADE_STEP,
        }
    }
}

/// One remembered position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailSample {
    /// Distance along the track (m)
    pub position: f32,
    /// 0-1, decays every tick
    pub opacity: f32,
}

/// Bounded fading history of positions (oldest first)
#[derive(Debug, Clone, Default)]
pub struct Trail {
    samples: VecDeque<TrailSample>,
}

impl Trail {
    /// Record a new sample, evict beyond capacity, then fade everything
    pub fn record(&mut self, position: f32, settings: &TrailSettings) {
        self.samples.push_back(TrailSample {
            position,
            opacity: 1.0,
        });
        while self.samples.len() > settings.capacity {
            self.samples.pop_front();
        }
        for sample in &mut self.samples {
            sample.opacity -= settings.fade_step;
        }
        self.samples.retain(|s| s.opacity > 0.0);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailSample> {
        self.samples.iter()
    }

    pub fn samples(&self) -> &VecDeque<TrailSample> {
        &self.samples
    }
}

/// Kinematic state of a racer, independent of identity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Kinematics {
    /// Distance from the start line (m)
    pub position: f32,
    /// m/s
    pub velocity: f32,
    /// m/s²
    pub acceleration: f32,
    /// Crossed the line; frozen from then on
    pub finished: bool,
}

impl Kinematics {
    /// Resting at the start line
    pub fn at_start(initial_velocity: f32) -> Self {
        Self {
            position: 0.0,
            velocity: initial_velocity,
            acceleration: 0.0,
            finished: false,
        }
    }
}

/// A racer on the track
#[derive(Debug, Clone)]
pub struct ObjectState {
    pub character: Character,
    pub kinematics: Kinematics,
    pub trail: Trail,
    /// Working parameter snapshot
    pub params: MotionParameters,
}

impl ObjectState {
    pub fn new(character: Character, params: MotionParameters) -> Self {
        Self {
            character,
            kinematics: Kinematics::at_start(params.initial_velocity),
            trail: Trail::default(),
            params,
        }
    }

    pub fn id(&self) -> &'static str {
        self.character.id
    }

    pub fn position(&self) -> f32 {
        self.kinematics.position
    }

    pub fn velocity(&self) -> f32 {
        self.kinematics.velocity
    }

    pub fn acceleration(&self) -> f32 {
        self.kinematics.acceleration
    }

    pub fn is_finished(&self) -> bool {
        self.kinematics.finished
    }

    /// Back to the start line with a fresh parameter snapshot
    pub fn reset(&mut self, params: MotionParameters) {
        self.params = params;
        self.kinematics = Kinematics::at_start(params.initial_velocity);
        self.trail.clear();
    }
}
