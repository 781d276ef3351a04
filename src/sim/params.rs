//! Motion parameters and the parameter store
//!
//! Every value entering the simulation passes through here, so the stepper can
//! rely on `mass > 0` without checking it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::SimulationStatus;

/// Full parameter set for one racer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionParameters {
    /// Applied driving force (N)
    pub force: f32,
    /// Mass (kg), always > 0
    pub mass: f32,
    /// Surface friction coefficient
    pub friction: f32,
    /// Linear drag coefficient
    pub air_resistance: f32,
    /// Track length (m), shared by every lane
    pub max_distance: f32,
    /// Simulation speed multiplier
    pub time_scale: f32,
    /// Velocity at the start line (m/s)
    pub initial_velocity: f32,
}

impl Default for MotionParameters {
    fn default() -> Self {
        Self {
            force: 50.0,
            mass: 5.0,
            friction: 0.1,
            air_resistance: 0.2,
            max_distance: 300.0,
            time_scale: 1.0,
            initial_velocity: 10.0,
        }
    }
}

impl MotionParameters {
    /// Combine track-wide settings with one racer's own fields
    pub fn merge(track: &TrackParameters, object: &ObjectParameters) -> Self {
        Self {
            force: object.force,
            mass: object.mass,
            friction: object.friction,
            air_resistance: object.air_resistance,
            max_distance: track.max_distance,
            time_scale: track.time_scale,
            initial_velocity: object.initial_velocity,
        }
    }

    pub fn track(&self) -> TrackParameters {
        TrackParameters {
            max_distance: self.max_distance,
            time_scale: self.time_scale,
        }
    }

    pub fn object(&self) -> ObjectParameters {
        ObjectParameters {
            force: self.force,
            mass: self.mass,
            friction: self.friction,
            air_resistance: self.air_resistance,
            initial_velocity: self.initial_velocity,
        }
    }

    /// Clamp every field into its slider range (non-finite values become the default)
    pub fn clamped(self) -> Self {
        let fallback = Self::default();
        let mut out = self;
        for field in ParamField::ALL {
            let value = field.read(&self);
            let value = if value.is_finite() {
                field.range().clamp(value)
            } else {
                field.read(&fallback)
            };
            out.write(field, value);
        }
        out
    }

    fn write(&mut self, field: ParamField, value: f32) {
        match field {
            ParamField::TrackDistance => self.max_distance = value,
            ParamField::TimeScale => self.time_scale = value,
            ParamField::InitialVelocity => self.initial_velocity = value,
            ParamField::Force => self.force = value,
            ParamField::Mass => self.mass = value,
            ParamField::Friction => self.friction = value,
            ParamField::AirResistance => self.air_resistance = value,
        }
    }
}

/// Parameters owned by a single racer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectParameters {
    pub force: f32,
    pub mass: f32,
    pub friction: f32,
    pub air_resistance: f32,
    pub initial_velocity: f32,
}

impl ObjectParameters {
    pub fn get(&self, field: ParamField) -> Option<f32> {
        match field {
            ParamField::InitialVelocity => Some(self.initial_velocity),
            ParamField::Force => Some(self.force),
            ParamField::Mass => Some(self.mass),
            ParamField::Friction => Some(self.friction),
            ParamField::AirResistance => Some(self.air_resistance),
            ParamField::TrackDistance | ParamField::TimeScale => None,
        }
    }

    fn set(&mut self, field: ParamField, value: f32) {
        match field {
            ParamField::InitialVelocity => self.initial_velocity = value,
            ParamField::Force => self.force = value,
            ParamField::Mass => self.mass = value,
            ParamField::Friction => self.friction = value,
            ParamField::AirResistance => self.air_resistance = value,
            ParamField::TrackDistance | ParamField::TimeScale => {}
        }
    }
}

/// Parameters shared by the whole track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackParameters {
    pub max_distance: f32,
    pub time_scale: f32,
}

/// Who a parameter belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamScope {
    /// Shared, editable at any time
    Track,
    /// Per racer, editable only while idle
    Object,
}

/// Inclusive slider range with a step grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Clamp into range and round to the nearest step
    pub fn snap(&self, value: f32) -> f32 {
        let min = self.min as f64;
        let step = self.step as f64;
        let v = self.clamp(value) as f64;
        let steps = ((v - min) / step).round();
        ((min + steps * step) as f32).clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Every user-adjustable parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamField {
    TrackDistance,
    TimeScale,
    InitialVelocity,
    Force,
    Mass,
    Friction,
    AirResistance,
}

impl ParamField {
    pub const ALL: [ParamField; 7] = [
        ParamField::TrackDistance,
        ParamField::TimeScale,
        ParamField::InitialVelocity,
        ParamField::Force,
        ParamField::Mass,
        ParamField::Friction,
        ParamField::AirResistance,
    ];

    /// Track-wide fields, in sidebar order
    pub const TRACK: [ParamField; 2] = [ParamField::TrackDistance, ParamField::TimeScale];

    /// Per-racer fields, in sidebar order
    pub const OBJECT: [ParamField; 5] = [
        ParamField::InitialVelocity,
        ParamField::Force,
        ParamField::Mass,
        ParamField::Friction,
        ParamField::AirResistance,
    ];

    pub fn scope(self) -> ParamScope {
        match self {
            ParamField::TrackDistance | ParamField::TimeScale => ParamScope::Track,
            _ => ParamScope::Object,
        }
    }

    pub fn range(self) -> SliderRange {
        match self {
            ParamField::TrackDistance => SliderRange::new(50.0, 500.0, 10.0),
            ParamField::TimeScale => SliderRange::new(0.1, 3.0, 0.1),
            ParamField::InitialVelocity => SliderRange::new(0.0, 40.0, 1.0),
            ParamField::Force => SliderRange::new(0.0, 100.0, 1.0),
            ParamField::Mass => SliderRange::new(1.0, 25.0, 1.0),
            ParamField::Friction => SliderRange::new(0.0, 0.3, 0.01),
            ParamField::AirResistance => SliderRange::new(0.0, 1.0, 0.01),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ParamField::TrackDistance => "Track Distance",
            ParamField::TimeScale => "Time Scale",
            ParamField::InitialVelocity => "Initial Speed",
            ParamField::Force => "Applied Force",
            ParamField::Mass => "Mass",
            ParamField::Friction => "Surface Friction",
            ParamField::AirResistance => "Air Resistance",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            ParamField::TrackDistance => "m",
            ParamField::TimeScale => "x",
            ParamField::InitialVelocity => " m/s",
            ParamField::Force => " N",
            ParamField::Mass => " kg",
            ParamField::Friction | ParamField::AirResistance => "",
        }
    }

    /// Short key used in element ids
    pub fn key(self) -> &'static str {
        match self {
            ParamField::TrackDistance => "distance",
            ParamField::TimeScale => "time-scale",
            ParamField::InitialVelocity => "velocity",
            ParamField::Force => "force",
            ParamField::Mass => "mass",
            ParamField::Friction => "friction",
            ParamField::AirResistance => "drag",
        }
    }

    /// Decimal places shown next to the slider
    pub fn precision(self) -> usize {
        match self {
            ParamField::TimeScale => 1,
            ParamField::Friction | ParamField::AirResistance => 2,
            _ => 0,
        }
    }

    pub fn read(self, params: &MotionParameters) -> f32 {
        match self {
            ParamField::TrackDistance => params.max_distance,
            ParamField::TimeScale => params.time_scale,
            ParamField::InitialVelocity => params.initial_velocity,
            ParamField::Force => params.force,
            ParamField::Mass => params.mass,
            ParamField::Friction => params.friction,
            ParamField::AirResistance => params.air_resistance,
        }
    }
}

/// Write capability derived from the current run status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditPermit {
    status: SimulationStatus,
}

impl EditPermit {
    pub fn for_status(status: SimulationStatus) -> Self {
        Self { status }
    }

    pub fn allows(self, scope: ParamScope) -> bool {
        match scope {
            ParamScope::Track => true,
            ParamScope::Object => self.status == SimulationStatus::Idle,
        }
    }
}

/// Outcome of an accepted mutation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamChange {
    /// Value stored
    Applied,
    /// Write refused by the current status (not an error)
    Locked,
}

/// Misuse of the store API
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("unknown racer `{0}`")]
    UnknownObject(String),
    #[error("{field:?} must be finite, got {value}")]
    NotFinite { field: ParamField, value: f32 },
    #[error("{field:?} is not a {expected:?} parameter")]
    WrongScope { field: ParamField, expected: ParamScope },
}

/// Global defaults plus per-racer overrides
#[derive(Debug, Clone)]
pub struct ParameterStore {
    global: MotionParameters,
    objects: Vec<(String, ObjectParameters)>,
}

impl ParameterStore {
    /// Create a store where every racer starts from `defaults`
    pub fn new<'a>(ids: impl IntoIterator<Item = &'a str>, defaults: MotionParameters) -> Self {
        let global = defaults.clamped();
        let objects = ids
            .into_iter()
            .map(|id| (id.to_string(), global.object()))
            .collect();
        Self { global, objects }
    }

    /// Global copy (track fields are live, object fields are the initial defaults)
    pub fn global(&self) -> &MotionParameters {
        &self.global
    }

    pub fn track(&self) -> TrackParameters {
        self.global.track()
    }

    pub fn object(&self, id: &str) -> Option<&ObjectParameters> {
        self.objects.iter().find(|(k, _)| k == id).map(|(_, p)| p)
    }

    /// Parameters a racer runs with
    pub fn effective(&self, id: &str) -> Option<MotionParameters> {
        self.object(id)
            .map(|object| MotionParameters::merge(&self.track(), object))
    }

    /// Set a track-wide field. Returns the stored (snapped) value.
    pub fn set_track(
        &mut self,
        permit: EditPermit,
        field: ParamField,
        value: f32,
    ) -> Result<(ParamChange, f32), ParamError> {
        let value = Self::validate(field, ParamScope::Track, value)?;
        if !permit.allows(ParamScope::Track) {
            return Ok((ParamChange::Locked, field.read(&self.global)));
        }
        self.global.write(field, value);
        Ok((ParamChange::Applied, value))
    }

    /// Set one racer's field; refused unless the permit allows object edits
    pub fn set_object(
        &mut self,
        permit: EditPermit,
        id: &str,
        field: ParamField,
        value: f32,
    ) -> Result<ParamChange, ParamError> {
        let value = Self::validate(field, ParamScope::Object, value)?;
        let params = self
            .objects
            .iter_mut()
            .find(|(k, _)| k == id)
            .map(|(_, p)| p)
            .ok_or_else(|| ParamError::UnknownObject(id.to_string()))?;

        if !permit.allows(ParamScope::Object) {
            return Ok(ParamChange::Locked);
        }
        params.set(field, value);
        Ok(ParamChange::Applied)
    }

    fn validate(field: ParamField, expected: ParamScope, value: f32) -> Result<f32, ParamError> {
        if field.scope() != expected {
            return Err(ParamError::WrongScope { field, expected });
        }
        if !value.is_finite() {
            return Err(ParamError::NotFinite { field, value });
        }
        Ok(field.range().snap(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ParameterStore {
        ParameterStore::new(["a", "b"], MotionParameters::default())
    }

    fn idle() -> EditPermit {
        EditPermit::for_status(SimulationStatus::Idle)
    }

    #[test]
    fn test_merge_takes_track_fields_from_track() {
        let track = TrackParameters {
            max_distance: 120.0,
            time_scale: 2.0,
        };
        let object = ObjectParameters {
            force: 10.0,
            mass: 3.0,
            friction: 0.05,
            air_resistance: 0.5,
            initial_velocity: 4.0,
        };
        let merged = MotionParameters::merge(&track, &object);
        assert_eq!(merged.max_distance, 120.0);
        assert_eq!(merged.time_scale, 2.0);
        assert_eq!(merged.force, 10.0);
        assert_eq!(merged.initial_velocity, 4.0);
        assert_eq!(merged.object(), object);
        assert_eq!(merged.track(), track);
    }

    #[test]
    fn test_snap_rounds_to_step_and_clamps() {
        let range = ParamField::Mass.range();
        assert_eq!(range.snap(0.0), 1.0);
        assert_eq!(range.snap(-3.0), 1.0);
        assert_eq!(range.snap(7.4), 7.0);
        assert_eq!(range.snap(99.0), 25.0);

        let distance = ParamField::TrackDistance.range();
        assert_eq!(distance.snap(314.0), 310.0);
        assert_eq!(distance.snap(10.0), 50.0);

        let scale = ParamField::TimeScale.range();
        assert!((scale.snap(1.04) - 1.0).abs() < 1e-6);
        assert!((scale.snap(0.0) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_snap_is_idempotent() {
        for field in ParamField::ALL {
            let range = field.range();
            let mut v = range.min - 1.0;
            while v < range.max + 1.0 {
                let once = range.snap(v);
                assert!(range.contains(once), "{field:?} {once}");
                assert!((range.snap(once) - once).abs() < 1e-6);
                v += range.step * 0.37;
            }
        }
    }

    #[test]
    fn test_zero_mass_is_clamped_at_boundary() {
        let mut s = store();
        let change = s.set_object(idle(), "a", ParamField::Mass, 0.0).unwrap();
        assert_eq!(change, ParamChange::Applied);
        assert_eq!(s.object("a").unwrap().mass, 1.0);

        let bad_defaults = MotionParameters {
            mass: -2.0,
            ..Default::default()
        };
        let s = ParameterStore::new(["a"], bad_defaults);
        assert_eq!(s.global().mass, 1.0);
    }

    #[test]
    fn test_clamped_replaces_non_finite_with_default() {
        let params = MotionParameters {
            force: f32::NAN,
            max_distance: f32::INFINITY,
            ..Default::default()
        }
        .clamped();
        assert_eq!(params.force, 50.0);
        assert_eq!(params.max_distance, 300.0);
    }

    #[test]
    fn test_object_edit_locked_outside_idle() {
        for status in [
            SimulationStatus::Running,
            SimulationStatus::Paused,
            SimulationStatus::Finished,
        ] {
            let mut s = store();
            let before = *s.object("a").unwrap();
            let change = s
                .set_object(EditPermit::for_status(status), "a", ParamField::Force, 80.0)
                .unwrap();
            assert_eq!(change, ParamChange::Locked);
            assert_eq!(*s.object("a").unwrap(), before);
        }
    }

    #[test]
    fn test_object_edit_only_touches_that_object() {
        let mut s = store();
        s.set_object(idle(), "b", ParamField::Friction, 0.25).unwrap();
        assert!((s.object("b").unwrap().friction - 0.25).abs() < 1e-6);
        assert!((s.object("a").unwrap().friction - 0.1).abs() < 1e-6);
        assert!((s.effective("b").unwrap().friction - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_track_edit_allowed_in_any_state() {
        let mut s = store();
        let running = EditPermit::for_status(SimulationStatus::Running);
        let (change, stored) = s.set_track(running, ParamField::TrackDistance, 455.0).unwrap();
        assert_eq!(change, ParamChange::Applied);
        assert_eq!(stored, 460.0);
        assert_eq!(s.track().max_distance, 460.0);
        assert_eq!(s.effective("a").unwrap().max_distance, 460.0);
    }

    #[test]
    fn test_errors() {
        let mut s = store();
        assert_eq!(
            s.set_object(idle(), "zed", ParamField::Force, 1.0),
            Err(ParamError::UnknownObject("zed".into()))
        );
        assert!(matches!(
            s.set_object(idle(), "a", ParamField::TimeScale, 1.0),
            Err(ParamError::WrongScope { .. })
        ));
        assert!(matches!(
            s.set_track(idle(), ParamField::Mass, 1.0),
            Err(ParamError::WrongScope { .. })
        ));
        assert!(matches!(
            s.set_object(idle(), "a", ParamField::Force, f32::NAN),
            Err(ParamError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_permit() {
        assert!(idle().allows(ParamScope::Object));
        let paused = EditPermit::for_status(SimulationStatus::Paused);
        assert!(!paused.allows(ParamScope::Object));
        assert!(paused.allows(ParamScope::Track));
    }
}
