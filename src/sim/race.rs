//! Race controller: run status, transitions and gated parameter edits
//!
//! ```text
//! Idle ──start──▶ Running ──pause──▶ Paused
//!  ▲                │  ▲──resume─────┘
//!  │              (all finished)
//!  └──reset── Finished
//! ```

use super::params::{
    EditPermit, MotionParameters, ParamChange, ParamError, ParamField, ParameterStore,
    TrackParameters,
};
use super::state::{ObjectState, SimulationStatus, TrailSettings};
use super::tick::tick;
use crate::consts::SIM_DT;
use crate::roster::Character;

/// A status change caused by a control action or a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: SimulationStatus,
    pub to: SimulationStatus,
}

impl Transition {
    pub fn entered_running(&self) -> bool {
        self.to == SimulationStatus::Running && self.from != SimulationStatus::Running
    }
}

/// The whole race: parameters, racers and status
#[derive(Debug, Clone)]
pub struct Race {
    status: SimulationStatus,
    params: ParameterStore,
    objects: Vec<ObjectState>,
    trail: TrailSettings,
    /// Ticks since the last reset
    ticks: u64,
}

impl Race {
    pub fn new(roster: &[Character], defaults: MotionParameters, trail: TrailSettings) -> Self {
        let params = ParameterStore::new(roster.iter().map(|c| c.id), defaults);
        let objects = roster
            .iter()
            .map(|c| {
                let effective = params.effective(c.id).unwrap_or(*params.global());
                ObjectState::new(*c, effective)
            })
            .collect();

        Self {
            status: SimulationStatus::Idle,
            params,
            objects,
            trail,
            ticks: 0,
        }
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn objects(&self) -> &[ObjectState] {
        &self.objects
    }

    pub fn object(&self, id: &str) -> Option<&ObjectState> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    pub fn track(&self) -> TrackParameters {
        self.params.track()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Step size for one tick: base frame interval scaled by the live time scale
    pub fn step_dt(&self) -> f32 {
        SIM_DT * self.params.track().time_scale
    }

    fn set_status(&mut self, to: SimulationStatus) -> Option<Transition> {
        let from = self.status;
        if from == to {
            return None;
        }
        self.status = to;
        log::info!("Race {} -> {}", from.as_str(), to.as_str());
        Some(Transition { from, to })
    }

    /// Idle or Paused -> Running
    pub fn start(&mut self) -> Option<Transition> {
        match self.status {
            SimulationStatus::Idle | SimulationStatus::Paused => {
                self.set_status(SimulationStatus::Running)
            }
            SimulationStatus::Running | SimulationStatus::Finished => None,
        }
    }

    /// Running -> Paused
    pub fn pause(&mut self) -> Option<Transition> {
        if self.status == SimulationStatus::Running {
            self.set_status(SimulationStatus::Paused)
        } else {
            None
        }
    }

    /// Single start/pause/restart control
    pub fn toggle(&mut self) -> Option<Transition> {
        match self.status {
            SimulationStatus::Idle | SimulationStatus::Paused => self.start(),
            SimulationStatus::Running => self.pause(),
            SimulationStatus::Finished => {
                self.reset();
                self.set_status(SimulationStatus::Running)
                    .map(|t| Transition {
                        from: SimulationStatus::Finished,
                        to: t.to,
                    })
            }
        }
    }

    /// Any state -> Idle, racers back at the start line
    pub fn reset(&mut self) -> Option<Transition> {
        for object in &mut self.objects {
            if let Some(effective) = self.params.effective(object.id()) {
                object.reset(effective);
            }
        }
        self.ticks = 0;
        self.set_status(SimulationStatus::Idle)
    }

    /// Advance one tick if running. Fires Running -> Finished when every racer is done.
    pub fn tick(&mut self) -> Option<Transition> {
        if self.status != SimulationStatus::Running {
            return None;
        }
        let dt = self.step_dt();
        let track = self.params.track();
        self.ticks += 1;
        if tick(&mut self.objects, &track, dt, &self.trail) {
            log::info!("All racers finished after {} ticks", self.ticks);
            return self.set_status(SimulationStatus::Finished);
        }
        None
    }

    /// Change a track-wide field; applies immediately in any state
    pub fn set_track_param(&mut self, field: ParamField, value: f32) -> Result<ParamChange, ParamError> {
        let permit = EditPermit::for_status(self.status);
        let (change, stored) = self.params.set_track(permit, field, value)?;
        if change == ParamChange::Applied {
            for object in &mut self.objects {
                match field {
                    ParamField::TrackDistance => {
                        object.params.max_distance = stored;
                        object.kinematics.position = object.kinematics.position.min(stored);
                    }
                    ParamField::TimeScale => object.params.time_scale = stored,
                    _ => {}
                }
            }
        }
        Ok(change)
    }

    /// Change one racer's field; silently refused unless idle
    pub fn set_object_param(
        &mut self,
        id: &str,
        field: ParamField,
        value: f32,
    ) -> Result<ParamChange, ParamError> {
        let permit = EditPermit::for_status(self.status);
        let change = self.params.set_object(permit, id, field, value)?;
        match change {
            ParamChange::Applied => {
                // Idle racers sit at the start line, so refresh them in place
                if let (Some(effective), Some(object)) = (
                    self.params.effective(id),
                    self.objects.iter_mut().find(|o| o.id() == id),
                ) {
                    object.reset(effective);
                }
            }
            ParamChange::Locked => {
                log::debug!("Ignored {:?} change for {} while {}", field, id, self.status.as_str());
            }
        }
        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::ROSTER;

    fn race() -> Race {
        Race::new(&ROSTER, MotionParameters::default(), TrailSettings::default())
    }

    fn run_ticks(race: &mut Race, n: usize) {
        for _ in 0..n {
            race.tick();
        }
    }

    #[test]
    fn test_new_race_is_idle_at_start() {
        let r = race();
        assert_eq!(r.status(), SimulationStatus::Idle);
        assert_eq!(r.objects().len(), 3);
        for o in r.objects() {
            assert_eq!(o.position(), 0.0);
            assert_eq!(o.velocity(), 10.0);
            assert_eq!(o.acceleration(), 0.0);
            assert!(o.trail.is_empty());
            assert!(!o.is_finished());
        }
    }

    #[test]
    fn test_no_tick_unless_running() {
        let mut r = race();
        run_ticks(&mut r, 10);
        assert_eq!(r.ticks(), 0);
        assert!(r.objects().iter().all(|o| o.position() == 0.0));

        r.start();
        run_ticks(&mut r, 10);
        r.pause();
        let frozen: Vec<f32> = r.objects().iter().map(|o| o.position()).collect();
        run_ticks(&mut r, 10);
        let after: Vec<f32> = r.objects().iter().map(|o| o.position()).collect();
        assert_eq!(frozen, after);
        assert_eq!(r.ticks(), 10);
    }

    #[test]
    fn test_transitions() {
        let mut r = race();
        assert_eq!(r.pause(), None);
        let t = r.start().unwrap();
        assert!(t.entered_running());
        assert_eq!(r.start(), None);

        assert_eq!(
            r.toggle(),
            Some(Transition {
                from: SimulationStatus::Running,
                to: SimulationStatus::Paused
            })
        );
        assert!(r.toggle().unwrap().entered_running());

        let t = r.reset().unwrap();
        assert_eq!(t.to, SimulationStatus::Idle);
        assert_eq!(r.reset(), None);
        assert!(r.toggle().unwrap().entered_running());
    }

    #[test]
    fn test_race_runs_to_finish() {
        let mut r = race();
        r.start();
        let mut finished_on = None;
        for _ in 0..100_000 {
            if let Some(t) = r.tick() {
                assert_eq!(t.to, SimulationStatus::Finished);
                finished_on = Some(r.ticks());
                break;
            }
        }
        assert!(finished_on.is_some());
        assert!(r.objects().iter().all(|o| o.position() == 300.0 && o.velocity() == 0.0));

        // Frozen until reset
        run_ticks(&mut r, 5);
        assert_eq!(Some(r.ticks()), finished_on);
        assert_eq!(r.start(), None);
        assert_eq!(r.pause(), None);
    }

    #[test]
    fn test_toggle_from_finished_restarts() {
        let mut r = race();
        r.start();
        while r.status() == SimulationStatus::Running {
            r.tick();
        }
        let t = r.toggle().unwrap();
        assert_eq!(t.from, SimulationStatus::Finished);
        assert_eq!(t.to, SimulationStatus::Running);
        assert!(r.objects().iter().all(|o| o.position() == 0.0 && !o.is_finished()));
        assert_eq!(r.ticks(), 0);
    }

    #[test]
    fn test_reset_from_any_state() {
        for ticks in [0, 30, 100_000] {
            for pause in [false, true] {
                let mut r = race();
                r.set_object_param("bubbles", ParamField::InitialVelocity, 3.0)
                    .unwrap();
                r.start();
                run_ticks(&mut r, ticks);
                if pause {
                    r.pause();
                }
                r.reset();
                assert_eq!(r.status(), SimulationStatus::Idle);
                for o in r.objects() {
                    assert_eq!(o.position(), 0.0);
                    assert_eq!(o.acceleration(), 0.0);
                    assert!(o.trail.is_empty());
                    assert!(!o.is_finished());
                    let expected = if o.id() == "bubbles" { 3.0 } else { 10.0 };
                    assert_eq!(o.velocity(), expected);
                }
            }
        }
    }

    #[test]
    fn test_object_params_locked_while_active() {
        let mut r = race();
        r.start();
        run_ticks(&mut r, 5);
        let change = r.set_object_param("blossom", ParamField::Force, 90.0).unwrap();
        assert_eq!(change, ParamChange::Locked);
        assert_eq!(r.params().object("blossom").unwrap().force, 50.0);
        assert_eq!(r.object("blossom").unwrap().params.force, 50.0);

        r.pause();
        assert_eq!(
            r.set_object_param("blossom", ParamField::Mass, 2.0).unwrap(),
            ParamChange::Locked
        );
        assert_eq!(r.params().object("blossom").unwrap().mass, 5.0);
    }

    #[test]
    fn test_idle_object_change_applies_and_survives_reset() {
        let mut r = race();
        let change = r.set_object_param("blossom", ParamField::Force, 90.0).unwrap();
        assert_eq!(change, ParamChange::Applied);
        assert_eq!(r.object("blossom").unwrap().params.force, 90.0);

        r.set_object_param("blossom", ParamField::InitialVelocity, 0.0)
            .unwrap();
        assert_eq!(r.object("blossom").unwrap().velocity(), 0.0);

        r.start();
        run_ticks(&mut r, 3);
        r.reset();
        let blossom = r.object("blossom").unwrap();
        assert_eq!(blossom.params.force, 90.0);
        assert_eq!(blossom.velocity(), 0.0);
        assert_eq!(r.object("bubbles").unwrap().params.force, 50.0);
    }

    #[test]
    fn test_track_distance_propagates_mid_run() {
        let mut r = race();
        r.start();
        run_ticks(&mut r, 60);
        let change = r.set_track_param(ParamField::TrackDistance, 100.0).unwrap();
        assert_eq!(change, ParamChange::Applied);
        assert_eq!(r.status(), SimulationStatus::Running);
        assert!(r.objects().iter().all(|o| o.params.max_distance == 100.0));
        assert_eq!(r.track().max_distance, 100.0);

        while r.status() == SimulationStatus::Running {
            r.tick();
        }
        assert!(r.objects().iter().all(|o| o.position() == 100.0));
    }

    #[test]
    fn test_shrinking_track_clamps_positions() {
        let mut r = race();
        r.start();
        while r.status() == SimulationStatus::Running {
            r.tick();
        }
        r.set_track_param(ParamField::TrackDistance, 50.0).unwrap();
        assert!(r.objects().iter().all(|o| o.position() == 50.0));
    }

    #[test]
    fn test_time_scale_changes_step() {
        let mut r = race();
        r.set_track_param(ParamField::TimeScale, 2.0).unwrap();
        assert!((r.step_dt() - 2.0 * SIM_DT).abs() < 1e-6);

        // Double speed covers more ground in the same number of ticks
        let mut slow = race();
        slow.start();
        r.start();
        run_ticks(&mut slow, 30);
        run_ticks(&mut r, 30);
        assert!(r.objects()[0].position() > slow.objects()[0].position());
    }

    #[test]
    fn test_param_errors_propagate() {
        let mut r = race();
        assert!(r.set_object_param("nobody", ParamField::Force, 1.0).is_err());
        assert!(r.set_track_param(ParamField::Force, 1.0).is_err());
    }
}
