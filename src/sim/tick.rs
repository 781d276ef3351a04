//! Fixed timestep physics step
//!
//! Semi-implicit Euler on a single axis. Velocity is updated first and the new
//! velocity moves the racer, so a racer with zero net force still coasts.

use super::params::{MotionParameters, TrackParameters};
use super::state::{Kinematics, ObjectState, TrailSettings};
use crate::consts::GRAVITY;

/// Forces acting on a racer at a given speed (N)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceBreakdown {
    pub friction: f32,
    pub drag: f32,
    /// Driving force minus friction and drag, never negative
    pub net: f32,
}

/// Resolve friction, linear drag and the floored net force
pub fn forces(velocity: f32, params: &MotionParameters) -> ForceBreakdown {
    let friction = params.friction * params.mass * GRAVITY;
    let drag = params.air_resistance * velocity;
    let net = (params.force - friction - drag).max(0.0);
    ForceBreakdown {
        friction,
        drag,
        net,
    }
}

/// Advance one racer's kinematics by `dt` against a finish line at `max_distance`
pub fn integrate(state: Kinematics, params: &MotionParameters, max_distance: f32, dt: f32) -> Kinematics {
    if state.finished {
        return state;
    }

    let acceleration = forces(state.velocity, params).net / params.mass;
    let velocity = state.velocity + acceleration * dt;
    let position = state.position + velocity * dt;

    if position >= max_distance {
        Kinematics {
            position: max_distance,
            velocity: 0.0,
            acceleration: 0.0,
            finished: true,
        }
    } else {
        Kinematics {
            position,
            velocity,
            acceleration,
            finished: false,
        }
    }
}

/// Step one racer and record its trail. Finished racers are left untouched.
pub fn advance_object(object: &mut ObjectState, max_distance: f32, dt: f32, trail: &TrailSettings) {
    if object.is_finished() {
        return;
    }
    object.kinematics = integrate(object.kinematics, &object.params, max_distance, dt);
    object.trail.record(object.kinematics.position, trail);
}

/// Advance every racer by one tick. Returns true once all have finished.
pub fn tick(objects: &mut [ObjectState], track: &TrackParameters, dt: f32, trail: &TrailSettings) -> bool {
    for object in objects.iter_mut() {
        advance_object(object, track.max_distance, dt, trail);
    }
    objects.iter().all(ObjectState::is_finished)
}
