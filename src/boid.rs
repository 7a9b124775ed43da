/*
 * Boid Module
 *
 * This module defines the Agent record and the three steering rules.
 * Each agent follows:
 * 1. Alignment: steer towards the average velocity of its neighbours
 * 2. Cohesion: steer towards the centre of its neighbours
 * 3. Separation: steer away from neighbours, weighted by inverse distance
 *
 * The rules read a frame-stable slice of agents and only return deltas, so
 * they can run in any order or in parallel before being merged.
 */

use glam::Vec3;

use crate::params::BoidsParams;
use crate::transform::EPSILON;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Agent {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
    // Unit heading the rendered body points along
    pub orientation: Vec3,
}

// Acceleration deltas contributed by each rule for one agent
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Steering {
    pub alignment: Vec3,
    pub cohesion: Vec3,
    pub separation: Vec3,
    pub neighbours: usize,
}

// Shorten `v` to at most `max` while keeping its direction
#[inline]
fn limit(v: Vec3, max: f32) -> Vec3 {
    let length = v.length();
    if length > max {
        v / length * max
    } else {
        v
    }
}

impl Agent {
    pub fn new(position: Vec3, velocity: Vec3, acceleration: Vec3) -> Self {
        Self {
            position,
            velocity,
            acceleration,
            orientation: velocity.try_normalize().unwrap_or(Vec3::Z),
        }
    }

    // Bounce off the faces of the cube [-half_extent, half_extent]^3.
    // An axis flips only while the agent is outside and still moving outward.
    // Returns the previous orientation when anything changed.
    pub fn reflect_at_bounds(&mut self, half_extent: f32) -> Option<Vec3> {
        let previous = self.orientation;
        let mut changed = false;
        for axis in 0..3 {
            let outward = (self.position[axis] > half_extent && self.velocity[axis] > 0.0)
                || (self.position[axis] < -half_extent && self.velocity[axis] < 0.0);
            if outward {
                self.velocity[axis] = -self.velocity[axis];
                self.acceleration[axis] = -self.acceleration[axis];
                self.orientation[axis] = -previous[axis];
                changed = true;
            }
        }
        changed.then_some(previous)
    }

    pub fn apply_steering(&mut self, steering: &Steering) {
        self.acceleration += steering.alignment;
        self.acceleration += steering.cohesion;
        self.acceleration += steering.separation;
    }

    // Advance one step. Position moves with the velocity from before the
    // acceleration is applied; the new velocity is capped at `max_speed`.
    // Returns the displacement.
    pub fn integrate(&mut self, deltat: f32, max_speed: f32) -> Vec3 {
        let displacement = deltat * self.velocity;
        self.position += displacement;
        self.velocity += self.acceleration * deltat;
        let speed = self.velocity.length();
        if speed > max_speed {
            self.velocity *= max_speed / speed;
        }
        displacement
    }
}

// Evaluate the three rules for agent `index` against `agents`.
// `candidates` must list possible neighbours in ascending index order; any
// candidate outside the perception radius is ignored.
pub fn steering(
    index: usize,
    agents: &[Agent],
    candidates: impl IntoIterator<Item = usize>,
    params: &BoidsParams,
) -> Steering {
    let me = &agents[index];
    let mut velocity_sum = Vec3::ZERO;
    let mut position_sum = Vec3::ZERO;
    let mut away_sum = Vec3::ZERO;
    let mut total = 0usize;

    for other_index in candidates {
        if other_index == index {
            continue;
        }
        let other = &agents[other_index];
        let offset = me.position - other.position;
        let distance = offset.length();
        if distance < params.perception {
            velocity_sum += other.velocity;
            position_sum += other.position;
            // Coincident agents push in no particular direction
            if distance > EPSILON {
                away_sum += offset / distance;
            }
            total += 1;
        }
    }

    if total == 0 {
        return Steering::default();
    }
    let count = total as f32;

    // Alignment is added unscaled by the step, unlike the other two rules
    let heading = (velocity_sum / count).normalize_or_zero() * params.max_speed;
    let alignment = heading - me.velocity;

    let to_centre = (position_sum / count - me.position).normalize_or_zero() * params.max_speed;
    let cohesion = params.deltat * limit(to_centre - me.velocity, params.max_force);

    let away = away_sum / count;
    let separation = params.deltat * limit(away - me.velocity, params.max_force);

    Steering {
        alignment,
        cohesion,
        separation,
        neighbours: total,
    }
}
