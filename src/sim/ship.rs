//! The player's ship (a cat, in the shipped art)
//!
//! Steers toward a clicked target: accelerate for the first half of the
//! initial distance, brake for the rest, stop dead once within arrival range.
//! Moves are rejected if they would land in an obstacle cell.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Entity, SHIP_INFO, SpriteKind};
use super::grid::Grid;
use super::group::Group;
use super::state::GameEvent;
use crate::audio::Cue;
use crate::consts::*;
use crate::{angle_to_vector, distance, wrap_position};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading (radians, screen coordinates)
    pub angle: f32,
    pub angular_vel: f32,
    pub radius: f32,
    /// Thrust engaged (pointer held)
    pub thrust: bool,
    /// Steering target
    pub target: Option<Vec2>,
    /// Distance to the target when it was set
    pub initial_distance: f32,
    /// Fire held (presentation shows the flight pose)
    pub firing: bool,
}

impl Ship {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            angular_vel: 0.0,
            radius: SHIP_INFO.radius,
            thrust: false,
            target: None,
            initial_distance: 0.0,
            firing: false,
        }
    }

    /// Steer toward `target` from wherever the ship is now
    pub fn set_target(&mut self, target: Vec2) {
        self.target = Some(target);
        self.initial_distance = distance(self.pos, target);
    }

    /// Engage/release thrust; the engine loop only runs during an active session
    pub fn set_thrust(&mut self, on: bool, active: bool, events: &mut Vec<GameEvent>) {
        self.thrust = on;
        let cue = if on && active { Cue::ThrustOn } else { Cue::ThrustOff };
        events.push(GameEvent::Cue(cue));
    }

    /// Unit vector along the heading
    pub fn forward(&self) -> Vec2 {
        angle_to_vector(self.angle)
    }

    /// One tick of motion. Returns the loot cell picked up, if any.
    pub fn update(&mut self, grid: &mut Grid, bounds: Vec2, events: &mut Vec<GameEvent>) -> Option<(usize, usize)> {
        self.steer();

        let next = wrap_position(self.pos + self.vel, bounds);
        if !grid.is_obstacle(next.x, next.y) {
            self.pos = next;
        }

        let picked = grid.take_loot(self.pos.x, self.pos.y);
        if let Some((row, col)) = picked {
            log::debug!("Loot picked up at ({row}, {col})");
            events.push(GameEvent::Cue(Cue::LootPickedUp));
        }

        if self.thrust {
            self.vel += self.forward() * THRUST_ACCEL;
        }
        self.vel *= DRAG;

        picked
    }

    fn steer(&mut self) {
        let Some(target) = self.target else {
            return;
        };
        let remaining = distance(self.pos, target);
        let to_target = target - self.pos;
        self.angle = to_target.y.atan2(to_target.x);

        if remaining > self.initial_distance * DECEL_FRACTION {
            self.vel += self.forward() * STEER_ACCEL;
            self.vel = self.vel.clamp_length_max(STEER_MAX_SPEED);
        } else {
            self.vel *= BRAKE_DAMPING;
            if remaining < ARRIVAL_DISTANCE {
                self.target = None;
                self.vel = Vec2::ZERO;
            }
        }
    }

    /// Fire a projectile from the nose, inheriting the ship's velocity
    pub fn shoot(&mut self, id: u32, projectiles: &mut Group, events: &mut Vec<GameEvent>) {
        let forward = self.forward();
        let projectile = Entity::spawn(
            id,
            SpriteKind::Projectile,
            self.pos + forward * self.radius,
            self.vel + forward * PROJECTILE_SPEED,
            self.angle,
            0.0,
            events,
        );
        projectiles.insert(projectile);
        self.firing = true;
    }

    /// Back to `pos`, at rest, no target
    pub fn reset(&mut self, pos: Vec2) {
        *self = Self::new(pos);
    }
}

impl Body for Ship {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}
