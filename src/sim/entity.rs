//! Moving entities: projectiles, donuts and explosions
//!
//! An entity is either kinetic (integrates velocity on the torus) or animated
//! (steps an animation frame counter in place). Both age by one per advance.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::GameEvent;
use crate::audio::Cue;
use crate::consts::EXPLOSION_FRAME_STEP;
use crate::{distance, wrap_position};

/// Static visual/collision descriptor shared by every sprite of a kind
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteInfo {
    /// Image center in source pixels
    pub center: Vec2,
    /// Image size in source pixels
    pub size: Vec2,
    /// Collision radius
    pub radius: f32,
    /// Ticks until expiry (`None` lives forever); animated sprites expire by frame count instead
    pub lifespan: Option<u32>,
    /// Animated sprites step frames instead of moving
    pub animated: bool,
    /// Animation frames (1 for still sprites)
    pub frame_count: u32,
    /// Cue fired once when a sprite of this kind is spawned
    pub cue: Option<Cue>,
}

pub const SHIP_INFO: SpriteInfo = SpriteInfo {
    center: Vec2::new(45.0, 45.0),
    size: Vec2::new(90.0, 90.0),
    radius: 35.0,
    lifespan: None,
    animated: false,
    frame_count: 1,
    cue: None,
};

pub const PROJECTILE_INFO: SpriteInfo = SpriteInfo {
    center: Vec2::new(5.0, 5.0),
    size: Vec2::new(10.0, 10.0),
    radius: 3.0,
    lifespan: Some(50),
    animated: false,
    frame_count: 1,
    cue: Some(Cue::ProjectileFired),
};

pub const DONUT_INFO: SpriteInfo = SpriteInfo {
    center: Vec2::new(45.0, 45.0),
    size: Vec2::new(90.0, 90.0),
    radius: 40.0,
    lifespan: None,
    animated: false,
    frame_count: 1,
    cue: None,
};

pub const EXPLOSION_INFO: SpriteInfo = SpriteInfo {
    center: Vec2::new(64.0, 64.0),
    size: Vec2::new(128.0, 128.0),
    radius: 17.0,
    lifespan: None,
    animated: true,
    frame_count: 3,
    cue: Some(Cue::ExplosionTriggered),
};

/// Sprite kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKind {
    Ship,
    Projectile,
    Donut,
    Explosion,
}

impl SpriteKind {
    pub fn info(self) -> &'static SpriteInfo {
        match self {
            SpriteKind::Ship => &SHIP_INFO,
            SpriteKind::Projectile => &PROJECTILE_INFO,
            SpriteKind::Donut => &DONUT_INFO,
            SpriteKind::Explosion => &EXPLOSION_INFO,
        }
    }
}

/// Anything with a collision circle
pub trait Body {
    fn position(&self) -> Vec2;
    fn radius(&self) -> f32;

    /// Circle overlap: center distance no greater than the radius sum
    fn collides_with<B: Body + ?Sized>(&self, other: &B) -> bool {
        distance(self.position(), other.position()) <= self.radius() + other.radius()
    }
}

/// How an entity advances each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Integrates angle and position, wraps on the torus
    Kinetic,
    /// Steps the animation frame; position stays put
    Animated { frame: f32, frame_count: u32 },
}

/// A simulated body owned by exactly one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: SpriteKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub angle: f32,
    pub angular_vel: f32,
    pub radius: f32,
    pub age: u32,
    pub lifespan: Option<u32>,
    pub motion: Motion,
}

impl Entity {
    /// Build an entity without firing its spawn cue
    pub fn new(id: u32, kind: SpriteKind, pos: Vec2, vel: Vec2, angle: f32, angular_vel: f32) -> Self {
        let info = kind.info();
        let motion = if info.animated {
            Motion::Animated {
                frame: 0.0,
                frame_count: info.frame_count,
            }
        } else {
            Motion::Kinetic
        };
        Self {
            id,
            kind,
            pos,
            vel,
            angle,
            angular_vel,
            radius: info.radius,
            age: 0,
            lifespan: info.lifespan,
            motion,
        }
    }

    /// Build an entity and fire its spawn cue (if the kind has one)
    pub fn spawn(
        id: u32,
        kind: SpriteKind,
        pos: Vec2,
        vel: Vec2,
        angle: f32,
        angular_vel: f32,
        events: &mut Vec<GameEvent>,
    ) -> Self {
        if let Some(cue) = kind.info().cue {
            events.push(GameEvent::Cue(cue));
        }
        Self::new(id, kind, pos, vel, angle, angular_vel)
    }

    /// Stationary explosion at `pos`
    pub fn explosion(id: u32, pos: Vec2, events: &mut Vec<GameEvent>) -> Self {
        Self::spawn(id, SpriteKind::Explosion, pos, Vec2::ZERO, 0.0, 0.0, events)
    }

    pub fn info(&self) -> &'static SpriteInfo {
        self.kind.info()
    }

    /// Advance one tick; returns true once the entity is due for removal
    pub fn advance(&mut self, bounds: Vec2) -> bool {
        self.age = self.age.saturating_add(1);
        match &mut self.motion {
            Motion::Kinetic => {
                self.angle += self.angular_vel;
                self.pos = wrap_position(self.pos + self.vel, bounds);
                self.lifespan.is_some_and(|lifespan| self.age >= lifespan)
            }
            Motion::Animated { frame, frame_count } => {
                *frame += EXPLOSION_FRAME_STEP;
                *frame >= *frame_count as f32
            }
        }
    }

    /// Animation frame to draw (animated entities only)
    pub fn render_frame(&self) -> Option<usize> {
        match self.motion {
            Motion::Kinetic => None,
            Motion::Animated { frame, .. } => Some(frame.floor() as usize),
        }
    }
}

impl Body for Entity {
    fn position(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}
