//! Meteor Mess - a top-down arcade shooter on a tile grid
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, grid, session state)
//! - `audio`: Cue vocabulary the simulation emits for an external audio layer
//! - `settings`: Data-driven gameplay tuning
//! - `error`: Level loading errors

pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;

pub use error::LevelError;
pub use settings::{LevelProgression, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Frame rate the simulation is tuned for (one tick per frame)
    pub const FRAME_RATE: u32 = 60;

    /// Default playfield dimensions in pixels
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// Default level grid cell size in pixels
    pub const CELL_SIZE: f32 = 50.0;

    /// Ambient drag applied to every ship velocity each tick
    pub const DRAG: f32 = 0.99;
    /// Thrust acceleration along the heading while thrust is engaged
    pub const THRUST_ACCEL: f32 = 0.1;

    /// Steering: acceleration toward the target per tick
    pub const STEER_ACCEL: f32 = 0.1;
    /// Steering: speed cap while accelerating toward the target
    pub const STEER_MAX_SPEED: f32 = 5.0;
    /// Fraction of the initial distance after which the ship brakes
    pub const DECEL_FRACTION: f32 = 0.5;
    /// Velocity damping per tick inside the braking zone
    pub const BRAKE_DAMPING: f32 = 0.95;
    /// Remaining distance below which the ship counts as arrived
    pub const ARRIVAL_DISTANCE: f32 = 5.0;

    /// Projectile muzzle speed added on top of the ship velocity
    pub const PROJECTILE_SPEED: f32 = 6.0;

    /// Explosion animation advance per tick (in frames)
    pub const EXPLOSION_FRAME_STEP: f32 = 0.08;

    /// Enemy spawn velocity range (per axis, symmetric)
    pub const ENEMY_MAX_DRIFT: f32 = 0.3;
    /// Enemy spawn angular velocity range (symmetric)
    pub const ENEMY_MAX_SPIN: f32 = 0.1;
}

/// Unit vector for a heading in radians
#[inline]
pub fn angle_to_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Wrap a coordinate onto the torus `[0, bound)`
#[inline]
pub fn wrap_coord(value: f32, bound: f32) -> f32 {
    let wrapped = value.rem_euclid(bound);
    // rem_euclid can round up to exactly `bound` for tiny negative inputs
    if wrapped >= bound { 0.0 } else { wrapped }
}

/// Wrap a position onto the `bounds.x` by `bounds.y` torus
#[inline]
pub fn wrap_position(pos: Vec2, bounds: Vec2) -> Vec2 {
    Vec2::new(wrap_coord(pos.x, bounds.x), wrap_coord(pos.y, bounds.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_angle_to_vector() {
        let v = angle_to_vector(0.0);
        assert!((v.x - 1.0).abs() < 1e-6 && v.y.abs() < 1e-6);

        let v = angle_to_vector(FRAC_PI_2);
        assert!(v.x.abs() < 1e-6 && (v.y - 1.0).abs() < 1e-6);

        let v = angle_to_vector(PI);
        assert!((v.x + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)), 5.0);
        assert_eq!(distance(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0)), 0.0);
    }

    #[test]
    fn test_wrap_coord() {
        assert_eq!(wrap_coord(805.0, 800.0), 5.0);
        assert_eq!(wrap_coord(-5.0, 800.0), 795.0);
        assert_eq!(wrap_coord(800.0, 800.0), 0.0);
        assert_eq!(wrap_coord(0.0, 800.0), 0.0);

        let tiny = wrap_coord(-1e-9, 800.0);
        assert!((0.0..800.0).contains(&tiny));
    }

    #[test]
    fn test_wrap_position() {
        let p = wrap_position(Vec2::new(-10.0, 610.0), Vec2::new(800.0, 600.0));
        assert_eq!(p, Vec2::new(790.0, 10.0));
    }
}
