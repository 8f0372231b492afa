//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one `tick` per frame)
//! - Seeded RNG only
//! - Stable group iteration order (insertion order, walked by id snapshot)
//! - No rendering or audio backends; sound goes out as `GameEvent::Cue`

pub mod collision;
pub mod entity;
pub mod grid;
pub mod group;
pub mod level;
pub mod ship;
pub mod state;
pub mod tick;

pub use collision::{Effects, advance_group, group_vs_group, group_vs_single};
pub use entity::{Body, DONUT_INFO, EXPLOSION_INFO, Entity, Motion, PROJECTILE_INFO, SHIP_INFO, SpriteInfo, SpriteKind};
pub use grid::{Cell, Grid};
pub use group::Group;
pub use level::{LevelDir, LevelRows, LevelSource, StaticLevels, parse_level};
pub use ship::Ship;
pub use state::{EntityIds, GameEvent, GamePhase, GameState, RunSummary, SessionState};
pub use tick::{LevelTransition, TickInput, apply_input, check_level_transition, handle_death, spawn_enemy, start_new_game, tick};
