//! Per-frame simulation tick
//!
//! One call = one frame: apply input, spawn, check for level-up, advance every
//! group, move the ship, run the collision passes, settle lives/score.

use glam::Vec2;
use rand::Rng;

use super::collision::{Effects, advance_group, group_vs_group, group_vs_single};
use super::entity::{DONUT_INFO, Entity, SpriteKind};
use super::level::LevelSource;
use super::state::{GameEvent, GamePhase, GameState, SessionState};
use crate::audio::Cue;
use crate::consts::{ENEMY_MAX_DRIFT, ENEMY_MAX_SPIN};
use crate::distance;

/// Autopilot fires every this many ticks while donuts are around
const AUTOPILOT_FIRE_INTERVAL: u64 = 20;
/// Autopilot picks a fresh target at least this often (unsticks it from walls)
const AUTOPILOT_RETARGET_INTERVAL: u64 = 120;

/// Input intents for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer pressed at a screen position
    pub pointer_click: Option<Vec2>,
    /// Pointer released
    pub pointer_release: bool,
    /// Fire pressed
    pub fire: bool,
    /// Fire released
    pub fire_release: bool,
    /// Idle/demo mode - the autopilot plays the game
    pub idle_mode: bool,
}

/// Outcome of a level-up check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelTransition {
    Stay,
    Advanced(u32),
    AllCleared,
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput, levels: &dyn LevelSource) {
    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    apply_input(state, &input, levels);

    state.time_ticks += 1;

    if state.is_active() {
        spawn_enemy(state);
        if check_level_transition(state, levels) != LevelTransition::Stay {
            // Fresh grid; start moving on the next frame
            return;
        }
    }

    let bounds = state.bounds();
    advance_group(&mut state.enemies, bounds);
    advance_group(&mut state.projectiles, bounds);
    advance_group(&mut state.explosions, bounds);

    if !state.is_active() {
        return;
    }

    if state
        .ship
        .update(&mut state.grid, bounds, &mut state.events)
        .is_some()
    {
        state.session.loot_collected += 1;
    }

    let (ship_hits, kills) = {
        let mut fx = Effects {
            explosions: &mut state.explosions,
            ids: &mut state.ids,
            events: &mut state.events,
        };
        let ship_hits = group_vs_single(&mut state.enemies, &state.ship, &mut fx);
        let kills = group_vs_group(&mut state.enemies, &mut state.projectiles, &mut fx);
        (ship_hits, kills)
    };

    if ship_hits > 0 {
        state.session.lives -= 1;
        log::debug!("Ship hit by {} donut(s), {} lives left", ship_hits, state.session.lives);
        state.push_event(GameEvent::LifeLost {
            remaining: state.session.lives,
        });
    }

    if kills > 0 {
        state.session.score += kills;
        if state.settings.kills_award_loot {
            state.session.loot_collected += kills;
        }
        state.push_event(GameEvent::EnemyDestroyed { count: kills });
    }

    if state.session.is_dead() {
        handle_death(state, levels);
    }
}

/// Route input intents to the ship / session
pub fn apply_input(state: &mut GameState, input: &TickInput, levels: &dyn LevelSource) {
    if let Some(pos) = input.pointer_click {
        if state.is_active() {
            state.ship.set_target(pos);
            state.ship.set_thrust(true, true, &mut state.events);
        } else if state.settings.in_start_button(pos) {
            start_new_game(state, levels);
        }
    }

    if input.pointer_release && state.ship.thrust {
        let active = state.is_active();
        state.ship.set_thrust(false, active, &mut state.events);
    }

    if input.fire && state.is_active() {
        let id = state.next_entity_id();
        state.ship.shoot(id, &mut state.projectiles, &mut state.events);
    }

    if input.fire_release {
        state.ship.firing = false;
    }
}

/// Brand-new game from level 1
pub fn start_new_game(state: &mut GameState, levels: &dyn LevelSource) {
    state.session = SessionState::new(&state.settings);
    state.reset_field();
    state.background = 0;

    match levels.load(1) {
        Ok(rows) => {
            state.rebuild_grid(&rows);
            state.phase = GamePhase::Playing;
            state.push_event(GameEvent::GameStarted);
            state.push_event(GameEvent::Cue(Cue::SoundtrackStart));
            log::info!("New game started ({} loot on level 1)", state.grid.loot_count());
        }
        Err(e) => {
            log::error!("Cannot start a new game: {e}");
            state.grid.reset();
            state.phase = GamePhase::AllLevelsCleared;
            state.push_event(GameEvent::AllLevelsCleared);
        }
    }
}

/// Spawn one donut if under the cap and the random spot is clear of the ship
pub fn spawn_enemy(state: &mut GameState) {
    if state.enemies.len() >= state.session.max_enemies {
        return;
    }

    let bounds = state.bounds();
    let pos = Vec2::new(
        state.rng.random_range(0.0..bounds.x),
        state.rng.random_range(0.0..bounds.y),
    );
    let clearance = 2.0 * DONUT_INFO.radius + state.ship.radius;
    if distance(pos, state.ship.pos) <= clearance {
        return;
    }

    let vel = Vec2::new(
        state.rng.random_range(-ENEMY_MAX_DRIFT..ENEMY_MAX_DRIFT),
        state.rng.random_range(-ENEMY_MAX_DRIFT..ENEMY_MAX_DRIFT),
    );
    let spin = state.rng.random_range(-ENEMY_MAX_SPIN..ENEMY_MAX_SPIN);
    let id = state.next_entity_id();
    state
        .enemies
        .insert(Entity::new(id, SpriteKind::Donut, pos, vel, 0.0, spin));
}

/// Level up once the score threshold is met and the grid is out of loot
pub fn check_level_transition(state: &mut GameState, levels: &dyn LevelSource) -> LevelTransition {
    if !state.is_active() {
        return LevelTransition::Stay;
    }
    if state.session.score < state.session.score_to_next_level || state.grid.loot_count() > 0 {
        return LevelTransition::Stay;
    }

    let next = state.session.current_level + 1;
    match levels.load(next) {
        Ok(rows) => {
            state.rebuild_grid(&rows);
            let session = &mut state.session;
            session.current_level = next;
            session.score_to_next_level = state
                .settings
                .level_progression
                .next_threshold(session.score_to_next_level);
            session.max_enemies += 1;

            if next - 1 < state.settings.background_count {
                state.background = next - 1;
            } else {
                log::warn!("No background for level {next}, keeping {}", state.background);
            }

            log::info!(
                "Level {} loaded: {} loot, next level at {} points, up to {} donuts",
                next,
                state.grid.loot_count(),
                state.session.score_to_next_level,
                state.session.max_enemies
            );
            state.push_event(GameEvent::LevelAdvanced { level: next });
            LevelTransition::Advanced(next)
        }
        Err(e) => {
            log::info!("All levels cleared ({e})");
            let summary = state.session.summary(true);
            state.last_run = Some(summary);
            state.phase = GamePhase::AllLevelsCleared;
            state.push_event(GameEvent::AllLevelsCleared);
            state.push_event(GameEvent::Cue(Cue::SoundtrackStop));
            LevelTransition::AllCleared
        }
    }
}

/// Out of lives: record the run, then everything back to level 1
pub fn handle_death(state: &mut GameState, levels: &dyn LevelSource) {
    let summary = state.session.summary(false);
    log::info!(
        "Game over on level {}: score {}, loot {}",
        summary.level,
        summary.score,
        summary.loot
    );
    state.last_run = Some(summary);
    state.phase = GamePhase::GameOver;
    if state.ship.thrust {
        state.ship.set_thrust(false, false, &mut state.events);
    }
    state.push_event(GameEvent::GameOver(summary));
    state.push_event(GameEvent::Cue(Cue::SoundtrackStop));

    state.session = SessionState::new(&state.settings);
    state.reset_field();
    state.background = 0;
    match levels.load(1) {
        Ok(rows) => state.rebuild_grid(&rows),
        Err(e) => {
            log::error!("Cannot reload level 1: {e}");
            state.grid.reset();
        }
    }
}

/// Fill in input for idle/demo mode
fn autopilot(state: &GameState, input: &mut TickInput) {
    match state.phase {
        GamePhase::Splash | GamePhase::GameOver => {
            input.pointer_click = Some(state.bounds() / 2.0);
            return;
        }
        GamePhase::AllLevelsCleared => return,
        GamePhase::Playing => {}
    }

    let ship = &state.ship;
    if ship.thrust {
        input.pointer_release = true;
    }

    let retarget = state.time_ticks % AUTOPILOT_RETARGET_INTERVAL == 0;
    if ship.target.is_none() || retarget {
        let nearest_loot = state
            .grid
            .loot_cells()
            .map(|(row, col)| state.grid.cell_center(row, col))
            .min_by(|a, b| {
                distance(*a, ship.pos)
                    .partial_cmp(&distance(*b, ship.pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        let nearest_enemy = state.enemies.iter().map(|e| e.pos).min_by(|a, b| {
            distance(*a, ship.pos)
                .partial_cmp(&distance(*b, ship.pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if let Some(target) = nearest_loot.or(nearest_enemy) {
            input.pointer_click = Some(target);
        }
    }

    if !state.enemies.is_empty() && state.time_ticks % AUTOPILOT_FIRE_INTERVAL == 0 {
        input.fire = true;
    } else if ship.firing {
        input.fire_release = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{LevelProgression, Settings};
    use crate::sim::level::StaticLevels;

    const OPEN: &str = "................\n";

    fn quiet_settings() -> Settings {
        Settings {
            base_max_enemies: 0,
            ..Settings::default()
        }
    }

    fn playing(settings: Settings, levels: &StaticLevels) -> GameState {
        let mut state = GameState::new(settings, levels).unwrap();
        start_new_game(&mut state, levels);
        assert_eq!(state.phase, GamePhase::Playing);
        state.drain_events();
        state
    }

    fn add_donut(state: &mut GameState, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        state
            .enemies
            .insert(Entity::new(id, SpriteKind::Donut, pos, Vec2::ZERO, 0.0, 0.0));
        id
    }

    #[test]
    fn test_click_start_button_starts_game() {
        let levels = StaticLevels::from_texts(&["@"]);
        let mut state = GameState::new(Settings::default(), &levels).unwrap();
        let outside = TickInput {
            pointer_click: Some(Vec2::new(5.0, 5.0)),
            ..Default::default()
        };
        tick(&mut state, &outside, &levels);
        assert_eq!(state.phase, GamePhase::Splash);

        let inside = TickInput {
            pointer_click: Some(Vec2::new(400.0, 300.0)),
            ..Default::default()
        };
        tick(&mut state, &inside, &levels);
        assert_eq!(state.phase, GamePhase::Playing);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::GameStarted));
        assert!(events.contains(&GameEvent::Cue(Cue::SoundtrackStart)));
    }

    #[test]
    fn test_click_while_playing_steers() {
        let levels = StaticLevels::from_texts(&[OPEN]);
        let mut state = playing(quiet_settings(), &levels);
        let click = TickInput {
            pointer_click: Some(Vec2::new(600.0, 300.0)),
            ..Default::default()
        };
        tick(&mut state, &click, &levels);
        assert_eq!(state.ship.target, Some(Vec2::new(600.0, 300.0)));
        assert!(state.ship.thrust);
        assert!(state.ship.pos.x > 400.0);

        let release = TickInput {
            pointer_release: true,
            ..Default::default()
        };
        tick(&mut state, &release, &levels);
        assert!(!state.ship.thrust);
        assert!(state.events().contains(&GameEvent::Cue(Cue::ThrustOff)));
    }

    #[test]
    fn test_fire_only_while_playing() {
        let levels = StaticLevels::from_texts(&[OPEN]);
        let mut state = GameState::new(quiet_settings(), &levels).unwrap();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, &levels);
        assert!(state.projectiles.is_empty());

        start_new_game(&mut state, &levels);
        tick(&mut state, &fire, &levels);
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.ship.firing);

        let release = TickInput {
            fire_release: true,
            ..Default::default()
        };
        tick(&mut state, &release, &levels);
        assert!(!state.ship.firing);
    }

    #[test]
    fn test_projectiles_expire() {
        let levels = StaticLevels::from_texts(&[OPEN]);
        let mut state = playing(quiet_settings(), &levels);
        apply_input(
            &mut state,
            &TickInput {
                fire: true,
                ..Default::default()
            },
            &levels,
        );
        for _ in 0..49 {
            tick(&mut state, &TickInput::default(), &levels);
        }
        assert_eq!(state.projectiles.len(), 1);
        tick(&mut state, &TickInput::default(), &levels);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_spawner_respects_cap_and_clearance() {
        let levels = StaticLevels::from_texts(&[OPEN]);
        let mut state = playing(Settings::default(), &levels);
        let clearance = 2.0 * DONUT_INFO.radius + state.ship.radius;
        for _ in 0..200 {
            let before = state.enemies.snapshot();
            spawn_enemy(&mut state);
            assert!(state.enemies.len() <= state.session.max_enemies);
            for e in state.enemies.iter().filter(|e| !before.contains(&e.id)) {
                assert!(distance(e.pos, state.ship.pos) > clearance);
                assert!(e.vel.x.abs() <= ENEMY_MAX_DRIFT && e.vel.y.abs() <= ENEMY_MAX_DRIFT);
                assert!(e.angular_vel.abs() <= ENEMY_MAX_SPIN);
            }
        }
        assert_eq!(state.enemies.len(), 5);
    }

    #[test]
    fn test_spawner_deterministic() {
        let levels = StaticLevels::from_texts(&[OPEN]);
        let mut a = playing(Settings::default(), &levels);
        let mut b = playing(Settings::default(), &levels);
        for _ in 0..30 {
            tick(&mut a, &TickInput::default(), &levels);
            tick(&mut b, &TickInput::default(), &levels);
        }
        let pa: Vec<_> = a.enemies.iter().map(|e| e.pos).collect();
        let pb: Vec<_> = b.enemies.iter().map(|e| e.pos).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_level_transition_fires_once() {
        let levels = StaticLevels::from_texts(&[OPEN, "@...\n", "#...\n"]);
        let mut state = playing(quiet_settings(), &levels);
        state.session.score = state.session.score_to_next_level;
        assert_eq!(state.grid.loot_count(), 0);

        assert_eq!(check_level_transition(&mut state, &levels), LevelTransition::Advanced(2));
        assert_eq!(state.session.current_level, 2);
        assert_eq!(state.session.score_to_next_level, 125);
        assert_eq!(state.session.max_enemies, 1);
        assert_eq!(state.session.score, 50);
        assert_eq!(state.background, 1);
        assert_eq!(state.grid.loot_count(), 1);

        assert_eq!(check_level_transition(&mut state, &levels), LevelTransition::Stay);
        let advanced = state
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelAdvanced { .. }))
            .count();
        assert_eq!(advanced, 1);
    }

    #[test]
    fn test_transition_needs_score_and_no_loot() {
        let levels = StaticLevels::from_texts(&["@\n", OPEN]);
        let mut state = playing(quiet_settings(), &levels);
        state.session.score = 1_000;
        assert_eq!(check_level_transition(&mut state, &levels), LevelTransition::Stay);

        state.grid.reset();
        state.session.score = 49;
        assert_eq!(check_level_transition(&mut state, &levels), LevelTransition::Stay);

        state.session.score = 50;
        assert_eq!(check_level_transition(&mut state, &levels), LevelTransition::Advanced(2));
    }

    #[test]
    fn test_linear_progression() {
        let levels = StaticLevels::from_texts(&[OPEN, OPEN]);
        let settings = Settings {
            level_progression: LevelProgression::Linear { step: 50 },
            ..quiet_settings()
        };
        let mut state = playing(settings, &levels);
        state.session.score = 50;
        check_level_transition(&mut state, &levels);
        assert_eq!(state.session.score_to_next_level, 100);
    }

    #[test]
    fn test_last_level_cleared() {
        let levels = StaticLevels::from_texts(&[OPEN]);
        let mut state = playing(quiet_settings(), &levels);
        state.session.score = 60;
        state.session.loot_collected = 4;

        tick(&mut state, &TickInput::default(), &levels);
        assert_eq!(state.phase, GamePhase::AllLevelsCleared);
        assert!(state.events().contains(&GameEvent::AllLevelsCleared));
        let run = state.last_run.unwrap();
        assert!(run.cleared_all);
        assert_eq!((run.score, run.loot, run.level), (60, 4, 1));

        // Terminal: further ticks do nothing
        assert_eq!(check_level_transition(&mut state, &levels), LevelTransition::Stay);
        tick(&mut state, &TickInput::default(), &levels);
        assert_eq!(state.phase, GamePhase::AllLevelsCleared);
    }

    #[test]
    fn test_donut_hit_costs_one_life() {
        let levels = StaticLevels::from_texts(&[OPEN]);
        let mut state = playing(quiet_settings(), &levels);
        let center = state.ship.pos;
        add_donut(&mut state, center + Vec2::new(10.0, 0.0));
        add_donut(&mut state, center - Vec2::new(10.0, 0.0));

        tick(&mut state, &TickInput::default(), &levels);
        assert_eq!(state.session.lives, 2);
        assert!(state.enemies.is_empty());
        assert_eq!(state.explosions.len(), 2);
        assert!(state.events().contains(&GameEvent::LifeLost { remaining: 2 }));
    }

    #[test]
    fn test_kill_scores() {
        let levels = StaticLevels::from_texts(&[OPEN]);
        let mut state = playing(quiet_settings(), &levels);
        let id = add_donut(&mut state, Vec2::new(100.0, 100.0));
        let pid = state.next_entity_id();
        state.projectiles.insert(Entity::new(
            pid,
            SpriteKind::Projectile,
            Vec2::new(100.0, 100.0),
            Vec2::ZERO,
            0.0,
            0.0,
        ));

        tick(&mut state, &TickInput::default(), &levels);
        assert!(!state.enemies.contains(id));
        assert!(state.projectiles.is_empty());
        assert_eq!(state.session.score, 1);
        assert_eq!(state.session.loot_collected, 1);
        assert_eq!(state.explosions.len(), 1);
        assert!(state.events().contains(&GameEvent::EnemyDestroyed { count: 1 }));
    }

    #[test]
    fn test_kills_without_loot_award() {
        let levels = StaticLevels::from_texts(&[OPEN]);
        let settings = Settings {
            kills_award_loot: false,
            ..quiet_settings()
        };
        let mut state = playing(settings, &levels);
        add_donut(&mut state, Vec2::new(100.0, 100.0));
        let pid = state.next_entity_id();
        state.projectiles.insert(Entity::new(
            pid,
            SpriteKind::Projectile,
            Vec2::new(100.0, 100.0),
            Vec2::ZERO,
            0.0,
            0.0,
        ));
        tick(&mut state, &TickInput::default(), &levels);
        assert_eq!(state.session.score, 1);
        assert_eq!(state.session.loot_collected, 0);
    }

    #[test]
    fn test_death_returns_to_level_one() {
        let levels = StaticLevels::from_texts(&["@..\n", OPEN]);
        let mut state = playing(quiet_settings(), &levels);
        state.grid.reset();
        state.session.score = 50;
        check_level_transition(&mut state, &levels);
        assert_eq!(state.session.current_level, 2);

        state.session.lives = 1;
        state.session.score = 7;
        let center = state.ship.pos;
        add_donut(&mut state, center);
        tick(&mut state, &TickInput::default(), &levels);

        assert_eq!(state.phase, GamePhase::GameOver);
        let run = state.last_run.unwrap();
        assert_eq!((run.score, run.level, run.cleared_all), (7, 2, false));
        assert_eq!(state.session, SessionState::new(&state.settings));
        assert_eq!(state.grid.loot_count(), 1);
        assert!(state.enemies.is_empty() && state.projectiles.is_empty() && state.explosions.is_empty());
        assert!(state.events().contains(&GameEvent::GameOver(run)));

        // Click the start button to play again
        let click = TickInput {
            pointer_click: Some(Vec2::new(400.0, 300.0)),
            ..Default::default()
        };
        tick(&mut state, &click, &levels);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.session.lives, 3);
    }

    #[test]
    fn test_autopilot_plays() {
        let levels = StaticLevels::from_texts(&["@..............@\n"]);
        let mut state = GameState::new(Settings::default(), &levels).unwrap();
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &idle, &levels);
        }
        assert_ne!(state.phase, GamePhase::Splash);
        assert_eq!(state.time_ticks, 600);
    }
}
