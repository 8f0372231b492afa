//! Game state and core simulation types
//!
//! Everything the frame driver mutates lives in `GameState`; nothing is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::group::Group;
use super::level::LevelSource;
use super::ship::Ship;
use crate::audio::Cue;
use crate::error::LevelError;
use crate::settings::Settings;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for a click on the start button
    Splash,
    /// Active gameplay
    Playing,
    /// Ship ran out of lives
    GameOver,
    /// No further level could be loaded
    AllLevelsCleared,
}

/// How a run ended, for the game-over screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u32,
    pub loot: u32,
    pub level: u32,
    pub cleared_all: bool,
}

/// Things that happened during a tick, drained by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Sound cue for the audio layer
    Cue(Cue),
    GameStarted,
    LifeLost { remaining: i32 },
    EnemyDestroyed { count: u32 },
    LevelAdvanced { level: u32 },
    AllLevelsCleared,
    GameOver(RunSummary),
}

/// Score, lives, loot and level progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u32,
    pub lives: i32,
    pub loot_collected: u32,
    /// 1-based
    pub current_level: u32,
    pub score_to_next_level: u32,
    /// Enemy population cap
    pub max_enemies: usize,
}

impl SessionState {
    /// Fresh session on level 1
    pub fn new(settings: &Settings) -> Self {
        Self {
            score: 0,
            lives: settings.starting_lives,
            loot_collected: 0,
            current_level: 1,
            score_to_next_level: settings.base_score_to_next_level,
            max_enemies: settings.base_max_enemies,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.lives <= 0
    }

    pub fn summary(&self, cleared_all: bool) -> RunSummary {
        RunSummary {
            score: self.score,
            loot: self.loot_collected,
            level: self.current_level,
            cleared_all,
        }
    }
}

/// Entity id allocator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl EntityIds {
    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub phase: GamePhase,
    pub session: SessionState,
    pub ship: Ship,
    pub grid: Grid,
    /// Donuts
    pub enemies: Group,
    pub projectiles: Group,
    pub explosions: Group,
    pub ids: EntityIds,
    /// Spawner RNG (seeded from settings)
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Background image index for the presentation layer
    pub background: u32,
    /// Result of the previous run, if any
    pub last_run: Option<RunSummary>,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Splash-screen state with level 1 loaded
    pub fn new(settings: Settings, levels: &dyn LevelSource) -> Result<Self, LevelError> {
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                log::warn!("Invalid settings ({e}); using defaults");
                Settings::default()
            }
        };
        let rows = levels.load(1)?;
        let (cols, grid_rows) = settings.grid_dims();
        let grid = Grid::from_rows(cols, grid_rows, settings.cell_size, &rows);
        log::info!("Loaded level 1 ({} loot)", grid.loot_count());

        Ok(Self {
            phase: GamePhase::Splash,
            session: SessionState::new(&settings),
            ship: Ship::new(settings.bounds() / 2.0),
            grid,
            enemies: Group::new(),
            projectiles: Group::new(),
            explosions: Group::new(),
            ids: EntityIds::default(),
            rng: Pcg32::seed_from_u64(settings.seed),
            time_ticks: 0,
            background: 0,
            last_run: None,
            events: Vec::new(),
            settings,
        })
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn bounds(&self) -> Vec2 {
        self.settings.bounds()
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next_id()
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take everything emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ship back to center; donuts, projectiles and explosions cleared
    pub fn reset_field(&mut self) {
        self.ship.reset(self.bounds() / 2.0);
        self.enemies.clear();
        self.projectiles.clear();
        self.explosions.clear();
    }

    /// Replace the grid with a level layout
    pub fn rebuild_grid(&mut self, rows: &[String]) {
        self.grid.reset();
        self.grid.load_rows(rows);
    }
}
