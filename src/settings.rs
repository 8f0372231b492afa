//! Gameplay settings
//!
//! Loaded from a JSON file next to the levels; every field has a default so a
//! partial file only overrides what it names.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CELL_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};

/// How the score threshold grows on each level transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LevelProgression {
    /// `threshold * 2 + 25`
    #[default]
    Doubling,
    /// `threshold + step`
    Linear { step: u32 },
}

impl LevelProgression {
    /// Threshold for the level after one with `current`
    pub fn next_threshold(&self, current: u32) -> u32 {
        match self {
            LevelProgression::Doubling => current.saturating_mul(2).saturating_add(25),
            LevelProgression::Linear { step } => current.saturating_add(*step),
        }
    }
}

/// Gameplay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    /// Screen width in pixels (wrap bound)
    pub width: f32,
    /// Screen height in pixels (wrap bound)
    pub height: f32,
    /// Level grid cell size in pixels
    pub cell_size: f32,

    // === Session ===
    pub starting_lives: i32,
    /// Enemy population cap on level 1
    pub base_max_enemies: usize,
    /// Score needed to leave level 1
    pub base_score_to_next_level: u32,
    pub level_progression: LevelProgression,
    /// Kills also count as loot
    pub kills_award_loot: bool,

    // === Presentation hooks ===
    /// Number of level backgrounds available
    pub background_count: u32,
    /// Start button size, centered on the screen
    pub start_button: (f32, f32),

    /// RNG seed for enemy spawning
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            cell_size: CELL_SIZE,

            starting_lives: 3,
            base_max_enemies: 5,
            base_score_to_next_level: 50,
            level_progression: LevelProgression::Doubling,
            kills_award_loot: true,

            background_count: 3,
            start_button: (400.0, 300.0),

            seed: 0x5eed,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; out-of-range values are a parse error
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Self = serde_json::from_str(json)?;
        settings
            .validate()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;
        Ok(settings)
    }

    /// Check the playfield: positive finite size, at least one grid cell
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [("width", self.width), ("height", self.height), ("cell_size", self.cell_size)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{name} must be positive, got {value}"));
            }
        }
        if self.cell_size > self.width.min(self.height) {
            return Err(format!(
                "cell_size {} larger than the {}x{} playfield",
                self.cell_size, self.width, self.height
            ));
        }
        Ok(())
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {}: {e}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Wrap bounds for entity motion
    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Grid dimensions in cells (columns, rows)
    pub fn grid_dims(&self) -> (usize, usize) {
        (
            (self.width / self.cell_size) as usize,
            (self.height / self.cell_size) as usize,
        )
    }

    /// Whether a point lies strictly inside the centered start button
    pub fn in_start_button(&self, pos: Vec2) -> bool {
        let center = self.bounds() / 2.0;
        let half = Vec2::new(self.start_button.0, self.start_button.1) / 2.0;
        let min = center - half;
        let max = center + half;
        pos.x > min.x && pos.x < max.x && pos.y > min.y && pos.y < max.y
    }
}
