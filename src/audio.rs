//! Audio cues
//!
//! The simulation never plays sound itself. It emits `Cue`s and an `AudioSink`
//! decides what to do with them.

use serde::{Deserialize, Serialize};

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Projectile spawned
    ProjectileFired,
    /// Loot cell consumed
    LootPickedUp,
    /// Engine loop start
    ThrustOn,
    /// Engine loop stop
    ThrustOff,
    /// Explosion spawned
    ExplosionTriggered,
    /// Background music start (new game)
    SoundtrackStart,
    /// Background music stop (game over)
    SoundtrackStop,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::ProjectileFired => "projectile_fired",
            Cue::LootPickedUp => "loot_picked_up",
            Cue::ThrustOn => "thrust_on",
            Cue::ThrustOff => "thrust_off",
            Cue::ExplosionTriggered => "explosion_triggered",
            Cue::SoundtrackStart => "soundtrack_start",
            Cue::SoundtrackStop => "soundtrack_stop",
        }
    }
}

/// Something that can play cues
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
}

/// Sink that logs cues and tracks the looping sounds
#[derive(Debug, Default)]
pub struct LogAudio {
    volume: f32,
    muted: bool,
    engine_running: bool,
    music_running: bool,
    played: u64,
}

impl LogAudio {
    pub fn new(volume: f32) -> Self {
        Self {
            volume: volume.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn engine_running(&self) -> bool {
        self.engine_running
    }

    pub fn music_running(&self) -> bool {
        self.music_running
    }

    /// Number of one-shot cues played
    pub fn played(&self) -> u64 {
        self.played
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: Cue) {
        match cue {
            Cue::ThrustOn => self.engine_running = true,
            Cue::ThrustOff => self.engine_running = false,
            Cue::SoundtrackStart => self.music_running = true,
            Cue::SoundtrackStop => self.music_running = false,
            _ => self.played += 1,
        }
        if !self.muted && self.volume > 0.0 {
            log::trace!("cue {} (volume {:.2})", cue.as_str(), self.volume);
        }
    }
}
