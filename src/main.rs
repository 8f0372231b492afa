//! Meteor Mess entry point
//!
//! Headless runner: loads settings and levels, lets the autopilot play for a
//! number of frames, routes sound cues to a logging sink and prints the result.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use meteor_mess::Settings;
use meteor_mess::audio::{AudioSink, LogAudio};
use meteor_mess::consts::FRAME_RATE;
use meteor_mess::sim::{GameEvent, GamePhase, GameState, LevelDir, TickInput, tick};

#[derive(Parser, Debug)]
#[command(name = "meteor-mess")]
#[command(about = "Run the Meteor Mess simulation headless with the autopilot at the controls")]
struct Cli {
    /// Directory holding level1.txt, level2.txt, ...
    #[arg(long, default_value = "levels")]
    levels: PathBuf,
    /// JSON settings file (defaults are used if missing or invalid)
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Frames to simulate
    #[arg(long, default_value_t = 60 * 60)]
    frames: u64,
    /// Override the spawner seed
    #[arg(long)]
    seed: Option<u64>,
    /// Sound cue volume (0..1)
    #[arg(long, default_value_t = 0.8)]
    volume: f32,
    /// Silence cue logging
    #[arg(long)]
    mute: bool,
    /// Keep playing after a game over instead of stopping
    #[arg(long)]
    keep_going: bool,
}

/// Routes drained events to the audio sink and the log
struct Runner {
    audio: LogAudio,
    games: u32,
    keep_going: bool,
}

impl Runner {
    fn new(audio: LogAudio, keep_going: bool) -> Self {
        Self {
            audio,
            games: 0,
            keep_going,
        }
    }

    /// Route a whole frame's events; returns true if the run should stop after them
    fn route(&mut self, events: Vec<GameEvent>) -> bool {
        let mut stop = false;
        for event in events {
            match event {
                GameEvent::Cue(cue) => self.audio.play(cue),
                GameEvent::GameStarted => {
                    self.games += 1;
                    log::info!("Game {} started", self.games);
                }
                GameEvent::LifeLost { remaining } => log::info!("Life lost, {remaining} left"),
                GameEvent::EnemyDestroyed { count } => log::debug!("{count} donut(s) destroyed"),
                GameEvent::LevelAdvanced { level } => log::info!("Reached level {level}"),
                GameEvent::AllLevelsCleared => {
                    log::info!("All levels cleared");
                    stop = true;
                }
                GameEvent::GameOver(run) => {
                    log::info!("Game over: score {} loot {} level {}", run.score, run.loot, run.level);
                    stop |= !self.keep_going;
                }
            }
        }
        stop
    }
}

fn main() -> Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(seed) = cli.seed {
        settings.seed = seed;
    }
    log::info!("Meteor Mess starting (seed {:#x})", settings.seed);

    let levels = LevelDir::new(&cli.levels);
    let mut state = GameState::new(settings, &levels)
        .with_context(|| format!("loading levels from {}", levels.root().display()))?;
    let mut audio = LogAudio::new(cli.volume);
    audio.set_muted(cli.mute);
    let mut runner = Runner::new(audio, cli.keep_going);

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut frames_run = 0u64;

    for _ in 0..cli.frames {
        tick(&mut state, &input, &levels);
        frames_run += 1;
        if runner.route(state.drain_events()) {
            break;
        }
    }

    let seconds = frames_run as f32 / FRAME_RATE as f32;
    println!("Simulated {frames_run} frames ({seconds:.1}s), {} game(s)", runner.games);
    match (state.phase, state.last_run) {
        (GamePhase::Playing, _) | (_, None) => {
            let s = &state.session;
            println!(
                "In progress: score {} lives {} loot {} level {} ({} loot left on the grid)",
                s.score,
                s.lives,
                s.loot_collected,
                s.current_level,
                state.grid.loot_count()
            );
        }
        (_, Some(run)) => {
            let outcome = if run.cleared_all { "cleared every level" } else { "game over" };
            println!(
                "Last run {outcome}: score {} loot {} level {}",
                run.score, run.loot, run.level
            );
        }
    }
    println!("{} sound cue(s) played", runner.audio.played());

    Ok(())
}
