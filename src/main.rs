//! Headless brick breaker runner
//!
//! Plays one level with the autopilot paddle and reports the outcome.
//!
//! Usage:
//!   cargo run --release -- --level 3 --seed 42
//!   RUST_LOG=debug cargo run -- --level 15 --map response.json

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;

use brick_breaker::audio::AudioManager;
use brick_breaker::consts::{LEVEL_COUNT, SIM_DT};
use brick_breaker::persistence::{JsonFileStore, MemoryStore, ProgressStore};
use brick_breaker::platform::HeadlessScheduler;
use brick_breaker::session::{Collaborators, GridSource, NoGridSource, Session, SessionObserver};
use brick_breaker::sim::{Field, GameEvent, GamePhase, parse_grid_response};
use brick_breaker::{FetchError, Tuning, UnlockedLevels};

#[derive(Parser)]
#[command(name = "brick-breaker")]
#[command(about = "Play a brick breaker level headlessly with the autopilot paddle")]
struct Args {
    /// Level id (the last one is procedural)
    #[arg(long, default_value_t = 0)]
    level: u32,
    /// RNG seed
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Field width in pixels
    #[arg(long, default_value_t = 400.0)]
    width: f32,
    /// Field height in pixels
    #[arg(long, default_value_t = 600.0)]
    height: f32,
    /// Give up after this many frames
    #[arg(long, default_value_t = 216_000)]
    max_frames: u64,
    /// JSON tuning override
    #[arg(long)]
    tuning: Option<PathBuf>,
    /// Unlock progress file; without it every level is playable
    #[arg(long)]
    progress: Option<PathBuf>,
    /// Saved map service response for the procedural level
    #[arg(long)]
    map: Option<PathBuf>,
}

/// Tallies events and logs the sound cues a host would play
struct ConsoleObserver {
    audio: AudioManager,
    clock: Rc<Cell<f64>>,
    bricks: u64,
    balls_lost: u64,
    score: Option<usize>,
    outcome: Rc<Cell<Option<(GamePhase, usize)>>>,
}

impl SessionObserver for ConsoleObserver {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::BrickDestroyed { .. } => self.bricks += 1,
            GameEvent::BallLost => self.balls_lost += 1,
            GameEvent::PowerUpCollected { kind } => log::info!("Power-up: {:?}", kind),
            _ => {}
        }
        if let Some(cue) = self.audio.cue(event, self.clock.get()) {
            log::trace!("Sound {:?} at {:.2}", cue.effect, cue.volume);
        }
    }

    fn on_terminal(&mut self, phase: GamePhase) {
        log::info!(
            "{:?}: {} bricks destroyed, {} balls lost",
            phase,
            self.bricks,
            self.balls_lost
        );
        self.outcome.set(Some((phase, self.score.unwrap_or(0))));
    }

    fn submit_score(&mut self, score: usize) {
        self.score = Some(score);
    }
}

/// Serves a recorded map service response
struct RecordedMap {
    body: String,
}

impl GridSource for RecordedMap {
    fn fetch_grid(&mut self, _columns: usize, _rows: usize) -> Result<Vec<Vec<u8>>, FetchError> {
        parse_grid_response(&self.body)
    }
}

fn load_tuning(path: &Path) -> Result<Tuning> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file: {}", path.display()))?;
    Tuning::from_json(&json)
        .with_context(|| format!("invalid tuning file: {}", path.display()))
}

fn open_progress(path: &Path) -> Result<JsonFileStore> {
    let store = JsonFileStore::new(path);
    // A missing file is a fresh start; a corrupt one is worth stopping for
    store
        .load()
        .with_context(|| format!("failed to read progress file: {}", store.path().display()))?;
    Ok(store)
}

fn run(args: Args) -> Result<(GamePhase, u64, usize, u64)> {
    let tuning = match &args.tuning {
        Some(path) => load_tuning(path)?,
        None => Tuning::default(),
    };
    let throttle = tuning.sound_throttle;

    let store: Box<dyn ProgressStore> = match &args.progress {
        Some(path) => Box::new(open_progress(path)?),
        None => Box::new(MemoryStore::with_levels(UnlockedLevels::from_ids(
            0..LEVEL_COUNT,
        ))),
    };
    let grid_source: Box<dyn GridSource> = match &args.map {
        Some(path) => Box::new(RecordedMap {
            body: fs::read_to_string(path)
                .with_context(|| format!("failed to read map file: {}", path.display()))?,
        }),
        None => Box::new(NoGridSource),
    };

    let clock = Rc::new(Cell::new(0.0));
    let outcome = Rc::new(Cell::new(None));
    let scheduler = HeadlessScheduler::new();
    let collab = Collaborators {
        grid_source,
        store,
        observer: Box::new(ConsoleObserver {
            audio: AudioManager::new(throttle),
            clock: clock.clone(),
            bricks: 0,
            balls_lost: 0,
            score: None,
            outcome: outcome.clone(),
        }),
        scheduler: Box::new(scheduler.clone()),
    };

    let field = Field::new(args.width, args.height);
    let mut session = Session::new(tuning, field, args.seed, collab)
        .context("failed to create game session")?;
    session
        .select_level(args.level)
        .with_context(|| format!("cannot select level {}", args.level))?;
    session.set_autopilot(true);
    session
        .start()
        .with_context(|| format!("failed to start level {}", args.level))?;

    let mut frames = 0;
    while frames < args.max_frames {
        let Some(handle) = scheduler.take_pending() else {
            break;
        };
        frames += 1;
        let now = frames as f64 * SIM_DT as f64;
        clock.set(now);
        session.frame(handle, now);
    }

    let points = session.points();
    match outcome.get() {
        Some((phase, score)) => Ok((phase, points, score, frames)),
        None => {
            log::warn!("Stopped after {} frames without an outcome", frames);
            session.stop();
            Ok((GamePhase::Playing, points, session.unlocked().score(), frames))
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    let level = args.level;

    match run(args) {
        Ok((phase, points, score, frames)) => {
            println!("Level:   {}", level);
            println!("Outcome: {:?}", phase);
            println!("Points:  {}", points);
            println!("Score:   {} levels unlocked", score);
            println!(
                "Frames:  {} ({:.1}s simulated)",
                frames,
                frames as f64 * SIM_DT as f64
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
