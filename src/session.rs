//! Session lifecycle
//!
//! `Session` owns one [`GameState`] at a time and drives it from host frame
//! callbacks. Everything outside the simulation (map service, progress
//! storage, score submission, frame scheduling) is reached through the
//! [`Collaborators`] passed at construction.
//!
//! Phases: `Start` -> `Playing` -> `GameOver` | `Won`, then back to `Start`
//! ([`Session::reset`]) or straight into `Playing` ([`Session::retry`],
//! [`Session::next_level`]).

use crate::consts::*;
use crate::error::{FetchError, SessionError};
use crate::persistence::{ProgressStore, load_or_default};
use crate::platform::{FrameHandle, FrameScheduler, ResizeDebouncer};
use crate::progress::UnlockedLevels;
use crate::settings::Tuning;
use crate::sim::{
    BrickGrid, ExternalGrid, Field, GameEvent, GamePhase, GameState, GridLayout, TickInput,
    derive_dimensions, generate_map, snap_six_plus_one, tick,
};

/// Procedural map service
pub trait GridSource {
    /// Raw `grid[row][column]` cell codes for the requested size
    fn fetch_grid(&mut self, columns: usize, rows: usize) -> Result<Vec<Vec<u8>>, FetchError>;
}

impl<F> GridSource for F
where
    F: FnMut(usize, usize) -> Result<Vec<Vec<u8>>, FetchError>,
{
    fn fetch_grid(&mut self, columns: usize, rows: usize) -> Result<Vec<Vec<u8>>, FetchError> {
        self(columns, rows)
    }
}

/// Grid source for hosts without a map service
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGridSource;

impl GridSource for NoGridSource {
    fn fetch_grid(&mut self, _columns: usize, _rows: usize) -> Result<Vec<Vec<u8>>, FetchError> {
        Err(FetchError::Unavailable("no map service configured".to_string()))
    }
}

/// Receives everything the session reports to the outside
pub trait SessionObserver {
    /// Every simulation event, in tick order
    fn on_event(&mut self, _event: &GameEvent) {}
    /// Points gained by a destroyed brick
    fn on_score_delta(&mut self, _delta: u32) {}
    /// The session reached `GameOver` or `Won`
    fn on_terminal(&mut self, _phase: GamePhase) {}
    /// Final score (levels unlocked) on every terminal transition
    fn submit_score(&mut self, _score: usize) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {}

/// External capabilities the session depends on
pub struct Collaborators {
    pub grid_source: Box<dyn GridSource>,
    pub store: Box<dyn ProgressStore>,
    pub observer: Box<dyn SessionObserver>,
    pub scheduler: Box<dyn FrameScheduler>,
}

/// Game state controller
pub struct Session {
    tuning: Tuning,
    field: Field,
    seed: u64,
    starts: u64,
    selected_level: u32,
    unlocked: UnlockedLevels,
    state: Option<GameState>,
    input: TickInput,
    /// Frame we are waiting on; anything else is stale
    frame: Option<FrameHandle>,
    last_frame_time: Option<f64>,
    accumulator: f64,
    resize: ResizeDebouncer,
    collab: Collaborators,
}

impl Session {
    /// Validate tuning and read persisted progress
    pub fn new(
        tuning: Tuning,
        field: Field,
        seed: u64,
        collab: Collaborators,
    ) -> Result<Self, SessionError> {
        tuning.validate()?;
        let unlocked = load_or_default(collab.store.as_ref());
        log::info!(
            "Session ready: {}x{} field, {} of {} levels unlocked",
            field.width,
            field.height,
            unlocked.len(),
            LEVEL_COUNT
        );
        Ok(Self {
            resize: ResizeDebouncer::new(tuning.resize_debounce),
            tuning,
            field,
            seed,
            starts: 0,
            selected_level: 0,
            unlocked,
            state: None,
            input: TickInput::default(),
            frame: None,
            last_frame_time: None,
            accumulator: 0.0,
            collab,
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.state.as_ref().map_or(GamePhase::Start, |s| s.phase)
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Live state, for hosts that edit a level in place
    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    pub fn points(&self) -> u64 {
        self.state.as_ref().map_or(0, |s| s.points)
    }

    pub fn selected_level(&self) -> u32 {
        self.selected_level
    }

    pub fn unlocked(&self) -> &UnlockedLevels {
        &self.unlocked
    }

    pub fn field(&self) -> Field {
        self.field
    }

    /// Frame the session expects next
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frame
    }

    /// Choose the level for the next [`Session::start`]
    pub fn select_level(&mut self, level: u32) -> Result<(), SessionError> {
        if self.phase() == GamePhase::Playing {
            return Err(SessionError::InvalidTransition {
                from: GamePhase::Playing,
                action: "select a level",
            });
        }
        if level >= LEVEL_COUNT {
            return Err(SessionError::UnknownLevel(level));
        }
        if !self.unlocked.contains(level) {
            return Err(SessionError::LevelLocked(level));
        }
        self.selected_level = level;
        Ok(())
    }

    /// Start the selected level
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.phase() == GamePhase::Playing {
            return Err(SessionError::InvalidTransition {
                from: GamePhase::Playing,
                action: "start",
            });
        }
        self.start_level(self.selected_level)
    }

    /// Play the same level again after it ended
    pub fn retry(&mut self) -> Result<(), SessionError> {
        let phase = self.phase();
        if !phase.is_terminal() {
            return Err(SessionError::InvalidTransition {
                from: phase,
                action: "retry",
            });
        }
        self.start_level(self.selected_level)
    }

    /// Continue with the level just unlocked
    pub fn next_level(&mut self) -> Result<(), SessionError> {
        let phase = self.phase();
        if phase != GamePhase::Won {
            return Err(SessionError::InvalidTransition {
                from: phase,
                action: "advance",
            });
        }
        let next = self.selected_level + 1;
        if next >= LEVEL_COUNT {
            return Err(SessionError::UnknownLevel(next));
        }
        self.selected_level = next;
        self.start_level(next)
    }

    /// Return to level selection after a finished game
    pub fn reset(&mut self) -> Result<(), SessionError> {
        let phase = self.phase();
        if phase == GamePhase::Playing {
            return Err(SessionError::InvalidTransition {
                from: phase,
                action: "reset",
            });
        }
        self.state = None;
        Ok(())
    }

    /// Host teardown: cancel the pending frame and any width boost
    pub fn stop(&mut self) {
        self.cancel_frame();
        if let Some(state) = self.state.as_mut() {
            state.paddle.reset();
        }
        if self.phase() == GamePhase::Playing {
            log::info!("Session stopped mid-level");
        }
        self.state = None;
    }

    /// Latest pointer sample in field coordinates
    pub fn set_pointer(&mut self, x: f32) {
        self.input.pointer_x = Some(x);
    }

    /// Let the paddle play by itself
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    /// Report a new field size at time `now` (seconds)
    ///
    /// Applied after the debounce window. Only bounds change; in-flight balls,
    /// the paddle and the grid keep their coordinates.
    pub fn resize(&mut self, field: Field, now: f64) {
        if !(field.width.is_finite() && field.height.is_finite())
            || field.width <= 0.0
            || field.height <= 0.0
        {
            log::warn!("Ignoring invalid field size {}x{}", field.width, field.height);
            return;
        }
        self.resize.push(field, now);
    }

    /// Apply a settled resize while no frames are running
    pub fn poll_resize(&mut self, now: f64) {
        if let Some(field) = self.resize.poll(now) {
            self.apply_field(field);
        }
    }

    fn apply_field(&mut self, field: Field) {
        log::debug!("Field resized to {}x{}", field.width, field.height);
        self.field = field;
        if let Some(state) = self.state.as_mut() {
            state.field = field;
            state.paddle.set_field_width(field.width);
        }
    }

    /// Host frame callback
    ///
    /// `now` is the host clock in seconds. Runs up to `MAX_SUBSTEPS` fixed
    /// ticks, reports events, then schedules the next frame or finishes the
    /// session. Returns the events of this frame.
    pub fn frame(&mut self, handle: FrameHandle, now: f64) -> Vec<GameEvent> {
        if self.frame != Some(handle) {
            log::debug!("Ignoring stale frame {:?}", handle);
            return Vec::new();
        }
        self.frame = None;
        if self.phase() != GamePhase::Playing {
            return Vec::new();
        }

        if let Some(field) = self.resize.poll(now) {
            self.apply_field(field);
        }

        let step = SIM_DT as f64;
        let max_backlog = step * MAX_SUBSTEPS as f64;
        let elapsed = match self.last_frame_time {
            Some(last) => (now - last).max(0.0),
            None => step,
        };
        self.last_frame_time = Some(now);
        self.accumulator = (self.accumulator + elapsed).min(max_backlog);

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= step && substeps < MAX_SUBSTEPS {
            let Some(state) = self.state.as_mut() else {
                break;
            };
            let tick_events = tick(state, &self.input, SIM_DT);
            self.accumulator -= step;
            substeps += 1;

            for event in &tick_events {
                self.collab.observer.on_event(event);
                if let GameEvent::BrickDestroyed { points, .. } = event {
                    self.collab.observer.on_score_delta(*points);
                }
            }
            events.extend(tick_events);

            if state.phase.is_terminal() {
                break;
            }
        }

        let phase = self.phase();
        if phase.is_terminal() {
            self.finish(phase);
        } else {
            self.frame = Some(self.collab.scheduler.request_frame());
        }
        events
    }

    fn start_level(&mut self, level: u32) -> Result<(), SessionError> {
        if level >= LEVEL_COUNT {
            return Err(SessionError::UnknownLevel(level));
        }
        if !self.unlocked.contains(level) {
            return Err(SessionError::LevelLocked(level));
        }
        self.cancel_frame();
        if let Some(field) = self.resize.flush() {
            self.apply_field(field);
        }

        let procedural = level == PROCEDURAL_LEVEL;
        let layout = self.level_layout(procedural)?;
        let grid = BrickGrid::new(layout)?;

        let seed = self.seed.wrapping_add(self.starts);
        self.starts += 1;
        let mut state = GameState::new(self.tuning.clone(), self.field, grid, seed);

        let external = if procedural {
            self.fetch_external(&layout)
        } else {
            None
        };
        generate_map(&mut state.grid, level, external.as_ref(), &mut state.rng);
        state.begin(level);
        log::info!(
            "Level {} started ({} bricks, seed {})",
            level,
            state.grid.remaining(),
            seed
        );

        self.state = Some(state);
        self.accumulator = 0.0;
        self.last_frame_time = None;
        self.frame = Some(self.collab.scheduler.request_frame());
        Ok(())
    }

    /// Grid geometry for the current field; procedural rows are `6n + 1`
    fn level_layout(&self, procedural: bool) -> Result<GridLayout, SessionError> {
        let t = &self.tuning;
        let coverage = if procedural {
            t.procedural_height_coverage
        } else {
            t.brick_height_coverage
        };
        let mut layout = derive_dimensions(
            self.field.width,
            self.field.height,
            t.brick_target_size,
            t.brick_padding,
            t.brick_offset_left,
            t.brick_offset_top,
            coverage,
        )?;
        if procedural {
            layout.rows = snap_six_plus_one(layout.rows as i64) as usize;
        }
        Ok(layout)
    }

    /// Fetch and validate the procedural layout; any failure means fallback
    fn fetch_external(&mut self, layout: &GridLayout) -> Option<ExternalGrid> {
        let result = self
            .collab
            .grid_source
            .fetch_grid(layout.columns, layout.rows)
            .and_then(|rows| ExternalGrid::from_rows(&rows, layout.columns, layout.rows));
        match result {
            Ok(grid) if grid.has_bricks() => Some(grid),
            Ok(_) => {
                log::warn!("Procedural map has no bricks, using fallback layout");
                None
            }
            Err(err) => {
                log::warn!("Procedural map unavailable, using fallback layout: {}", err);
                None
            }
        }
    }

    fn finish(&mut self, phase: GamePhase) {
        self.cancel_frame();
        let level = self.selected_level;
        if let Some(state) = self.state.as_mut() {
            state.paddle.reset();
        }

        if phase == GamePhase::Won && self.unlocked.unlock(level + 1) {
            log::info!("Unlocked level {}", level + 1);
            if let Err(err) = self.collab.store.save(&self.unlocked) {
                log::warn!("Failed to save progress: {}", err);
            }
        }

        let score = self.unlocked.score();
        self.collab.observer.submit_score(score);
        self.collab.observer.on_terminal(phase);
        log::info!("Level {} ended: {:?}, score {}", level, phase, score);
    }

    fn cancel_frame(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.collab.scheduler.cancel_frame(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, ProgressError};
    use crate::persistence::MemoryStore;
    use crate::platform::HeadlessScheduler;
    use crate::sim::Cell;
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Record {
        events: Vec<GameEvent>,
        deltas: Vec<u32>,
        terminals: Vec<GamePhase>,
        scores: Vec<usize>,
        saves: Vec<UnlockedLevels>,
        requests: Vec<(usize, usize)>,
    }

    struct Recorder(Rc<RefCell<Record>>);

    impl SessionObserver for Recorder {
        fn on_event(&mut self, event: &GameEvent) {
            self.0.borrow_mut().events.push(*event);
        }
        fn on_score_delta(&mut self, delta: u32) {
            self.0.borrow_mut().deltas.push(delta);
        }
        fn on_terminal(&mut self, phase: GamePhase) {
            self.0.borrow_mut().terminals.push(phase);
        }
        fn submit_score(&mut self, score: usize) {
            self.0.borrow_mut().scores.push(score);
        }
    }

    struct RecordingStore {
        inner: MemoryStore,
        record: Rc<RefCell<Record>>,
    }

    impl ProgressStore for RecordingStore {
        fn load(&self) -> Result<UnlockedLevels, ProgressError> {
            self.inner.load()
        }
        fn save(&mut self, levels: &UnlockedLevels) -> Result<(), ProgressError> {
            self.record.borrow_mut().saves.push(levels.clone());
            self.inner.save(levels)
        }
    }

    struct Rig {
        session: Session,
        scheduler: HeadlessScheduler,
        record: Rc<RefCell<Record>>,
        now: f64,
    }

    impl Rig {
        fn with(unlocked: UnlockedLevels, source: Box<dyn GridSource>) -> Self {
            let record = Rc::new(RefCell::new(Record::default()));
            let scheduler = HeadlessScheduler::new();
            let collab = Collaborators {
                grid_source: source,
                store: Box::new(RecordingStore {
                    inner: MemoryStore::with_levels(unlocked),
                    record: record.clone(),
                }),
                observer: Box::new(Recorder(record.clone())),
                scheduler: Box::new(scheduler.clone()),
            };
            let session =
                Session::new(Tuning::default(), Field::new(400.0, 600.0), 7, collab).unwrap();
            Self {
                session,
                scheduler,
                record,
                now: 0.0,
            }
        }

        fn new() -> Self {
            Self::with(UnlockedLevels::default(), Box::new(NoGridSource))
        }

        /// Deliver frames until the session stops asking or `max` is reached
        fn run(&mut self, max: usize) -> usize {
            let mut frames = 0;
            while frames < max {
                let Some(handle) = self.scheduler.take_pending() else {
                    break;
                };
                self.now += SIM_DT as f64;
                self.session.frame(handle, self.now);
                frames += 1;
            }
            frames
        }

        /// Replace the level with one brick directly above the opening ball
        fn single_brick_level(&mut self) {
            let state = self.session.state_mut().unwrap();
            state.grid.clear();
            state.grid.set(27, 3, Cell::Brick);
        }
    }

    fn all_levels() -> UnlockedLevels {
        UnlockedLevels::from_ids(0..LEVEL_COUNT)
    }

    #[test]
    fn test_level_selection_rules() {
        let mut rig = Rig::new();
        assert_eq!(rig.session.phase(), GamePhase::Start);
        assert_eq!(rig.session.select_level(1), Err(SessionError::LevelLocked(1)));
        assert_eq!(
            rig.session.select_level(LEVEL_COUNT),
            Err(SessionError::UnknownLevel(LEVEL_COUNT))
        );
        assert_eq!(rig.session.select_level(0), Ok(()));
    }

    #[test]
    fn test_start_schedules_exactly_one_frame() {
        let mut rig = Rig::new();
        rig.session.start().unwrap();
        assert_eq!(rig.session.phase(), GamePhase::Playing);
        assert_eq!(rig.session.points(), 0);
        assert_eq!(rig.session.state().unwrap().balls.len(), 1);
        assert_eq!(rig.scheduler.requested(), 1);
        assert!(matches!(
            rig.session.start(),
            Err(SessionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_stale_frame_is_ignored() {
        let mut rig = Rig::new();
        rig.session.start().unwrap();
        let events = rig.session.frame(FrameHandle(999), 1.0);
        assert!(events.is_empty());
        assert_eq!(rig.session.state().unwrap().time_ticks, 0);
        assert!(rig.session.pending_frame().is_some());
    }

    #[test]
    fn test_frame_runs_bounded_substeps() {
        let mut rig = Rig::new();
        rig.session.start().unwrap();
        let first = rig.scheduler.take_pending().unwrap();
        rig.session.frame(first, 0.0);
        assert_eq!(rig.session.state().unwrap().time_ticks, 1);

        // A long stall catches up by at most MAX_SUBSTEPS ticks
        let second = rig.scheduler.take_pending().unwrap();
        rig.session.frame(second, 10.0);
        assert_eq!(
            rig.session.state().unwrap().time_ticks,
            1 + MAX_SUBSTEPS as u64
        );
    }

    #[test]
    fn test_win_unlocks_next_level_once() {
        let mut rig = Rig::new();
        for _ in 0..2 {
            if rig.session.phase() == GamePhase::Won {
                rig.session.retry().unwrap();
            } else {
                rig.session.start().unwrap();
            }
            rig.single_brick_level();
            rig.run(1000);
            assert_eq!(rig.session.phase(), GamePhase::Won);
            assert_eq!(rig.session.points(), POINTS_PER_BRICK as u64);
            assert!(rig.scheduler.pending().is_none());
        }

        let record = rig.record.borrow();
        assert_eq!(record.saves.len(), 1, "second win must not re-save");
        assert!(record.saves[0].contains(1));
        assert_eq!(record.scores, vec![2, 2]);
        assert_eq!(record.terminals, vec![GamePhase::Won, GamePhase::Won]);
        assert_eq!(record.deltas, vec![10, 10]);
        assert!(rig.session.unlocked().contains(1));
    }

    #[test]
    fn test_gameover_reports_score_and_stops() {
        let mut rig = Rig::new();
        rig.session.start().unwrap();
        {
            let state = rig.session.state_mut().unwrap();
            state.balls.set(0, Vec2::new(380.0, 590.0), Vec2::new(0.0, 5.0));
        }
        let frames = rig.run(100);
        assert!(frames < 10);
        assert_eq!(rig.session.phase(), GamePhase::GameOver);
        assert!(rig.scheduler.pending().is_none());

        let record = rig.record.borrow();
        assert_eq!(record.scores, vec![1]);
        assert_eq!(record.terminals, vec![GamePhase::GameOver]);
        assert!(record.events.contains(&GameEvent::BallLost));
        assert!(record.saves.is_empty());
    }

    #[test]
    fn test_next_level_only_after_win() {
        let mut rig = Rig::new();
        rig.session.start().unwrap();
        assert!(matches!(
            rig.session.next_level(),
            Err(SessionError::InvalidTransition { .. })
        ));
        rig.single_brick_level();
        rig.run(1000);
        rig.session.next_level().unwrap();
        assert_eq!(rig.session.selected_level(), 1);
        assert_eq!(rig.session.state().unwrap().level, 1);
        assert_eq!(rig.session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_reset_and_stop() {
        let mut rig = Rig::new();
        rig.session.start().unwrap();
        assert!(rig.session.reset().is_err());

        rig.session
            .state_mut()
            .unwrap()
            .paddle
            .grant_width_boost(60.0, 8.0);
        rig.session.stop();
        assert_eq!(rig.session.phase(), GamePhase::Start);
        assert_eq!(rig.scheduler.cancelled(), 1);
        assert!(rig.scheduler.pending().is_none());
        assert_eq!(rig.session.points(), 0);
    }

    #[test]
    fn test_procedural_request_uses_six_plus_one() {
        let record = Rc::new(RefCell::new(Record::default()));
        let requests = record.clone();
        let source = move |columns: usize, rows: usize| -> Result<Vec<Vec<u8>>, FetchError> {
            requests.borrow_mut().requests.push((columns, rows));
            let mut grid = vec![vec![0u8; columns]; rows];
            grid[3][27] = 1;
            grid[5][0] = 2;
            Ok(grid)
        };
        let mut rig = Rig::with(all_levels(), Box::new(source));
        rig.session.select_level(PROCEDURAL_LEVEL).unwrap();
        rig.session.start().unwrap();

        let (columns, rows) = record.borrow().requests[0];
        assert_eq!((columns, rows), (55, 25));
        assert_eq!((columns - 1) % 6, 0);
        assert_eq!((rows - 1) % 6, 0);

        let state = rig.session.state().unwrap();
        assert_eq!(state.grid.remaining(), 1);
        assert_eq!(state.grid.get(0, 5), Cell::Wall);

        // The lone brick sits above the opening ball
        rig.run(1000);
        assert_eq!(rig.session.phase(), GamePhase::Won);
    }

    #[test]
    fn test_procedural_fallback_on_bad_data() {
        let short = |columns: usize, _rows: usize| -> Result<Vec<Vec<u8>>, FetchError> {
            Ok(vec![vec![1u8; columns]; 2])
        };
        let mut rig = Rig::with(all_levels(), Box::new(short));
        rig.session.select_level(PROCEDURAL_LEVEL).unwrap();
        rig.session.start().unwrap();
        let state = rig.session.state().unwrap();
        assert_eq!(state.grid.remaining(), state.grid.columns() * 3);

        let mut rig = Rig::with(all_levels(), Box::new(NoGridSource));
        rig.session.select_level(PROCEDURAL_LEVEL).unwrap();
        rig.session.start().unwrap();
        assert_eq!(rig.session.phase(), GamePhase::Playing);
        assert!(rig.session.state().unwrap().grid.remaining() > 0);
    }

    #[test]
    fn test_resize_is_debounced_and_keeps_positions() {
        let mut rig = Rig::new();
        rig.session.start().unwrap();
        rig.run(2);
        let layout = *rig.session.state().unwrap().layout();

        rig.session.resize(Field::new(500.0, 600.0), rig.now);
        rig.run(1);
        assert_eq!(rig.session.state().unwrap().field.width, 400.0);

        rig.run(10);
        let state = rig.session.state().unwrap();
        assert_eq!(state.field.width, 500.0);
        assert_eq!(*state.layout(), layout);
        assert_eq!(rig.session.field(), Field::new(500.0, 600.0));
    }

    #[test]
    fn test_idle_resize_waits_for_window() {
        let mut rig = Rig::new();
        rig.session.resize(Field::new(500.0, 700.0), 1.0);
        rig.session.poll_resize(1.0 + RESIZE_DEBOUNCE / 2.0);
        assert_eq!(rig.session.field(), Field::new(400.0, 600.0));
        rig.session.poll_resize(1.0 + RESIZE_DEBOUNCE * 2.0);
        assert_eq!(rig.session.field(), Field::new(500.0, 700.0));
    }

    #[test]
    fn test_pointer_steers_paddle() {
        let mut rig = Rig::new();
        rig.session.start().unwrap();
        rig.session.set_pointer(100.0);
        rig.run(1);
        let paddle = rig.session.state().unwrap().paddle.rect(600.0);
        assert!((paddle.center_x() - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_tuning_is_rejected() {
        let collab = Collaborators {
            grid_source: Box::new(NoGridSource),
            store: Box::new(MemoryStore::new()),
            observer: Box::new(NullObserver),
            scheduler: Box::new(HeadlessScheduler::new()),
        };
        let tuning = Tuning {
            ball_speed: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            Session::new(tuning, Field::new(400.0, 600.0), 1, collab),
            Err(SessionError::Config(_))
        ));
    }

    #[test]
    fn test_zero_brick_pitch_fails_before_play() {
        let json = r#"{"brick_target_size": 2.0, "brick_padding": -2.0}"#;
        assert!(matches!(Tuning::from_json(json), Err(ConfigError::OutOfRange { .. })));

        // Same values assembled directly never reach grid allocation either
        let tuning = Tuning {
            brick_target_size: 2.0,
            brick_padding: -2.0,
            ..Default::default()
        };
        let collab = Collaborators {
            grid_source: Box::new(NoGridSource),
            store: Box::new(MemoryStore::new()),
            observer: Box::new(NullObserver),
            scheduler: Box::new(HeadlessScheduler::new()),
        };
        assert!(matches!(
            Session::new(tuning, Field::new(400.0, 600.0), 1, collab),
            Err(SessionError::Config(_))
        ));
    }

    #[test]
    fn test_tiny_field_fails_fast() {
        let mut rig = Rig::new();
        rig.session.resize(Field::new(10.0, 600.0), 0.0);
        assert!(matches!(rig.session.start(), Err(SessionError::Grid(_))));
        assert_eq!(rig.session.phase(), GamePhase::Start);
        assert!(rig.scheduler.pending().is_none());
    }
}
