//! Timed reaction (RGB) game.
//!
//! A target colour is shown inside a reaction window. Clicking the matching
//! square while the window is open scores a point and immediately opens the
//! next window; letting a window lapse silently opens the next one. The
//! game ends when its overall countdown runs out.
//!
//! [`ReactionGame`] is a pure state machine: every call takes the current
//! time in milliseconds, so a recorded click log replays identically.
//! [`ReactionSession`] drives one on the tokio clock and owns its timer task.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use crate::error::GameError;
use crate::model::{Difficulty, GameKind};

/// Tunables for the reaction game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionConfig {
    /// How long each target stays clickable.
    pub reaction_time_ms: u64,
    /// Length of the whole game.
    pub duration_ms: u64,
}

impl ReactionConfig {
    pub const EASY: ReactionConfig = ReactionConfig {
        reaction_time_ms: 2000,
        duration_ms: 60_000,
    };
    pub const MEDIUM: ReactionConfig = ReactionConfig {
        reaction_time_ms: 1500,
        duration_ms: 60_000,
    };
    pub const HARD: ReactionConfig = ReactionConfig {
        reaction_time_ms: 1000,
        duration_ms: 60_000,
    };

    /// Shortest reaction window accepted from a stored puzzle.
    pub const MIN_REACTION_MS: u64 = 100;
    /// Longest game accepted from a stored puzzle (one hour).
    pub const MAX_DURATION_MS: u64 = 3_600_000;

    /// Reject settings that would make a replay open an unbounded number of windows.
    pub fn validate(&self) -> Result<(), GameError> {
        let invalid = |message: String| GameError::InvalidConfig {
            game: GameKind::Reaction,
            message,
        };
        if !(Self::MIN_REACTION_MS..=Self::MAX_DURATION_MS).contains(&self.reaction_time_ms) {
            return Err(invalid(format!(
                "reaction_time_ms must be between {} and {}, got {}",
                Self::MIN_REACTION_MS,
                Self::MAX_DURATION_MS,
                self.reaction_time_ms
            )));
        }
        if self.duration_ms > Self::MAX_DURATION_MS {
            return Err(invalid(format!(
                "duration_ms must be at most {}, got {}",
                Self::MAX_DURATION_MS,
                self.duration_ms
            )));
        }
        Ok(())
    }

    pub fn for_difficulty(difficulty: Difficulty) -> ReactionConfig {
        match difficulty {
            Difficulty::Easy => Self::EASY,
            Difficulty::Medium => Self::MEDIUM,
            Difficulty::Hard => Self::HARD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Green,
    Blue,
}

impl Color {
    pub const ALL: [Color; 3] = [Color::Red, Color::Green, Color::Blue];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// 1-based count of windows opened so far.
    pub number: u32,
    pub target: Color,
    pub opened_at: u64,
    pub closes_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickOutcome {
    /// Matching colour inside an open window.
    Hit,
    /// Wrong colour; the window stays open.
    Miss,
    /// No window open (idle, between games, or ended).
    Ignored,
}

/// A click from a recorded play-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedClick {
    /// Milliseconds since the game started.
    pub at_ms: u64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionSummary {
    /// The score: number of correct clicks.
    pub hits: u32,
    pub wrong_clicks: u32,
    pub windows_opened: u32,
    pub average_reaction_ms: Option<u64>,
}

#[derive(Debug)]
pub struct ReactionGame {
    config: ReactionConfig,
    rng: StdRng,
    phase: Phase,
    started_at: u64,
    window: Option<Window>,
    windows_opened: u32,
    hits: u32,
    wrong_clicks: u32,
    reaction_times: Vec<u64>,
}

impl ReactionGame {
    pub fn new(config: ReactionConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            phase: Phase::Idle,
            started_at: 0,
            window: None,
            windows_opened: 0,
            hits: 0,
            wrong_clicks: 0,
            reaction_times: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn window(&self) -> Option<Window> {
        self.window
    }

    pub fn target(&self) -> Option<Color> {
        self.window.map(|w| w.target)
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    pub fn ends_at(&self) -> u64 {
        self.started_at.saturating_add(self.config.duration_ms)
    }

    /// Milliseconds left on the game countdown.
    pub fn remaining_ms(&self, now: u64) -> u64 {
        match self.phase {
            Phase::Idle => self.config.duration_ms,
            Phase::Running => self.ends_at().saturating_sub(now),
            Phase::Ended => 0,
        }
    }

    /// The next instant at which [`tick`](Self::tick) would change anything.
    pub fn deadline(&self) -> Option<u64> {
        if self.phase != Phase::Running {
            return None;
        }
        let end = self.ends_at();
        Some(self.window.map_or(end, |w| w.closes_at.min(end)))
    }

    pub fn start(&mut self, now: u64) {
        if self.phase != Phase::Idle {
            return;
        }
        self.phase = Phase::Running;
        self.started_at = now;
        self.open_window(now);
        if self.config.duration_ms == 0 {
            self.end();
        }
    }

    /// Advance the clock: end the game once its time is up, otherwise roll
    /// over every window that lapsed without a correct click.
    pub fn tick(&mut self, now: u64) {
        if self.phase != Phase::Running {
            return;
        }
        if now >= self.ends_at() {
            self.end();
            return;
        }
        while let Some(window) = self.window {
            if window.closes_at > now {
                break;
            }
            self.open_window(window.closes_at);
        }
    }

    pub fn click(&mut self, color: Color, now: u64) -> ClickOutcome {
        self.tick(now);
        let Some(window) = self.window else {
            return ClickOutcome::Ignored;
        };
        if color != window.target {
            self.wrong_clicks += 1;
            return ClickOutcome::Miss;
        }
        self.hits += 1;
        self.reaction_times.push(now.saturating_sub(window.opened_at));
        self.open_window(now);
        ClickOutcome::Hit
    }

    /// Stop the game now, closing any open window.
    pub fn end(&mut self) {
        if self.phase == Phase::Ended {
            return;
        }
        self.phase = Phase::Ended;
        self.window = None;
        tracing::debug!(hits = self.hits, windows = self.windows_opened, "reaction game ended");
    }

    pub fn summary(&self) -> ReactionSummary {
        let average_reaction_ms = (!self.reaction_times.is_empty())
            .then(|| self.reaction_times.iter().sum::<u64>() / self.reaction_times.len() as u64);
        ReactionSummary {
            hits: self.hits,
            wrong_clicks: self.wrong_clicks,
            windows_opened: self.windows_opened,
            average_reaction_ms,
        }
    }

    fn open_window(&mut self, at: u64) {
        let target = Color::ALL[self.rng.random_range(0..Color::ALL.len())];
        self.windows_opened += 1;
        self.window = Some(Window {
            number: self.windows_opened,
            target,
            opened_at: at,
            closes_at: at.saturating_add(self.config.reaction_time_ms.max(1)),
        });
    }
}

/// Score a recorded click log against the game a seed produces.
pub fn replay(config: ReactionConfig, seed: u64, clicks: &[RecordedClick]) -> ReactionSummary {
    let mut ordered = clicks.to_vec();
    ordered.sort_by_key(|c| c.at_ms);

    let mut game = ReactionGame::new(config, seed);
    game.start(0);
    for click in ordered {
        game.click(click.color, click.at_ms);
    }
    game.tick(config.duration_ms);
    game.summary()
}

/// What a UI needs to render the game at a given moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionSnapshot {
    pub phase: Phase,
    pub target: Option<Color>,
    pub window_number: Option<u32>,
    pub hits: u32,
    pub remaining_ms: u64,
}

/// A live game on the tokio clock.
///
/// A background task ticks the game at each window or game deadline.
/// Stopping or dropping the session aborts that task.
pub struct ReactionSession {
    id: Uuid,
    game: Arc<Mutex<ReactionGame>>,
    origin: Instant,
    timer: Option<JoinHandle<()>>,
}

impl ReactionSession {
    /// Start a game immediately. Must be called from within a tokio runtime.
    pub fn start(config: ReactionConfig, seed: u64) -> Self {
        let id = Uuid::new_v4();
        let origin = Instant::now();
        let mut game = ReactionGame::new(config, seed);
        game.start(0);
        let game = Arc::new(Mutex::new(game));

        let timer = tokio::spawn(run_timer(Arc::clone(&game), origin));
        tracing::info!(session = %id, ?config, "reaction session started");

        Self {
            id,
            game,
            origin,
            timer: Some(timer),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn click(&self, color: Color) -> ClickOutcome {
        let now = elapsed_ms(self.origin);
        lock(&self.game).click(color, now)
    }

    pub fn snapshot(&self) -> ReactionSnapshot {
        let now = elapsed_ms(self.origin);
        let mut game = lock(&self.game);
        game.tick(now);
        ReactionSnapshot {
            phase: game.phase(),
            target: game.target(),
            window_number: game.window().map(|w| w.number),
            hits: game.hits(),
            remaining_ms: game.remaining_ms(now),
        }
    }

    /// Wait for the countdown to run out.
    pub async fn finished(&mut self) -> ReactionSummary {
        if let Some(timer) = self.timer.take() {
            if let Err(e) = timer.await {
                if !e.is_cancelled() {
                    tracing::error!(session = %self.id, "reaction timer failed: {e}");
                }
            }
        }
        let now = elapsed_ms(self.origin);
        let mut game = lock(&self.game);
        game.tick(now);
        game.summary()
    }

    /// End the game early (reset or teardown) and cancel the timer.
    pub fn stop(&mut self) -> ReactionSummary {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        let now = elapsed_ms(self.origin);
        let mut game = lock(&self.game);
        game.tick(now);
        game.end();
        tracing::info!(session = %self.id, hits = game.hits(), "reaction session stopped");
        game.summary()
    }
}

impl Drop for ReactionSession {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

async fn run_timer(game: Arc<Mutex<ReactionGame>>, origin: Instant) {
    loop {
        let Some(deadline) = lock(&game).deadline() else {
            break;
        };
        tokio::time::sleep_until(origin + Duration::from_millis(deadline)).await;
        lock(&game).tick(elapsed_ms(origin));
    }
}

fn lock(game: &Mutex<ReactionGame>) -> std::sync::MutexGuard<'_, ReactionGame> {
    game.lock().unwrap_or_else(PoisonError::into_inner)
}

fn elapsed_ms(origin: Instant) -> u64 {
    origin.elapsed().as_millis() as u64
}
