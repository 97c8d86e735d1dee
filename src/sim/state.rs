//! Round state and the simulation aggregate
//!
//! `Simulation` owns every entity for the process lifetime. Entities inside it
//! are reset or rebuilt per round by `new_game`.

use std::fmt;
use std::time::Instant;

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::background::Background;
use super::corridor::{Corridor, Envelope};
use super::explosion::Explosion;
use super::frames::{Assets, ImageProvider};
use super::obstacles::ObstacleManager;
use super::player::Player;
use crate::error::Result;
use crate::scoreboard::ScoreBoard;
use crate::settings::Settings;

/// Independent generator streams derived from the session seed
pub const CORRIDOR_STREAM: u64 = 1;
pub const OBSTACLE_STREAM: u64 = 2;

/// Lifecycle of one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Initial state, corridor visible, waiting for the first press
    WaitingToStart,
    Playing,
    /// Explosion is playing
    Dying,
    /// Counting down to the automatic new round
    WaitingToRestart,
}

impl RoundPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundPhase::WaitingToStart => "WaitingToStart",
            RoundPhase::Playing => "Playing",
            RoundPhase::Dying => "Dying",
            RoundPhase::WaitingToRestart => "WaitingToRestart",
        }
    }
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    pub fn with_stream(self, stream: u64) -> Self {
        Self { stream, ..self }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}

/// Serializable summary of the running simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub phase: RoundPhase,
    pub score: u32,
    pub best: u32,
    pub last_score: Option<u32>,
    pub distance: u64,
    pub rounds_played: u32,
    pub envelope: Envelope,
    pub warmup: i32,
    pub rocks: usize,
    pub segments: usize,
    pub player: (i32, i32),
    pub time_ticks: u64,
    pub seed: u64,
}

/// Everything that makes up one game session
#[derive(Debug)]
pub struct Simulation {
    pub(crate) settings: Settings,
    pub(crate) rng_state: RngState,
    pub(crate) phase: RoundPhase,
    pub(crate) player: Player,
    pub(crate) obstacles: ObstacleManager,
    pub(crate) corridor: Corridor,
    pub(crate) explosion: Explosion,
    pub(crate) background: Background,
    pub(crate) scoreboard: ScoreBoard,
    pub(crate) died_at: Option<Instant>,
    pub(crate) time_ticks: u64,
}

impl Simulation {
    /// Load all sprites through `provider` and build the session.
    /// A missing image resource fails here.
    pub fn new(settings: Settings, provider: &dyn ImageProvider, now: Instant) -> Result<Self> {
        settings.validate()?;
        let assets = Assets::load(provider, &settings.sprites)?;
        Self::with_assets(settings, assets, now)
    }

    pub fn with_assets(settings: Settings, assets: Assets, now: Instant) -> Result<Self> {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let rng_state = RngState::new(seed);
        let screen = settings.screen;

        let player = Player::new(assets.player, settings.player, &screen, now)?;
        let obstacles = ObstacleManager::new(
            assets.rock,
            settings.rocks,
            screen,
            rng_state.with_stream(OBSTACLE_STREAM).to_rng(),
        );
        let corridor = Corridor::new(
            assets.ground,
            settings.corridor,
            screen,
            rng_state.with_stream(CORRIDOR_STREAM).to_rng(),
            now,
        )?;
        let explosion = Explosion::new(
            assets.explosion,
            settings.round.explosion_delay_ms,
            screen,
            now,
        )?;
        let background = Background::new(assets.background, screen, now);

        log::info!(
            "Simulation ready: seed={} screen={}x{} difficulty={}",
            seed,
            screen.width,
            screen.height,
            settings.difficulty.as_str()
        );

        Ok(Self {
            settings,
            rng_state,
            phase: RoundPhase::WaitingToStart,
            player,
            obstacles,
            corridor,
            explosion,
            background,
            scoreboard: ScoreBoard::new(),
            died_at: None,
            time_ticks: 0,
        })
    }

    /// Reset the player, reseed the walls and empty the rock pool.
    /// The phase is left to the caller.
    pub fn new_game(&mut self, now: Instant) -> Result<()> {
        self.player.reset(now);
        self.corridor.new_game(now)?;
        self.obstacles.clear();
        self.explosion.reset(now);
        self.background.reset();
        self.died_at = None;
        log::info!(
            "New game: round {} warmup={}px",
            self.scoreboard.rounds_played() + 1,
            self.corridor.warmup()
        );
        Ok(())
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn obstacles(&self) -> &ObstacleManager {
        &self.obstacles
    }

    pub fn corridor(&self) -> &Corridor {
        &self.corridor
    }

    pub fn explosion(&self) -> &Explosion {
        &self.explosion
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn scoreboard(&self) -> &ScoreBoard {
        &self.scoreboard
    }

    pub fn score(&self) -> u32 {
        self.player.score()
    }

    pub fn best_score(&self) -> u32 {
        self.scoreboard.best()
    }

    /// Distance shown on the HUD
    pub fn distance(&self) -> u64 {
        u64::from(self.settings.round.distance_multiplier) * u64::from(self.player.score())
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let pos = self.player.position();
        RoundSnapshot {
            phase: self.phase,
            score: self.player.score(),
            best: self.scoreboard.best(),
            last_score: self.scoreboard.last(),
            distance: self.distance(),
            rounds_played: self.scoreboard.rounds_played(),
            envelope: self.corridor.envelope(),
            warmup: self.corridor.warmup(),
            rocks: self.obstacles.len(),
            segments: self.corridor.segment_count(),
            player: (pos.x, pos.y),
            time_ticks: self.time_ticks,
            seed: self.rng_state.seed,
        }
    }
}

impl fmt::Display for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "segments={} - rocks={} - phase={} - player=[{}]",
            self.corridor.segment_count(),
            self.obstacles.len(),
            self.phase,
            self.player
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use crate::sim::frames::SheetLibrary;
    use crate::sim::frames::tests::test_library;

    fn seeded(seed: u64) -> Settings {
        Settings {
            seed: Some(seed),
            ..Settings::default()
        }
    }

    #[test]
    fn test_new_simulation_waits_with_corridor() {
        let sim = Simulation::new(seeded(1), &test_library(), Instant::now()).unwrap();
        assert_eq!(sim.phase(), RoundPhase::WaitingToStart);
        assert_eq!(sim.score(), 0);
        assert!(!sim.player().alive());
        assert!(sim.corridor().segment_count() > 0);
        assert!(sim.obstacles().is_empty());
        assert_eq!(sim.seed(), 1);
    }

    #[test]
    fn test_missing_resource_fails_startup() {
        let library = SheetLibrary::new();
        let result = Simulation::new(seeded(1), &library, Instant::now());
        assert!(matches!(result, Err(SimError::ResourceNotFound(_))));
    }

    #[test]
    fn test_invalid_settings_fail_startup() {
        let mut settings = seeded(1);
        settings.corridor.segment_width = 0;
        let result = Simulation::new(settings, &test_library(), Instant::now());
        assert!(matches!(result, Err(SimError::InvalidSettings(_))));
    }

    #[test]
    fn test_same_seed_same_corridor() {
        let now = Instant::now();
        let a = Simulation::new(seeded(9), &test_library(), now).unwrap();
        let b = Simulation::new(seeded(9), &test_library(), now).unwrap();
        let heights = |s: &Simulation| -> Vec<i32> {
            s.corridor()
                .segments(crate::sim::Edge::Lower)
                .iter()
                .map(|seg| seg.height())
                .collect()
        };
        assert_eq!(heights(&a), heights(&b));
    }

    #[test]
    fn test_rng_streams_differ() {
        use rand::RngCore;
        let state = RngState::new(5);
        let mut a = state.with_stream(CORRIDOR_STREAM).to_rng();
        let mut b = state.with_stream(OBSTACLE_STREAM).to_rng();
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn test_snapshot_serializes() {
        let sim = Simulation::new(seeded(3), &test_library(), Instant::now()).unwrap();
        let snap = sim.snapshot();
        assert_eq!(snap.phase, RoundPhase::WaitingToStart);
        assert_eq!(snap.player, (100, 540));
        let json = serde_json::to_string(&snap).unwrap();
        let back: RoundSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn test_display_summary() {
        let sim = Simulation::new(seeded(3), &test_library(), Instant::now()).unwrap();
        let text = sim.to_string();
        assert!(text.starts_with("segments="));
        assert!(text.contains("phase=WaitingToStart"));
    }
}
