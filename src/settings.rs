//! Game settings and balance
//!
//! Loaded once from JSON (or defaults) and handed to the simulation by value.
//! Nothing in the simulation reads configuration from global state.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SimError};
use crate::millis;

/// Difficulty presets
///
/// `Classic` reproduces the early tuning of the game (fixed rock cap, shorter
/// spawn interval, constant rock speed weight). `Progressive` scales the rock
/// cap and speed with the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPreset {
    Classic,
    #[default]
    Progressive,
}

impl DifficultyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Classic => "Classic",
            DifficultyPreset::Progressive => "Progressive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(DifficultyPreset::Classic),
            "progressive" | "prog" => Some(DifficultyPreset::Progressive),
            _ => None,
        }
    }

    pub fn spawn_cap(&self) -> SpawnCap {
        match self {
            DifficultyPreset::Classic => SpawnCap::Fixed(5),
            DifficultyPreset::Progressive => SpawnCap::Scaled {
                base: 1,
                score_per_rock: 200,
            },
        }
    }

    pub fn spawn_interval_ms(&self) -> u64 {
        match self {
            DifficultyPreset::Classic => 5000,
            DifficultyPreset::Progressive => 7000,
        }
    }

    pub fn score_weight(&self) -> ScoreWeight {
        match self {
            DifficultyPreset::Classic => ScoreWeight::Fixed(100),
            DifficultyPreset::Progressive => ScoreWeight::Score,
        }
    }
}

/// Maximum number of live rocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnCap {
    Fixed(usize),
    /// `base + score / score_per_rock`
    Scaled { base: usize, score_per_rock: u32 },
}

impl SpawnCap {
    pub fn for_score(&self, score: u32) -> usize {
        match *self {
            SpawnCap::Fixed(n) => n,
            SpawnCap::Scaled {
                base,
                score_per_rock,
            } => base + (score / score_per_rock.max(1)) as usize,
        }
    }
}

/// Where a new rock's speed weight comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreWeight {
    /// The player's current score
    Score,
    Fixed(u32),
}

impl ScoreWeight {
    pub fn resolve(&self, score: u32) -> u32 {
        match *self {
            ScoreWeight::Score => score,
            ScoreWeight::Fixed(w) => w,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSettings {
    /// Logical width in pixels
    pub width: i32,
    /// Logical height in pixels
    pub height: i32,
    /// Horizontal displacement per tick (negative scrolls left)
    pub scroll_speed: i32,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            scroll_speed: SCROLL_SPEED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopSettings {
    pub ticks_per_second: u32,
    pub min_sleep_ms: u64,
    pub shutdown_attempts: u32,
    pub shutdown_poll_ms: u64,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            ticks_per_second: TICKS_PER_SECOND,
            min_sleep_ms: MIN_SLEEP_MS,
            shutdown_attempts: SHUTDOWN_ATTEMPTS,
            shutdown_poll_ms: 1,
        }
    }
}

impl LoopSettings {
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs(1) / self.ticks_per_second.max(1)
    }

    pub fn min_sleep(&self) -> Duration {
        millis(self.min_sleep_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    pub start_x: i32,
    /// Velocity change per tick while ascending or descending
    pub acceleration: i32,
    /// Vertical velocity is clamped to ±this
    pub max_vertical_speed: i32,
    /// One score point per interval of wall-clock time alive
    pub score_interval_ms: u64,
    pub animation_delay_ms: u64,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            start_x: PLAYER_START_X,
            acceleration: PLAYER_ACCELERATION,
            max_vertical_speed: PLAYER_MAX_VERTICAL_SPEED,
            score_interval_ms: SCORE_INTERVAL_MS,
            animation_delay_ms: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RockSettings {
    pub spawn_cap: SpawnCap,
    pub spawn_interval_ms: u64,
    pub base_speed: i32,
    pub max_speed: i32,
    pub speed_score_divisor: u32,
    pub max_vertical_speed: i32,
    /// Rocks leaving the left edge are reseeded on the right instead of removed
    pub auto_recycle: bool,
    pub score_weight: ScoreWeight,
    pub animation_delay_ms: u64,
}

impl Default for RockSettings {
    fn default() -> Self {
        let preset = DifficultyPreset::default();
        Self {
            spawn_cap: preset.spawn_cap(),
            spawn_interval_ms: preset.spawn_interval_ms(),
            base_speed: ROCK_BASE_SPEED,
            max_speed: ROCK_MAX_SPEED,
            speed_score_divisor: ROCK_SPEED_SCORE_DIVISOR,
            max_vertical_speed: ROCK_MAX_VERTICAL_SPEED,
            auto_recycle: false,
            score_weight: preset.score_weight(),
            animation_delay_ms: 100,
        }
    }
}

impl RockSettings {
    pub fn spawn_interval(&self) -> Duration {
        millis(self.spawn_interval_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorridorSettings {
    pub segment_width: i32,
    pub base_max_height: i32,
    pub base_min_height: i32,
    /// Score points per pixel of envelope growth
    pub progress_denom: u32,
    /// Width of the flat warm-up stretch on the first round
    pub warmup_start: i32,
    /// How much the warm-up stretch shrinks each new round
    pub warmup_ratchet: i32,
}

impl Default for CorridorSettings {
    fn default() -> Self {
        Self {
            segment_width: SEGMENT_WIDTH,
            base_max_height: BASE_MAX_HEIGHT,
            base_min_height: BASE_MIN_HEIGHT,
            progress_denom: PROGRESS_DENOM,
            warmup_start: 600,
            warmup_ratchet: 120,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundSettings {
    /// Delay between death and the automatic new round
    pub restart_delay_ms: u64,
    /// A press while waiting to restart starts the new round immediately
    pub restart_on_input: bool,
    pub explosion_delay_ms: u64,
    /// HUD distance = score * multiplier
    pub distance_multiplier: u32,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            restart_delay_ms: RESTART_DELAY_MS,
            restart_on_input: false,
            explosion_delay_ms: 10,
            distance_multiplier: DISTANCE_MULTIPLIER,
        }
    }
}

impl RoundSettings {
    pub fn restart_delay(&self) -> Duration {
        millis(self.restart_delay_ms)
    }
}

/// An image resource and the grid it is cut into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSource {
    pub resource: String,
    pub rows: u32,
    pub columns: u32,
}

impl SpriteSource {
    pub fn new(resource: &str, rows: u32, columns: u32) -> Self {
        Self {
            resource: resource.to_string(),
            rows,
            columns,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteSettings {
    pub player: SpriteSource,
    pub rock: SpriteSource,
    pub explosion: SpriteSource,
    pub ground: SpriteSource,
    pub background: SpriteSource,
}

impl Default for SpriteSettings {
    fn default() -> Self {
        Self {
            player: SpriteSource::new("player_run", 1, 3),
            rock: SpriteSource::new("rock", 3, 1),
            explosion: SpriteSource::new("explosion", 5, 5),
            ground: SpriteSource::new("ground", 1, 1),
            background: SpriteSource::new("background", 1, 1),
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Recorded by `apply_preset`; an explicit `rocks` section in JSON wins
    pub difficulty: DifficultyPreset,
    pub screen: ScreenSettings,
    pub game_loop: LoopSettings,
    pub player: PlayerSettings,
    pub rocks: RockSettings,
    pub corridor: CorridorSettings,
    pub round: RoundSettings,
    pub sprites: SpriteSettings,
    /// Fixed RNG seed; a fresh one is drawn when absent
    pub seed: Option<u64>,
}

impl Settings {
    /// Create settings from a difficulty preset
    pub fn from_preset(preset: DifficultyPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a difficulty preset (updates the rock spawn policy)
    pub fn apply_preset(&mut self, preset: DifficultyPreset) {
        self.difficulty = preset;
        self.rocks.spawn_cap = preset.spawn_cap();
        self.rocks.spawn_interval_ms = preset.spawn_interval_ms();
        self.rocks.score_weight = preset.score_weight();
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, what: &str) -> Result<()> {
            if ok {
                Ok(())
            } else {
                Err(SimError::InvalidSettings(what.to_string()))
            }
        }

        check(
            self.screen.width > 0 && self.screen.height > 0,
            "screen size must be positive",
        )?;
        check(
            self.game_loop.ticks_per_second > 0,
            "ticks_per_second must be positive",
        )?;
        check(self.player.acceleration >= 0, "player acceleration must not be negative")?;
        check(
            self.player.max_vertical_speed >= 0,
            "player max_vertical_speed must not be negative",
        )?;
        check(self.player.score_interval_ms > 0, "score_interval_ms must be positive")?;
        check(
            self.rocks.base_speed > 0 && self.rocks.max_speed >= self.rocks.base_speed,
            "rock speeds must satisfy 0 < base_speed <= max_speed",
        )?;
        check(self.rocks.speed_score_divisor > 0, "speed_score_divisor must be positive")?;
        check(
            self.rocks.max_vertical_speed >= 0,
            "rock max_vertical_speed must not be negative",
        )?;
        check(self.corridor.segment_width > 0, "segment_width must be positive")?;
        check(
            self.corridor.base_min_height > 0
                && self.corridor.base_max_height >= self.corridor.base_min_height,
            "corridor heights must satisfy 0 < base_min_height <= base_max_height",
        )?;
        check(self.corridor.progress_denom > 0, "progress_denom must be positive")?;
        check(
            self.corridor.warmup_start >= 0 && self.corridor.warmup_ratchet >= 0,
            "warm-up values must not be negative",
        )?;
        Ok(())
    }
}
