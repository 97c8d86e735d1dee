//! Corridor Run - a side-scrolling obstacle-avoidance game core
//!
//! Core modules:
//! - `sim`: Simulation (player, rocks, corridor, explosion, round state machine)
//! - `renderer`: Render target abstraction and draw-list decisions
//! - `platform`: Fixed-rate game loop and input signal plumbing
//! - `settings`: Data-driven game balance and screen configuration
//! - `scoreboard`: In-memory best score tracking

pub mod error;
pub mod platform;
pub mod renderer;
pub mod scoreboard;
pub mod settings;
pub mod sim;

pub use error::{Result, SimError};
pub use scoreboard::ScoreBoard;
pub use settings::{DifficultyPreset, Settings};

/// Reference defaults. `Settings::default()` is built from these.
pub mod consts {
    /// Logical surface size; the renderer scales this onto the physical surface
    pub const SCREEN_WIDTH: i32 = 1920;
    pub const SCREEN_HEIGHT: i32 = 1080;
    /// Horizontal scroll per tick shared by background and corridor
    pub const SCROLL_SPEED: i32 = -5;

    /// Fixed simulation rate
    pub const TICKS_PER_SECOND: u32 = 30;
    /// Lower bound on the end-of-tick sleep so the loop never spins
    pub const MIN_SLEEP_MS: u64 = 2;
    /// How many times shutdown polls the loop thread before abandoning it
    pub const SHUTDOWN_ATTEMPTS: u32 = 1000;

    /// Player defaults
    pub const PLAYER_START_X: i32 = 100;
    pub const PLAYER_ACCELERATION: i32 = 2;
    pub const PLAYER_MAX_VERTICAL_SPEED: i32 = 20;
    pub const SCORE_INTERVAL_MS: u64 = 100;

    /// Rock defaults
    pub const ROCK_BASE_SPEED: i32 = 7;
    pub const ROCK_MAX_SPEED: i32 = 35;
    pub const ROCK_SPEED_SCORE_DIVISOR: u32 = 30;
    pub const ROCK_MAX_VERTICAL_SPEED: i32 = 20;

    /// Corridor defaults
    pub const SEGMENT_WIDTH: i32 = 20;
    pub const BASE_MAX_HEIGHT: i32 = 30;
    pub const BASE_MIN_HEIGHT: i32 = 5;
    pub const PROGRESS_DENOM: u32 = 20;

    /// Round defaults
    pub const RESTART_DELAY_MS: u64 = 10_000;
    pub const DISTANCE_MULTIPLIER: u32 = 3;
}

/// Millisecond helper used throughout the settings sections
#[inline]
pub fn millis(ms: u64) -> std::time::Duration {
    std::time::Duration::from_millis(ms)
}
