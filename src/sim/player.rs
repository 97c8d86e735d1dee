//! The player character
//!
//! Vertical-only motion driven by a binary ascend latch, plus a wall-clock
//! scoring clock. Whether the player died is decided by the round controller.

use std::fmt;
use std::time::{Duration, Instant};

use glam::IVec2;

use super::animator::Animator;
use super::entity::{Body, Collidable};
use super::frames::FrameSet;
use crate::error::{Result, SimError};
use crate::millis;
use crate::settings::{PlayerSettings, ScreenSettings};

#[derive(Debug, Clone)]
pub struct Player {
    body: Body,
    animator: Animator,
    settings: PlayerSettings,
    screen_height: i32,
    score: u32,
    alive: bool,
    ascending: bool,
    score_clock: Instant,
}

impl Player {
    /// Player at the start position, not yet alive
    pub fn new(
        frames: FrameSet,
        settings: PlayerSettings,
        screen: &ScreenSettings,
        now: Instant,
    ) -> Result<Self> {
        let animator = Animator::with_delay(frames, millis(settings.animation_delay_ms), now);
        let (w, h) = animator.frame_size();
        if h > screen.height {
            return Err(SimError::invalid(format!(
                "player height {} exceeds screen height {}",
                h, screen.height
            )));
        }
        let body = Body::new(Self::start_pos(&settings, screen.height), IVec2::new(w, h))?;

        Ok(Self {
            body,
            animator,
            settings,
            screen_height: screen.height,
            score: 0,
            alive: false,
            ascending: false,
            score_clock: now,
        })
    }

    fn start_pos(settings: &PlayerSettings, screen_height: i32) -> IVec2 {
        IVec2::new(settings.start_x, screen_height / 2)
    }

    /// One tick of scoring, vertical kinematics and animation
    pub fn update(&mut self, now: Instant) {
        if self.alive {
            self.run_score_clock(now);
        }

        let step = if self.ascending {
            -self.settings.acceleration
        } else {
            self.settings.acceleration
        };
        let max = self.settings.max_vertical_speed;
        self.body.vel.y = (self.body.vel.y + step).clamp(-max, max);
        self.body.integrate();
        self.body.pos.y = self.body.pos.y.clamp(0, self.max_y());

        self.animator.advance(now);
    }

    /// Award one point per elapsed interval, carrying the remainder
    fn run_score_clock(&mut self, now: Instant) {
        let interval = millis(self.settings.score_interval_ms);
        if interval.is_zero() {
            return;
        }
        let elapsed = now.saturating_duration_since(self.score_clock);
        let points = (elapsed.as_nanos() / interval.as_nanos()) as u32;
        if points > 0 {
            self.score = self.score.saturating_add(points);
            self.score_clock += interval * points;
        }
    }

    fn max_y(&self) -> i32 {
        self.screen_height - self.body.height()
    }

    /// Begin a round: the score clock starts now
    pub fn start(&mut self, now: Instant) {
        self.alive = true;
        self.score_clock = now;
    }

    /// Stop playing; vertical velocity is dropped, position is kept
    pub fn kill(&mut self) {
        self.alive = false;
        self.body.vel.y = 0;
    }

    /// Back to mid-screen with a zero score, ready for `start`
    pub fn reset(&mut self, now: Instant) {
        self.body.pos = Self::start_pos(&self.settings, self.screen_height);
        self.body.vel = IVec2::ZERO;
        self.score = 0;
        self.ascending = false;
        self.score_clock = now;
        self.animator.reset(now);
    }

    /// Latch the ascend input for the following ticks
    pub fn set_ascending(&mut self, ascending: bool) {
        self.ascending = ascending;
    }

    /// Whether the ascend latch is set
    pub fn ascending(&self) -> bool {
        self.ascending
    }

    /// True between `start` and `kill`
    pub fn alive(&self) -> bool {
        self.alive
    }

    /// Points for the current round
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Top-left corner
    pub fn position(&self) -> IVec2 {
        self.body.pos
    }

    /// Signed vertical velocity, positive downwards
    pub fn vertical_velocity(&self) -> i32 {
        self.body.vel.y
    }

    /// Current frame for drawing
    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    /// Wall-clock time until the next score point
    pub fn until_next_point(&self, now: Instant) -> Duration {
        millis(self.settings.score_interval_ms)
            .saturating_sub(now.saturating_duration_since(self.score_clock))
    }
}

impl Collidable for Player {
    fn body(&self) -> &Body {
        &self.body
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "score={} - alive={} - {}",
            self.score, self.alive, self.body
        )
    }
}
