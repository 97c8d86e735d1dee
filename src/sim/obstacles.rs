//! Rocks and their spawn policy
//!
//! Rocks enter at the right edge with a randomized trajectory, bounce between
//! the corridor margins and leave on the left. The manager caps the live pool
//! by score and spaces spawns by a minimum interval.

use std::fmt;
use std::time::{Duration, Instant};

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::animator::Animator;
use super::collision::first_hit;
use super::entity::{Body, Collidable, Rect};
use super::frames::FrameSet;
use crate::error::{Result, SimError};
use crate::millis;
use crate::settings::{RockSettings, ScreenSettings};

/// What happened to a rock during one update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RockStep {
    Moved,
    /// Left the screen and was reseeded at the right edge
    Recycled,
    /// Left the screen; the owner removes it
    Exited,
}

#[derive(Debug, Clone)]
pub struct Rock {
    body: Body,
    animator: Animator,
    settings: RockSettings,
    screen: ScreenSettings,
    score_weight: u32,
    speed: i32,
    spawned_at: Instant,
    out: bool,
}

impl Rock {
    /// New rock at the right edge; speed scales with `score_weight`
    pub fn spawn(
        frames: FrameSet,
        settings: RockSettings,
        screen: ScreenSettings,
        score_weight: u32,
        rng: &mut Pcg32,
        now: Instant,
    ) -> Result<Self> {
        let animator = Animator::with_delay(frames, millis(settings.animation_delay_ms), now);
        let (w, h) = animator.frame_size();
        if h > screen.height {
            return Err(SimError::invalid(format!(
                "rock height {} exceeds screen height {}",
                h, screen.height
            )));
        }
        let mut rock = Self {
            body: Body::new(IVec2::ZERO, IVec2::new(w, h))?,
            animator,
            settings,
            screen,
            score_weight,
            speed: settings.base_speed,
            spawned_at: now,
            out: false,
        };
        rock.hurl(rng);
        Ok(rock)
    }

    /// Fresh trajectory from the right edge
    fn hurl(&mut self, rng: &mut Pcg32) {
        let s = &self.settings;
        let max_y = self.screen.height - self.body.height();
        let bonus = rng.random_range(0..=self.score_weight / s.speed_score_divisor.max(1));
        self.speed = (s.base_speed + bonus.min(i32::MAX as u32) as i32).min(s.max_speed);

        self.body.pos = IVec2::new(self.screen.width, rng.random_range(0..=max_y));
        self.body.vel = IVec2::new(
            -self.speed,
            rng.random_range(-s.max_vertical_speed..=s.max_vertical_speed),
        );
        self.out = false;
    }

    /// Move one tick. `margin` is the corridor wall height the rock bounces off.
    pub fn update(&mut self, margin: i32, rng: &mut Pcg32, now: Instant) -> Result<RockStep> {
        let max_margin = (self.screen.height - self.body.height()) / 2;
        if !(0..=max_margin).contains(&margin) {
            return Err(SimError::invalid(format!(
                "corridor margin {} outside 0..={}",
                margin, max_margin
            )));
        }

        let next_x = self.body.pos.x + self.body.vel.x;
        let step = if next_x + self.body.width() <= 0 {
            if self.settings.auto_recycle {
                self.hurl(rng);
                RockStep::Recycled
            } else {
                self.out = true;
                RockStep::Exited
            }
        } else {
            self.body.pos.x = next_x;
            self.bounce(margin);
            RockStep::Moved
        };

        self.animator.advance(now);
        Ok(step)
    }

    fn bounce(&mut self, margin: i32) {
        let top = margin;
        let bottom = self.screen.height - margin - self.body.height();
        let next_y = self.body.pos.y + self.body.vel.y;
        // Reflect only when heading out of the band
        if next_y > bottom {
            self.body.pos.y = bottom;
            if self.body.vel.y > 0 {
                self.body.vel.y = -self.body.vel.y;
            }
        } else if next_y < top {
            self.body.pos.y = top;
            if self.body.vel.y < 0 {
                self.body.vel.y = -self.body.vel.y;
            }
        } else {
            self.body.pos.y = next_y;
        }
    }

    /// Leftward speed in pixels per tick
    pub fn speed(&self) -> i32 {
        self.speed
    }

    /// Signed vertical velocity, positive downwards
    pub fn vertical_speed(&self) -> i32 {
        self.body.vel.y
    }

    /// Top-left corner
    pub fn position(&self) -> IVec2 {
        self.body.pos
    }

    /// Left the screen and waiting to be removed
    pub fn is_out(&self) -> bool {
        self.out
    }

    /// Time since spawn; recycling keeps the original spawn time
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.spawned_at)
    }

    /// Current frame for drawing
    pub fn animator(&self) -> &Animator {
        &self.animator
    }
}

impl Collidable for Rock {
    fn body(&self) -> &Body {
        &self.body
    }
}

impl fmt::Display for Rock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scoreWeight={} - speed={} - {}",
            self.score_weight, self.speed, self.body
        )
    }
}

/// Bounded pool of live rocks
#[derive(Debug)]
pub struct ObstacleManager {
    rocks: Vec<Rock>,
    frames: FrameSet,
    settings: RockSettings,
    screen: ScreenSettings,
    rng: Pcg32,
}

impl ObstacleManager {
    /// Empty pool drawing trajectories from `rng`
    pub fn new(frames: FrameSet, settings: RockSettings, screen: ScreenSettings, rng: Pcg32) -> Self {
        Self {
            rocks: Vec::new(),
            frames,
            settings,
            screen,
            rng,
        }
    }

    /// Below the score-scaled cap and the newest rock is old enough
    pub fn can_spawn(&self, score: u32, now: Instant) -> bool {
        if self.rocks.len() >= self.settings.spawn_cap.for_score(score) {
            return false;
        }
        match self.rocks.last() {
            None => true,
            Some(newest) => newest.age(now) > self.settings.spawn_interval(),
        }
    }

    /// Spawn when the policy allows. Returns whether a rock was added.
    pub fn try_spawn(&mut self, score: u32, now: Instant) -> Result<bool> {
        if !self.can_spawn(score, now) {
            return Ok(false);
        }
        let weight = self.settings.score_weight.resolve(score);
        self.spawn(weight, now)?;
        Ok(true)
    }

    /// Unconditionally add a rock with the given speed weight
    pub fn spawn(&mut self, score_weight: u32, now: Instant) -> Result<&Rock> {
        let rock = Rock::spawn(
            self.frames.clone(),
            self.settings,
            self.screen,
            score_weight,
            &mut self.rng,
            now,
        )?;
        log::debug!("Rock spawned: {}", rock);
        self.rocks.push(rock);
        Ok(&self.rocks[self.rocks.len() - 1])
    }

    /// Move every rock and drop the ones that left the screen
    pub fn update(&mut self, margin: i32, now: Instant) -> Result<()> {
        for rock in &mut self.rocks {
            if rock.update(margin, &mut self.rng, now)? == RockStep::Recycled {
                log::debug!("Rock recycled: {}", rock);
            }
        }
        let before = self.rocks.len();
        self.rocks.retain(|r| !r.is_out());
        if self.rocks.len() != before {
            log::debug!("{} rock(s) left the screen", before - self.rocks.len());
        }
        Ok(())
    }

    /// Index of the first rock overlapping `target`
    pub fn first_hit(&self, target: &Rect) -> Option<usize> {
        first_hit(target, &self.rocks)
    }

    /// Take a rock out of the pool, e.g. after it hit the player
    pub fn remove(&mut self, index: usize) -> Rock {
        self.rocks.remove(index)
    }

    /// Drop every rock for a new round
    pub fn clear(&mut self) {
        self.rocks.clear();
    }

    /// Live rocks, oldest first
    pub fn rocks(&self) -> &[Rock] {
        &self.rocks
    }

    pub fn len(&self) -> usize {
        self.rocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rocks.is_empty()
    }

    /// Pin a rock in place
    #[cfg(test)]
    pub(crate) fn park(&mut self, index: usize, pos: IVec2) {
        let body = &mut self.rocks[index].body;
        body.pos = pos;
        body.vel = IVec2::ZERO;
    }
}
