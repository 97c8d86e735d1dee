//! One-shot death explosion

use std::fmt;
use std::time::Instant;

use glam::IVec2;

use super::animator::Animator;
use super::entity::{Body, Collidable};
use super::frames::FrameSet;
use crate::error::{Result, SimError};
use crate::millis;
use crate::settings::ScreenSettings;

#[derive(Debug, Clone)]
pub struct Explosion {
    body: Body,
    animator: Animator,
    screen: ScreenSettings,
    active: bool,
    finished: bool,
}

impl Explosion {
    pub fn new(frames: FrameSet, delay_ms: u64, screen: ScreenSettings, now: Instant) -> Result<Self> {
        let animator = Animator::with_delay(frames, millis(delay_ms), now);
        let (w, h) = animator.frame_size();
        Ok(Self {
            body: Body::new(IVec2::ZERO, IVec2::new(w, h))?,
            animator,
            screen,
            active: false,
            finished: false,
        })
    }

    /// Start playing centred on `(x, y)`, which must lie on screen
    pub fn trigger(&mut self, x: i32, y: i32, now: Instant) -> Result<()> {
        if !(0..self.screen.width).contains(&x) || !(0..self.screen.height).contains(&y) {
            return Err(SimError::invalid(format!(
                "explosion at ({}, {}) is outside the {}x{} screen",
                x, y, self.screen.width, self.screen.height
            )));
        }
        self.body.pos = IVec2::new(x, y) - self.body.size() / 2;
        self.animator.reset(now);
        self.active = true;
        self.finished = false;
        Ok(())
    }

    /// Advance the animation; deactivates itself after one full play.
    /// Returns true on the tick it finishes.
    pub fn update(&mut self, now: Instant) -> bool {
        if !self.active {
            return false;
        }
        self.animator.advance(now);
        if self.animator.played_once() {
            self.active = false;
            self.finished = true;
            self.animator.reset(now);
            return true;
        }
        false
    }

    pub fn reset(&mut self, now: Instant) {
        self.active = false;
        self.finished = false;
        self.animator.reset(now);
    }

    pub fn active(&self) -> bool {
        self.active
    }

    /// Played through since the last trigger
    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn position(&self) -> IVec2 {
        self.body.pos
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }
}

impl Collidable for Explosion {
    fn body(&self) -> &Body {
        &self.body
    }
}

impl fmt::Display for Explosion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "active={} - {} - {}", self.active, self.body, self.animator)
    }
}
