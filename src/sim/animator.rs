//! Wall-clock sprite animation
//!
//! Every visible entity owns one `Animator`. The frame index advances when more
//! than `delay` has passed since the previous step, independent of tick rate.

use std::fmt;
use std::time::{Duration, Instant};

use super::frames::{Frame, FrameSet};
use crate::error::{Result, SimError};

/// Which way `advance` steps through the frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayDirection {
    #[default]
    Forward,
    Backward,
}

#[derive(Debug, Clone)]
pub struct Animator {
    frames: FrameSet,
    frame_index: usize,
    delay: Duration,
    last_advance: Instant,
    played_once: bool,
    direction: PlayDirection,
}

impl Animator {
    /// Negative delays are rejected
    pub fn new(frames: FrameSet, delay_ms: i64, now: Instant) -> Result<Self> {
        let delay = checked_delay(delay_ms)?;
        Ok(Self::with_delay(frames, delay, now))
    }

    /// Build with an already validated delay
    pub fn with_delay(frames: FrameSet, delay: Duration, now: Instant) -> Self {
        Self {
            frames,
            frame_index: 0,
            delay,
            last_advance: now,
            played_once: false,
            direction: PlayDirection::Forward,
        }
    }

    /// Step one frame if the delay has elapsed. Returns true when the index changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_advance) <= self.delay {
            return false;
        }
        let last = self.frames.len() - 1;
        let wrapped = match self.direction {
            PlayDirection::Forward if self.frame_index >= last => {
                self.frame_index = 0;
                true
            }
            PlayDirection::Forward => {
                self.frame_index += 1;
                false
            }
            PlayDirection::Backward if self.frame_index == 0 => {
                self.frame_index = last;
                true
            }
            PlayDirection::Backward => {
                self.frame_index -= 1;
                false
            }
        };
        self.played_once |= wrapped;
        self.last_advance = now;
        true
    }

    pub fn reset(&mut self, now: Instant) {
        self.frame_index = 0;
        self.played_once = false;
        self.last_advance = now;
    }

    pub fn set_frame_index(&mut self, index: usize) -> Result<()> {
        if index >= self.frames.len() {
            return Err(SimError::invalid(format!(
                "frame index {} out of range 0..{}",
                index,
                self.frames.len()
            )));
        }
        self.frame_index = index;
        Ok(())
    }

    pub fn set_delay_ms(&mut self, delay_ms: i64) -> Result<()> {
        self.delay = checked_delay(delay_ms)?;
        Ok(())
    }

    pub fn set_direction(&mut self, direction: PlayDirection) {
        self.direction = direction;
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn played_once(&self) -> bool {
        self.played_once
    }

    pub fn current_frame(&self) -> &Frame {
        &self.frames[self.frame_index]
    }

    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    /// Frame size as (width, height) in pixels
    pub fn frame_size(&self) -> (i32, i32) {
        (
            self.frames.frame_width() as i32,
            self.frames.frame_height() as i32,
        )
    }
}

impl fmt::Display for Animator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "numberOfFrames={} - frameIndex={} - delay={}ms",
            self.frames.len(),
            self.frame_index,
            self.delay.as_millis()
        )
    }
}

fn checked_delay(delay_ms: i64) -> Result<Duration> {
    u64::try_from(delay_ms)
        .map(Duration::from_millis)
        .map_err(|_| SimError::invalid(format!("animation delay cannot be negative: {}", delay_ms)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::frames::SpriteSheet;
    use proptest::prelude::*;

    fn frames(n: u32) -> FrameSet {
        FrameSet::slice(&SpriteSheet::filled(n, 1, 0), 1, n).unwrap()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_advance_waits_for_delay() {
        let t0 = Instant::now();
        let mut anim = Animator::new(frames(3), 10, t0).unwrap();

        assert!(!anim.advance(t0 + ms(5)));
        // Exactly the delay is not enough
        assert!(!anim.advance(t0 + ms(10)));
        assert!(anim.advance(t0 + ms(11)));
        assert_eq!(anim.frame_index(), 1);
    }

    #[test]
    fn test_advance_idempotent_within_window() {
        let t0 = Instant::now();
        let mut anim = Animator::new(frames(4), 100, t0).unwrap();
        assert!(anim.advance(t0 + ms(101)));
        assert_eq!(anim.frame_index(), 1);
        assert!(!anim.advance(t0 + ms(150)));
        assert!(!anim.advance(t0 + ms(201)));
        assert_eq!(anim.frame_index(), 1);
    }

    #[test]
    fn test_full_cycle_latches_played_once() {
        let t0 = Instant::now();
        let mut anim = Animator::new(frames(5), 0, t0).unwrap();
        for i in 1..=5u64 {
            assert!(!anim.played_once());
            assert!(anim.advance(t0 + ms(i)));
        }
        assert!(anim.played_once());
        assert_eq!(anim.frame_index(), 0);

        // Stays latched through further cycles
        anim.advance(t0 + ms(10));
        assert!(anim.played_once());
    }

    #[test]
    fn test_backward_wraps_to_last() {
        let t0 = Instant::now();
        let mut anim = Animator::new(frames(3), 0, t0).unwrap();
        anim.set_direction(PlayDirection::Backward);
        anim.advance(t0 + ms(1));
        assert_eq!(anim.frame_index(), 2);
        assert!(anim.played_once());
        anim.advance(t0 + ms(2));
        assert_eq!(anim.frame_index(), 1);
    }

    #[test]
    fn test_single_frame_wraps_every_step() {
        let t0 = Instant::now();
        let mut anim = Animator::new(frames(1), 0, t0).unwrap();
        anim.advance(t0 + ms(1));
        assert_eq!(anim.frame_index(), 0);
        assert!(anim.played_once());
    }

    #[test]
    fn test_reset() {
        let t0 = Instant::now();
        let mut anim = Animator::new(frames(2), 0, t0).unwrap();
        anim.advance(t0 + ms(1));
        anim.advance(t0 + ms(2));
        assert!(anim.played_once());

        anim.reset(t0 + ms(3));
        assert_eq!(anim.frame_index(), 0);
        assert!(!anim.played_once());
        assert!(!anim.advance(t0 + ms(3)));
    }

    #[test]
    fn test_set_delay_rejects_negative() {
        let t0 = Instant::now();
        let mut anim = Animator::new(frames(2), 10, t0).unwrap();
        assert!(matches!(anim.set_delay_ms(-1), Err(SimError::InvalidArgument(_))));
        assert_eq!(anim.delay(), ms(10));
        anim.set_delay_ms(0).unwrap();
        assert_eq!(anim.delay(), Duration::ZERO);
    }

    proptest! {
        #[test]
        fn prop_negative_delay_rejected(d in i64::MIN..0) {
            let result = Animator::new(frames(2), d, Instant::now());
            prop_assert!(matches!(result, Err(SimError::InvalidArgument(_))));
        }

        #[test]
        fn prop_frame_index_bounds(n in 1u32..32, index in 0usize..64) {
            let mut anim = Animator::new(frames(n), 0, Instant::now()).unwrap();
            let result = anim.set_frame_index(index);
            if index < n as usize {
                prop_assert!(result.is_ok());
                prop_assert_eq!(anim.frame_index(), index);
            } else {
                prop_assert!(matches!(result, Err(SimError::InvalidArgument(_))));
                prop_assert_eq!(anim.frame_index(), 0);
            }
        }

        #[test]
        fn prop_first_and_last_index_always_valid(n in 1u32..64) {
            let mut anim = Animator::new(frames(n), 0, Instant::now()).unwrap();
            prop_assert!(anim.set_frame_index(n as usize - 1).is_ok());
            prop_assert!(anim.set_frame_index(0).is_ok());
        }
    }
}
