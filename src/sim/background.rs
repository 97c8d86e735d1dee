//! Endlessly scrolling backdrop

use std::time::{Duration, Instant};

use glam::IVec2;

use super::animator::Animator;
use super::entity::Rect;
use super::frames::FrameSet;
use crate::settings::ScreenSettings;

#[derive(Debug, Clone)]
pub struct Background {
    x: i32,
    animator: Animator,
    screen: ScreenSettings,
}

impl Background {
    pub fn new(frames: FrameSet, screen: ScreenSettings, now: Instant) -> Self {
        Self {
            x: 0,
            animator: Animator::with_delay(frames, Duration::ZERO, now),
            screen,
        }
    }

    pub fn update(&mut self, now: Instant) {
        self.x += self.screen.scroll_speed;
        if self.x < -self.screen.width {
            self.x = 0;
        }
        self.animator.advance(now);
    }

    pub fn reset(&mut self) {
        self.x = 0;
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    /// Screen-sized placements covering the view: the image at x and, once it
    /// has scrolled left, a second copy right behind it
    pub fn placements(&self) -> Vec<Rect> {
        let size = IVec2::new(self.screen.width, self.screen.height);
        let mut rects = vec![Rect::from_pos_size(IVec2::new(self.x, 0), size)];
        if self.x < 0 {
            rects.push(Rect::from_pos_size(
                IVec2::new(self.x + self.screen.width, 0),
                size,
            ));
        }
        rects
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::frames::SpriteSheet;

    fn background(screen: ScreenSettings) -> Background {
        let frames = FrameSet::slice(&SpriteSheet::filled(96, 54, 0), 1, 1).unwrap();
        Background::new(frames, screen, Instant::now())
    }

    #[test]
    fn test_wraps_after_full_width() {
        let screen = ScreenSettings {
            width: 20,
            height: 10,
            scroll_speed: -5,
        };
        let mut bg = background(screen);
        let now = Instant::now();
        for _ in 0..4 {
            bg.update(now);
        }
        assert_eq!(bg.x(), -20);
        bg.update(now);
        assert_eq!(bg.x(), 0);
    }

    #[test]
    fn test_second_copy_while_scrolled() {
        let mut bg = background(ScreenSettings::default());
        assert_eq!(bg.placements().len(), 1);
        bg.update(Instant::now());
        let rects = bg.placements();
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].left, -5);
        assert_eq!(rects[1].left, 1915);
        assert_eq!(rects[1].right, 3835);
    }
}
