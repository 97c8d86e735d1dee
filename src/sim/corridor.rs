//! Procedural corridor walls
//!
//! Each wall is a sliding window of fixed-width segments ordered by x. New
//! segment heights follow a bounded random walk inside a min/max envelope that
//! widens with the score.

use std::fmt;
use std::time::{Duration, Instant};

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animator::Animator;
use super::collision::first_hit_in_ordered;
use super::entity::{Body, Collidable, Rect};
use super::frames::FrameSet;
use crate::error::Result;
use crate::settings::{CorridorSettings, ScreenSettings};

/// Which wall a segment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Upper,
    Lower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    Grow,
    Shrink,
}

/// Allowed wall heights for newly generated segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub min_height: i32,
    pub max_height: i32,
}

impl Envelope {
    /// Base heights grown by `score / progress_denom`, capped at H/8 and H/4
    pub fn for_score(settings: &CorridorSettings, screen_height: i32, score: u32) -> Self {
        let growth = (score / settings.progress_denom.max(1)).min(i32::MAX as u32) as i32;
        Self {
            min_height: settings
                .base_min_height
                .saturating_add(growth)
                .min(screen_height / 8),
            max_height: settings
                .base_max_height
                .saturating_add(growth)
                .min(screen_height / 4),
        }
    }
}

/// One column of wall terrain
#[derive(Debug, Clone)]
pub struct BoundarySegment {
    body: Body,
    animator: Animator,
}

impl BoundarySegment {
    fn new(frames: FrameSet, pos: IVec2, width: i32, height: i32, now: Instant) -> Result<Self> {
        Ok(Self {
            body: Body::new(pos, IVec2::new(width, height))?,
            animator: Animator::with_delay(frames, Duration::ZERO, now),
        })
    }

    /// Wall thickness measured from its screen edge
    pub fn height(&self) -> i32 {
        self.body.height()
    }

    /// Top-left corner
    pub fn position(&self) -> IVec2 {
        self.body.pos
    }

    /// Current frame for drawing
    pub fn animator(&self) -> &Animator {
        &self.animator
    }
}

impl Collidable for BoundarySegment {
    fn body(&self) -> &Body {
        &self.body
    }
}

impl fmt::Display for BoundarySegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.body.fmt(f)
    }
}

#[derive(Debug, Clone)]
struct Wall {
    edge: Edge,
    segments: Vec<BoundarySegment>,
    walk: Walk,
    /// No walked segment yet since the last seed
    fresh: bool,
}

impl Wall {
    fn new(edge: Edge) -> Self {
        Self {
            edge,
            segments: Vec::new(),
            walk: Walk::Grow,
            fresh: true,
        }
    }

    fn next_height(&mut self, envelope: &Envelope) -> i32 {
        let Some(last) = self.segments.last() else {
            return envelope.min_height;
        };
        let height = last.height();
        if height >= envelope.max_height {
            self.walk = Walk::Shrink;
        } else if height <= envelope.min_height {
            self.walk = Walk::Grow;
        }
        match self.walk {
            Walk::Grow => height + 1,
            Walk::Shrink => (height - 1).max(1),
        }
    }

    fn push(
        &mut self,
        frames: &FrameSet,
        x: i32,
        width: i32,
        height: i32,
        screen_height: i32,
        now: Instant,
    ) -> Result<()> {
        let y = match self.edge {
            Edge::Upper => 0,
            Edge::Lower => screen_height - height,
        };
        let segment = BoundarySegment::new(frames.clone(), IVec2::new(x, y), width, height, now)?;
        self.segments.push(segment);
        Ok(())
    }

    fn trailing_edge(&self) -> Option<i32> {
        self.segments.last().map(|s| s.body.right())
    }

    fn scroll(&mut self, dx: i32, now: Instant) -> usize {
        for segment in &mut self.segments {
            segment.body.pos.x += dx;
            segment.animator.advance(now);
        }
        let expired = self
            .segments
            .iter()
            .take_while(|s| s.body.right() <= 0)
            .count();
        self.segments.drain(..expired);
        expired
    }
}

/// Upper and lower walls plus the state that drives their generation
#[derive(Debug)]
pub struct Corridor {
    upper: Wall,
    lower: Wall,
    frames: FrameSet,
    settings: CorridorSettings,
    screen: ScreenSettings,
    envelope: Envelope,
    warmup: i32,
    rng: Pcg32,
}

impl Corridor {
    /// Build and seed both walls with the full warm-up stretch
    pub fn new(
        frames: FrameSet,
        settings: CorridorSettings,
        screen: ScreenSettings,
        rng: Pcg32,
        now: Instant,
    ) -> Result<Self> {
        let mut corridor = Self {
            upper: Wall::new(Edge::Upper),
            lower: Wall::new(Edge::Lower),
            frames,
            settings,
            screen,
            envelope: Envelope::for_score(&settings, screen.height, 0),
            warmup: settings.warmup_start,
            rng,
        };
        corridor.seed(now)?;
        Ok(corridor)
    }

    /// Clear and reseed for a new round with a shorter warm-up stretch
    pub fn new_game(&mut self, now: Instant) -> Result<()> {
        self.warmup = (self.warmup - self.settings.warmup_ratchet).max(0);
        self.seed(now)
    }

    fn seed(&mut self, now: Instant) -> Result<()> {
        self.envelope = Envelope::for_score(&self.settings, self.screen.height, 0);
        for wall in [&mut self.upper, &mut self.lower] {
            wall.segments.clear();
            wall.walk = Walk::Grow;
            wall.fresh = true;
        }
        self.fill(-self.settings.segment_width, self.warmup, now)?;
        log::debug!(
            "Corridor seeded: warmup={}px segments={}",
            self.warmup,
            self.upper.segments.len()
        );
        Ok(())
    }

    /// Append segments until both walls reach one segment past the screen.
    /// `start_x` is used only when a wall is empty. Segments starting left of
    /// `flat_until` get the minimum height.
    fn fill(&mut self, start_x: i32, flat_until: i32, now: Instant) -> Result<()> {
        let width = self.settings.segment_width;
        let limit = self.screen.width + width;
        let envelope = self.envelope;
        for wall in [&mut self.upper, &mut self.lower] {
            loop {
                let x = wall.trailing_edge().unwrap_or(start_x);
                if x >= limit {
                    break;
                }
                let height = if x < flat_until {
                    envelope.min_height
                } else if wall.fresh {
                    // The walk starts somewhere random past the warm-up stretch
                    wall.fresh = false;
                    wall.walk = if self.rng.random_bool(0.5) {
                        Walk::Grow
                    } else {
                        Walk::Shrink
                    };
                    self.rng
                        .random_range(envelope.min_height..=envelope.max_height)
                } else {
                    wall.next_height(&envelope)
                };
                wall.push(&self.frames, x, width, height, self.screen.height, now)?;
            }
        }
        Ok(())
    }

    /// Scroll, evict expired segments and extend both walls
    pub fn update(&mut self, score: u32, now: Instant) -> Result<()> {
        self.envelope = Envelope::for_score(&self.settings, self.screen.height, score);
        let dx = self.screen.scroll_speed;
        let evicted = self.upper.scroll(dx, now) + self.lower.scroll(dx, now);
        if evicted > 0 {
            log::trace!("Evicted {} segment(s)", evicted);
        }
        self.fill(-self.settings.segment_width, i32::MIN, now)
    }

    /// The first wall segment overlapping `target`
    pub fn first_hit(&self, target: &Rect) -> Option<(Edge, usize)> {
        [&self.upper, &self.lower].into_iter().find_map(|wall| {
            first_hit_in_ordered(target, &wall.segments).map(|i| (wall.edge, i))
        })
    }

    /// Vertical margin rocks bounce off
    pub fn margin(&self) -> i32 {
        self.envelope.min_height
    }

    /// Height envelope for the current score
    pub fn envelope(&self) -> Envelope {
        self.envelope
    }

    /// Width of the flat stretch at the start of a round
    pub fn warmup(&self) -> i32 {
        self.warmup
    }

    /// One wall's segments, ordered by x
    pub fn segments(&self, edge: Edge) -> &[BoundarySegment] {
        match edge {
            Edge::Upper => &self.upper.segments,
            Edge::Lower => &self.lower.segments,
        }
    }

    /// Segments across both walls
    pub fn segment_count(&self) -> usize {
        self.upper.segments.len() + self.lower.segments.len()
    }
}

impl fmt::Display for Corridor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "upper={} - lower={} - minHeight={} - maxHeight={}",
            self.upper.segments.len(),
            self.lower.segments.len(),
            self.envelope.min_height,
            self.envelope.max_height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::frames::SpriteSheet;
    use rand::SeedableRng;

    fn corridor(seed: u64) -> Corridor {
        corridor_with(seed, CorridorSettings::default())
    }

    fn corridor_with(seed: u64, settings: CorridorSettings) -> Corridor {
        let frames = FrameSet::slice(&SpriteSheet::filled(20, 20, 0), 1, 1).unwrap();
        Corridor::new(
            frames,
            settings,
            ScreenSettings::default(),
            Pcg32::seed_from_u64(seed),
            Instant::now(),
        )
        .unwrap()
    }

    fn assert_covered(c: &Corridor) {
        for edge in [Edge::Upper, Edge::Lower] {
            let segs = c.segments(edge);
            assert!(segs[0].position().x <= 0);
            assert!(segs[segs.len() - 1].body.right() >= 1920);
            for pair in segs.windows(2) {
                assert_eq!(pair[0].body.right(), pair[1].position().x);
            }
        }
    }

    #[test]
    fn test_envelope_grows_and_caps() {
        let s = CorridorSettings::default();
        assert_eq!(
            Envelope::for_score(&s, 1080, 0),
            Envelope {
                min_height: 5,
                max_height: 30
            }
        );
        assert_eq!(
            Envelope::for_score(&s, 1080, 400),
            Envelope {
                min_height: 25,
                max_height: 50
            }
        );
        assert_eq!(
            Envelope::for_score(&s, 1080, 1_000_000),
            Envelope {
                min_height: 135,
                max_height: 270
            }
        );
    }

    #[test]
    fn test_seeded_walls_cover_screen() {
        let c = corridor(1);
        assert_covered(&c);
        assert_eq!(c.segments(Edge::Upper)[0].position().x, -20);
    }

    #[test]
    fn test_warmup_stretch_is_flat() {
        let c = corridor(2);
        for seg in c.segments(Edge::Upper) {
            if seg.position().x < 600 {
                assert_eq!(seg.height(), 5);
            }
        }
    }

    #[test]
    fn test_lower_wall_sits_on_floor() {
        let c = corridor(3);
        for seg in c.segments(Edge::Lower) {
            assert_eq!(seg.position().y + seg.height(), 1080);
        }
        for seg in c.segments(Edge::Upper) {
            assert_eq!(seg.position().y, 0);
        }
    }

    #[test]
    fn test_no_gap_over_many_ticks() {
        let t0 = Instant::now();
        let mut c = corridor(4);
        for tick in 0..5000u32 {
            c.update(tick / 3, t0 + Duration::from_millis(tick as u64 * 33))
                .unwrap();
            assert_covered(&c);
        }
    }

    #[test]
    fn test_walk_stays_inside_envelope() {
        let t0 = Instant::now();
        let mut c = corridor(5);
        // Scroll the seeded window away first
        for _ in 0..500 {
            c.update(0, t0).unwrap();
        }
        for _ in 0..2000 {
            c.update(0, t0).unwrap();
            for edge in [Edge::Upper, Edge::Lower] {
                for pair in c.segments(edge).windows(2) {
                    let (a, b) = (pair[0].height(), pair[1].height());
                    assert!((a - b).abs() <= 1);
                    assert!((5..=30).contains(&b), "height {}", b);
                }
            }
        }
    }

    #[test]
    fn test_long_warmup_only_flattens_the_seed() {
        let t0 = Instant::now();
        let mut c = corridor_with(
            9,
            CorridorSettings {
                warmup_start: 100_000,
                ..CorridorSettings::default()
            },
        );
        assert!(c.segments(Edge::Upper).iter().all(|s| s.height() == 5));

        let mut heights = std::collections::BTreeSet::new();
        for _ in 0..2000 {
            c.update(0, t0).unwrap();
            heights.extend(c.segments(Edge::Upper).iter().map(|s| s.height()));
        }
        assert!(heights.len() > 1, "walls stayed flat: {:?}", heights);
        assert!(heights.iter().all(|h| (5..=30).contains(h)));
    }

    #[test]
    fn test_seeded_heights_inside_envelope() {
        for seed in 0..20 {
            let c = corridor(seed);
            for seg in c.segments(Edge::Upper).iter().chain(c.segments(Edge::Lower)) {
                assert!((5..=30).contains(&seg.height()));
            }
        }
    }

    #[test]
    fn test_ratchet_shrinks_warmup_to_zero() {
        let t0 = Instant::now();
        let mut c = corridor(6);
        let mut last = c.warmup();
        assert_eq!(last, 600);
        for _ in 0..10 {
            c.new_game(t0).unwrap();
            assert!(c.warmup() <= last);
            last = c.warmup();
            assert_covered(&c);
        }
        assert_eq!(c.warmup(), 0);
    }

    #[test]
    fn test_new_game_resets_envelope() {
        let t0 = Instant::now();
        let mut c = corridor(7);
        c.update(2000, t0).unwrap();
        assert_eq!(c.envelope().min_height, 105);
        c.new_game(t0).unwrap();
        assert_eq!(c.envelope().min_height, 5);
        assert_eq!(c.margin(), 5);
    }

    #[test]
    fn test_first_hit_detects_walls() {
        let c = corridor(8);
        let top = Rect::new(100, 0, 164, 25);
        assert_eq!(c.first_hit(&top).map(|(e, _)| e), Some(Edge::Upper));

        let bottom = Rect::new(100, 1060, 164, 1085);
        assert_eq!(c.first_hit(&bottom).map(|(e, _)| e), Some(Edge::Lower));

        let middle = Rect::new(100, 540, 164, 565);
        assert_eq!(c.first_hit(&middle), None);
    }
}
