//! Draw list of one frame
//!
//! Order: background, corridor walls, rocks, player, explosion, HUD. A failed
//! draw is logged and skipped so the rest of the frame still goes out.

use crate::error::Result;
use crate::sim::{Collidable, Edge, RoundPhase, Simulation};

use super::{RenderTarget, TextAlign, TextStyle};

const HUD_MARGIN: i32 = 40;
const HUD_SIZE: u32 = 48;
const INSTRUCTION_SIZE: u32 = 64;
const INSTRUCTION_SPACING: i32 = 80;

pub const INSTRUCTIONS: [&str; 3] = [
    "TAP TO START ON SCREEN",
    "KEEP PRESSED TO GO UP",
    "RELEASE TO GO DOWN",
];

/// One line of HUD text in logical coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudText {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub style: TextStyle,
}

/// Outcome of drawing one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub drawn: usize,
    pub failed: usize,
}

impl FrameReport {
    fn note(&mut self, what: &str, result: Result<()>) {
        match result {
            Ok(()) => self.drawn += 1,
            Err(e) => {
                self.failed += 1;
                log::warn!("Failed to draw {}: {}", what, e);
            }
        }
    }
}

/// HUD text for the current state
pub fn hud_lines(sim: &Simulation) -> Vec<HudText> {
    let screen = sim.settings().screen;
    let bottom = screen.height - HUD_MARGIN;
    let mut lines = vec![
        HudText {
            text: format!("DISTANCE: {}", sim.distance()),
            x: HUD_MARGIN,
            y: bottom,
            style: TextStyle::new(HUD_SIZE, TextAlign::Left),
        },
        HudText {
            text: format!("BEST: {}", sim.best_score()),
            x: screen.width - HUD_MARGIN,
            y: bottom,
            style: TextStyle::new(HUD_SIZE, TextAlign::Right),
        },
    ];

    if sim.phase() == RoundPhase::WaitingToStart {
        let top = screen.height / 2 - INSTRUCTION_SPACING;
        lines.extend(INSTRUCTIONS.iter().zip(0..).map(|(text, i)| HudText {
            text: text.to_string(),
            x: screen.width / 2,
            y: top + i * INSTRUCTION_SPACING,
            style: TextStyle::new(INSTRUCTION_SIZE, TextAlign::Center),
        }));
    }
    lines
}

impl Simulation {
    /// Draw the current state onto an acquired target
    pub fn render<T: RenderTarget + ?Sized>(&self, target: &mut T) -> FrameReport {
        let size = target.physical_size();
        let screen = self.settings.screen;
        target.scale(
            size.width as f32 / screen.width as f32,
            size.height as f32 / screen.height as f32,
        );

        let mut report = FrameReport::default();

        let backdrop = self.background.animator().current_frame();
        for dest in self.background.placements() {
            report.note("background", target.draw_image(backdrop, dest));
        }

        for edge in [Edge::Upper, Edge::Lower] {
            for segment in self.corridor.segments(edge) {
                report.note(
                    "boundary segment",
                    target.draw_image(segment.animator().current_frame(), segment.bounds()),
                );
            }
        }

        for rock in self.obstacles.rocks() {
            report.note(
                "rock",
                target.draw_image(rock.animator().current_frame(), rock.bounds()),
            );
        }

        if matches!(self.phase, RoundPhase::WaitingToStart | RoundPhase::Playing) {
            report.note(
                "player",
                target.draw_image(self.player.animator().current_frame(), self.player.bounds()),
            );
        }

        if self.explosion.active() {
            report.note(
                "explosion",
                target.draw_image(
                    self.explosion.animator().current_frame(),
                    self.explosion.bounds(),
                ),
            );
        }

        for line in hud_lines(self) {
            report.note("hud", target.draw_text(&line.text, line.x, line.y, line.style));
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Acquired, DrawCommand, PhysicalSize, RecordingTarget};
    use crate::settings::Settings;
    use crate::sim::TickInput;
    use crate::sim::frames::tests::test_library;
    use std::time::{Duration, Instant};

    fn sim(now: Instant) -> Simulation {
        let settings = Settings {
            seed: Some(77),
            ..Settings::default()
        };
        Simulation::new(settings, &test_library(), now).unwrap()
    }

    fn images(commands: &[DrawCommand]) -> Vec<(u32, u32)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image { width, height, .. } => Some((*width, *height)),
                _ => None,
            })
            .collect()
    }

    fn texts(commands: &[DrawCommand]) -> Vec<String> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_waiting_frame_draw_order() {
        let s = sim(Instant::now());
        let mut target = RecordingTarget::new(PhysicalSize::new(960, 540));
        let report = {
            let mut guard = Acquired::acquire(&mut target).unwrap();
            s.render(&mut *guard)
        };
        assert_eq!(report.failed, 0);

        let frame = target.last_frame();
        assert_eq!(frame[0], DrawCommand::Scale { sx: 0.5, sy: 0.5 });

        let imgs = images(frame);
        let segments = s.corridor().segment_count();
        // Background, walls, then the player last
        assert_eq!(imgs.len(), 1 + segments + 1);
        assert_eq!(imgs[0], (96, 54));
        assert!(imgs[1..=segments].iter().all(|&size| size == (20, 20)));
        assert_eq!(imgs[imgs.len() - 1], (64, 25));

        assert_eq!(
            texts(frame),
            vec![
                "DISTANCE: 0".to_string(),
                "BEST: 0".to_string(),
                INSTRUCTIONS[0].to_string(),
                INSTRUCTIONS[1].to_string(),
                INSTRUCTIONS[2].to_string(),
            ]
        );
        assert_eq!(report.drawn, imgs.len() + 5);
    }

    #[test]
    fn test_playing_hud_has_no_instructions() {
        let t0 = Instant::now();
        let mut s = sim(t0);
        s.update(&TickInput { ascend: false, start: true }, t0).unwrap();
        s.update(&TickInput::default(), t0 + Duration::from_millis(1000))
            .unwrap();

        let lines = hud_lines(&s);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "DISTANCE: 30");
        assert_eq!(lines[0].y, 1040);
        assert_eq!(lines[1].style.align, TextAlign::Right);
        assert_eq!(lines[1].x, 1880);
    }

    #[test]
    fn test_draw_failures_are_skipped() {
        let s = sim(Instant::now());
        let mut target = RecordingTarget::new(PhysicalSize::new(1920, 1080));
        target.fail_next_draws(3);
        target.acquire().unwrap();
        let report = s.render(&mut target);
        target.release();

        assert_eq!(report.failed, 3);
        assert_eq!(report.drawn, target.last_frame().len() - 1);
        // The player is still drawn after the failures
        let imgs = images(target.last_frame());
        assert_eq!(imgs[imgs.len() - 1], (64, 25));
    }

    #[test]
    fn test_explosion_replaces_player() {
        let t0 = Instant::now();
        let mut s = sim(t0);
        s.update(&TickInput { ascend: false, start: true }, t0).unwrap();
        crate::sim::tick::die(&mut s, t0).unwrap();

        let mut target = RecordingTarget::new(PhysicalSize::new(1920, 1080));
        target.acquire().unwrap();
        s.render(&mut target);
        target.release();

        let imgs = images(target.last_frame());
        assert_eq!(imgs[imgs.len() - 1], (20, 20));
        assert!(!imgs.contains(&(64, 25)));
    }
}
