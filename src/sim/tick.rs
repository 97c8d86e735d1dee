//! One simulation tick
//!
//! Drives the round state machine: waiting to start, playing, the death
//! explosion and the countdown to the next round.

use std::time::Instant;

use glam::IVec2;

use super::entity::Collidable;
use super::state::{RoundPhase, Simulation};
use crate::error::Result;

/// Input sampled at the top of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Ascend latch (pressed)
    pub ascend: bool,
    /// A press arrived since the previous tick
    pub start: bool,
}

/// Advance the simulation by one tick
pub fn tick(sim: &mut Simulation, input: &TickInput, now: Instant) -> Result<()> {
    sim.time_ticks += 1;
    sim.player.set_ascending(input.ascend);

    match sim.phase {
        RoundPhase::WaitingToStart => {
            if input.start {
                sim.player.start(now);
                sim.phase = RoundPhase::Playing;
                log::info!("Round started");
            }
        }
        RoundPhase::Playing => play(sim, now)?,
        RoundPhase::Dying => {
            if sim.explosion.update(now) {
                sim.phase = RoundPhase::WaitingToRestart;
                log::debug!("Explosion finished, waiting to restart");
            }
        }
        RoundPhase::WaitingToRestart => {
            let delay_elapsed = sim
                .died_at
                .is_none_or(|t| now.saturating_duration_since(t) >= sim.settings.round.restart_delay());
            let skip = sim.settings.round.restart_on_input && input.start;
            if delay_elapsed || skip {
                sim.new_game(now)?;
                sim.player.start(now);
                sim.phase = RoundPhase::Playing;
            }
        }
    }
    Ok(())
}

fn play(sim: &mut Simulation, now: Instant) -> Result<()> {
    sim.background.update(now);
    sim.player.update(now);

    let score = sim.player.score();
    sim.corridor.update(score, now)?;
    sim.obstacles.try_spawn(score, now)?;
    sim.obstacles.update(sim.corridor.margin(), now)?;

    let bounds = sim.player.bounds();
    if let Some((edge, _)) = sim.corridor.first_hit(&bounds) {
        log::debug!("Player hit the {:?} wall", edge);
        die(sim, now)?;
    } else if let Some(index) = sim.obstacles.first_hit(&bounds) {
        let rock = sim.obstacles.remove(index);
        log::debug!("Player hit rock: {}", rock);
        die(sim, now)?;
    }
    Ok(())
}

/// End the current round: record the score and start the explosion
pub(crate) fn die(sim: &mut Simulation, now: Instant) -> Result<()> {
    let score = sim.player.score();
    let new_best = sim.scoreboard.record_round(score);
    sim.player.kill();

    let screen = sim.settings.screen;
    let bounds = sim.player.bounds();
    let center = IVec2::new(
        ((bounds.left + bounds.right) / 2).clamp(0, screen.width - 1),
        ((bounds.top + bounds.bottom) / 2).clamp(0, screen.height - 1),
    );
    sim.explosion.trigger(center.x, center.y, now)?;
    sim.died_at = Some(now);
    sim.phase = RoundPhase::Dying;

    log::info!(
        "Player died: score={} best={}{}",
        score,
        sim.scoreboard.best(),
        if new_best { " (new best)" } else { "" }
    );
    Ok(())
}

impl Simulation {
    /// Advance one tick; see [`tick`]
    pub fn update(&mut self, input: &TickInput, now: Instant) -> Result<()> {
        tick(self, input, now)
    }
}
