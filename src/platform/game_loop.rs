//! Fixed-rate game loop
//!
//! One thread runs update and render under a single lock on the simulation,
//! then sleeps for whatever is left of the tick budget (never less than the
//! minimum sleep). Failures are logged and the loop moves on to the next tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{Result, SimError};
use crate::renderer::{Acquired, RenderTarget};
use crate::settings::LoopSettings;
use crate::sim::{Simulation, TickInput};

use super::input::InputSignal;

/// Cooperative stop flag, checked once per tick
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Diagnostics only; nothing in the game reads these
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub ticks: u64,
    /// Rolling average over the last `ticks_per_second` ticks
    pub average_fps: f32,
    pub frames_rendered: u64,
    /// Ticks where the render target could not be acquired
    pub skipped_renders: u64,
    pub draw_failures: u64,
    pub update_errors: u64,
}

#[derive(Debug)]
struct FpsCounter {
    window: u32,
    count: u32,
    window_start: Instant,
}

impl FpsCounter {
    fn new(window: u32, now: Instant) -> Self {
        Self {
            window: window.max(1),
            count: 0,
            window_start: now,
        }
    }

    /// Count one tick; yields the average once per window
    fn tick(&mut self, now: Instant) -> Option<f32> {
        self.count += 1;
        if self.count < self.window {
            return None;
        }
        let elapsed = now.saturating_duration_since(self.window_start).as_secs_f32();
        let fps = if elapsed > 0.0 {
            self.count as f32 / elapsed
        } else {
            0.0
        };
        self.count = 0;
        self.window_start = now;
        Some(fps)
    }
}

pub struct GameLoop;

impl GameLoop {
    /// Start the loop thread. The target comes back from `LoopHandle::shutdown`.
    pub fn spawn<T>(
        sim: Arc<Mutex<Simulation>>,
        target: T,
        input: InputSignal,
        settings: LoopSettings,
    ) -> Result<LoopHandle<T>>
    where
        T: RenderTarget + Send + 'static,
    {
        let token = CancellationToken::new();
        let stats = Arc::new(Mutex::new(FrameStats::default()));

        let thread_token = token.clone();
        let thread_stats = Arc::clone(&stats);
        let handle = thread::Builder::new()
            .name("game-loop".into())
            .spawn(move || run(sim, target, input, settings, thread_token, thread_stats))?;

        log::info!(
            "Game loop started at {} ticks/s",
            settings.ticks_per_second
        );

        Ok(LoopHandle {
            token,
            handle: Some(handle),
            stats,
            settings,
        })
    }
}

fn run<T: RenderTarget>(
    sim: Arc<Mutex<Simulation>>,
    mut target: T,
    input: InputSignal,
    settings: LoopSettings,
    token: CancellationToken,
    shared: Arc<Mutex<FrameStats>>,
) -> T {
    let budget = settings.tick_duration();
    let min_sleep = settings.min_sleep();
    let mut stats = FrameStats::default();
    let mut fps = FpsCounter::new(settings.ticks_per_second, Instant::now());

    while !token.is_cancelled() {
        let start = Instant::now();
        run_tick(&sim, &mut target, &input.sample(), start, &mut stats);

        stats.ticks += 1;
        if let Some(avg) = fps.tick(Instant::now()) {
            stats.average_fps = avg;
            log::debug!("Average FPS: {:.1}", avg);
        }
        *shared.lock().unwrap_or_else(PoisonError::into_inner) = stats;

        let elapsed = start.elapsed();
        thread::sleep(min_sleep.max(budget.saturating_sub(elapsed)));
    }

    log::debug!("Game loop stopped after {} ticks", stats.ticks);
    target
}

/// Update and render one tick. The target is released when the guard drops,
/// also on the error paths.
fn run_tick<T: RenderTarget + ?Sized>(
    sim: &Mutex<Simulation>,
    target: &mut T,
    input: &TickInput,
    now: Instant,
    stats: &mut FrameStats,
) {
    let mut surface = match Acquired::acquire(target) {
        Ok(guard) => Some(guard),
        Err(e) => {
            log::warn!("Skipping render: {}", e);
            stats.skipped_renders += 1;
            None
        }
    };

    let mut sim = sim.lock().unwrap_or_else(|poisoned| {
        log::error!("Simulation lock poisoned, recovering");
        poisoned.into_inner()
    });

    if let Err(e) = sim.update(input, now) {
        log::error!("Update failed: {}", e);
        stats.update_errors += 1;
    }

    if let Some(surface) = surface.as_mut() {
        let report = sim.render(&mut **surface);
        stats.frames_rendered += 1;
        stats.draw_failures += report.failed as u64;
    }
}

/// Owner side of a running loop
pub struct LoopHandle<T> {
    token: CancellationToken,
    handle: Option<JoinHandle<T>>,
    stats: Arc<Mutex<FrameStats>>,
    settings: LoopSettings,
}

impl<T> LoopHandle<T> {
    pub fn stats(&self) -> FrameStats {
        *self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel and wait a bounded number of polls for the thread to exit.
    /// On timeout the thread is abandoned and `ShutdownTimeout` returned.
    pub fn shutdown(mut self) -> Result<T> {
        self.token.cancel();
        let Some(handle) = self.handle.take() else {
            return Err(SimError::LoopPanicked);
        };

        let attempts = self.settings.shutdown_attempts;
        let poll = Duration::from_millis(self.settings.shutdown_poll_ms);
        let mut waited = 0;
        while !handle.is_finished() {
            if waited >= attempts {
                log::error!("Game loop did not stop after {} attempts, abandoning it", attempts);
                return Err(SimError::ShutdownTimeout { attempts });
            }
            thread::sleep(poll);
            waited += 1;
        }

        let target = handle.join().map_err(|_| SimError::LoopPanicked)?;
        log::info!("Game loop shut down");
        Ok(target)
    }
}

impl<T> Drop for LoopHandle<T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
