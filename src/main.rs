//! Corridor Run headless runner
//!
//! Usage: `corridor-run [--settings settings.json] [--seconds N]`
//!
//! Runs the real game loop against a recording render target for a fixed
//! time, with an autopilot holding the player near mid-screen, then prints a
//! JSON snapshot of the session.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use corridor_run::platform::{CancellationToken, GameLoop, InputSignal};
use corridor_run::renderer::{PhysicalSize, RecordingTarget};
use corridor_run::settings::{SpriteSettings, SpriteSource};
use corridor_run::sim::{SheetLibrary, Simulation, SpriteSheet};
use corridor_run::{Result, Settings};

#[derive(Debug, Parser)]
#[command(name = "corridor-run")]
#[command(about = "Run the corridor game headless with an autopilot and print a session snapshot")]
struct Cli {
    /// Settings JSON; defaults apply when omitted
    #[arg(long)]
    settings: Option<PathBuf>,
    /// How long to run, in seconds
    #[arg(long, default_value_t = 10)]
    seconds: u64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let seconds = cli.seconds;

    log::info!("Corridor Run (headless) starting for {}s", seconds);

    let library = demo_library(&settings.sprites);
    let sim = Simulation::new(settings.clone(), &library, Instant::now())?;
    let sim = Arc::new(Mutex::new(sim));

    let input = InputSignal::new();
    let target = RecordingTarget::new(PhysicalSize::new(1280, 720));
    let handle = GameLoop::spawn(Arc::clone(&sim), target, input.clone(), settings.game_loop)?;

    let stop = CancellationToken::new();
    let pilot = {
        let sim = Arc::clone(&sim);
        let stop = stop.clone();
        thread::Builder::new()
            .name("autopilot".into())
            .spawn(move || autopilot(sim, input, stop))?
    };

    thread::sleep(Duration::from_secs(seconds));

    stop.cancel();
    if pilot.join().is_err() {
        log::warn!("Autopilot thread panicked");
    }

    let stats = handle.stats();
    let target = handle.shutdown()?;

    let sim = sim.lock().unwrap_or_else(PoisonError::into_inner);
    log::info!(
        "Best score {} over {} round(s); {} frames presented, average FPS {:.1}",
        sim.best_score(),
        sim.scoreboard().rounds_played(),
        target.frames_presented(),
        stats.average_fps
    );
    println!("{}", serde_json::to_string_pretty(&sim.snapshot())?);
    Ok(())
}

/// Press while the player is below mid-screen, release above it
fn autopilot(sim: Arc<Mutex<Simulation>>, input: InputSignal, stop: CancellationToken) {
    while !stop.is_cancelled() {
        let (y, mid) = {
            let sim = sim.lock().unwrap_or_else(PoisonError::into_inner);
            (sim.player().position().y, sim.settings().screen.height / 2)
        };
        if y > mid {
            input.press();
        } else {
            input.release();
        }
        thread::sleep(Duration::from_millis(15));
    }
    input.release();
}

/// Solid-color sheets sized to each sprite's grid
fn demo_library(sprites: &SpriteSettings) -> SheetLibrary {
    let sheet = |source: &SpriteSource, frame_w: u32, frame_h: u32, rgba: u32| {
        SpriteSheet::filled(frame_w * source.columns, frame_h * source.rows, rgba)
    };

    SheetLibrary::new()
        .with(&sprites.player.resource, sheet(&sprites.player, 64, 25, 0xe040_40ff))
        .with(&sprites.rock.resource, sheet(&sprites.rock, 30, 30, 0x7070_70ff))
        .with(
            &sprites.explosion.resource,
            sheet(&sprites.explosion, 40, 40, 0xffa0_20ff),
        )
        .with(&sprites.ground.resource, sheet(&sprites.ground, 20, 20, 0x3a7d_2cff))
        .with(
            &sprites.background.resource,
            sheet(&sprites.background, 480, 270, 0x87ce_ebff),
        )
}
