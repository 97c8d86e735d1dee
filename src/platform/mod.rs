//! Platform glue
//!
//! - `input`: press/release flags written by the UI thread
//! - `game_loop`: the fixed-rate update/render thread and its shutdown

pub mod game_loop;
pub mod input;

pub use game_loop::{CancellationToken, FrameStats, GameLoop, LoopHandle};
pub use input::InputSignal;
