//! In-memory render target
//!
//! Records the draw list of each frame instead of rasterizing it. Backs the
//! headless binary and the tests, and can be told to fail acquisition or
//! individual draws.

use crate::error::{Result, SimError};
use crate::sim::{Frame, Rect};

use super::{PhysicalSize, RenderTarget, Surface, TextStyle};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Scale { sx: f32, sy: f32 },
    Image { width: u32, height: u32, dest: Rect },
    Text { text: String, x: i32, y: i32, style: TextStyle },
}

#[derive(Debug, Clone)]
pub struct RecordingTarget {
    size: PhysicalSize,
    acquired: bool,
    current: Vec<DrawCommand>,
    last_frame: Vec<DrawCommand>,
    frames_presented: u64,
    failed_acquires: u64,
    failing_acquires: u32,
    failing_draws: u32,
}

impl RecordingTarget {
    pub fn new(size: PhysicalSize) -> Self {
        Self {
            size,
            acquired: false,
            current: Vec::new(),
            last_frame: Vec::new(),
            frames_presented: 0,
            failed_acquires: 0,
            failing_acquires: 0,
            failing_draws: 0,
        }
    }

    /// The next `n` calls to `acquire` fail
    pub fn fail_next_acquires(&mut self, n: u32) {
        self.failing_acquires = n;
    }

    /// The next `n` draw calls fail
    pub fn fail_next_draws(&mut self, n: u32) {
        self.failing_draws = n;
    }

    pub fn is_acquired(&self) -> bool {
        self.acquired
    }

    /// Draw list of the most recently released frame
    pub fn last_frame(&self) -> &[DrawCommand] {
        &self.last_frame
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    pub fn failed_acquires(&self) -> u64 {
        self.failed_acquires
    }

    fn record(&mut self, command: DrawCommand) -> Result<()> {
        if !self.acquired {
            return Err(SimError::Draw("render target not acquired".into()));
        }
        if self.failing_draws > 0 {
            self.failing_draws -= 1;
            return Err(SimError::Draw(format!("injected failure: {:?}", command)));
        }
        self.current.push(command);
        Ok(())
    }
}

impl Surface for RecordingTarget {
    fn scale(&mut self, sx: f32, sy: f32) {
        if self.acquired {
            self.current.push(DrawCommand::Scale { sx, sy });
        }
    }

    fn draw_image(&mut self, frame: &Frame, dest: Rect) -> Result<()> {
        self.record(DrawCommand::Image {
            width: frame.width,
            height: frame.height,
            dest,
        })
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, style: TextStyle) -> Result<()> {
        self.record(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            style,
        })
    }
}

impl RenderTarget for RecordingTarget {
    fn physical_size(&self) -> PhysicalSize {
        self.size
    }

    fn acquire(&mut self) -> Result<()> {
        if self.acquired {
            self.failed_acquires += 1;
            return Err(SimError::RenderTargetUnavailable("already acquired".into()));
        }
        if self.failing_acquires > 0 {
            self.failing_acquires -= 1;
            self.failed_acquires += 1;
            return Err(SimError::RenderTargetUnavailable("surface busy".into()));
        }
        self.acquired = true;
        self.current.clear();
        Ok(())
    }

    fn release(&mut self) {
        if !self.acquired {
            return;
        }
        self.acquired = false;
        self.last_frame = std::mem::take(&mut self.current);
        self.frames_presented += 1;
    }
}
