//! Rendering seam
//!
//! The simulation decides what to draw and where. Rasterization happens
//! behind `Surface`, and the platform supplies a `RenderTarget` that has to be
//! acquired for each frame.

pub mod recording;
pub mod scene;

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::{Frame, Rect};

pub use recording::{DrawCommand, RecordingTarget};
pub use scene::{FrameReport, HudText, hud_lines};

/// Pixel size of the physical surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    /// `x` is the right edge of the text
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Glyph height in logical pixels
    pub size: u32,
    pub align: TextAlign,
}

impl TextStyle {
    pub const fn new(size: u32, align: TextAlign) -> Self {
        Self { size, align }
    }
}

/// Drawing primitives in logical coordinates
pub trait Surface {
    /// Logical to physical scale for the draws that follow
    fn scale(&mut self, sx: f32, sy: f32);

    /// Draw `frame` stretched into `dest`
    fn draw_image(&mut self, frame: &Frame, dest: Rect) -> Result<()>;

    /// Draw one line of text with its baseline at `y`
    fn draw_text(&mut self, text: &str, x: i32, y: i32, style: TextStyle) -> Result<()>;
}

/// A surface that must be held exclusively while drawing a frame
pub trait RenderTarget: Surface {
    fn physical_size(&self) -> PhysicalSize;

    /// May fail fast when the surface is busy or gone; never blocks
    fn acquire(&mut self) -> Result<()>;

    fn release(&mut self);
}

/// Exclusive hold on a render target, released on drop
pub struct Acquired<'a, T: RenderTarget + ?Sized> {
    target: &'a mut T,
}

impl<'a, T: RenderTarget + ?Sized> Acquired<'a, T> {
    pub fn acquire(target: &'a mut T) -> Result<Self> {
        target.acquire()?;
        Ok(Self { target })
    }
}

impl<T: RenderTarget + ?Sized> Deref for Acquired<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T: RenderTarget + ?Sized> DerefMut for Acquired<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T: RenderTarget + ?Sized> Drop for Acquired<'_, T> {
    fn drop(&mut self) {
        self.target.release();
    }
}
