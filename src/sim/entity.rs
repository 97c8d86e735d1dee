//! Shared spatial state of every game object
//!
//! Position, velocity and size are integer pixels; the bounding rectangle is
//! derived, never stored.

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// Axis-aligned rectangle, `[left, right) x [top, bottom)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_pos_size(pos: IVec2, size: IVec2) -> Self {
        Self::new(pos.x, pos.y, pos.x + size.x, pos.y + size.y)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Position, velocity and size of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub pos: IVec2,
    pub vel: IVec2,
    size: IVec2,
}

impl Body {
    /// Width and height must both be positive
    pub fn new(pos: IVec2, size: IVec2) -> Result<Self> {
        check_size(size)?;
        Ok(Self {
            pos,
            vel: IVec2::ZERO,
            size,
        })
    }

    pub fn size(&self) -> IVec2 {
        self.size
    }

    pub fn width(&self) -> i32 {
        self.size.x
    }

    pub fn height(&self) -> i32 {
        self.size.y
    }

    pub fn set_size(&mut self, size: IVec2) -> Result<()> {
        check_size(size)?;
        self.size = size;
        Ok(())
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Right edge in pixels
    pub fn right(&self) -> i32 {
        self.pos.x + self.size.x
    }

    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "position=[{},{}] - width={} - height={}",
            self.pos.x, self.pos.y, self.size.x, self.size.y
        )
    }
}

fn check_size(size: IVec2) -> Result<()> {
    if size.x <= 0 || size.y <= 0 {
        return Err(SimError::invalid(format!(
            "entity size must be positive, got {}x{}",
            size.x, size.y
        )));
    }
    Ok(())
}

/// Anything with a bounding box that takes part in collision checks
pub trait Collidable {
    fn body(&self) -> &Body;

    fn bounds(&self) -> Rect {
        self.body().rect()
    }
}

impl Collidable for Body {
    fn body(&self) -> &Body {
        self
    }
}
