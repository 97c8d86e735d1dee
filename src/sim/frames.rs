//! Sprite frames
//!
//! A `FrameSet` is an immutable, shared run of equally sized frames cut from one
//! sprite sheet. Many animators may hold the same set; nobody mutates pixels
//! after slicing.

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use crate::error::{Result, SimError};
use crate::settings::{SpriteSettings, SpriteSource};

/// A decoded RGBA image (one `u32` per pixel, row-major)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl SpriteSheet {
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Result<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(SimError::invalid(format!(
                "sheet {}x{} needs {} pixels, got {}",
                width,
                height,
                width * height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A sheet of one solid color
    pub fn filled(width: u32, height: u32, color: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width as usize) * (height as usize)],
        }
    }

    #[inline]
    fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[(y * self.width + x) as usize]
    }
}

/// One still image of an animation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

/// Ordered frames of uniform size. Cloning shares the frames.
#[derive(Debug, Clone)]
pub struct FrameSet {
    frames: Arc<[Frame]>,
    frame_width: u32,
    frame_height: u32,
}

impl FrameSet {
    /// Cut `sheet` into a `rows` x `columns` grid, row-major
    pub fn slice(sheet: &SpriteSheet, rows: u32, columns: u32) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(SimError::invalid(format!(
                "sprite grid must be at least 1x1, got {}x{}",
                rows, columns
            )));
        }
        let frame_width = sheet.width / columns;
        let frame_height = sheet.height / rows;
        if frame_width == 0 || frame_height == 0 {
            return Err(SimError::invalid(format!(
                "sheet {}x{} too small for a {}x{} grid",
                sheet.width, sheet.height, rows, columns
            )));
        }

        let frames: Vec<Frame> = (0..rows * columns)
            .map(|i| {
                let col = i % columns;
                let row = i / columns;
                let (x0, y0) = (col * frame_width, row * frame_height);
                let mut pixels = Vec::with_capacity((frame_width * frame_height) as usize);
                for y in y0..y0 + frame_height {
                    for x in x0..x0 + frame_width {
                        pixels.push(sheet.pixel(x, y));
                    }
                }
                Frame {
                    width: frame_width,
                    height: frame_height,
                    pixels,
                }
            })
            .collect();

        Ok(Self {
            frames: frames.into(),
            frame_width,
            frame_height,
        })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false for a constructed set; present for API symmetry
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    /// True when both sets share the same frame storage
    pub fn shares_frames_with(&self, other: &FrameSet) -> bool {
        Arc::ptr_eq(&self.frames, &other.frames)
    }
}

impl Index<usize> for FrameSet {
    type Output = Frame;

    fn index(&self, index: usize) -> &Frame {
        &self.frames[index]
    }
}

impl fmt::Display for FrameSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frames={} - frameWidth={} - frameHeight={}",
            self.len(),
            self.frame_width,
            self.frame_height
        )
    }
}

/// Source of sliced frames, backed by whatever decodes images on the platform
pub trait ImageProvider {
    fn frames(&self, resource: &str, rows: u32, columns: u32) -> Result<FrameSet>;
}

/// In-memory provider over already decoded sheets
#[derive(Debug, Default, Clone)]
pub struct SheetLibrary {
    sheets: HashMap<String, SpriteSheet>,
}

impl SheetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource: impl Into<String>, sheet: SpriteSheet) {
        self.sheets.insert(resource.into(), sheet);
    }

    pub fn with(mut self, resource: impl Into<String>, sheet: SpriteSheet) -> Self {
        self.insert(resource, sheet);
        self
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

impl ImageProvider for SheetLibrary {
    fn frames(&self, resource: &str, rows: u32, columns: u32) -> Result<FrameSet> {
        let sheet = self
            .sheets
            .get(resource)
            .ok_or_else(|| SimError::ResourceNotFound(resource.to_string()))?;
        FrameSet::slice(sheet, rows, columns)
    }
}

/// Every frame set the game needs, built once per session
#[derive(Debug, Clone)]
pub struct Assets {
    pub player: FrameSet,
    pub rock: FrameSet,
    pub explosion: FrameSet,
    pub ground: FrameSet,
    pub background: FrameSet,
}

impl Assets {
    pub fn load(provider: &dyn ImageProvider, sprites: &SpriteSettings) -> Result<Self> {
        let load = |source: &SpriteSource| -> Result<FrameSet> {
            let set = provider.frames(&source.resource, source.rows, source.columns)?;
            log::debug!("Loaded sprite '{}': {}", source.resource, set);
            Ok(set)
        };

        Ok(Self {
            player: load(&sprites.player)?,
            rock: load(&sprites.rock)?,
            explosion: load(&sprites.explosion)?,
            ground: load(&sprites.ground)?,
            background: load(&sprites.background)?,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Small solid-color sheets for every default sprite
    pub(crate) fn test_library() -> SheetLibrary {
        SheetLibrary::new()
            .with("player_run", SpriteSheet::filled(3 * 64, 25, 0xff00_00ff))
            .with("rock", SpriteSheet::filled(30, 3 * 30, 0x8080_80ff))
            .with("explosion", SpriteSheet::filled(5 * 20, 5 * 20, 0xffa5_00ff))
            .with("ground", SpriteSheet::filled(20, 20, 0x0080_00ff))
            .with("background", SpriteSheet::filled(96, 54, 0x87ce_ebff))
    }

    #[test]
    fn test_slice_row_major() {
        // 2x2 grid of 1px frames: values encode their position
        let sheet = SpriteSheet::new(2, 2, vec![0, 1, 2, 3]).unwrap();
        let set = FrameSet::slice(&sheet, 2, 2).unwrap();
        assert_eq!(set.len(), 4);
        for i in 0..4 {
            assert_eq!(set.frame(i).unwrap().pixels, vec![i as u32]);
        }
        assert!(set.frame(4).is_none());
    }

    #[test]
    fn test_slice_vertical_strip() {
        let sheet = SpriteSheet::new(2, 6, (0..12).collect()).unwrap();
        let set = FrameSet::slice(&sheet, 3, 1).unwrap();
        assert_eq!((set.frame_width(), set.frame_height()), (2, 2));
        assert_eq!(set.frame(1).unwrap().pixels, vec![4, 5, 6, 7]);
    }

    #[test]
    fn test_slice_rejects_bad_grid() {
        let sheet = SpriteSheet::filled(4, 4, 0);
        assert!(matches!(
            FrameSet::slice(&sheet, 0, 1),
            Err(SimError::InvalidArgument(_))
        ));
        assert!(matches!(
            FrameSet::slice(&sheet, 1, 5),
            Err(SimError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_sheet_pixel_count_checked() {
        assert!(SpriteSheet::new(3, 3, vec![0; 8]).is_err());
    }

    #[test]
    fn test_missing_resource() {
        let lib = SheetLibrary::new();
        let err = lib.frames("rock", 3, 1).unwrap_err();
        assert!(matches!(err, SimError::ResourceNotFound(ref id) if id == "rock"));
    }

    #[test]
    fn test_clone_shares_frames() {
        let set = test_library().frames("rock", 3, 1).unwrap();
        let copy = set.clone();
        assert!(set.shares_frames_with(&copy));
    }

    #[test]
    fn test_assets_load_defaults() {
        let assets = Assets::load(&test_library(), &SpriteSettings::default()).unwrap();
        assert_eq!(assets.player.len(), 3);
        assert_eq!(assets.rock.len(), 3);
        assert_eq!(assets.explosion.len(), 25);
        assert_eq!(assets.player.frame_width(), 64);
    }

    #[test]
    fn test_assets_fail_on_missing_sheet() {
        let mut sprites = SpriteSettings::default();
        sprites.ground.resource = "lava".to_string();
        assert!(matches!(
            Assets::load(&test_library(), &sprites),
            Err(SimError::ResourceNotFound(_))
        ));
    }
}
