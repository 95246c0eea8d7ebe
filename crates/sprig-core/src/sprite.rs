//! Sprite capability and the concrete sprite record

use serde::{Deserialize, Serialize};

/// What the runtime needs to know about a sprite.
///
/// Collision and animation only ever read these five values, so the asset
/// pipeline can hand in any type that answers them.
pub trait SpriteInfo {
    /// Number of animation frames
    fn frame_count(&self) -> usize;
    /// Frame width in pixels, before instance scaling
    fn width(&self) -> f64;
    /// Frame height in pixels, before instance scaling
    fn height(&self) -> f64;
    /// Origin offset from the left edge
    fn xoffset(&self) -> f64;
    /// Origin offset from the top edge
    fn yoffset(&self) -> f64;
}

/// One animation frame: the top-left corner of the frame in its atlas page
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpriteFrame {
    pub x: u32,
    pub y: u32,
}

/// A sprite as described by a project file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    #[serde(default)]
    pub frames: Vec<SpriteFrame>,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub xoffset: f64,
    #[serde(default)]
    pub yoffset: f64,
}

impl Sprite {
    /// A sprite with `frames` frames laid out left to right in one atlas row
    pub fn new(width: f64, height: f64, frames: usize) -> Self {
        let step = width.max(0.0) as u32;
        Self {
            frames: (0..frames as u32)
                .map(|i| SpriteFrame { x: i * step, y: 0 })
                .collect(),
            width,
            height,
            xoffset: 0.0,
            yoffset: 0.0,
        }
    }

    pub fn with_offset(mut self, xoffset: f64, yoffset: f64) -> Self {
        self.xoffset = xoffset;
        self.yoffset = yoffset;
        self
    }
}

impl SpriteInfo for Sprite {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn xoffset(&self) -> f64 {
        self.xoffset
    }

    fn yoffset(&self) -> f64 {
        self.yoffset
    }
}
