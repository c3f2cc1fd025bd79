// src/pixels.rs
//! Pixel type and pixel-space aliases.
//!
//! ## Coordinate Systems
//!
//! 1. **Window units**: the OS window size, chrome included, in logical units.
//! 2. **Framebuffer pixels**: the real pixels of the drawable area.
//!    - `framebuffer_px = window_px * scale_factor`
//!    - Dirty rects and presents are always expressed in framebuffer pixels.

use serde::{Deserialize, Serialize};

/// Physical pixels (framebuffer pixels).
pub type PhysicalPx = i32;

/// Scale factor converting window units to framebuffer pixels.
pub type ScaleFactor = f32;

/// A 4-channel colour.
///
/// Channel order is a presentation concern; the core only moves these bytes
/// around and never interprets them.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub const TRANSPARENT: Pixel = Pixel::rgba(0, 0, 0, 0);
    pub const BLACK: Pixel = Pixel::rgba(0, 0, 0, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Pixel { r, g, b, a }
    }

    /// Raw channel bytes in storage order.
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
