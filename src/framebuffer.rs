// src/framebuffer.rs
//! Framebuffer storage and its allocation policy.
//!
//! Storage is sized against the monitor the window sits on, not against the
//! window itself. The first resize on a monitor allocates room for the whole
//! monitor; every later resize within it only moves the visible width and
//! height. Capacity (`pitch * max_height`) never shrinks.

use crate::error::EvaError;
use crate::geometry::Rect;
use crate::pixels::{Pixel, PhysicalPx, ScaleFactor};
use log::{debug, info, warn};
use std::fmt;

/// Owned pixel storage plus its current visible size.
#[derive(Debug)]
struct Framebuffer {
    width: usize,
    height: usize,
    pitch: usize,
    max_height: usize,
    scale_x: ScaleFactor,
    scale_y: ScaleFactor,
    pixels: Vec<Pixel>,
}

/// Owns the framebuffer and decides when it is reallocated.
#[derive(Debug)]
pub struct FramebufferManager {
    framebuffer: Option<Framebuffer>,
    monitor_width: usize,
    monitor_height: usize,
    fill: Pixel,
    reallocations: usize,
}

fn clamp_dim(value: PhysicalPx) -> usize {
    value.max(0) as usize
}

fn sanitize_scale(scale: ScaleFactor, axis: &str) -> ScaleFactor {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        warn!(
            "FramebufferManager: invalid {} scale {}, using 1.0",
            axis, scale
        );
        1.0
    }
}

impl FramebufferManager {
    /// Creates a manager with no storage. Storage appears on the first resize.
    pub fn new(fill: Pixel) -> Self {
        FramebufferManager {
            framebuffer: None,
            monitor_width: 0,
            monitor_height: 0,
            fill,
            reallocations: 0,
        }
    }

    /// Records the bounds of the monitor the window currently occupies.
    pub fn set_monitor(&mut self, width: PhysicalPx, height: PhysicalPx) {
        let (width, height) = (clamp_dim(width), clamp_dim(height));
        if (width, height) != (self.monitor_width, self.monitor_height) {
            debug!("FramebufferManager: monitor bounds now {}x{}", width, height);
        }
        self.monitor_width = width;
        self.monitor_height = height;
    }

    /// Grows storage when `width`/`height` exceed the current capacity.
    ///
    /// The new capacity is the per-axis maximum of the current capacity, the
    /// requested size, and the monitor size. Returns whether storage moved.
    pub fn ensure_capacity(
        &mut self,
        width: PhysicalPx,
        height: PhysicalPx,
        monitor_width: PhysicalPx,
        monitor_height: PhysicalPx,
    ) -> Result<bool, EvaError> {
        let (width, height) = (clamp_dim(width), clamp_dim(height));
        let (monitor_width, monitor_height) = (clamp_dim(monitor_width), clamp_dim(monitor_height));
        let fill = self.fill;

        let fb = self.framebuffer.get_or_insert_with(|| Framebuffer {
            width: 0,
            height: 0,
            pitch: 0,
            max_height: 0,
            scale_x: 1.0,
            scale_y: 1.0,
            pixels: Vec::new(),
        });

        if fb.pitch >= width && fb.max_height >= height {
            return Ok(false);
        }

        let pitch = fb.pitch.max(width).max(monitor_width);
        let max_height = fb.max_height.max(height).max(monitor_height);
        let alloc_error = || EvaError::Allocation { pitch, max_height };

        let count = pitch.checked_mul(max_height).ok_or_else(alloc_error)?;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(count).map_err(|_| alloc_error())?;
        pixels.resize(count, fill);

        // Old storage is only dropped once the new storage holds its rows.
        for row in 0..fb.max_height {
            let src = &fb.pixels[row * fb.pitch..(row + 1) * fb.pitch];
            pixels[row * pitch..row * pitch + fb.pitch].copy_from_slice(src);
        }

        info!(
            "FramebufferManager: grew storage {}x{} -> {}x{}",
            fb.pitch, fb.max_height, pitch, max_height
        );
        fb.pixels = pixels;
        fb.pitch = pitch;
        fb.max_height = max_height;
        self.reallocations += 1;
        Ok(true)
    }

    /// Sets the visible size and scale, growing storage if needed.
    ///
    /// Capacity is secured before the new size is committed, so the visible
    /// area never exceeds storage even when growth fails.
    pub fn resize(
        &mut self,
        width: PhysicalPx,
        height: PhysicalPx,
        scale_x: ScaleFactor,
        scale_y: ScaleFactor,
    ) -> Result<(), EvaError> {
        let scale_x = sanitize_scale(scale_x, "x");
        let scale_y = sanitize_scale(scale_y, "y");
        let (monitor_width, monitor_height) =
            (self.monitor_width as PhysicalPx, self.monitor_height as PhysicalPx);

        self.ensure_capacity(width, height, monitor_width, monitor_height)?;

        if let Some(fb) = self.framebuffer.as_mut() {
            fb.width = clamp_dim(width);
            fb.height = clamp_dim(height);
            fb.scale_x = scale_x;
            fb.scale_y = scale_y;
            debug!(
                "FramebufferManager: resized to {}x{} (capacity {}x{}, scale {}x{})",
                fb.width, fb.height, fb.pitch, fb.max_height, scale_x, scale_y
            );
        }
        Ok(())
    }

    /// A transient read/write handle on the framebuffer.
    ///
    /// `None` until the first resize.
    pub fn view(&mut self) -> Option<FramebufferView<'_>> {
        self.framebuffer.as_mut().map(|fb| FramebufferView {
            width: fb.width,
            height: fb.height,
            pitch: fb.pitch,
            scale_x: fb.scale_x,
            scale_y: fb.scale_y,
            pixels: fb.pixels.as_mut_slice(),
        })
    }

    pub fn is_allocated(&self) -> bool {
        self.framebuffer.is_some()
    }

    pub fn width(&self) -> PhysicalPx {
        self.framebuffer.as_ref().map_or(0, |fb| fb.width as PhysicalPx)
    }

    pub fn height(&self) -> PhysicalPx {
        self.framebuffer.as_ref().map_or(0, |fb| fb.height as PhysicalPx)
    }

    pub fn pitch(&self) -> usize {
        self.framebuffer.as_ref().map_or(0, |fb| fb.pitch)
    }

    pub fn max_height(&self) -> usize {
        self.framebuffer.as_ref().map_or(0, |fb| fb.max_height)
    }

    pub fn scale(&self) -> (ScaleFactor, ScaleFactor) {
        self.framebuffer
            .as_ref()
            .map_or((1.0, 1.0), |fb| (fb.scale_x, fb.scale_y))
    }

    /// Allocated pixel count.
    pub fn capacity(&self) -> usize {
        self.pitch() * self.max_height()
    }

    /// The visible area, anchored at the origin.
    pub fn extent(&self) -> Option<Rect> {
        self.framebuffer
            .as_ref()
            .map(|fb| Rect::from_size(fb.width as PhysicalPx, fb.height as PhysicalPx))
    }

    /// Number of times storage has been (re)allocated.
    pub fn reallocations(&self) -> usize {
        self.reallocations
    }
}

/// Borrowed access to the framebuffer for one callback.
///
/// Rows are `pitch` pixels apart; only the first `width` pixels of each of
/// the first `height` rows are visible.
pub struct FramebufferView<'a> {
    width: usize,
    height: usize,
    pitch: usize,
    scale_x: ScaleFactor,
    scale_y: ScaleFactor,
    pixels: &'a mut [Pixel],
}

impl fmt::Debug for FramebufferView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FramebufferView")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pitch", &self.pitch)
            .field("scale", &(self.scale_x, self.scale_y))
            .finish_non_exhaustive()
    }
}

impl<'a> FramebufferView<'a> {
    pub fn width(&self) -> PhysicalPx {
        self.width as PhysicalPx
    }

    pub fn height(&self) -> PhysicalPx {
        self.height as PhysicalPx
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn scale(&self) -> (ScaleFactor, ScaleFactor) {
        (self.scale_x, self.scale_y)
    }

    pub fn extent(&self) -> Rect {
        Rect::from_size(self.width(), self.height())
    }

    /// The whole storage, including rows and columns beyond the visible area.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels[..]
    }

    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels[..]
    }

    /// Visible part of row `y`.
    pub fn row(&self, y: usize) -> Option<&[Pixel]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.pitch;
        Some(&self.pixels[start..start + self.width])
    }

    pub fn row_mut(&mut self, y: usize) -> Option<&mut [Pixel]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.pitch;
        Some(&mut self.pixels[start..start + self.width])
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Pixel> {
        self.row(y).and_then(|row| row.get(x).copied())
    }

    pub fn pixel_mut(&mut self, x: usize, y: usize) -> Option<&mut Pixel> {
        self.row_mut(y).and_then(|row| row.get_mut(x))
    }

    /// Fills `rect`, clipped to the visible area.
    pub fn fill_rect(&mut self, rect: Rect, pixel: Pixel) {
        let clipped = self.extent().intersect(&rect);
        if clipped.is_degenerate() {
            return;
        }
        let (x0, x1) = (clipped.x as usize, clipped.right() as usize);
        for y in clipped.y as usize..clipped.bottom() as usize {
            let start = y * self.pitch;
            self.pixels[start + x0..start + x1].fill(pixel);
        }
    }

    /// Fills the visible area.
    pub fn clear(&mut self, pixel: Pixel) {
        let extent = self.extent();
        self.fill_rect(extent, pixel);
    }
}
