// src/geometry.rs
//! Integer rectangles in framebuffer space.

use crate::pixels::PhysicalPx;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in framebuffer pixels.
///
/// A zero-sized rect at the origin is a legitimate value. "Nothing pending"
/// is spelled `Option<Rect>::None`, never a sentinel rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: PhysicalPx,
    pub y: PhysicalPx,
    pub w: PhysicalPx,
    pub h: PhysicalPx,
}

impl Rect {
    pub const fn new(x: PhysicalPx, y: PhysicalPx, w: PhysicalPx, h: PhysicalPx) -> Self {
        Rect { x, y, w, h }
    }

    /// A rect anchored at the origin.
    pub const fn from_size(w: PhysicalPx, h: PhysicalPx) -> Self {
        Rect { x: 0, y: 0, w, h }
    }

    pub fn right(&self) -> PhysicalPx {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(&self) -> PhysicalPx {
        self.y.saturating_add(self.h)
    }

    /// True when the rect covers no pixels.
    pub fn is_degenerate(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Bounding box of both rects.
    ///
    /// This over-approximates the exact region union; a single rectangular
    /// present cannot use anything finer. When the box is wider than
    /// `i32::MAX`, the far edges are kept and the negative side is cut, since
    /// framebuffer pixels never have negative coordinates.
    pub fn union(&self, other: &Rect) -> Rect {
        let (x, w) = span_union(self.x, self.w, other.x, other.w);
        let (y, h) = span_union(self.y, self.h, other.y, other.h);
        Rect { x, y, w, h }
    }

    /// Overlap of both rects, or a zero-sized rect at the clamped corner.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect {
            x,
            y,
            w: right.saturating_sub(x).max(0),
            h: bottom.saturating_sub(y).max(0),
        }
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

fn span_union(
    a: PhysicalPx,
    a_len: PhysicalPx,
    b: PhysicalPx,
    b_len: PhysicalPx,
) -> (PhysicalPx, PhysicalPx) {
    let max = i64::from(PhysicalPx::MAX);
    let far = (i64::from(a) + i64::from(a_len))
        .max(i64::from(b) + i64::from(b_len))
        .min(max);
    let near = i64::from(a.min(b)).max(far - max);
    // Both values are within i32 range after the clamps above.
    (near as PhysicalPx, (far - near) as PhysicalPx)
}
