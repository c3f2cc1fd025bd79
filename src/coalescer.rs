// src/coalescer.rs
//! Dirty-region coalescing.
//!
//! Every `request_frame` made while one native notification is processed
//! folds into a single pending region. `flush` turns that region into exactly
//! one frame callback and exactly one present, then forgets it.

use crate::error::EvaError;
use crate::framebuffer::{FramebufferManager, FramebufferView};
use crate::geometry::Rect;
use log::{debug, trace, warn};

/// What the current notification cycle has asked to redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingFrame {
    /// No frame requested.
    #[default]
    Idle,
    /// Bounding box of every rect requested so far.
    Partial(Rect),
    /// The whole framebuffer. Absorbs any partial request.
    Full,
}

#[derive(Debug, Default)]
pub struct DirtyRegionCoalescer {
    pending: PendingFrame,
}

impl DirtyRegionCoalescer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a redraw request for the current cycle.
    ///
    /// `None` asks for the full framebuffer. Degenerate rects cover no
    /// pixels and are ignored.
    pub fn request_frame(&mut self, rect: Option<Rect>) {
        self.pending = match (self.pending, rect) {
            (_, None) => {
                trace!("Coalescer: full frame requested");
                PendingFrame::Full
            }
            (pending, Some(rect)) if rect.is_degenerate() => {
                debug!("Coalescer: ignoring degenerate dirty rect {:?}", rect);
                pending
            }
            (PendingFrame::Full, Some(_)) => PendingFrame::Full,
            (PendingFrame::Idle, Some(rect)) => {
                trace!("Coalescer: dirty rect {:?}", rect);
                PendingFrame::Partial(rect)
            }
            (PendingFrame::Partial(current), Some(rect)) => {
                let merged = current.union(&rect);
                trace!("Coalescer: {:?} + {:?} -> {:?}", current, rect, merged);
                PendingFrame::Partial(merged)
            }
        };
    }

    pub fn pending(&self) -> PendingFrame {
        self.pending
    }

    pub fn has_pending(&self) -> bool {
        self.pending != PendingFrame::Idle
    }

    /// Clears and returns the pending state.
    pub fn take(&mut self) -> PendingFrame {
        std::mem::take(&mut self.pending)
    }

    /// Ends a notification cycle.
    ///
    /// When a frame is pending, `frame` draws into the framebuffer and
    /// `present` shows the region, both exactly once and with the same rect
    /// in framebuffer pixels. Returns the presented rect.
    pub fn flush<F, P>(
        &mut self,
        framebuffer: &mut FramebufferManager,
        frame: F,
        present: P,
    ) -> Result<Option<Rect>, EvaError>
    where
        F: FnOnce(&mut FramebufferView<'_>, Rect),
        P: FnOnce(Rect, &FramebufferView<'_>) -> Result<(), EvaError>,
    {
        let pending = self.take();
        if pending == PendingFrame::Idle {
            return Ok(None);
        }

        let Some(mut view) = framebuffer.view() else {
            warn!("Coalescer: frame requested before the framebuffer exists, dropping it");
            return Ok(None);
        };

        let extent = view.extent();
        let region = match pending {
            PendingFrame::Full => extent,
            PendingFrame::Partial(rect) => extent.intersect(&rect),
            PendingFrame::Idle => return Ok(None),
        };
        if region.is_degenerate() {
            debug!("Coalescer: {:?} lies outside {:?}, skipping frame", pending, extent);
            return Ok(None);
        }

        debug!("Coalescer: flushing frame for {:?}", region);
        frame(&mut view, region);
        present(region, &view)?;
        Ok(Some(region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::Pixel;
    use std::cell::RefCell;
    use test_log::test;

    fn manager(width: i32, height: i32) -> FramebufferManager {
        let mut manager = FramebufferManager::new(Pixel::BLACK);
        manager.resize(width, height, 1.0, 1.0).unwrap();
        manager
    }

    /// Flushes and records every frame and present call.
    fn flush_recording(
        coalescer: &mut DirtyRegionCoalescer,
        fb: &mut FramebufferManager,
    ) -> (Vec<Rect>, Vec<Rect>, Option<Rect>) {
        let frames = RefCell::new(Vec::new());
        let presents = RefCell::new(Vec::new());
        let result = coalescer
            .flush(
                fb,
                |_, rect| frames.borrow_mut().push(rect),
                |rect, _| {
                    presents.borrow_mut().push(rect);
                    Ok(())
                },
            )
            .unwrap();
        (frames.into_inner(), presents.into_inner(), result)
    }

    #[test]
    fn overlapping_requests_present_their_union_once() {
        let mut fb = manager(800, 600);
        let mut coalescer = DirtyRegionCoalescer::new();
        coalescer.request_frame(Some(Rect::new(0, 0, 10, 10)));
        coalescer.request_frame(Some(Rect::new(5, 5, 10, 10)));

        let (frames, presents, result) = flush_recording(&mut coalescer, &mut fb);
        assert_eq!(frames, vec![Rect::new(0, 0, 15, 15)]);
        assert_eq!(presents, vec![Rect::new(0, 0, 15, 15)]);
        assert_eq!(result, Some(Rect::new(0, 0, 15, 15)));
        assert!(!coalescer.has_pending());
    }

    #[test]
    fn full_request_absorbs_partials_before_and_after() {
        let mut fb = manager(320, 200);
        let mut coalescer = DirtyRegionCoalescer::new();
        coalescer.request_frame(Some(Rect::new(1, 1, 2, 2)));
        coalescer.request_frame(None);
        coalescer.request_frame(Some(Rect::new(50, 50, 2, 2)));
        assert_eq!(coalescer.pending(), PendingFrame::Full);

        let (frames, presents, _) = flush_recording(&mut coalescer, &mut fb);
        assert_eq!(frames, vec![Rect::from_size(320, 200)]);
        assert_eq!(presents, vec![Rect::from_size(320, 200)]);
    }

    #[test]
    fn many_requests_yield_one_callback_and_one_present() {
        let mut fb = manager(100, 100);
        let mut coalescer = DirtyRegionCoalescer::new();
        for i in 0..25 {
            coalescer.request_frame(Some(Rect::new(i * 3, i * 2, 4, 4)));
        }

        let (frames, presents, _) = flush_recording(&mut coalescer, &mut fb);
        assert_eq!(frames.len(), 1);
        assert_eq!(presents.len(), 1);
        assert_eq!(presents[0], Rect::new(0, 0, 76, 52));
    }

    #[test]
    fn idle_cycle_does_not_call_back() {
        let mut fb = manager(10, 10);
        let mut coalescer = DirtyRegionCoalescer::new();
        let (frames, presents, result) = flush_recording(&mut coalescer, &mut fb);
        assert!(frames.is_empty());
        assert!(presents.is_empty());
        assert_eq!(result, None);
    }

    #[test]
    fn degenerate_rects_do_not_schedule_a_frame() {
        let mut coalescer = DirtyRegionCoalescer::new();
        coalescer.request_frame(Some(Rect::default()));
        coalescer.request_frame(Some(Rect::new(4, 4, -1, 3)));
        assert_eq!(coalescer.pending(), PendingFrame::Idle);

        coalescer.request_frame(Some(Rect::new(2, 2, 1, 1)));
        coalescer.request_frame(Some(Rect::new(0, 0, 0, 0)));
        assert_eq!(coalescer.pending(), PendingFrame::Partial(Rect::new(2, 2, 1, 1)));
    }

    #[test]
    fn region_is_clipped_to_the_framebuffer() {
        let mut fb = manager(50, 40);
        let mut coalescer = DirtyRegionCoalescer::new();
        coalescer.request_frame(Some(Rect::new(40, 30, 100, 100)));
        let (_, presents, _) = flush_recording(&mut coalescer, &mut fb);
        assert_eq!(presents, vec![Rect::new(40, 30, 10, 10)]);
    }

    #[test]
    fn region_outside_the_framebuffer_skips_frame_and_present() {
        let mut fb = manager(800, 600);
        let mut coalescer = DirtyRegionCoalescer::new();
        coalescer.request_frame(Some(Rect::new(900, 900, 10, 10)));
        let (frames, presents, result) = flush_recording(&mut coalescer, &mut fb);
        assert!(frames.is_empty());
        assert!(presents.is_empty());
        assert_eq!(result, None);
        assert!(!coalescer.has_pending());
    }

    #[test]
    fn far_apart_requests_coalesce_without_overflow() {
        let mut fb = manager(100, 100);
        let mut coalescer = DirtyRegionCoalescer::new();
        coalescer.request_frame(Some(Rect::new(i32::MIN, 0, 1, 1)));
        coalescer.request_frame(Some(Rect::new(10, 0, 1, 1)));
        let PendingFrame::Partial(pending) = coalescer.pending() else {
            panic!("expected a partial frame, got {:?}", coalescer.pending());
        };
        assert_eq!(pending.right(), 11);

        let (_, presents, _) = flush_recording(&mut coalescer, &mut fb);
        assert_eq!(presents, vec![Rect::new(0, 0, 11, 1)]);
    }

    #[test]
    fn frame_without_framebuffer_is_dropped() {
        let mut fb = FramebufferManager::new(Pixel::BLACK);
        let mut coalescer = DirtyRegionCoalescer::new();
        coalescer.request_frame(None);
        let (frames, presents, result) = flush_recording(&mut coalescer, &mut fb);
        assert!(frames.is_empty() && presents.is_empty());
        assert_eq!(result, None);
        assert!(!coalescer.has_pending());
    }

    #[test]
    fn frame_callback_draws_before_present_sees_the_pixels() {
        let red = Pixel::rgba(255, 0, 0, 255);
        let mut fb = manager(8, 8);
        let mut coalescer = DirtyRegionCoalescer::new();
        coalescer.request_frame(Some(Rect::new(2, 2, 2, 2)));

        let mut seen = None;
        coalescer
            .flush(
                &mut fb,
                |view, rect| view.fill_rect(rect, red),
                |rect, view| {
                    seen = view.pixel(rect.x as usize, rect.y as usize);
                    Ok(())
                },
            )
            .unwrap();
        assert_eq!(seen, Some(red));
    }

    #[test]
    fn present_errors_propagate_and_clear_pending() {
        let mut fb = manager(8, 8);
        let mut coalescer = DirtyRegionCoalescer::new();
        coalescer.request_frame(None);
        let result = coalescer.flush(
            &mut fb,
            |_, _| {},
            |_, _| Err(EvaError::platform_setup(5, "device lost")),
        );
        assert!(result.is_err());
        assert!(!coalescer.has_pending());
    }
}
