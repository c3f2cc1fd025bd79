// src/display/drivers/headless.rs
//! Headless scripted native pump.
//!
//! Replays a fixed queue of notifications and records every call the event
//! loop makes, so the loop can run without a window system.

use crate::display::messages::{NativeNotification, PumpRequest, PumpResponse};
use crate::display::pump::NativePump;
use crate::error::EvaError;
use crate::geometry::Rect;
use crate::pixels::{Pixel, PhysicalPx, ScaleFactor};
use log::{info, trace};
use std::collections::VecDeque;

/// Width and height of the window frame added around the client area.
const CHROME_WIDTH: i32 = 16;
const CHROME_HEIGHT: i32 = 39;

/// One recorded present.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentRecord {
    pub rect: Rect,
    /// Copy of the presented region, row by row.
    pub pixels: Vec<Pixel>,
}

#[derive(Debug, Default)]
pub struct HeadlessPump {
    script: VecDeque<NativeNotification>,
    setup_error: Option<EvaError>,
    title: Option<String>,
    window_size: Option<(i32, i32)>,
    quit_posted: bool,
    quit_delivered: bool,
    destroy_count: usize,
    presents: Vec<PresentRecord>,
}

impl HeadlessPump {
    pub fn new(script: impl IntoIterator<Item = NativeNotification>) -> Self {
        HeadlessPump {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Makes `CreateWindow` fail with `error`.
    pub fn with_setup_error(mut self, error: EvaError) -> Self {
        self.setup_error = Some(error);
        self
    }

    /// A resize to `width`x`height` framebuffer pixels on a monitor of the
    /// given size.
    pub fn resized(
        width: PhysicalPx,
        height: PhysicalPx,
        scale: ScaleFactor,
        monitor_width: PhysicalPx,
        monitor_height: PhysicalPx,
    ) -> NativeNotification {
        NativeNotification::Resized {
            window_width: ((width as ScaleFactor / scale) as i32).saturating_add(CHROME_WIDTH),
            window_height: ((height as ScaleFactor / scale) as i32).saturating_add(CHROME_HEIGHT),
            client_width: width,
            client_height: height,
            scale_x: scale,
            scale_y: scale,
            monitor_width,
            monitor_height,
        }
    }

    /// `Char` notifications for every UTF-16 unit of `text`.
    pub fn typed(text: &str) -> impl Iterator<Item = NativeNotification> + '_ {
        text.encode_utf16().map(|unit| NativeNotification::Char {
            unit,
            modifiers: Default::default(),
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn window_size(&self) -> Option<(i32, i32)> {
        self.window_size
    }

    pub fn presents(&self) -> &[PresentRecord] {
        &self.presents
    }

    pub fn quit_posted(&self) -> bool {
        self.quit_posted
    }

    pub fn destroy_count(&self) -> usize {
        self.destroy_count
    }

    /// Scripted notifications that were never delivered.
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl NativePump for HeadlessPump {
    fn handle_request(&mut self, request: PumpRequest<'_>) -> Result<PumpResponse, EvaError> {
        match request {
            PumpRequest::CreateWindow {
                title,
                width,
                height,
            } => {
                if let Some(err) = self.setup_error.take() {
                    return Err(err);
                }
                let end = title.iter().position(|&u| u == 0).unwrap_or(title.len());
                let title = String::from_utf16_lossy(&title[..end]);
                info!("HeadlessPump: CreateWindow '{}' {}x{}", title, width, height);
                self.title = Some(title);
                self.window_size = Some((width, height));
                Ok(PumpResponse::WindowCreated)
            }
            PumpRequest::NextNotification => {
                // Once quit is posted the queue only yields the final Quit.
                if self.quit_posted {
                    if self.quit_delivered {
                        return Ok(PumpResponse::Notification(None));
                    }
                    self.quit_delivered = true;
                    return Ok(PumpResponse::Notification(Some(NativeNotification::Quit)));
                }
                Ok(PumpResponse::Notification(self.script.pop_front()))
            }
            PumpRequest::Present { rect, frame } => {
                trace!("HeadlessPump: Present {:?}", rect);
                let mut pixels = Vec::with_capacity((rect.w.max(0) * rect.h.max(0)) as usize);
                for y in rect.y..rect.bottom() {
                    if let Some(row) = frame.row(y as usize) {
                        pixels.extend_from_slice(&row[rect.x as usize..rect.right() as usize]);
                    }
                }
                self.presents.push(PresentRecord { rect, pixels });
                Ok(PumpResponse::Presented)
            }
            PumpRequest::PostQuit => {
                info!("HeadlessPump: PostQuit");
                self.quit_posted = true;
                Ok(PumpResponse::QuitPosted)
            }
            PumpRequest::DestroyWindow => {
                info!("HeadlessPump: DestroyWindow");
                self.destroy_count += 1;
                Ok(PumpResponse::WindowDestroyed)
            }
        }
    }
}
