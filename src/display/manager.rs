// src/display/manager.rs
//! PumpManager - typed wrapper around a NativePump.

use crate::display::messages::{NativeNotification, PumpRequest, PumpResponse};
use crate::display::pump::NativePump;
use crate::error::{EvaError, ERROR_CODE_PROTOCOL};
use crate::framebuffer::FramebufferView;
use crate::geometry::Rect;
use log::trace;

fn unexpected(expected: &str, got: PumpResponse) -> EvaError {
    EvaError::platform_setup(
        ERROR_CODE_PROTOCOL,
        format!("Expected {} response, got {:?}", expected, got),
    )
}

/// Turns the pump's request/response protocol into plain method calls.
#[derive(Debug)]
pub struct PumpManager<P: NativePump> {
    pump: P,
}

impl<P: NativePump> PumpManager<P> {
    pub fn new(pump: P) -> Self {
        Self { pump }
    }

    pub fn pump(&self) -> &P {
        &self.pump
    }

    pub fn pump_mut(&mut self) -> &mut P {
        &mut self.pump
    }

    pub fn into_inner(self) -> P {
        self.pump
    }

    pub fn create_window(&mut self, title: &[u16], width: i32, height: i32) -> Result<(), EvaError> {
        match self.pump.handle_request(PumpRequest::CreateWindow {
            title,
            width,
            height,
        })? {
            PumpResponse::WindowCreated => Ok(()),
            other => Err(unexpected("WindowCreated", other)),
        }
    }

    /// Blocks until the next notification.
    pub fn next_notification(&mut self) -> Result<Option<NativeNotification>, EvaError> {
        match self.pump.handle_request(PumpRequest::NextNotification)? {
            PumpResponse::Notification(notification) => {
                trace!("PumpManager: notification {:?}", notification);
                Ok(notification)
            }
            other => Err(unexpected("Notification", other)),
        }
    }

    pub fn present(&mut self, rect: Rect, frame: &FramebufferView<'_>) -> Result<(), EvaError> {
        match self.pump.handle_request(PumpRequest::Present { rect, frame })? {
            PumpResponse::Presented => Ok(()),
            other => Err(unexpected("Presented", other)),
        }
    }

    pub fn post_quit(&mut self) -> Result<(), EvaError> {
        match self.pump.handle_request(PumpRequest::PostQuit)? {
            PumpResponse::QuitPosted => Ok(()),
            other => Err(unexpected("QuitPosted", other)),
        }
    }

    pub fn destroy_window(&mut self) -> Result<(), EvaError> {
        match self.pump.handle_request(PumpRequest::DestroyWindow)? {
            PumpResponse::WindowDestroyed => Ok(()),
            other => Err(unexpected("WindowDestroyed", other)),
        }
    }
}
