// src/display/messages.rs
//! Message types for communication between the event loop and a native pump.
//!
//! The pump owns the OS window and message queue; the event loop owns
//! everything else. Framebuffer pixels are only ever lent to the pump for the
//! duration of a `Present` request.

use crate::framebuffer::FramebufferView;
use crate::geometry::Rect;
use crate::keys::{Modifiers, MouseButton};
use crate::pixels::{PhysicalPx, ScaleFactor};

/// Requests sent from the event loop to a native pump.
#[derive(Debug)]
pub enum PumpRequest<'a> {
    /// Set up DPI awareness, register the window class, create and show the
    /// window. `title` is NUL-terminated UTF-16.
    CreateWindow {
        title: &'a [u16],
        width: i32,
        height: i32,
    },

    /// Block until the next native notification.
    NextNotification,

    /// Blit `rect` of the framebuffer to the window.
    Present {
        rect: Rect,
        frame: &'a FramebufferView<'a>,
    },

    /// Ask the message queue to wind down. A `Quit` notification follows.
    PostQuit,

    /// Destroy the window and unregister the window class.
    DestroyWindow,
}

/// Responses sent from a native pump back to the event loop.
#[derive(Debug)]
pub enum PumpResponse {
    WindowCreated,

    /// The next notification, or `None` once the queue is gone.
    Notification(Option<NativeNotification>),

    Presented,

    QuitPosted,

    WindowDestroyed,
}

/// Notifications as the OS delivers them, before translation.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeNotification {
    /// Size or DPI change.
    Resized {
        /// Window size, chrome included.
        window_width: i32,
        window_height: i32,
        /// Client area in physical pixels.
        client_width: PhysicalPx,
        client_height: PhysicalPx,
        scale_x: ScaleFactor,
        scale_y: ScaleFactor,
        /// Bounds of the monitor the window now occupies.
        monitor_width: PhysicalPx,
        monitor_height: PhysicalPx,
    },

    MouseButton {
        button: MouseButton,
        pressed: bool,
        x: PhysicalPx,
        y: PhysicalPx,
    },

    MouseMove { x: PhysicalPx, y: PhysicalPx },

    MouseEntered { x: PhysicalPx, y: PhysicalPx },

    MouseExited { x: PhysicalPx, y: PhysicalPx },

    /// One UTF-16 code unit of text input. Characters outside the BMP arrive
    /// as two notifications, high surrogate first.
    Char { unit: u16, modifiers: Modifiers },

    /// The window contents were invalidated by the OS.
    Paint,

    /// The user asked to close the window.
    CloseRequested,

    /// The queue is shutting down after `PostQuit`.
    Quit,
}
