// src/event.rs
//! Events delivered to the application.
//!
//! An `Event` is built by the event channel, handed to exactly one
//! `Application::event` call, and dropped. Nothing is queued.

use crate::keys::Modifiers;
use crate::pixels::{PhysicalPx, ScaleFactor};

/// Events delivered to the application handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The window was resized or moved to a display with another DPI.
    WindowResized(WindowEvent),
    /// Mouse button, motion, or hover change.
    Mouse(MouseEvent),
    /// Text input.
    Keyboard(KeyboardEvent),
    /// The user asked to close the window. Call `cancel_quit` to veto.
    QuitRequested,
    /// The OS asked for the window contents to be redrawn.
    RedrawNeeded,
}

/// Window and framebuffer dimensions after a resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowEvent {
    /// Window size, chrome included.
    pub window_width: i32,
    pub window_height: i32,
    /// Drawable size in framebuffer pixels.
    pub framebuffer_width: PhysicalPx,
    pub framebuffer_height: PhysicalPx,
    /// Framebuffer pixels per window unit.
    pub scale_x: ScaleFactor,
    pub scale_y: ScaleFactor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Pressed,
    Released,
    Moved,
    Entered,
    Exited,
}

/// A mouse event in framebuffer pixels.
///
/// The button flags describe the transition that produced this event, not
/// the held state; a move carries no transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: PhysicalPx,
    pub y: PhysicalPx,

    pub left_pressed: bool,
    pub left_released: bool,

    pub middle_pressed: bool,
    pub middle_released: bool,

    pub right_pressed: bool,
    pub right_released: bool,
}

impl MouseEvent {
    /// An event with no button transitions.
    pub fn at(kind: MouseEventKind, x: PhysicalPx, y: PhysicalPx) -> Self {
        MouseEvent {
            kind,
            x,
            y,
            left_pressed: false,
            left_released: false,
            middle_pressed: false,
            middle_released: false,
            right_pressed: false,
            right_released: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyboardEventKind {
    KeyDown,
}

/// One unit of text input.
///
/// `text` holds a full code point as UTF-8, which can be up to four bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub kind: KeyboardEventKind,
    pub text: String,
    pub modifiers: Modifiers,
}

impl KeyboardEvent {
    pub fn utf8(&self) -> &[u8] {
        self.text.as_bytes()
    }
}
