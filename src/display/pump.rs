// src/display/pump.rs
//! NativePump trait - minimal interface to a platform message pump.
//!
//! ## Threading Model
//! - The pump and the event loop share one thread, the one that owns the
//!   native message queue.
//! - `NextNotification` is the only call allowed to block.
//!
//! ## Lifecycle
//! 1. `CreateWindow` - DPI awareness, class registration, window creation
//! 2. `NextNotification` / `Present` / `PostQuit` until the queue drains
//! 3. `DestroyWindow` - exactly once, after the application's cleanup

use crate::display::messages::{PumpRequest, PumpResponse};
use crate::error::EvaError;

/// Platform-specific native pump.
///
/// Implementations only translate requests into OS calls. Frame coalescing,
/// buffer sizing, and quit negotiation all live in the event loop.
///
/// ## Request/Response Pairs
/// - `CreateWindow` → `WindowCreated`
/// - `NextNotification` → `Notification`
/// - `Present` → `Presented`
/// - `PostQuit` → `QuitPosted`
/// - `DestroyWindow` → `WindowDestroyed`
pub trait NativePump {
    fn handle_request(&mut self, request: PumpRequest<'_>) -> Result<PumpResponse, EvaError>;
}
