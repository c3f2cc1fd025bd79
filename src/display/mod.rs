// src/display/mod.rs
//! Message-based boundary to the native window system.
//!
//! - NativePump: platform-specific primitives (window, queue, blit)
//! - PumpManager: typed wrapper used by the event loop
//! - Messages: request/response protocol and native notifications
//! - Encoding: UTF-16 conversion for titles and keystrokes

pub mod drivers;
pub mod encoding;
pub mod manager;
pub mod messages;
pub mod pump;

pub use drivers::HeadlessPump;
pub use manager::PumpManager;
pub use messages::{NativeNotification, PumpRequest, PumpResponse};
pub use pump::NativePump;
