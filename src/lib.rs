//! Eva library crate.
//!
//! Eva turns native window notifications into a uniform event stream and
//! hands the application a pixel framebuffer to draw into. Redraw requests
//! are coalesced into a single present per notification, the framebuffer
//! grows against monitor bounds instead of reallocating on every resize,
//! and window close goes through a cancellable quit handshake.

pub mod app;
pub mod channel;
pub mod clock;
pub mod coalescer;
pub mod config;
pub mod display;
pub mod error;
pub mod event;
pub mod framebuffer;
pub mod geometry;
pub mod keys;
pub mod pixels;
pub mod quit;

pub use app::{Application, EventContext, EventLoop};
pub use error::EvaError;
pub use event::Event;
pub use framebuffer::{FramebufferManager, FramebufferView};
pub use geometry::Rect;
pub use pixels::Pixel;
