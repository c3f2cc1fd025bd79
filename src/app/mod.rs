// src/app/mod.rs
//! The event loop and the application-facing callback surface.
//!
//! An [`EventLoop`] is the whole application context: it owns the native
//! pump, window state, framebuffer, redraw coalescer, quit negotiator, and
//! the application itself. Nothing is global, so several loops can exist in
//! one process.
//!
//! Per notification the loop runs one cycle:
//! 1. the pump blocks until the next native notification,
//! 2. the event channel translates it,
//! 3. the application handles the resulting event, possibly calling
//!    `request_frame` or `cancel_quit` on its [`EventContext`],
//! 4. the coalescer flushes at most one frame callback and one present.

use crate::channel::{Dispatch, EventChannel};
use crate::coalescer::DirtyRegionCoalescer;
use crate::config::Config;
use crate::display::encoding::{encode_title, truncate_title};
use crate::display::{NativePump, PumpManager};
use crate::error::EvaError;
use crate::event::{Event, WindowEvent};
use crate::framebuffer::{FramebufferManager, FramebufferView};
use crate::geometry::Rect;
use crate::pixels::{PhysicalPx, ScaleFactor};
use crate::quit::{QuitAction, QuitInput, QuitNegotiator, QuitState};
use log::{debug, error, info, warn};


/// Callbacks an application provides to the event loop.
pub trait Application {
    /// Called once after the window exists, before any event.
    fn init(&mut self) {}

    /// Handles one event. Runs to completion before the next notification.
    fn event(&mut self, event: &Event, ctx: &mut EventContext<'_>);

    /// Draws the requested region. Called at most once per event, after
    /// `event` returns; exactly `dirty` is presented afterwards.
    fn frame(&mut self, _view: &mut FramebufferView<'_>, _dirty: Rect) {}

    /// Called exactly once before the loop returns, if `init` ran.
    fn cleanup(&mut self) {}

    /// Reports an unrecoverable error. The loop stops afterwards.
    fn fail(&mut self, error_code: i32, message: &str) {
        error!("Application failure {}: {}", error_code, message);
    }
}

/// OS window dimensions, chrome included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowState {
    pub width: i32,
    pub height: i32,
}

/// Handle given to [`Application::event`].
///
/// `request_frame` and `cancel_quit` are only reachable through this handle,
/// so they cannot be called outside a handler.
pub struct EventContext<'a> {
    coalescer: &'a mut DirtyRegionCoalescer,
    quit: &'a mut QuitNegotiator,
    framebuffer: &'a mut FramebufferManager,
    window: &'a WindowState,
}

impl<'a> EventContext<'a> {
    /// Asks for `rect` (or the whole framebuffer for `None`) to be drawn and
    /// presented once this event has been handled.
    pub fn request_frame(&mut self, rect: Option<Rect>) {
        self.coalescer.request_frame(rect);
    }

    /// Vetoes the close being negotiated. No effect outside a
    /// `QuitRequested` event.
    pub fn cancel_quit(&mut self) {
        self.quit.apply(QuitInput::CancelQuit);
    }

    pub fn quit_state(&self) -> QuitState {
        self.quit.state()
    }

    /// Direct framebuffer access while handling the event.
    pub fn framebuffer(&mut self) -> Option<FramebufferView<'_>> {
        self.framebuffer.view()
    }

    pub fn window_width(&self) -> i32 {
        self.window.width
    }

    pub fn window_height(&self) -> i32 {
        self.window.height
    }

    pub fn framebuffer_width(&self) -> PhysicalPx {
        self.framebuffer.width()
    }

    pub fn framebuffer_height(&self) -> PhysicalPx {
        self.framebuffer.height()
    }

    pub fn framebuffer_scale(&self) -> (ScaleFactor, ScaleFactor) {
        self.framebuffer.scale()
    }
}

/// The application context and its run loop.
pub struct EventLoop<P: NativePump, A: Application> {
    pump: PumpManager<P>,
    app: A,
    config: Config,
    window: WindowState,
    framebuffer: FramebufferManager,
    coalescer: DirtyRegionCoalescer,
    quit: QuitNegotiator,
    channel: EventChannel,
    initialized: bool,
    cleaned_up: bool,
}

impl<P: NativePump, A: Application> EventLoop<P, A> {
    pub fn new(pump: P, app: A, config: Config) -> Self {
        let framebuffer = FramebufferManager::new(config.framebuffer.fill);
        EventLoop {
            pump: PumpManager::new(pump),
            app,
            config,
            window: WindowState::default(),
            framebuffer,
            coalescer: DirtyRegionCoalescer::new(),
            quit: QuitNegotiator::new(),
            channel: EventChannel::new(),
            initialized: false,
            cleaned_up: false,
        }
    }

    /// Runs until the native queue ends or a fatal error occurs.
    ///
    /// Fatal errors are reported through [`Application::fail`] and returned
    /// after cleanup has run.
    pub fn run(&mut self) -> Result<(), EvaError> {
        if self.quit.state() == QuitState::Terminated {
            warn!("EventLoop: run() called after termination, ignoring");
            return Ok(());
        }

        info!("EventLoop: starting");
        let result = self.pump_notifications();
        if let Err(e) = &result {
            error!("EventLoop: fatal error: {}", e);
            self.app.fail(e.error_code(), &e.to_string());
        }
        self.shutdown();
        info!("EventLoop: terminated");
        result
    }

    fn pump_notifications(&mut self) -> Result<(), EvaError> {
        self.create_window()?;

        self.app.init();
        self.initialized = true;
        debug!("EventLoop: application initialized");

        loop {
            let Some(notification) = self.pump.next_notification()? else {
                info!("EventLoop: native queue closed");
                return Ok(());
            };

            match self.channel.translate(notification) {
                None => continue,
                Some(Dispatch::Terminate) => {
                    info!("EventLoop: quit received from native queue");
                    return Ok(());
                }
                Some(Dispatch::Close) => self.negotiate_close()?,
                Some(Dispatch::Resize {
                    event,
                    monitor_width,
                    monitor_height,
                }) => {
                    let event = self.apply_resize(event, monitor_width, monitor_height)?;
                    self.deliver(&Event::WindowResized(event));
                }
                Some(Dispatch::Event(event)) => self.deliver(&event),
            }

            self.flush_frame()?;
        }
    }

    fn create_window(&mut self) -> Result<(), EvaError> {
        let window = &self.config.window;
        let title = match encode_title(&window.title, window.title_capacity) {
            Ok(title) => title,
            Err(e) => {
                warn!("EventLoop: {}; using a truncated title", e);
                truncate_title(&window.title, window.title_capacity)
            }
        };
        self.pump
            .create_window(&title, window.width, window.height)?;
        info!(
            "EventLoop: window created ({}x{})",
            window.width, window.height
        );
        Ok(())
    }

    fn apply_resize(
        &mut self,
        event: WindowEvent,
        monitor_width: PhysicalPx,
        monitor_height: PhysicalPx,
    ) -> Result<WindowEvent, EvaError> {
        self.window = WindowState {
            width: event.window_width,
            height: event.window_height,
        };
        self.framebuffer.set_monitor(monitor_width, monitor_height);
        self.framebuffer.resize(
            event.framebuffer_width,
            event.framebuffer_height,
            event.scale_x,
            event.scale_y,
        )?;

        let (scale_x, scale_y) = self.framebuffer.scale();
        Ok(WindowEvent {
            framebuffer_width: self.framebuffer.width(),
            framebuffer_height: self.framebuffer.height(),
            scale_x,
            scale_y,
            ..event
        })
    }

    fn negotiate_close(&mut self) -> Result<(), EvaError> {
        match self.quit.apply(QuitInput::CloseSignal) {
            QuitAction::DeliverQuitRequested => {
                self.deliver(&Event::QuitRequested);
                if self.quit.apply(QuitInput::HandlerReturned) == QuitAction::SignalPump {
                    self.pump.post_quit()?;
                } else {
                    info!("EventLoop: quit cancelled by application");
                }
            }
            QuitAction::SignalPump => self.pump.post_quit()?,
            QuitAction::None => {}
        }
        Ok(())
    }

    fn deliver(&mut self, event: &Event) {
        debug!("EventLoop: delivering {:?}", event);
        let mut ctx = EventContext {
            coalescer: &mut self.coalescer,
            quit: &mut self.quit,
            framebuffer: &mut self.framebuffer,
            window: &self.window,
        };
        self.app.event(event, &mut ctx);
    }

    fn flush_frame(&mut self) -> Result<(), EvaError> {
        let app = &mut self.app;
        let pump = &mut self.pump;
        self.coalescer.flush(
            &mut self.framebuffer,
            |view, dirty| app.frame(view, dirty),
            |rect, view| pump.present(rect, view),
        )?;
        Ok(())
    }

    fn shutdown(&mut self) {
        if self.initialized && !self.cleaned_up {
            info!("EventLoop: running application cleanup");
            self.app.cleanup();
            self.cleaned_up = true;
        }
        if let Err(e) = self.pump.destroy_window() {
            warn!("EventLoop: failed to destroy window: {}", e);
        }
        self.quit.apply(QuitInput::CleanupComplete);
    }

    pub fn quit_state(&self) -> QuitState {
        self.quit.state()
    }

    pub fn window(&self) -> WindowState {
        self.window
    }

    pub fn framebuffer(&self) -> &FramebufferManager {
        &self.framebuffer
    }

    pub fn application(&self) -> &A {
        &self.app
    }

    pub fn pump(&self) -> &P {
        self.pump.pump()
    }

    /// Keystrokes dropped because they could not be decoded.
    pub fn dropped_inputs(&self) -> usize {
        self.channel.dropped_inputs()
    }

    pub fn into_parts(self) -> (P, A) {
        (self.pump.into_inner(), self.app)
    }
}
