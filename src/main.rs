// src/main.rs

use eva::config::CONFIG;
use eva::display::{HeadlessPump, NativeNotification};
use eva::event::{Event, MouseEventKind};
use eva::keys::MouseButton;
use eva::{Application, EventContext, EventLoop, FramebufferView, Pixel, Rect};

use anyhow::Context;
use log::{error, info};

const BACKGROUND: Pixel = Pixel::rgba(20, 20, 20, 255);
const BOX_COLOR: Pixel = Pixel::rgba(255, 0, 0, 255);
const BOX_STEP_PX: i32 = 10;

/// Moves a red box right on every keystroke and to the cursor on click.
struct BoxDemo {
    position: Rect,
    full_redraw: bool,
    closes_refused: usize,
}

impl BoxDemo {
    fn new() -> Self {
        BoxDemo {
            position: Rect::new(10, 10, 100, 100),
            full_redraw: true,
            closes_refused: 0,
        }
    }

    /// Moves the box and requests the area it left and entered.
    fn move_to(&mut self, x: i32, y: i32, ctx: &mut EventContext<'_>) {
        let old = self.position;
        self.position.x = x;
        self.position.y = y;
        ctx.request_frame(Some(old.union(&self.position)));
    }
}

impl Application for BoxDemo {
    fn init(&mut self) {
        info!("BoxDemo: init");
    }

    fn event(&mut self, event: &Event, ctx: &mut EventContext<'_>) {
        match event {
            Event::WindowResized(resized) => {
                info!(
                    "BoxDemo: window {}x{}, framebuffer {}x{} @ {}x",
                    resized.window_width,
                    resized.window_height,
                    resized.framebuffer_width,
                    resized.framebuffer_height,
                    resized.scale_x
                );
                self.full_redraw = true;
                ctx.request_frame(None);
            }
            Event::RedrawNeeded => {
                self.full_redraw = true;
                ctx.request_frame(None);
            }
            Event::Keyboard(key) => {
                info!("BoxDemo: key {:?} ({} bytes)", key.text, key.utf8().len());
                let (x, y) = (self.position.x + BOX_STEP_PX, self.position.y);
                self.move_to(x, y, ctx);
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Pressed && mouse.left_pressed => {
                self.move_to(mouse.x, mouse.y, ctx);
            }
            Event::Mouse(_) => {}
            Event::QuitRequested => {
                // Refuse the first close to show the veto.
                if self.closes_refused == 0 {
                    info!("BoxDemo: refusing the first close");
                    self.closes_refused += 1;
                    ctx.cancel_quit();
                } else {
                    info!("BoxDemo: quitting");
                }
            }
        }
    }

    fn frame(&mut self, view: &mut FramebufferView<'_>, dirty: Rect) {
        if std::mem::take(&mut self.full_redraw) {
            view.clear(BACKGROUND);
        } else {
            view.fill_rect(dirty, BACKGROUND);
        }
        view.fill_rect(self.position, BOX_COLOR);
    }

    fn cleanup(&mut self) {
        info!("BoxDemo: cleaning up");
    }

    fn fail(&mut self, error_code: i32, message: &str) {
        error!("BoxDemo: error {}: {}", error_code, message);
    }
}

/// A short scripted session for the headless pump.
fn demo_script() -> Vec<NativeNotification> {
    let mut script = vec![
        HeadlessPump::resized(800, 600, 1.0, 1920, 1080),
        NativeNotification::Paint,
    ];
    script.extend(HeadlessPump::typed("eva\u{1F600}"));
    script.push(NativeNotification::MouseButton {
        button: MouseButton::Left,
        pressed: true,
        x: 300,
        y: 200,
    });
    script.push(HeadlessPump::resized(400, 300, 1.0, 1920, 1080));
    script.push(NativeNotification::CloseRequested);
    script.push(HeadlessPump::resized(1600, 1200, 2.0, 3840, 2160));
    script.push(NativeNotification::CloseRequested);
    script
}

/// Main entry point for the `eva` demo.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(CONFIG.logging.filter.as_str()),
    )
    .format_timestamp_micros()
    .init();

    info!("Starting eva demo...");
    let clock = eva::clock::Clock::monotonic();
    let start = clock.now();

    let mut event_loop = EventLoop::new(
        HeadlessPump::new(demo_script()),
        BoxDemo::new(),
        CONFIG.clone(),
    );
    event_loop.run().context("eva event loop failed")?;

    let framebuffer = event_loop.framebuffer();
    info!(
        "Presented {} frames; framebuffer {}x{} in {}x{} storage after {} allocations",
        event_loop.pump().presents().len(),
        framebuffer.width(),
        framebuffer.height(),
        framebuffer.pitch(),
        framebuffer.max_height(),
        framebuffer.reallocations()
    );
    info!("eva demo finished in {:.3} ms", clock.since_ms(start));
    Ok(())
}
