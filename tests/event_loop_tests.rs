//! End-to-end runs of the event loop over the headless pump.
//!
//! These drive the public API only: a scripted native session goes in, and
//! the presents, framebuffer state, and callback order come out.

use eva::config::Config;
use eva::display::{HeadlessPump, NativeNotification};
use eva::quit::QuitState;
use eva::{Application, Event, EventContext, EventLoop, FramebufferView, Pixel, Rect};
use std::cell::RefCell;
use std::rc::Rc;

const PAINT: Pixel = Pixel::rgba(0, 128, 255, 255);

/// Paints whatever is dirty and logs callbacks to a shared journal.
struct Painter {
    journal: Rc<RefCell<Vec<String>>>,
    veto_closes: usize,
}

impl Painter {
    fn new(journal: Rc<RefCell<Vec<String>>>, veto_closes: usize) -> Self {
        Painter {
            journal,
            veto_closes,
        }
    }

    fn log(&self, entry: impl Into<String>) {
        self.journal.borrow_mut().push(entry.into());
    }
}

impl Application for Painter {
    fn init(&mut self) {
        self.log("init");
    }

    fn event(&mut self, event: &Event, ctx: &mut EventContext<'_>) {
        match event {
            Event::WindowResized(_) | Event::RedrawNeeded => ctx.request_frame(None),
            Event::Keyboard(key) => {
                self.log(format!("key {}", key.text));
                let x = key.text.chars().count() as i32;
                ctx.request_frame(Some(Rect::new(x, x, 2, 2)));
                ctx.request_frame(Some(Rect::new(x + 4, x + 4, 2, 2)));
            }
            Event::QuitRequested => {
                self.log("quit requested");
                if self.veto_closes > 0 {
                    self.veto_closes -= 1;
                    ctx.cancel_quit();
                }
            }
            Event::Mouse(_) => {}
        }
    }

    fn frame(&mut self, view: &mut FramebufferView<'_>, dirty: Rect) {
        self.log(format!("frame {}x{}", dirty.w, dirty.h));
        view.fill_rect(dirty, PAINT);
    }

    fn cleanup(&mut self) {
        self.log("cleanup");
    }

    fn fail(&mut self, error_code: i32, message: &str) {
        self.log(format!("fail {} {}", error_code, message));
    }
}

fn session(veto_closes: usize) -> (EventLoop<HeadlessPump, Painter>, Rc<RefCell<Vec<String>>>) {
    let mut script = vec![
        HeadlessPump::resized(800, 600, 1.0, 1920, 1080),
        NativeNotification::Paint,
    ];
    script.extend(HeadlessPump::typed("a"));
    script.push(HeadlessPump::resized(400, 300, 1.0, 1920, 1080));
    script.push(NativeNotification::CloseRequested);
    script.extend(HeadlessPump::typed("b"));
    script.push(NativeNotification::CloseRequested);

    let journal = Rc::new(RefCell::new(Vec::new()));
    let event_loop = EventLoop::new(
        HeadlessPump::new(script),
        Painter::new(journal.clone(), veto_closes),
        Config::default(),
    );
    (event_loop, journal)
}

#[test_log::test]
fn session_without_veto_stops_at_the_first_close() {
    let (mut event_loop, journal) = session(0);
    event_loop.run().unwrap();

    assert_eq!(
        *journal.borrow(),
        vec![
            "init",
            "frame 800x600",
            "frame 800x600",
            "key a",
            "frame 6x6",
            "frame 400x300",
            "quit requested",
            "cleanup",
        ]
    );
    assert_eq!(event_loop.quit_state(), QuitState::Terminated);
    assert_eq!(event_loop.pump().remaining(), 2);
}

#[test_log::test]
fn vetoed_close_lets_later_input_through() {
    let (mut event_loop, journal) = session(1);
    event_loop.run().unwrap();

    let journal = journal.borrow();
    assert!(journal.contains(&"key b".to_string()));
    assert_eq!(journal.iter().filter(|e| *e == "quit requested").count(), 2);
    assert_eq!(journal.iter().filter(|e| *e == "cleanup").count(), 1);
    assert_eq!(journal.last().map(String::as_str), Some("cleanup"));
    assert_eq!(event_loop.pump().remaining(), 0);
}

#[test_log::test]
fn resizes_within_a_monitor_allocate_once() {
    let (mut event_loop, _) = session(0);
    event_loop.run().unwrap();

    let framebuffer = event_loop.framebuffer();
    assert_eq!(framebuffer.reallocations(), 1);
    assert_eq!((framebuffer.pitch(), framebuffer.max_height()), (1920, 1080));
    assert_eq!((framebuffer.width(), framebuffer.height()), (400, 300));
}

#[test_log::test]
fn every_present_matches_its_frame_and_holds_painted_pixels() {
    let (mut event_loop, _) = session(0);
    event_loop.run().unwrap();

    let presents = event_loop.pump().presents();
    let rects: Vec<Rect> = presents.iter().map(|p| p.rect).collect();
    assert_eq!(
        rects,
        vec![
            Rect::from_size(800, 600),
            Rect::from_size(800, 600),
            Rect::new(1, 1, 6, 6),
            Rect::from_size(400, 300),
        ]
    );
    for present in presents {
        assert_eq!(present.pixels.len(), (present.rect.w * present.rect.h) as usize);
        assert!(present.pixels.iter().all(|p| *p == PAINT));
    }
}
