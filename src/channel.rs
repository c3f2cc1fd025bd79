// src/channel.rs
//! Translation of native notifications into application events.
//!
//! The channel keeps native delivery order: each notification becomes at most
//! one dispatch, produced immediately. The only inputs that produce nothing
//! are the first half of a surrogate pair and text that cannot be decoded.

use crate::display::encoding::Utf16Decoder;
use crate::display::NativeNotification;
use crate::event::{
    Event, KeyboardEvent, KeyboardEventKind, MouseEvent, MouseEventKind, WindowEvent,
};
use crate::keys::MouseButton;
use crate::pixels::PhysicalPx;
use log::{debug, warn};

/// What the event loop must do with a translated notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Deliver this event to the handler.
    Event(Event),
    /// Resize the framebuffer, then deliver `WindowResized`.
    Resize {
        event: WindowEvent,
        monitor_width: PhysicalPx,
        monitor_height: PhysicalPx,
    },
    /// Run quit negotiation.
    Close,
    /// The native queue has ended.
    Terminate,
}

#[derive(Debug, Default)]
pub struct EventChannel {
    decoder: Utf16Decoder,
    dropped_inputs: usize,
}

impl EventChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keystrokes discarded because they could not be decoded.
    pub fn dropped_inputs(&self) -> usize {
        self.dropped_inputs
    }

    pub fn translate(&mut self, notification: NativeNotification) -> Option<Dispatch> {
        debug!("EventChannel: translating {:?}", notification);
        match notification {
            NativeNotification::Resized {
                window_width,
                window_height,
                client_width,
                client_height,
                scale_x,
                scale_y,
                monitor_width,
                monitor_height,
            } => Some(Dispatch::Resize {
                event: WindowEvent {
                    window_width,
                    window_height,
                    framebuffer_width: client_width,
                    framebuffer_height: client_height,
                    scale_x,
                    scale_y,
                },
                monitor_width,
                monitor_height,
            }),
            NativeNotification::MouseButton {
                button,
                pressed,
                x,
                y,
            } => {
                let kind = if pressed {
                    MouseEventKind::Pressed
                } else {
                    MouseEventKind::Released
                };
                let mut event = MouseEvent::at(kind, x, y);
                let (pressed_flag, released_flag) = match button {
                    MouseButton::Left => (&mut event.left_pressed, &mut event.left_released),
                    MouseButton::Middle => {
                        (&mut event.middle_pressed, &mut event.middle_released)
                    }
                    MouseButton::Right => (&mut event.right_pressed, &mut event.right_released),
                };
                *pressed_flag = pressed;
                *released_flag = !pressed;
                Some(Dispatch::Event(Event::Mouse(event)))
            }
            NativeNotification::MouseMove { x, y } => Some(Dispatch::Event(Event::Mouse(
                MouseEvent::at(MouseEventKind::Moved, x, y),
            ))),
            NativeNotification::MouseEntered { x, y } => Some(Dispatch::Event(Event::Mouse(
                MouseEvent::at(MouseEventKind::Entered, x, y),
            ))),
            NativeNotification::MouseExited { x, y } => Some(Dispatch::Event(Event::Mouse(
                MouseEvent::at(MouseEventKind::Exited, x, y),
            ))),
            NativeNotification::Char { unit, modifiers } => {
                let decoded = self.decoder.push(unit);
                if let Some(err) = decoded.dropped {
                    self.dropped_inputs += 1;
                    warn!("EventChannel: dropping keystroke: {}", err);
                }
                decoded.ch.map(|ch| {
                    Dispatch::Event(Event::Keyboard(KeyboardEvent {
                        kind: KeyboardEventKind::KeyDown,
                        text: ch.to_string(),
                        modifiers,
                    }))
                })
            }
            NativeNotification::Paint => Some(Dispatch::Event(Event::RedrawNeeded)),
            NativeNotification::CloseRequested => Some(Dispatch::Close),
            NativeNotification::Quit => Some(Dispatch::Terminate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Modifiers;

    fn key(text: &str) -> Dispatch {
        Dispatch::Event(Event::Keyboard(KeyboardEvent {
            kind: KeyboardEventKind::KeyDown,
            text: text.to_string(),
            modifiers: Modifiers::empty(),
        }))
    }

    fn char_unit(unit: u16) -> NativeNotification {
        NativeNotification::Char {
            unit,
            modifiers: Modifiers::empty(),
        }
    }

    #[test]
    fn resize_carries_window_and_framebuffer_dimensions() {
        let mut channel = EventChannel::new();
        let dispatch = channel.translate(NativeNotification::Resized {
            window_width: 816,
            window_height: 639,
            client_width: 1600,
            client_height: 1200,
            scale_x: 2.0,
            scale_y: 2.0,
            monitor_width: 3840,
            monitor_height: 2160,
        });
        assert_eq!(
            dispatch,
            Some(Dispatch::Resize {
                event: WindowEvent {
                    window_width: 816,
                    window_height: 639,
                    framebuffer_width: 1600,
                    framebuffer_height: 1200,
                    scale_x: 2.0,
                    scale_y: 2.0,
                },
                monitor_width: 3840,
                monitor_height: 2160,
            })
        );
    }

    #[test]
    fn button_transitions_set_only_the_matching_flag() {
        let mut channel = EventChannel::new();
        let Some(Dispatch::Event(Event::Mouse(press))) =
            channel.translate(NativeNotification::MouseButton {
                button: MouseButton::Middle,
                pressed: true,
                x: 3,
                y: 4,
            })
        else {
            panic!("expected a mouse event");
        };
        assert_eq!(press.kind, MouseEventKind::Pressed);
        assert!(press.middle_pressed);
        assert!(!press.middle_released && !press.left_pressed && !press.right_pressed);

        let Some(Dispatch::Event(Event::Mouse(release))) =
            channel.translate(NativeNotification::MouseButton {
                button: MouseButton::Right,
                pressed: false,
                x: 3,
                y: 4,
            })
        else {
            panic!("expected a mouse event");
        };
        assert_eq!(release.kind, MouseEventKind::Released);
        assert!(release.right_released && !release.right_pressed);
    }

    #[test]
    fn motion_and_hover_carry_no_button_transitions() {
        let mut channel = EventChannel::new();
        for (notification, kind) in [
            (NativeNotification::MouseMove { x: 1, y: 2 }, MouseEventKind::Moved),
            (NativeNotification::MouseEntered { x: 0, y: 0 }, MouseEventKind::Entered),
            (NativeNotification::MouseExited { x: 9, y: 9 }, MouseEventKind::Exited),
        ] {
            let dispatch = channel.translate(notification.clone());
            let Some(Dispatch::Event(Event::Mouse(event))) = dispatch else {
                panic!("expected a mouse event for {:?}", notification);
            };
            assert_eq!(event, MouseEvent::at(kind, event.x, event.y));
        }
    }

    #[test]
    fn keystrokes_are_delivered_as_utf8() {
        let mut channel = EventChannel::new();
        assert_eq!(channel.translate(char_unit('é' as u16)), Some(key("é")));

        let pair: Vec<u16> = "\u{1F600}".encode_utf16().collect();
        assert_eq!(channel.translate(char_unit(pair[0])), None);
        let dispatch = channel.translate(char_unit(pair[1]));
        assert_eq!(dispatch, Some(key("\u{1F600}")));
        if let Some(Dispatch::Event(Event::Keyboard(event))) = dispatch {
            assert_eq!(event.utf8(), &[0xF0, 0x9F, 0x98, 0x80]);
        }
    }

    #[test]
    fn undecodable_keystrokes_are_dropped_and_counted() {
        let mut channel = EventChannel::new();
        assert_eq!(channel.translate(char_unit(0xDC00)), None);
        assert_eq!(channel.translate(char_unit('a' as u16)), Some(key("a")));
        assert_eq!(channel.dropped_inputs(), 1);
    }

    #[test]
    fn lifecycle_notifications_map_to_loop_actions() {
        let mut channel = EventChannel::new();
        assert_eq!(
            channel.translate(NativeNotification::Paint),
            Some(Dispatch::Event(Event::RedrawNeeded))
        );
        assert_eq!(
            channel.translate(NativeNotification::CloseRequested),
            Some(Dispatch::Close)
        );
        assert_eq!(
            channel.translate(NativeNotification::Quit),
            Some(Dispatch::Terminate)
        );
    }
}
