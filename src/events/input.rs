//! Raw input records and the sources that produce them.
//!
//! [`RawInput`] is the OS-level record the event loop translates into typed
//! events. The application feeds it from egui through [`EguiInput`]; tests
//! feed it from a scripted source.

use crate::ui_egui::geometry::Point;

/// One OS input record, polled once per frame.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    Quit,
    /// `button` uses OS numbering (1 left, 2 wheel, 3 right).
    MouseDown { pos: Point, button: u8 },
    MouseUp { pos: Point, button: u8 },
    /// Positive `delta` scrolls up.
    Wheel { pos: Point, delta: f32 },
    /// `rel` is the movement since the previous motion record.
    Motion { pos: Point, rel: Point },
    KeyDown { key: Option<egui::Key>, character: Option<char> },
    KeyUp { key: Option<egui::Key>, character: Option<char> },
    /// The OS window gained or lost keyboard focus.
    WindowFocus(bool),
    /// The pointer entered or left the OS window.
    PointerInside(bool),
}

pub trait InputSource {
    /// All records that arrived since the previous poll.
    fn poll(&mut self) -> Vec<RawInput>;

    /// Current "pointer is over the window" state, checked once per tick.
    fn mouse_focused(&self) -> bool;
}

/// Collects raw records from egui's per-frame input state.
#[derive(Debug, Default)]
pub struct EguiInput {
    pending: Vec<RawInput>,
    last_pointer: Option<Point>,
    pointer_inside: bool,
    window_focused: Option<bool>,
}

impl EguiInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert this frame's egui events. Call once per frame before the
    /// event loop ticks.
    pub fn collect(&mut self, input: &egui::InputState) {
        if input.viewport().close_requested() {
            self.pending.push(RawInput::Quit);
        }

        if let Some(focused) = input.viewport().focused {
            if self.window_focused != Some(focused) {
                self.window_focused = Some(focused);
                self.pending.push(RawInput::WindowFocus(focused));
            }
        }

        for event in &input.events {
            match event {
                egui::Event::PointerMoved(pos) => {
                    let pos = Point::from_pos2(*pos);
                    let previous = self.last_pointer.unwrap_or(pos);
                    self.last_pointer = Some(pos);
                    self.pointer_inside = true;
                    self.pending.push(RawInput::Motion {
                        pos,
                        rel: Point::new(pos.x - previous.x, pos.y - previous.y),
                    });
                }
                egui::Event::PointerGone => {
                    self.pointer_inside = false;
                    self.pending.push(RawInput::PointerInside(false));
                }
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => {
                    let pos = Point::from_pos2(*pos);
                    let button = os_button(*button);
                    self.pending.push(if *pressed {
                        RawInput::MouseDown { pos, button }
                    } else {
                        RawInput::MouseUp { pos, button }
                    });
                }
                egui::Event::Key { key, pressed, .. } => {
                    let key = Some(*key);
                    self.pending.push(if *pressed {
                        RawInput::KeyDown {
                            key,
                            character: None,
                        }
                    } else {
                        RawInput::KeyUp {
                            key,
                            character: None,
                        }
                    });
                }
                egui::Event::Text(text) => {
                    self.pending.extend(text.chars().map(|c| RawInput::KeyDown {
                        key: None,
                        character: Some(c),
                    }));
                }
                _ => {}
            }
        }

        let scroll = input.raw_scroll_delta.y;
        if scroll != 0.0 {
            let pos = self.last_pointer.unwrap_or(Point::ZERO);
            self.pending.push(RawInput::Wheel { pos, delta: scroll });
        }
    }
}

impl InputSource for EguiInput {
    fn poll(&mut self) -> Vec<RawInput> {
        std::mem::take(&mut self.pending)
    }

    fn mouse_focused(&self) -> bool {
        self.pointer_inside
    }
}

fn os_button(button: egui::PointerButton) -> u8 {
    match button {
        egui::PointerButton::Primary => 1,
        egui::PointerButton::Middle => 2,
        egui::PointerButton::Secondary => 3,
        egui::PointerButton::Extra1 => 4,
        egui::PointerButton::Extra2 => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_egui_buttons_use_os_numbering() {
        assert_eq!(os_button(egui::PointerButton::Primary), 1);
        assert_eq!(os_button(egui::PointerButton::Middle), 2);
        assert_eq!(os_button(egui::PointerButton::Secondary), 3);
    }

    #[test]
    fn test_poll_drains_pending_records() {
        let mut input = EguiInput::new();
        input.pending.push(RawInput::Quit);
        assert_eq!(input.poll(), vec![RawInput::Quit]);
        assert!(input.poll().is_empty());
    }
}
