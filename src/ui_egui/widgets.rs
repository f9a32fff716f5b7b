//! Small building blocks the views are composed of.
//!
//! Widgets have a rectangle in their owning view's frame and receive events
//! in that frame; they move pointer events into their own frame before
//! hit-testing. Rendering takes the owning view's origin.

use std::time::{Duration, Instant};

use egui::{Align2, Color32, Key};

use crate::events::{Event, EventKind, KeyEvent, MouseButton};
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Rect};
use crate::ui_egui::view::with_local;
use crate::ui_egui::views::palette;

/// How long backspace must be held before `DeleteCharacter` starts repeating.
const DELETE_REPEAT_DELAY: Duration = Duration::from_millis(400);

fn hits(local: &Event, size: Rect) -> bool {
    local
        .position()
        .is_some_and(|p| Rect::new(0, 0, size.width, size.height).contains(p))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonColors {
    pub fill: Color32,
    pub hover: Color32,
    pub selected: Color32,
    pub text: Color32,
}

impl ButtonColors {
    pub const LIGHT: ButtonColors = ButtonColors {
        fill: palette::SURFACE,
        hover: palette::HOVER,
        selected: palette::ACCENT,
        text: palette::TEXT,
    };

    pub const DARK: ButtonColors = ButtonColors {
        fill: Color32::TRANSPARENT,
        hover: palette::HOVER_ON_DARK,
        selected: palette::ACCENT,
        text: palette::TEXT_ON_DARK,
    };

    pub const DANGER: ButtonColors = ButtonColors {
        fill: Color32::TRANSPARENT,
        hover: palette::DANGER,
        selected: palette::DANGER,
        text: palette::TEXT_ON_DARK,
    };
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonResponse {
    pub redraw: bool,
    pub clicked: bool,
}

/// Clickable rectangle with a text label. Fires on a left press inside.
#[derive(Debug, Clone)]
pub struct Button {
    pub rect: Rect,
    pub label: String,
    pub colors: ButtonColors,
    pub selected: bool,
    hovered: bool,
}

impl Button {
    pub fn new(rect: Rect, label: impl Into<String>, colors: ButtonColors) -> Self {
        Self {
            rect,
            label: label.into(),
            colors,
            selected: false,
            hovered: false,
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn register_event(&mut self, event: &Event) -> ButtonResponse {
        let rect = self.rect;
        with_local(event, rect.origin(), |local| self.handle_local(local, rect))
    }

    fn handle_local(&mut self, local: &Event, rect: Rect) -> ButtonResponse {
        match &local.kind {
            EventKind::MouseMotion(_) => {
                let hovered = hits(local, rect);
                let redraw = hovered != self.hovered;
                self.hovered = hovered;
                ButtonResponse { redraw, clicked: false }
            }
            EventKind::MouseClick(click) if click.button == MouseButton::Left => ButtonResponse {
                redraw: false,
                clicked: hits(local, rect),
            },
            EventKind::MouseFocusChanged { focused: false } => {
                let redraw = self.hovered;
                self.hovered = false;
                ButtonResponse { redraw, clicked: false }
            }
            _ => ButtonResponse::default(),
        }
    }

    pub fn render(&self, canvas: &mut dyn Canvas, origin: Point) {
        let rect = self.rect.translate(origin);
        let fill = if self.selected {
            self.colors.selected
        } else if self.hovered {
            self.colors.hover
        } else {
            self.colors.fill
        };
        canvas.fill_rounded_rect(rect, 4.0, fill);
        canvas.text(rect.center(), Align2::CENTER_CENTER, &self.label, 14.0, self.colors.text);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextFieldResponse {
    pub redraw: bool,
    pub changed: bool,
    pub submitted: bool,
}

/// Single-line text input. Focused by clicking into it; the caret blinks on
/// `RenderCursor` and a held backspace repeats on `DeleteCharacter`.
#[derive(Debug, Clone)]
pub struct TextField {
    pub rect: Rect,
    pub placeholder: String,
    text: String,
    max_len: usize,
    focused: bool,
    caret_visible: bool,
    backspace_since: Option<Instant>,
}

impl TextField {
    pub fn new(rect: Rect, placeholder: impl Into<String>) -> Self {
        Self {
            rect,
            placeholder: placeholder.into(),
            text: String::new(),
            max_len: 120,
            focused: false,
            caret_visible: false,
            backspace_since: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn focused(mut self) -> Self {
        self.focused = true;
        self.caret_visible = true;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn register_event(&mut self, event: &Event) -> TextFieldResponse {
        let rect = self.rect;
        with_local(event, rect.origin(), |local| self.handle_local(local, rect))
    }

    fn handle_local(&mut self, local: &Event, rect: Rect) -> TextFieldResponse {
        let mut response = TextFieldResponse::default();
        match &local.kind {
            EventKind::MouseClick(_) => {
                let focused = hits(local, rect);
                if focused != self.focused {
                    self.focused = focused;
                    self.caret_visible = focused;
                    self.backspace_since = None;
                    response.redraw = true;
                }
            }
            _ if !self.focused => {}
            EventKind::KeyPress(KeyEvent {
                key: Some(Key::Backspace),
                ..
            }) => {
                self.backspace_since = Some(local.time);
                response.changed = self.text.pop().is_some();
            }
            EventKind::KeyRelease(KeyEvent {
                key: Some(Key::Backspace),
                ..
            }) => {
                self.backspace_since = None;
            }
            EventKind::KeyPress(KeyEvent {
                key: Some(Key::Enter),
                ..
            }) => {
                response.submitted = true;
            }
            EventKind::KeyPress(KeyEvent {
                character: Some(c), ..
            }) if !c.is_control() => {
                if self.text.chars().count() < self.max_len {
                    self.text.push(*c);
                    response.changed = true;
                }
            }
            EventKind::DeleteCharacter => {
                let repeating = self
                    .backspace_since
                    .is_some_and(|since| local.time.saturating_duration_since(since) >= DELETE_REPEAT_DELAY);
                if repeating {
                    response.changed = self.text.pop().is_some();
                }
            }
            EventKind::RenderCursor => {
                self.caret_visible = !self.caret_visible;
                response.redraw = true;
            }
            _ => {}
        }
        response.redraw |= response.changed;
        response
    }

    pub fn render(&self, canvas: &mut dyn Canvas, origin: Point) {
        let rect = self.rect.translate(origin);
        canvas.fill_rounded_rect(rect, 4.0, palette::SURFACE);
        let border = if self.focused { palette::ACCENT } else { palette::BORDER };
        canvas.stroke_rect(rect, 1.0, border);

        let text_pos = Point::new(rect.x + 8, rect.center().y);
        if self.text.is_empty() && !self.focused {
            canvas.text(text_pos, Align2::LEFT_CENTER, &self.placeholder, 14.0, palette::TEXT_MUTED);
        } else {
            let shown = if self.focused && self.caret_visible {
                format!("{}|", self.text)
            } else {
                self.text.clone()
            };
            canvas.text(text_pos, Align2::LEFT_CENTER, &shown, 14.0, palette::TEXT);
        }
    }
}

/// Static text.
#[derive(Debug, Clone)]
pub struct Label {
    pub rect: Rect,
    pub text: String,
    pub color: Color32,
    pub size: f32,
}

impl Label {
    pub fn new(rect: Rect, text: impl Into<String>) -> Self {
        Self {
            rect,
            text: text.into(),
            color: palette::TEXT,
            size: 14.0,
        }
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn render(&self, canvas: &mut dyn Canvas, origin: Point) {
        if self.text.is_empty() {
            return;
        }
        let rect = self.rect.translate(origin);
        canvas.text(
            Point::new(rect.x, rect.center().y),
            Align2::LEFT_CENTER,
            &self.text,
            self.size,
            self.color,
        );
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckBoxResponse {
    pub redraw: bool,
    pub changed: bool,
}

/// A box with a label to its right. A left click anywhere on the row flips it.
#[derive(Debug, Clone)]
pub struct CheckBox {
    pub rect: Rect,
    pub label: String,
    checked: bool,
    hovered: bool,
}

impl CheckBox {
    pub fn new(rect: Rect, label: impl Into<String>, checked: bool) -> Self {
        Self {
            rect,
            label: label.into(),
            checked,
            hovered: false,
        }
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn register_event(&mut self, event: &Event) -> CheckBoxResponse {
        let rect = self.rect;
        with_local(event, rect.origin(), |local| match &local.kind {
            EventKind::MouseMotion(_) => {
                let hovered = hits(local, rect);
                let redraw = hovered != self.hovered;
                self.hovered = hovered;
                CheckBoxResponse { redraw, changed: false }
            }
            EventKind::MouseClick(click) if click.button == MouseButton::Left && hits(local, rect) => {
                self.checked = !self.checked;
                CheckBoxResponse {
                    redraw: true,
                    changed: true,
                }
            }
            EventKind::MouseFocusChanged { focused: false } => {
                let redraw = self.hovered;
                self.hovered = false;
                CheckBoxResponse { redraw, changed: false }
            }
            _ => CheckBoxResponse::default(),
        })
    }

    pub fn render(&self, canvas: &mut dyn Canvas, origin: Point) {
        let rect = self.rect.translate(origin);
        let side = rect.height.min(18);
        let square = Rect::new(rect.x, rect.center().y - side / 2, side, side);
        let fill = if self.checked {
            palette::ACCENT
        } else if self.hovered {
            palette::HOVER
        } else {
            palette::SURFACE
        };
        canvas.fill_rounded_rect(square, 3.0, fill);
        canvas.stroke_rect(square, 1.0, palette::BORDER);
        if self.checked {
            canvas.text(square.center(), Align2::CENTER_CENTER, "✔", 12.0, palette::TEXT_ON_DARK);
        }
        canvas.text(
            Point::new(square.right() + 10, rect.center().y),
            Align2::LEFT_CENTER,
            &self.label,
            14.0,
            palette::TEXT,
        );
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropDownResponse {
    pub redraw: bool,
    /// Set when the event landed on the widget or its open list, so the
    /// owner should not hand it to anything underneath.
    pub consumed: bool,
    /// Index of a newly picked option.
    pub selected: Option<usize>,
}

/// A box showing the chosen option. Clicking it opens the option list
/// below; picking a row or clicking anywhere else closes it again.
#[derive(Debug, Clone)]
pub struct DropDown {
    pub rect: Rect,
    options: Vec<String>,
    selected: usize,
    open: bool,
    /// First option shown when the list is longer than `visible_rows`.
    scroll: usize,
    visible_rows: usize,
    hovered_row: Option<usize>,
}

impl DropDown {
    pub fn new(rect: Rect, options: Vec<String>, selected: usize) -> Self {
        let selected = selected.min(options.len().saturating_sub(1));
        Self {
            rect,
            options,
            selected,
            open: false,
            scroll: 0,
            visible_rows: 6,
            hovered_row: None,
        }
    }

    pub fn with_visible_rows(mut self, rows: usize) -> Self {
        self.visible_rows = rows.max(1);
        self
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_text(&self) -> &str {
        self.options.get(self.selected).map(String::as_str).unwrap_or("")
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) -> bool {
        let was_open = self.open;
        self.open = false;
        self.hovered_row = None;
        was_open
    }

    fn shown_rows(&self) -> usize {
        self.options.len().min(self.visible_rows)
    }

    /// Local rect of the open list, directly under the box.
    fn list_rect(&self) -> Rect {
        Rect::new(0, self.rect.height, self.rect.width, self.rect.height * self.shown_rows() as i32)
    }

    fn option_at(&self, local: Point) -> Option<usize> {
        if !self.open || !self.list_rect().contains(local) {
            return None;
        }
        let row = ((local.y - self.rect.height) / self.rect.height) as usize;
        let index = self.scroll + row;
        (index < self.options.len()).then_some(index)
    }

    fn scroll_by(&mut self, delta: i32) -> bool {
        let max = self.options.len().saturating_sub(self.visible_rows);
        let scroll = (self.scroll as i32 + delta).clamp(0, max as i32) as usize;
        let changed = scroll != self.scroll;
        self.scroll = scroll;
        changed
    }

    pub fn register_event(&mut self, event: &Event) -> DropDownResponse {
        let rect = self.rect;
        with_local(event, rect.origin(), |local| {
            let Some(position) = local.position() else {
                if matches!(local.kind, EventKind::MouseFocusChanged { focused: false }) {
                    let redraw = self.hovered_row.take().is_some();
                    return DropDownResponse { redraw, ..Default::default() };
                }
                return DropDownResponse::default();
            };
            let on_box = hits(local, rect);
            let on_list = self.open && self.list_rect().contains(position);
            let mut response = DropDownResponse {
                consumed: on_box || on_list,
                ..Default::default()
            };
            match &local.kind {
                EventKind::MouseClick(click) if click.button == MouseButton::Left => {
                    if let Some(index) = self.option_at(position) {
                        if index != self.selected {
                            self.selected = index;
                            response.selected = Some(index);
                        }
                        self.close();
                        response.redraw = true;
                    } else if on_box {
                        self.open = !self.open;
                        if self.open {
                            self.scroll = self.selected.saturating_sub(self.visible_rows - 1);
                        }
                        response.redraw = true;
                    } else {
                        response.redraw = self.close();
                    }
                }
                EventKind::MouseClick(_) if !on_box && !on_list => {
                    response.redraw = self.close();
                }
                EventKind::MouseMotion(_) => {
                    let hovered = self.option_at(position);
                    response.redraw = hovered != self.hovered_row;
                    self.hovered_row = hovered;
                }
                EventKind::MouseWheelUp(_) if on_list => response.redraw = self.scroll_by(-1),
                EventKind::MouseWheelDown(_) if on_list => response.redraw = self.scroll_by(1),
                _ => {}
            }
            response
        })
    }

    pub fn render(&self, canvas: &mut dyn Canvas, origin: Point) {
        let rect = self.rect.translate(origin);
        canvas.fill_rounded_rect(rect, 4.0, palette::SURFACE);
        canvas.stroke_rect(rect, 1.0, if self.open { palette::ACCENT } else { palette::BORDER });
        canvas.text(
            Point::new(rect.x + 8, rect.center().y),
            Align2::LEFT_CENTER,
            self.selected_text(),
            14.0,
            palette::TEXT,
        );
        canvas.text(
            Point::new(rect.right() - 10, rect.center().y),
            Align2::CENTER_CENTER,
            if self.open { "▴" } else { "▾" },
            12.0,
            palette::TEXT_MUTED,
        );
        if !self.open {
            return;
        }

        let list = self.list_rect().translate(rect.origin());
        canvas.fill_rect(list, palette::SURFACE);
        canvas.stroke_rect(list, 1.0, palette::BORDER);
        let visible = self.options.iter().enumerate().skip(self.scroll).take(self.shown_rows());
        for (row, (index, option)) in visible.enumerate() {
            let row_rect = Rect::new(list.x, list.y + row as i32 * rect.height, list.width, rect.height);
            if index == self.selected {
                canvas.fill_rect(row_rect, palette::with_alpha(palette::ACCENT, 60));
            } else if Some(index) == self.hovered_row {
                canvas.fill_rect(row_rect, palette::HOVER);
            }
            canvas.text(
                Point::new(row_rect.x + 8, row_rect.center().y),
                Align2::LEFT_CENTER,
                option,
                14.0,
                palette::TEXT,
            );
        }
    }
}
