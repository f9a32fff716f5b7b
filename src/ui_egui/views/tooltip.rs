use egui::{Align2, Color32};

use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Rect};

const PADDING: i32 = 6;
/// Rough glyph advance used to size the bubble.
const CHAR_WIDTH: i32 = 7;
const HEIGHT: i32 = 24;

/// Floating tooltip. Purely cosmetic; never receives input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndependentLabel {
    pub text: String,
    pub anchor: Point,
}

impl IndependentLabel {
    pub fn new(text: impl Into<String>, anchor: Point) -> Self {
        Self {
            text: text.into(),
            anchor,
        }
    }

    pub fn rect(&self) -> Rect {
        let width = self.text.chars().count() as i32 * CHAR_WIDTH + PADDING * 2;
        Rect::new(self.anchor.x, self.anchor.y, width, HEIGHT)
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        let rect = self.rect();
        canvas.fill_rounded_rect(rect, 4.0, Color32::from_rgb(50, 54, 66));
        canvas.text(
            Point::new(rect.x + PADDING, rect.center().y),
            Align2::LEFT_CENTER,
            &self.text,
            12.0,
            Color32::WHITE,
        );
    }
}
