//! Drawing primitives the views render through.
//!
//! The application paints with an [`egui::Painter`]; tests use
//! [`RecordingCanvas`] to inspect what a view drew.

use egui::{Align2, Color32, FontId, Stroke};

use crate::ui_egui::geometry::{Point, Rect};

pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color32);
    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color32);
    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color32);
    fn line(&mut self, from: Point, to: Point, width: f32, color: Color32);
    /// Draw `text` so that `anchor` of its bounding box sits on `pos`.
    fn text(&mut self, pos: Point, anchor: Align2, text: &str, size: f32, color: Color32);
}

impl Canvas for egui::Painter {
    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        self.rect_filled(rect.to_egui(), 0.0, color);
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color32) {
        self.rect_filled(rect.to_egui(), radius, color);
    }

    fn stroke_rect(&mut self, rect: Rect, width: f32, color: Color32) {
        self.rect_stroke(rect.to_egui(), 0.0, Stroke::new(width, color));
    }

    fn line(&mut self, from: Point, to: Point, width: f32, color: Color32) {
        self.line_segment([from.to_pos2(), to.to_pos2()], Stroke::new(width, color));
    }

    fn text(&mut self, pos: Point, anchor: Align2, text: &str, size: f32, color: Color32) {
        egui::Painter::text(self, pos.to_pos2(), anchor, text, FontId::proportional(size), color);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect { rect: Rect, color: Color32 },
    StrokeRect { rect: Rect, color: Color32 },
    Line { from: Point, to: Point },
    Text { pos: Point, text: String },
}

/// Canvas that records draw calls.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color32) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, _radius: f32, color: Color32) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, _width: f32, color: Color32) {
        self.commands.push(DrawCommand::StrokeRect { rect, color });
    }

    fn line(&mut self, from: Point, to: Point, _width: f32, _color: Color32) {
        self.commands.push(DrawCommand::Line { from, to });
    }

    fn text(&mut self, pos: Point, _anchor: Align2, text: &str, _size: f32, _color: Color32) {
        self.commands.push(DrawCommand::Text {
            pos,
            text: text.to_string(),
        });
    }
}
