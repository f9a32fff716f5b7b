// Shared side panel chrome

use egui::Align2;

use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Rect, Size};
use crate::ui_egui::views::palette;

pub const HEADER_HEIGHT: i32 = 50;
pub const ROW_HEIGHT: i32 = 36;
pub const DEFAULT_WIDTH: i32 = 300;
pub const MIN_SIZE: Size = Size::new(250, 300);

/// Background, right separator and title. `rect` is in window coordinates.
pub fn render_chrome(canvas: &mut dyn Canvas, rect: Rect, title: &str) {
    canvas.fill_rect(rect, palette::SURFACE);
    canvas.text(
        Point::new(rect.x + 16, rect.y + HEADER_HEIGHT / 2),
        Align2::LEFT_CENTER,
        title,
        18.0,
        palette::TEXT,
    );
    canvas.line(
        Point::new(rect.x, rect.y + HEADER_HEIGHT),
        Point::new(rect.right(), rect.y + HEADER_HEIGHT),
        1.0,
        palette::BORDER,
    );
}

/// Index of the list row under `y` (panel-local), given the scroll offset.
pub fn row_at(y: i32, top: i32, scroll: i32, rows: usize) -> Option<usize> {
    if y < top {
        return None;
    }
    let index = usize::try_from((y - top + scroll) / ROW_HEIGHT).ok()?;
    (index < rows).then_some(index)
}

/// Largest scroll offset that still shows the last row.
pub fn max_scroll(rows: usize, visible_height: i32) -> i32 {
    (rows as i32 * ROW_HEIGHT - visible_height).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(49, 0, None ; "above list")]
    #[test_case(50, 0, Some(0) ; "first row")]
    #[test_case(121, 0, Some(1) ; "second row")]
    #[test_case(50, 72, Some(2) ; "scrolled")]
    #[test_case(200, 0, None ; "past last row")]
    fn test_row_at(y: i32, scroll: i32, expected: Option<usize>) {
        assert_eq!(row_at(y, HEADER_HEIGHT, scroll, 3), expected);
    }

    #[test]
    fn test_max_scroll_never_negative() {
        assert_eq!(max_scroll(2, 500), 0);
        assert_eq!(max_scroll(20, 500), 20 * ROW_HEIGHT - 500);
    }
}
