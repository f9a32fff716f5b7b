// Choose month view
// Context menu listing the twelve months, opened from the calendar title

use crate::events::{Event, EventKind};
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Rect, Size};
use crate::ui_egui::view::{FrameContext, View, ViewBase, ViewRole};
use crate::ui_egui::views::palette;
use crate::ui_egui::widgets::{Button, ButtonColors};
use crate::utils::date::MONTH_NAMES;

const WIDTH: i32 = 140;
const ITEM_HEIGHT: i32 = 30;
const ITEM_GAP: i32 = 2;
const PADDING: i32 = 5;

#[derive(Debug)]
pub struct ChooseMonthView {
    base: ViewBase,
    year: i32,
    months: Vec<Button>,
}

impl ChooseMonthView {
    /// `anchor` is the window position of the top-left corner. `current`
    /// (1-based) is highlighted.
    pub fn new(year: i32, current: u32, anchor: Point) -> Self {
        let count = MONTH_NAMES.len() as i32;
        let size = Size::new(WIDTH, PADDING * 2 + count * (ITEM_HEIGHT + ITEM_GAP) - ITEM_GAP);
        let months = MONTH_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let y = PADDING + i as i32 * (ITEM_HEIGHT + ITEM_GAP);
                let mut button = Button::new(
                    Rect::new(PADDING, y, WIDTH - PADDING * 2, ITEM_HEIGHT),
                    *name,
                    ButtonColors::LIGHT,
                );
                button.selected = i as u32 + 1 == current;
                button
            })
            .collect();
        Self {
            base: ViewBase::new(Rect::from_origin_size(anchor, size)),
            year,
            months,
        }
    }
}

impl View for ChooseMonthView {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn role(&self) -> ViewRole {
        ViewRole::ContextMenu
    }

    fn register_event(&mut self, event: &Event, ctx: &mut FrameContext<'_>) -> bool {
        let mut redraw = false;
        let mut chosen = None;
        for (i, button) in self.months.iter_mut().enumerate() {
            let response = button.register_event(event);
            redraw |= response.redraw;
            if response.clicked {
                chosen = Some(i as u32 + 1);
            }
        }

        if let Some(month) = chosen {
            log::debug!("Picked {}-{:02}", self.year, month);
            ctx.events.enqueue(EventKind::ChangeMonth { year: self.year, month });
            ctx.events.enqueue(EventKind::CloseView(self.base.id));
            return true;
        }
        redraw
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        let rect = self.base.rect;
        canvas.fill_rounded_rect(rect, 6.0, palette::SURFACE);
        canvas.stroke_rect(rect, 1.0, palette::BORDER);
        for month in &self.months {
            month.render(canvas, rect.origin());
        }
    }

    fn min_size(&self) -> Size {
        self.base.rect.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui_egui::canvas::RecordingCanvas;
    use crate::ui_egui::test_support::{click, TestEnv};

    #[test]
    fn test_picking_month_changes_month_then_closes() {
        let mut env = TestEnv::new();
        let mut menu = ChooseMonthView::new(2024, 3, Point::new(100, 80));
        // Row for July: index 6.
        let y = 80 + PADDING + 6 * (ITEM_HEIGHT + ITEM_GAP) + 10;
        env.dispatch(&mut menu, click(150, y));

        let events = env.drain();
        assert!(matches!(events[0].kind, EventKind::ChangeMonth { year: 2024, month: 7 }));
        assert!(matches!(events[1].kind, EventKind::CloseView(id) if id == menu.id()));
    }

    #[test]
    fn test_click_between_rows_does_nothing() {
        let mut env = TestEnv::new();
        let mut menu = ChooseMonthView::new(2024, 3, Point::new(0, 0));
        env.dispatch(&mut menu, click(1, 1));
        assert!(env.drain().is_empty());
    }

    #[test]
    fn test_lists_every_month() {
        let menu = ChooseMonthView::new(2024, 3, Point::new(0, 0));
        let mut canvas = RecordingCanvas::new();
        menu.render(&mut canvas);
        assert!(canvas.has_text("January"));
        assert!(canvas.has_text("December"));
        assert_eq!(menu.min_size().height, 5 * 2 + 12 * 32 - 2);
    }
}
