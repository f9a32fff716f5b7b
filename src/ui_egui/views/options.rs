// Options view
// Context menu with Edit and Delete for one task or calendar event

use crate::events::{Event, EventKind};
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Rect, Size};
use crate::ui_egui::view::{FrameContext, View, ViewBase, ViewRole};
use crate::ui_egui::views::palette;
use crate::ui_egui::widgets::{Button, ButtonColors};

const WIDTH: i32 = 130;
const ITEM_HEIGHT: i32 = 32;
const PADDING: i32 = 4;

/// What the menu acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsTarget {
    Task(i64),
    CalendarEvent(i64),
}

#[derive(Debug)]
pub struct OptionsView {
    base: ViewBase,
    target: OptionsTarget,
    edit: Button,
    delete: Button,
}

impl OptionsView {
    /// `anchor` is the window position the menu opens at.
    pub fn new(target: OptionsTarget, anchor: Point) -> Self {
        let size = Size::new(WIDTH, ITEM_HEIGHT * 2 + PADDING * 2);
        let mut delete_colors = ButtonColors::LIGHT;
        delete_colors.text = palette::DANGER;
        Self {
            base: ViewBase::new(Rect::from_origin_size(anchor, size)),
            target,
            edit: Button::new(Rect::new(PADDING, PADDING, WIDTH - PADDING * 2, ITEM_HEIGHT), "Edit", ButtonColors::LIGHT),
            delete: Button::new(
                Rect::new(PADDING, PADDING + ITEM_HEIGHT, WIDTH - PADDING * 2, ITEM_HEIGHT),
                "Delete",
                delete_colors,
            ),
        }
    }

    pub fn target(&self) -> OptionsTarget {
        self.target
    }
}

impl View for OptionsView {
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
        let edit = self.edit.register_event(event);
        let delete = self.delete.register_event(event);

        let chosen = match (edit.clicked, delete.clicked, self.target) {
            (true, _, OptionsTarget::Task(id)) => Some(EventKind::OpenEditTask(id)),
            (true, _, OptionsTarget::CalendarEvent(id)) => Some(EventKind::OpenEditCalendarEvent(id)),
            (_, true, OptionsTarget::Task(id)) => Some(EventKind::DeleteTask(id)),
            (_, true, OptionsTarget::CalendarEvent(id)) => Some(EventKind::DeleteCalendarEvent(id)),
            _ => None,
        };
        if let Some(kind) = chosen {
            ctx.events.enqueue(kind);
            ctx.events.enqueue(EventKind::CloseView(self.base.id));
            return true;
        }
        edit.redraw || delete.redraw
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        let rect = self.base.rect;
        canvas.fill_rounded_rect(rect, 6.0, palette::SURFACE);
        canvas.stroke_rect(rect, 1.0, palette::BORDER);
        self.edit.render(canvas, rect.origin());
        self.delete.render(canvas, rect.origin());
    }

    fn min_size(&self) -> Size {
        self.base.rect.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui_egui::test_support::{click, TestEnv};

    #[test]
    fn test_delete_then_close_itself() {
        let mut env = TestEnv::new();
        let mut menu = OptionsView::new(OptionsTarget::CalendarEvent(7), Point::new(300, 200));
        env.dispatch(&mut menu, click(310, 250));

        let events = env.drain();
        assert!(matches!(events[0].kind, EventKind::DeleteCalendarEvent(7)));
        assert!(matches!(events[1].kind, EventKind::CloseView(id) if id == menu.id()));
    }

    #[test]
    fn test_edit_task() {
        let mut env = TestEnv::new();
        let mut menu = OptionsView::new(OptionsTarget::Task(3), Point::new(0, 0));
        env.dispatch(&mut menu, click(20, 10));
        assert_eq!(env.drain_names(), vec!["OpenEditTask", "CloseView"]);
    }
}
