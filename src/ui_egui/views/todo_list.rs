// To-do list view
// Side panel listing every task, most important first

use egui::Align2;

use crate::events::{Event, EventKind, MouseButton};
use crate::models::task::Task;
use crate::services::Models;
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Rect, Size};
use crate::ui_egui::panel_resize::{PanelResizeBorder, BORDER_WIDTH};
use crate::ui_egui::view::{FrameContext, PanelKind, View, ViewBase, ViewRole};
use crate::ui_egui::views::add_task::AddTaskView;
use crate::ui_egui::views::options::{OptionsTarget, OptionsView};
use crate::ui_egui::views::palette;
use crate::ui_egui::views::panel::{self, HEADER_HEIGHT, ROW_HEIGHT};
use crate::ui_egui::widgets::{Button, ButtonColors};

#[derive(Debug)]
pub struct TodoListView {
    base: ViewBase,
    tasks: Vec<Task>,
    add: Button,
    border: PanelResizeBorder,
    scroll: i32,
    hovered_row: Option<usize>,
}

impl TodoListView {
    pub fn new(models: &Models) -> Self {
        let base = ViewBase::new(Rect::new(0, 0, panel::DEFAULT_WIDTH, panel::MIN_SIZE.height));
        let border = PanelResizeBorder::new(base.id, panel::MIN_SIZE.width, base.rect);
        let mut view = Self {
            base,
            tasks: Vec::new(),
            add: Button::new(Rect::default(), "+ Add", ButtonColors::LIGHT),
            border,
            scroll: 0,
            hovered_row: None,
        };
        view.layout();
        view.reload(models);
        view
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn reload(&mut self, models: &Models) {
        match models.tasks().list_all() {
            Ok(tasks) => {
                self.tasks = tasks;
                self.clamp_scroll();
            }
            Err(err) => log::error!("Failed to load tasks: {:#}", err),
        }
    }

    fn layout(&mut self) {
        let rect = self.base.rect;
        self.add.rect = Rect::new(rect.width - BORDER_WIDTH - 92, 10, 80, 30);
        self.border.layout(rect.width, rect.height);
    }

    fn clamp_scroll(&mut self) {
        let visible = self.base.rect.height - HEADER_HEIGHT;
        self.scroll = self.scroll.clamp(0, panel::max_scroll(self.tasks.len(), visible));
    }

    fn row_at(&self, position: Point) -> Option<usize> {
        let list = Rect::new(0, HEADER_HEIGHT, self.base.rect.width - BORDER_WIDTH, self.base.rect.height);
        if !list.contains(position) {
            return None;
        }
        panel::row_at(position.y, HEADER_HEIGHT, self.scroll, self.tasks.len())
    }
}

impl View for TodoListView {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn role(&self) -> ViewRole {
        ViewRole::Panel(PanelKind::Todo)
    }

    fn register_event(&mut self, event: &Event, ctx: &mut FrameContext<'_>) -> bool {
        if let EventKind::UpdateTasks = event.kind {
            self.reload(ctx.models);
            return true;
        }
        if self.border.register_event(event, ctx) {
            return true;
        }

        let add = self.add.register_event(event);
        if add.clicked {
            ctx.events.enqueue(EventKind::OpenView(Box::new(AddTaskView::new())));
            return true;
        }
        let mut redraw = add.redraw;

        let inside = event.position().is_some_and(|p| self.base.local_rect().contains(p));
        match &event.kind {
            EventKind::MouseClick(click) if click.button == MouseButton::Right => {
                let position = Point::new(click.x, click.y);
                let id = self.row_at(position).and_then(|row| self.tasks[row].id);
                if let Some(id) = id {
                    let anchor = self.base.rect.origin().offset(position.x, position.y);
                    ctx.events.enqueue(EventKind::OpenView(Box::new(OptionsView::new(
                        OptionsTarget::Task(id),
                        anchor,
                    ))));
                }
            }
            EventKind::MouseWheelUp(_) | EventKind::MouseWheelDown(_) if inside => {
                let step = if matches!(event.kind, EventKind::MouseWheelUp(_)) { -ROW_HEIGHT } else { ROW_HEIGHT };
                let before = self.scroll;
                self.scroll += step;
                self.clamp_scroll();
                redraw |= before != self.scroll;
            }
            EventKind::MouseMotion(motion) => {
                let hovered = self.row_at(Point::new(motion.x, motion.y));
                redraw |= hovered != self.hovered_row;
                self.hovered_row = hovered;
            }
            EventKind::MouseFocusChanged { focused: false } => {
                redraw |= self.hovered_row.take().is_some();
            }
            _ => {}
        }
        redraw
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        let rect = self.base.rect;
        let origin = rect.origin();
        panel::render_chrome(canvas, rect, "To-do");
        self.add.render(canvas, origin);

        if self.tasks.is_empty() {
            canvas.text(
                Point::new(rect.x + 16, rect.y + HEADER_HEIGHT + 24),
                Align2::LEFT_CENTER,
                "Nothing to do",
                13.0,
                palette::TEXT_MUTED,
            );
        }
        for (i, task) in self.tasks.iter().enumerate() {
            let y = rect.y + HEADER_HEIGHT + i as i32 * ROW_HEIGHT - self.scroll;
            if y + ROW_HEIGHT <= rect.y + HEADER_HEIGHT || y >= rect.bottom() {
                continue;
            }
            let row = Rect::new(rect.x, y, rect.width - BORDER_WIDTH, ROW_HEIGHT);
            if Some(i) == self.hovered_row {
                canvas.fill_rect(row, palette::HOVER);
            }
            canvas.fill_rounded_rect(
                Rect::new(row.x + 14, row.center().y - 5, 10, 10),
                5.0,
                palette::importance_color(task.importance),
            );
            canvas.text(
                Point::new(row.x + 34, row.center().y),
                Align2::LEFT_CENTER,
                &task.description,
                14.0,
                palette::TEXT,
            );
        }
        self.border.render(canvas, origin);
    }

    fn min_size(&self) -> Size {
        panel::MIN_SIZE
    }

    fn resize(&mut self, width: Option<i32>, height: Option<i32>) {
        if let Some(width) = width {
            self.base.rect.width = width;
        }
        if let Some(height) = height {
            self.base.rect.height = height;
        }
        self.layout();
        self.clamp_scroll();
        self.base.rendering = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::TaskImportance;
    use crate::ui_egui::test_support::{click, right_click, TestEnv};

    fn seeded() -> TestEnv {
        let env = TestEnv::new();
        for (description, importance) in [("water plants", TaskImportance::Low), ("pay rent", TaskImportance::High)] {
            env.models
                .tasks()
                .create(Task::new(description, importance).unwrap())
                .unwrap();
        }
        env
    }

    #[test]
    fn test_lists_tasks_by_importance() {
        let env = seeded();
        let view = TodoListView::new(&env.models);
        let order: Vec<_> = view.tasks().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(order, vec!["pay rent", "water plants"]);
    }

    #[test]
    fn test_add_button_opens_dialog() {
        let mut env = seeded();
        let mut view = TodoListView::new(&env.models);
        view.resize(Some(300), Some(700));
        env.send(&mut view, click(300 - BORDER_WIDTH - 80, 20));

        let events = env.drain();
        assert!(matches!(&events[0].kind, EventKind::OpenView(v) if v.role() == ViewRole::Modal));
    }

    #[test]
    fn test_right_click_row_opens_options_at_window_position() {
        let mut env = seeded();
        let mut view = TodoListView::new(&env.models);
        view.resize(Some(300), Some(700));
        view.set_position(Point::new(60, 30));

        env.dispatch(&mut view, right_click(60 + 40, 30 + HEADER_HEIGHT + ROW_HEIGHT + 5));

        let events = env.drain();
        let EventKind::OpenView(menu) = &events[0].kind else {
            panic!("expected OpenView");
        };
        assert_eq!(menu.role(), ViewRole::ContextMenu);
        assert_eq!(menu.rect().origin(), Point::new(100, 30 + HEADER_HEIGHT + ROW_HEIGHT + 5));
    }

    #[test]
    fn test_update_tasks_reloads() {
        let mut env = TestEnv::new();
        let mut view = TodoListView::new(&env.models);
        assert!(view.tasks().is_empty());
        env.models
            .tasks()
            .create(Task::new("read", TaskImportance::Medium).unwrap())
            .unwrap();
        env.send(&mut view, Event::now(EventKind::UpdateTasks));
        assert_eq!(view.tasks().len(), 1);
    }
}
