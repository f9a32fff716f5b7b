// Add task view
// Modal dialog that creates a task or edits an existing one. It closes
// itself once its own commit has gone through the dispatch.

use egui::Key;

use crate::events::{Event, EventKind, KeyEvent, TaskDraft};
use crate::models::task::{Task, TaskImportance};
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Rect, Size};
use crate::ui_egui::view::{FrameContext, View, ViewBase, ViewRole};
use crate::ui_egui::views::palette;
use crate::ui_egui::widgets::{Button, ButtonColors, Label, TextField};

const SIZE: Size = Size::new(400, 240);

#[derive(Debug)]
pub struct AddTaskView {
    base: ViewBase,
    /// Id of the task being edited.
    editing: Option<i64>,
    title: Label,
    description: TextField,
    importance: TaskImportance,
    importance_buttons: Vec<(TaskImportance, Button)>,
    error: Label,
    save: Button,
    cancel: Button,
}

impl AddTaskView {
    pub fn new() -> Self {
        Self::build(None, "New task", "", TaskImportance::Medium)
    }

    pub fn edit(task: &Task) -> Self {
        Self::build(task.id, "Edit task", &task.description, task.importance)
    }

    fn build(editing: Option<i64>, title: &str, description: &str, importance: TaskImportance) -> Self {
        let importance_buttons = TaskImportance::ALL
            .iter()
            .enumerate()
            .map(|(i, level)| {
                let rect = Rect::new(20 + i as i32 * 122, 110, 114, 32);
                let mut button = Button::new(rect, level.label(), ButtonColors::LIGHT);
                button.selected = *level == importance;
                (*level, button)
            })
            .collect();

        Self {
            base: ViewBase::new(Rect::from_origin_size(Default::default(), SIZE)),
            editing,
            title: Label::new(Rect::new(20, 12, 360, 30), title).with_size(18.0),
            description: TextField::new(Rect::new(20, 55, 360, 36), "Description")
                .with_text(description)
                .focused(),
            importance,
            importance_buttons,
            error: Label::new(Rect::new(20, 150, 360, 20), "").with_color(palette::DANGER),
            save: Button::new(Rect::new(260, 186, 120, 36), "Save", ButtonColors::LIGHT),
            cancel: Button::new(Rect::new(130, 186, 120, 36), "Cancel", ButtonColors::LIGHT),
        }
    }

    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    pub fn error(&self) -> Option<&str> {
        Some(self.error.text.as_str()).filter(|t| !t.is_empty())
    }

    fn select_importance(&mut self, importance: TaskImportance) {
        self.importance = importance;
        for (level, button) in &mut self.importance_buttons {
            button.selected = *level == importance;
        }
    }

    fn commit(&mut self, ctx: &mut FrameContext<'_>) {
        if let Err(err) = Task::new(self.description.text(), self.importance) {
            self.error.text = err.to_string();
            return;
        }
        self.error.text.clear();

        let draft = TaskDraft {
            description: self.description.text().trim().to_string(),
            importance: self.importance,
        };
        let origin = self.base.id;
        ctx.events.enqueue(match self.editing {
            Some(id) => EventKind::EditTask { id, draft, origin },
            None => EventKind::AddTask { draft, origin },
        });
    }

    fn is_own_commit(&self, event: &Event) -> bool {
        matches!(
            event.kind,
            EventKind::AddTask { origin, .. } | EventKind::EditTask { origin, .. } if origin == self.base.id
        )
    }
}

impl Default for AddTaskView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for AddTaskView {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn role(&self) -> ViewRole {
        ViewRole::Modal
    }

    fn register_event(&mut self, event: &Event, ctx: &mut FrameContext<'_>) -> bool {
        if self.is_own_commit(event) {
            ctx.events.enqueue(EventKind::CloseView(self.base.id));
            return false;
        }
        if let EventKind::KeyPress(KeyEvent {
            key: Some(Key::Escape),
            ..
        }) = event.kind
        {
            ctx.events.enqueue(EventKind::CloseView(self.base.id));
            return false;
        }

        let field = self.description.register_event(event);
        let mut redraw = field.redraw;

        let mut picked = None;
        for (level, button) in &mut self.importance_buttons {
            let response = button.register_event(event);
            redraw |= response.redraw;
            if response.clicked {
                picked = Some(*level);
            }
        }
        if let Some(level) = picked {
            self.select_importance(level);
            redraw = true;
        }

        let save = self.save.register_event(event);
        let cancel = self.cancel.register_event(event);
        redraw |= save.redraw || cancel.redraw;

        if cancel.clicked {
            ctx.events.enqueue(EventKind::CloseView(self.base.id));
        } else if save.clicked || field.submitted {
            self.commit(ctx);
            redraw = true;
        }
        redraw
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        let rect = self.base.rect;
        let origin = rect.origin();
        canvas.fill_rounded_rect(rect, 8.0, palette::SURFACE);
        self.title.render(canvas, origin);
        self.description.render(canvas, origin);
        for (_, button) in &self.importance_buttons {
            button.render(canvas, origin);
        }
        self.error.render(canvas, origin);
        self.cancel.render(canvas, origin);
        self.save.render(canvas, origin);
    }

    fn min_size(&self) -> Size {
        SIZE
    }
}
