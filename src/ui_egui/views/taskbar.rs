// Taskbar view
// Vertical strip on the left with one toggle per side panel and the
// settings toggle pinned to the bottom

use crate::events::{Event, EventKind};
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Rect, Size};
use crate::ui_egui::view::{FrameContext, PanelKind, View, ViewBase, ViewRole};
use crate::ui_egui::views::palette;
use crate::ui_egui::widgets::{Button, ButtonColors};

const BUTTON_HEIGHT: i32 = 50;
const BUTTON_GAP: i32 = 6;
const MIN_HEIGHT: i32 = 530;

const TOGGLES: [(PanelKind, &str, &str); 3] = [
    (PanelKind::Todo, "☑", "To-do list"),
    (PanelKind::Search, "🔍", "Search"),
    (PanelKind::Profile, "👤", "Profile"),
];
const SETTINGS_TOOLTIP: &str = "Settings";

#[derive(Debug)]
pub struct TaskbarView {
    base: ViewBase,
    buttons: Vec<(PanelKind, Button)>,
    settings: Button,
    /// Panel the taskbar believes is open.
    selected: Option<PanelKind>,
    tooltip_for: Option<&'static str>,
}

impl TaskbarView {
    pub fn new(width: i32, height: i32) -> Self {
        let buttons = TOGGLES
            .iter()
            .enumerate()
            .map(|(i, (kind, icon, _))| {
                let y = BUTTON_GAP + i as i32 * (BUTTON_HEIGHT + BUTTON_GAP);
                let rect = Rect::new(BUTTON_GAP, y, width - BUTTON_GAP * 2, BUTTON_HEIGHT);
                (*kind, Button::new(rect, *icon, ButtonColors::DARK))
            })
            .collect();
        let mut view = Self {
            base: ViewBase::new(Rect::new(0, 0, width, height)),
            buttons,
            settings: Button::new(Rect::default(), "⚙", ButtonColors::DARK),
            selected: None,
            tooltip_for: None,
        };
        view.layout();
        view
    }

    pub fn selected(&self) -> Option<PanelKind> {
        self.selected
    }

    pub fn settings_selected(&self) -> bool {
        self.settings.selected
    }

    fn layout(&mut self) {
        let rect = self.base.rect;
        self.settings.rect = Rect::new(
            BUTTON_GAP,
            rect.height - BUTTON_GAP - BUTTON_HEIGHT,
            rect.width - BUTTON_GAP * 2,
            BUTTON_HEIGHT,
        );
    }

    fn tooltip_text(kind: PanelKind) -> &'static str {
        TOGGLES
            .iter()
            .find(|(k, _, _)| *k == kind)
            .map_or("", |(_, _, text)| *text)
    }

    fn select(&mut self, selected: Option<PanelKind>) {
        self.selected = selected;
        for (kind, button) in &mut self.buttons {
            button.selected = Some(*kind) == selected;
        }
    }

    fn update_tooltip(&mut self, ctx: &mut FrameContext<'_>) {
        let hovered = self
            .buttons
            .iter()
            .find(|(_, b)| b.is_hovered())
            .map(|(kind, b)| (Self::tooltip_text(*kind), b.rect))
            .or_else(|| {
                self.settings
                    .is_hovered()
                    .then_some((SETTINGS_TOOLTIP, self.settings.rect))
            });

        match hovered {
            Some((text, rect)) if self.tooltip_for != Some(text) => {
                let origin = self.base.rect.origin();
                let anchor = Point::new(origin.x + rect.right() + 8, origin.y + rect.y + 12);
                ctx.events.enqueue(EventKind::ShowTooltip {
                    text: text.to_string(),
                    anchor,
                });
                self.tooltip_for = Some(text);
            }
            None if self.tooltip_for.is_some() => {
                ctx.events.enqueue(EventKind::HideTooltip);
                self.tooltip_for = None;
            }
            _ => {}
        }
    }
}

impl View for TaskbarView {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn role(&self) -> ViewRole {
        ViewRole::Bar
    }

    fn register_event(&mut self, event: &Event, ctx: &mut FrameContext<'_>) -> bool {
        match &event.kind {
            // The controller has already opened or closed the panel.
            EventKind::TogglePanel(kind) => {
                let next = if self.selected == Some(*kind) { None } else { Some(*kind) };
                self.select(next);
                return true;
            }
            EventKind::OpenEventList(_) => {
                self.select(None);
                return true;
            }
            EventKind::ToggleSettings => {
                self.settings.selected = !self.settings.selected;
                return true;
            }
            _ => {}
        }

        let mut redraw = false;
        let mut toggled = None;
        for (kind, button) in &mut self.buttons {
            let response = button.register_event(event);
            redraw |= response.redraw;
            if response.clicked {
                toggled = Some(*kind);
            }
        }
        if let Some(kind) = toggled {
            log::debug!("Taskbar toggles {:?}", kind);
            ctx.events.enqueue(EventKind::TogglePanel(kind));
        }
        let settings = self.settings.register_event(event);
        redraw |= settings.redraw;
        if settings.clicked {
            ctx.events.enqueue(EventKind::ToggleSettings);
        }
        if redraw {
            self.update_tooltip(ctx);
        }
        redraw
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.fill_rect(self.base.rect, palette::TASKBAR);
        let origin = self.base.rect.origin();
        for (_, button) in &self.buttons {
            button.render(canvas, origin);
        }
        self.settings.render(canvas, origin);
    }

    fn min_size(&self) -> Size {
        Size::new(self.base.rect.width, MIN_HEIGHT)
    }

    fn resize(&mut self, width: Option<i32>, height: Option<i32>) {
        if let Some(width) = width {
            self.base.rect.width = width;
        }
        if let Some(height) = height {
            self.base.rect.height = height;
        }
        self.layout();
        self.base.rendering = true;
    }
}
