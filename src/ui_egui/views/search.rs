// Search view
// Side panel that filters tasks and calendar events by description

use egui::Align2;

use crate::events::{Event, EventKind, MouseButton};
use crate::models::calendar_event::CalendarEvent;
use crate::models::task::Task;
use crate::services::Models;
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Rect, Size};
use crate::ui_egui::panel_resize::{PanelResizeBorder, BORDER_WIDTH};
use crate::ui_egui::view::{FrameContext, PanelKind, View, ViewBase, ViewRole};
use crate::ui_egui::views::palette;
use crate::ui_egui::views::panel::{self, HEADER_HEIGHT, ROW_HEIGHT};
use crate::ui_egui::widgets::TextField;

const FIELD_HEIGHT: i32 = 36;
/// Top of the first result row.
const RESULTS_TOP: i32 = HEADER_HEIGHT + FIELD_HEIGHT + 20;

#[derive(Debug)]
enum SearchHit {
    Task(Task),
    Event(CalendarEvent),
}

#[derive(Debug)]
pub struct SearchView {
    base: ViewBase,
    query: TextField,
    hits: Vec<SearchHit>,
    border: PanelResizeBorder,
}

impl SearchView {
    pub fn new() -> Self {
        let base = ViewBase::new(Rect::new(0, 0, panel::DEFAULT_WIDTH, panel::MIN_SIZE.height));
        let border = PanelResizeBorder::new(base.id, panel::MIN_SIZE.width, base.rect);
        let mut view = Self {
            base,
            query: TextField::new(Rect::default(), "Search tasks and events").focused(),
            hits: Vec::new(),
            border,
        };
        view.layout();
        view
    }

    pub fn query(&self) -> &str {
        self.query.text()
    }

    pub fn hit_count(&self) -> usize {
        self.hits.len()
    }

    fn layout(&mut self) {
        let rect = self.base.rect;
        self.query.rect = Rect::new(12, HEADER_HEIGHT + 10, rect.width - BORDER_WIDTH - 24, FIELD_HEIGHT);
        self.border.layout(rect.width, rect.height);
    }

    fn run_query(&mut self, models: &Models) {
        let query = self.query.text();
        let tasks = models.tasks().search(query);
        let events = models.calendar().search(query);
        match (tasks, events) {
            (Ok(tasks), Ok(events)) => {
                self.hits = tasks
                    .into_iter()
                    .map(SearchHit::Task)
                    .chain(events.into_iter().map(SearchHit::Event))
                    .collect();
            }
            (Err(err), _) | (_, Err(err)) => log::error!("Search for '{}' failed: {:#}", query, err),
        }
    }
}

impl Default for SearchView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for SearchView {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn role(&self) -> ViewRole {
        ViewRole::Panel(PanelKind::Search)
    }

    fn register_event(&mut self, event: &Event, ctx: &mut FrameContext<'_>) -> bool {
        if matches!(event.kind, EventKind::UpdateTasks | EventKind::UpdateCalendar) {
            self.run_query(ctx.models);
            return true;
        }
        if self.border.register_event(event, ctx) {
            return true;
        }

        let field = self.query.register_event(event);
        if field.changed {
            self.run_query(ctx.models);
        }

        if let EventKind::MouseClick(click) = &event.kind {
            if click.button == MouseButton::Left {
                let row = panel::row_at(click.y, RESULTS_TOP, 0, self.hits.len())
                    .filter(|_| click.x < self.base.rect.width - BORDER_WIDTH);
                if let Some(SearchHit::Event(found)) = row.map(|i| &self.hits[i]) {
                    ctx.events.enqueue(EventKind::OpenEventList(found.date));
                }
            }
        }
        field.redraw
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        let rect = self.base.rect;
        let origin = rect.origin();
        panel::render_chrome(canvas, rect, "Search");
        self.query.render(canvas, origin);

        if self.hits.is_empty() && !self.query.text().is_empty() {
            canvas.text(
                Point::new(rect.x + 16, rect.y + RESULTS_TOP + 16),
                Align2::LEFT_CENTER,
                "No matches",
                13.0,
                palette::TEXT_MUTED,
            );
        }
        for (i, hit) in self.hits.iter().enumerate() {
            let y = rect.y + RESULTS_TOP + i as i32 * ROW_HEIGHT;
            if y >= rect.bottom() {
                break;
            }
            let center = y + ROW_HEIGHT / 2;
            let (marker, text, detail) = match hit {
                SearchHit::Task(task) => (palette::importance_color(task.importance), task.description.as_str(), "To-do".to_string()),
                SearchHit::Event(event) => (
                    palette::event_color(event.color),
                    event.description.as_str(),
                    event.date.format("%d.%m.%Y").to_string(),
                ),
            };
            canvas.fill_rounded_rect(Rect::new(rect.x + 14, center - 5, 10, 10), 5.0, marker);
            canvas.text(Point::new(rect.x + 34, center), Align2::LEFT_CENTER, text, 14.0, palette::TEXT);
            canvas.text(
                Point::new(rect.right() - BORDER_WIDTH - 12, center),
                Align2::RIGHT_CENTER,
                &detail,
                12.0,
                palette::TEXT_MUTED,
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
        self.base.rendering = true;
    }
}
