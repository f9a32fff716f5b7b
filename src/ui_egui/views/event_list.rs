// Event list view
// Side panel with the events of one day, recurring ones included

use chrono::NaiveDate;
use egui::Align2;

use crate::events::{Event, EventKind, MouseButton};
use crate::models::calendar_event::CalendarEvent;
use crate::services::Models;
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Rect, Size};
use crate::ui_egui::panel_resize::{PanelResizeBorder, BORDER_WIDTH};
use crate::ui_egui::view::{FrameContext, PanelKind, View, ViewBase, ViewRole};
use crate::ui_egui::views::add_event::AddEventView;
use crate::ui_egui::views::options::{OptionsTarget, OptionsView};
use crate::ui_egui::views::palette;
use crate::ui_egui::views::panel::{self, HEADER_HEIGHT, ROW_HEIGHT};
use crate::ui_egui::widgets::{Button, ButtonColors};

#[derive(Debug)]
pub struct EventListView {
    base: ViewBase,
    date: NaiveDate,
    events: Vec<CalendarEvent>,
    add: Button,
    border: PanelResizeBorder,
    scroll: i32,
}

impl EventListView {
    pub fn new(date: NaiveDate, models: &Models) -> Self {
        let base = ViewBase::new(Rect::new(0, 0, panel::DEFAULT_WIDTH, panel::MIN_SIZE.height));
        let border = PanelResizeBorder::new(base.id, panel::MIN_SIZE.width, base.rect);
        let mut view = Self {
            base,
            date,
            events: Vec::new(),
            add: Button::new(Rect::default(), "+ Add", ButtonColors::LIGHT),
            border,
            scroll: 0,
        };
        view.layout();
        view.reload(models);
        view
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    fn reload(&mut self, models: &Models) {
        match models.calendar().events_on(self.date) {
            Ok(events) => self.events = events,
            Err(err) => log::error!("Failed to load events for {}: {:#}", self.date, err),
        }
    }

    fn layout(&mut self) {
        let rect = self.base.rect;
        self.add.rect = Rect::new(rect.width - BORDER_WIDTH - 92, 10, 80, 30);
        self.border.layout(rect.width, rect.height);
    }

    fn row_at(&self, position: Point) -> Option<usize> {
        let list = Rect::new(0, HEADER_HEIGHT, self.base.rect.width - BORDER_WIDTH, self.base.rect.height);
        if !list.contains(position) {
            return None;
        }
        panel::row_at(position.y, HEADER_HEIGHT, self.scroll, self.events.len())
    }
}

impl View for EventListView {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn role(&self) -> ViewRole {
        ViewRole::Panel(PanelKind::EventList)
    }

    fn register_event(&mut self, event: &Event, ctx: &mut FrameContext<'_>) -> bool {
        if let EventKind::UpdateCalendar = event.kind {
            self.reload(ctx.models);
            return true;
        }
        if self.border.register_event(event, ctx) {
            return true;
        }

        let add = self.add.register_event(event);
        if add.clicked {
            ctx.events
                .enqueue(EventKind::OpenView(Box::new(AddEventView::new(self.date))));
            return true;
        }

        let inside = event.position().is_some_and(|p| self.base.local_rect().contains(p));
        match &event.kind {
            EventKind::MouseClick(click) if click.button == MouseButton::Right => {
                let position = Point::new(click.x, click.y);
                if let Some(id) = self.row_at(position).and_then(|row| self.events[row].id) {
                    let anchor = self.base.rect.origin().offset(position.x, position.y);
                    ctx.events.enqueue(EventKind::OpenView(Box::new(OptionsView::new(
                        OptionsTarget::CalendarEvent(id),
                        anchor,
                    ))));
                }
                add.redraw
            }
            EventKind::MouseWheelUp(_) | EventKind::MouseWheelDown(_) if inside => {
                let step = if matches!(event.kind, EventKind::MouseWheelUp(_)) { -ROW_HEIGHT } else { ROW_HEIGHT };
                let visible = self.base.rect.height - HEADER_HEIGHT;
                let before = self.scroll;
                self.scroll = (self.scroll + step).clamp(0, panel::max_scroll(self.events.len(), visible));
                add.redraw || before != self.scroll
            }
            _ => add.redraw,
        }
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        let rect = self.base.rect;
        let origin = rect.origin();
        panel::render_chrome(canvas, rect, &self.date.format("%a %d %b").to_string());
        self.add.render(canvas, origin);

        if self.events.is_empty() {
            canvas.text(
                Point::new(rect.x + 16, rect.y + HEADER_HEIGHT + 24),
                Align2::LEFT_CENTER,
                "No events",
                13.0,
                palette::TEXT_MUTED,
            );
        }
        for (i, event) in self.events.iter().enumerate() {
            let y = rect.y + HEADER_HEIGHT + i as i32 * ROW_HEIGHT - self.scroll;
            if y + ROW_HEIGHT <= rect.y + HEADER_HEIGHT || y >= rect.bottom() {
                continue;
            }
            let row = Rect::new(rect.x, y, rect.width - BORDER_WIDTH, ROW_HEIGHT);
            canvas.fill_rect(
                Rect::new(row.x + 10, row.y + 6, 4, ROW_HEIGHT - 12),
                palette::event_color(event.color),
            );
            canvas.text(
                Point::new(row.x + 22, row.center().y),
                Align2::LEFT_CENTER,
                &event.time.format("%H:%M").to_string(),
                13.0,
                palette::TEXT_MUTED,
            );
            canvas.text(
                Point::new(row.x + 72, row.center().y),
                Align2::LEFT_CENTER,
                &event.description,
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
        self.base.rendering = true;
    }
}
