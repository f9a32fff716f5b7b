// Calendar view
// Month grid shown as the main view. Wheel or arrow buttons change month,
// the title opens the month picker, clicking a day opens that day's event list.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use egui::Align2;

use crate::events::{Event, EventKind, MouseButton};
use crate::models::calendar_event::CalendarEvent;
use crate::models::settings::{Preferences, SettingChange};
use crate::services::Models;
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Rect, Size};
use crate::ui_egui::view::{FrameContext, View, ViewBase, ViewRole};
use crate::ui_egui::views::palette;
use crate::ui_egui::views::ChooseMonthView;
use crate::ui_egui::widgets::{Button, ButtonColors};
use crate::utils::date::{catholic_holidays, month_grid, month_name, shift_month, WEEKDAY_NAMES};

const HEADER_HEIGHT: i32 = 50;
const WEEKDAY_HEIGHT: i32 = 24;
const ROWS: i32 = 6;
const EVENT_LINE_HEIGHT: i32 = 16;
/// Events listed in a cell before "+N more".
const MAX_EVENTS_PER_CELL: usize = 3;

#[derive(Debug)]
pub struct CalendarView {
    base: ViewBase,
    year: i32,
    month: u32,
    today: NaiveDate,
    events: BTreeMap<NaiveDate, Vec<CalendarEvent>>,
    holidays: BTreeMap<NaiveDate, Vec<&'static str>>,
    title: Button,
    previous: Button,
    next: Button,
    hovered_day: Option<NaiveDate>,
    show_holidays: bool,
    filled_events: bool,
    rounded: bool,
}

impl CalendarView {
    pub fn new(today: NaiveDate, models: &Models) -> Self {
        let mut view = Self {
            base: ViewBase::new(Rect::default()),
            year: today.year(),
            month: today.month(),
            today,
            events: BTreeMap::new(),
            holidays: BTreeMap::new(),
            title: Button::new(Rect::new(8, 10, 200, 30), "", ButtonColors::LIGHT),
            previous: Button::new(Rect::default(), "‹", ButtonColors::LIGHT),
            next: Button::new(Rect::default(), "›", ButtonColors::LIGHT),
            hovered_day: None,
            show_holidays: false,
            filled_events: false,
            rounded: true,
        };
        view.reload(models);
        view
    }

    pub fn with_preferences(mut self, preferences: &Preferences) -> Self {
        self.show_holidays = preferences.show_catholic_events;
        self.filled_events = preferences.render_filled_events;
        self.rounded = preferences.high_quality_graphics;
        self.reload_holidays();
        self
    }

    pub fn month(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    pub fn events_on(&self, date: NaiveDate) -> &[CalendarEvent] {
        self.events.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn holidays_on(&self, date: NaiveDate) -> &[&'static str] {
        self.holidays.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    fn reload(&mut self, models: &Models) {
        self.title.label = format!("{} {}", month_name(self.month), self.year);
        self.reload_holidays();
        match models.calendar().events_in_month(self.year, self.month) {
            Ok(events) => self.events = events,
            Err(err) => log::error!("Failed to load {}-{:02}: {:#}", self.year, self.month, err),
        }
    }

    fn reload_holidays(&mut self) {
        self.holidays.clear();
        if !self.show_holidays {
            return;
        }
        for (date, name) in catholic_holidays(self.year, self.month) {
            self.holidays.entry(date).or_default().push(name);
        }
    }

    fn apply_setting(&mut self, change: &SettingChange) -> bool {
        match change {
            SettingChange::ShowCatholicEvents(on) => {
                self.show_holidays = *on;
                self.reload_holidays();
            }
            SettingChange::RenderFilledEvents(on) => self.filled_events = *on,
            SettingChange::HighQualityGraphics(on) => self.rounded = *on,
            SettingChange::Language(_) | SettingChange::AutoSync(_) => return false,
        }
        true
    }

    fn open_month_picker(&self, ctx: &mut FrameContext<'_>) {
        let origin = self.base.rect.origin();
        let anchor = Point::new(origin.x + self.title.rect.x, origin.y + self.title.rect.bottom() + 4);
        let picker = ChooseMonthView::new(self.year, self.month, anchor);
        ctx.events.enqueue(EventKind::OpenView(Box::new(picker)));
    }

    fn layout(&mut self) {
        let width = self.base.rect.width;
        self.next.rect = Rect::new(width - 48, 10, 36, 30);
        self.previous.rect = Rect::new(width - 90, 10, 36, 30);
    }

    fn cell_size(&self) -> Size {
        let rect = self.base.rect;
        Size::new(
            rect.width / 7,
            (rect.height - HEADER_HEIGHT - WEEKDAY_HEIGHT) / ROWS,
        )
    }

    /// Local rect of grid cell `index` (Monday-first, row-major).
    fn cell_rect(&self, index: usize) -> Rect {
        let cell = self.cell_size();
        let col = index as i32 % 7;
        let row = index as i32 / 7;
        Rect::new(
            col * cell.width,
            HEADER_HEIGHT + WEEKDAY_HEIGHT + row * cell.height,
            cell.width,
            cell.height,
        )
    }

    fn day_at(&self, position: Point) -> Option<NaiveDate> {
        month_grid(self.year, self.month)
            .into_iter()
            .enumerate()
            .find(|(i, _)| self.cell_rect(*i).contains(position))
            .and_then(|(_, date)| date)
    }

    fn request_month(&self, delta: i32, ctx: &mut FrameContext<'_>) {
        let (year, month) = shift_month(self.year, self.month, delta);
        ctx.events.enqueue(EventKind::ChangeMonth { year, month });
    }

    fn render_cell(&self, canvas: &mut dyn Canvas, rect: Rect, date: NaiveDate) {
        let background = if date == self.today {
            palette::TODAY
        } else if Some(date) == self.hovered_day {
            palette::HOVER
        } else {
            palette::SURFACE
        };
        canvas.fill_rect(rect, background);
        canvas.stroke_rect(rect, 1.0, palette::BORDER);
        canvas.text(
            Point::new(rect.x + 6, rect.y + 4),
            Align2::LEFT_TOP,
            &date.day().to_string(),
            13.0,
            palette::TEXT,
        );

        let holidays = self.holidays_on(date).iter().map(|name| (*name, palette::HOLIDAY, palette::TEXT_ON_DARK));
        let events = self.events_on(date).iter().map(|event| {
            let color = palette::event_color(event.color);
            if self.filled_events {
                (event.description.as_str(), color, palette::TEXT_ON_DARK)
            } else {
                (event.description.as_str(), palette::with_alpha(color, 60), palette::TEXT)
            }
        });
        let total = self.holidays_on(date).len() + self.events_on(date).len();
        let radius = if self.rounded { 3.0 } else { 0.0 };
        for (i, (text, fill, text_color)) in holidays.chain(events).take(MAX_EVENTS_PER_CELL).enumerate() {
            let y = rect.y + 22 + i as i32 * EVENT_LINE_HEIGHT;
            let line = Rect::new(rect.x + 4, y, rect.width - 8, EVENT_LINE_HEIGHT - 2);
            canvas.fill_rounded_rect(line, radius, fill);
            canvas.text(
                Point::new(line.x + 4, line.center().y),
                Align2::LEFT_CENTER,
                text,
                11.0,
                text_color,
            );
        }
        if total > MAX_EVENTS_PER_CELL {
            let y = rect.y + 22 + MAX_EVENTS_PER_CELL as i32 * EVENT_LINE_HEIGHT;
            canvas.text(
                Point::new(rect.x + 6, y),
                Align2::LEFT_TOP,
                &format!("+{} more", total - MAX_EVENTS_PER_CELL),
                11.0,
                palette::TEXT_MUTED,
            );
        }
    }
}

impl View for CalendarView {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn role(&self) -> ViewRole {
        ViewRole::Main
    }

    fn register_event(&mut self, event: &Event, ctx: &mut FrameContext<'_>) -> bool {
        let mut redraw = false;
        if self.today != ctx.today {
            self.today = ctx.today;
            redraw = true;
        }

        match &event.kind {
            EventKind::ChangeMonth { year, month } => {
                self.year = *year;
                self.month = *month;
                self.hovered_day = None;
                self.reload(ctx.models);
                return true;
            }
            EventKind::UpdateCalendar => {
                self.reload(ctx.models);
                return true;
            }
            EventKind::ChangeSetting(change) => return self.apply_setting(change),
            _ => {}
        }

        let title = self.title.register_event(event);
        let previous = self.previous.register_event(event);
        let next = self.next.register_event(event);
        redraw |= title.redraw || previous.redraw || next.redraw;
        if title.clicked {
            self.open_month_picker(ctx);
            return true;
        }
        if previous.clicked {
            self.request_month(-1, ctx);
            return true;
        }
        if next.clicked {
            self.request_month(1, ctx);
            return true;
        }

        let local = self.base.local_rect();
        let inside = event.position().is_some_and(|p| local.contains(p));
        match &event.kind {
            EventKind::MouseWheelUp(_) if inside => self.request_month(-1, ctx),
            EventKind::MouseWheelDown(_) if inside => self.request_month(1, ctx),
            EventKind::MouseClick(click) if click.button == MouseButton::Left && inside => {
                if let Some(date) = self.day_at(Point::new(click.x, click.y)) {
                    log::debug!("Opening event list for {}", date);
                    ctx.events.enqueue(EventKind::OpenEventList(date));
                }
            }
            EventKind::MouseMotion(motion) => {
                let hovered = if inside {
                    self.day_at(Point::new(motion.x, motion.y))
                } else {
                    None
                };
                redraw |= hovered != self.hovered_day;
                self.hovered_day = hovered;
            }
            EventKind::MouseFocusChanged { focused: false } => {
                redraw |= self.hovered_day.take().is_some();
            }
            _ => {}
        }
        redraw
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        let rect = self.base.rect;
        let origin = rect.origin();
        canvas.fill_rect(rect, palette::BACKGROUND);
        self.title.render(canvas, origin);
        self.previous.render(canvas, origin);
        self.next.render(canvas, origin);

        let cell = self.cell_size();
        for (i, name) in WEEKDAY_NAMES.iter().enumerate() {
            let x = rect.x + i as i32 * cell.width + cell.width / 2;
            canvas.text(
                Point::new(x, rect.y + HEADER_HEIGHT + WEEKDAY_HEIGHT / 2),
                Align2::CENTER_CENTER,
                name,
                12.0,
                palette::TEXT_MUTED,
            );
        }

        for (i, date) in month_grid(self.year, self.month).into_iter().enumerate() {
            if let Some(date) = date {
                self.render_cell(canvas, self.cell_rect(i).translate(origin), date);
            }
        }
    }

    fn min_size(&self) -> Size {
        Size::new(350, 530)
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
