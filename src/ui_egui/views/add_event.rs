// Add event view
// Modal dialog for creating or editing a calendar event on one date

use chrono::NaiveDate;
use egui::Key;

use crate::events::{CalendarEventDraft, Event, EventKind, KeyEvent};
use crate::models::calendar_event::{parse_time_of_day, CalendarEvent, EventColor, Recurrence};
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Rect, Size};
use crate::ui_egui::view::{FrameContext, View, ViewBase, ViewRole};
use crate::ui_egui::views::palette;
use crate::ui_egui::widgets::{Button, ButtonColors, Label, TextField};

const SIZE: Size = Size::new(440, 330);
const SWATCH: i32 = 40;

#[derive(Debug)]
pub struct AddEventView {
    base: ViewBase,
    date: NaiveDate,
    editing: Option<i64>,
    title: Label,
    description: TextField,
    time: TextField,
    color: EventColor,
    swatches: Vec<(EventColor, Button)>,
    recurrence: Recurrence,
    recurrence_buttons: Vec<(Recurrence, Button)>,
    error: Label,
    save: Button,
    cancel: Button,
}

impl AddEventView {
    pub fn new(date: NaiveDate) -> Self {
        Self::build(date, None, "", "12:00", EventColor::default(), Recurrence::Never)
    }

    pub fn edit(event: &CalendarEvent) -> Self {
        Self::build(
            event.date,
            event.id,
            &event.description,
            &event.time.format("%H:%M").to_string(),
            event.color,
            event.recurrence,
        )
    }

    fn build(
        date: NaiveDate,
        editing: Option<i64>,
        description: &str,
        time: &str,
        color: EventColor,
        recurrence: Recurrence,
    ) -> Self {
        let title = match editing {
            Some(_) => format!("Edit event on {}", date.format("%d %b %Y")),
            None => format!("New event on {}", date.format("%d %b %Y")),
        };

        let swatches = EventColor::ALL
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let colors = ButtonColors {
                    fill: palette::event_color(*c),
                    hover: palette::with_alpha(palette::event_color(*c), 180),
                    selected: palette::event_color(*c),
                    text: palette::TEXT_ON_DARK,
                };
                let rect = Rect::new(20 + i as i32 * (SWATCH + 8), 150, SWATCH, 28);
                let mut button = Button::new(rect, "", colors);
                button.selected = *c == color;
                (*c, button)
            })
            .collect();

        let recurrence_buttons = Recurrence::ALL
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let rect = Rect::new(20 + i as i32 * 102, 196, 96, 30);
                let mut button = Button::new(rect, r.label(), ButtonColors::LIGHT);
                button.selected = *r == recurrence;
                (*r, button)
            })
            .collect();

        let mut view = Self {
            base: ViewBase::new(Rect::from_origin_size(Default::default(), SIZE)),
            date,
            editing,
            title: Label::new(Rect::new(20, 12, 400, 30), title).with_size(18.0),
            description: TextField::new(Rect::new(20, 55, 400, 36), "Description")
                .with_text(description)
                .focused(),
            time: TextField::new(Rect::new(20, 102, 120, 36), "HH:MM")
                .with_text(time)
                .with_max_len(5),
            color,
            swatches,
            recurrence,
            recurrence_buttons,
            error: Label::new(Rect::new(20, 236, 400, 20), "").with_color(palette::DANGER),
            save: Button::new(Rect::new(300, 276, 120, 36), "Save", ButtonColors::LIGHT),
            cancel: Button::new(Rect::new(170, 276, 120, 36), "Cancel", ButtonColors::LIGHT),
        };
        view.mark_selection();
        view
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn error(&self) -> Option<&str> {
        Some(self.error.text.as_str()).filter(|t| !t.is_empty())
    }

    fn mark_selection(&mut self) {
        for (c, button) in &mut self.swatches {
            button.label = if *c == self.color { "✔".to_string() } else { String::new() };
        }
        for (r, button) in &mut self.recurrence_buttons {
            button.selected = *r == self.recurrence;
        }
    }

    fn draft(&self) -> Result<CalendarEventDraft, String> {
        let time = parse_time_of_day(self.time.text()).map_err(|e| e.to_string())?;
        let event = CalendarEvent::new(self.date, time, self.description.text().trim())
            .map_err(|e| e.to_string())?;
        Ok(CalendarEventDraft {
            date: event.date,
            time: event.time,
            description: event.description,
            color: self.color,
            recurrence: self.recurrence,
        })
    }

    fn commit(&mut self, ctx: &mut FrameContext<'_>) {
        let draft = match self.draft() {
            Ok(draft) => draft,
            Err(message) => {
                log::debug!("Rejected event draft: {}", message);
                self.error.text = message;
                return;
            }
        };
        self.error.text.clear();
        let origin = self.base.id;
        ctx.events.enqueue(match self.editing {
            Some(id) => EventKind::EditCalendarEvent { id, draft, origin },
            None => EventKind::AddCalendarEvent { draft, origin },
        });
    }

    fn is_own_commit(&self, event: &Event) -> bool {
        matches!(
            event.kind,
            EventKind::AddCalendarEvent { origin, .. }
                | EventKind::EditCalendarEvent { origin, .. } if origin == self.base.id
        )
    }
}

impl View for AddEventView {
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

        let description = self.description.register_event(event);
        let time = self.time.register_event(event);
        let mut redraw = description.redraw || time.redraw;

        let mut color = None;
        for (c, button) in &mut self.swatches {
            let response = button.register_event(event);
            redraw |= response.redraw;
            if response.clicked {
                color = Some(*c);
            }
        }
        let mut recurrence = None;
        for (r, button) in &mut self.recurrence_buttons {
            let response = button.register_event(event);
            redraw |= response.redraw;
            if response.clicked {
                recurrence = Some(*r);
            }
        }
        if color.is_some() || recurrence.is_some() {
            self.color = color.unwrap_or(self.color);
            self.recurrence = recurrence.unwrap_or(self.recurrence);
            self.mark_selection();
            redraw = true;
        }

        let save = self.save.register_event(event);
        let cancel = self.cancel.register_event(event);
        redraw |= save.redraw || cancel.redraw;

        if cancel.clicked {
            ctx.events.enqueue(EventKind::CloseView(self.base.id));
        } else if save.clicked || description.submitted || time.submitted {
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
        self.time.render(canvas, origin);
        for (_, button) in &self.swatches {
            button.render(canvas, origin);
        }
        for (_, button) in &self.recurrence_buttons {
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
