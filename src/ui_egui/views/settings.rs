// Settings view
// Main-view page with the user preferences. Every edit goes out as a
// ChangeSetting event; the settings controller applies and saves it.

use egui::Align2;

use crate::events::{Event, EventKind};
use crate::models::settings::{language_index, Preferences, SettingChange, DEFAULT_LANGUAGE, LANGUAGES};
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Rect, Size};
use crate::ui_egui::view::{with_local, FrameContext, View, ViewBase, ViewRole};
use crate::ui_egui::views::palette;
use crate::ui_egui::widgets::{Button, ButtonColors, CheckBox, DropDown};

/// The title band stays put while the body scrolls under it.
const TITLE_HEIGHT: i32 = 70;
const LEFT: i32 = 30;
const ROW_HEIGHT: i32 = 26;
const GENERAL_TOP: i32 = 90;
const ACCOUNT_TOP: i32 = 290;
/// Lowest body pixel plus a bottom margin.
const CONTENT_BOTTOM: i32 = 424;
const SCROLL_STEP: i32 = 30;

#[derive(Debug)]
pub struct SettingsView {
    base: ViewBase,
    scroll: i32,
    language: DropDown,
    catholic_events: CheckBox,
    filled_events: CheckBox,
    graphics: CheckBox,
    auto_sync: CheckBox,
    sync: Button,
    sign_out_all: Button,
}

impl SettingsView {
    pub fn new(preferences: &Preferences) -> Self {
        let languages = LANGUAGES.iter().map(|(_, name)| name.to_string()).collect();
        let selected = language_index(&preferences.language)
            .or_else(|| language_index(DEFAULT_LANGUAGE))
            .unwrap_or(0);
        let check = |row: i32, label: &str, checked: bool| {
            CheckBox::new(Rect::new(LEFT, row, 320, ROW_HEIGHT), label, checked)
        };
        let mut danger = ButtonColors::LIGHT;
        danger.text = palette::DANGER;

        Self {
            base: ViewBase::new(Rect::default()),
            scroll: 0,
            language: DropDown::new(Rect::new(200, GENERAL_TOP + 30, 180, 30), languages, selected),
            catholic_events: check(GENERAL_TOP + 75, "Show Catholic holidays", preferences.show_catholic_events),
            filled_events: check(GENERAL_TOP + 110, "Fill event backgrounds", preferences.render_filled_events),
            graphics: check(GENERAL_TOP + 145, "High quality graphics", preferences.high_quality_graphics),
            auto_sync: check(ACCOUNT_TOP + 30, "Sync after signing in", preferences.auto_sync),
            sync: Button::new(Rect::new(LEFT, ACCOUNT_TOP + 70, 150, 34), "Sync calendars", ButtonColors::LIGHT),
            sign_out_all: Button::new(Rect::new(LEFT + 160, ACCOUNT_TOP + 70, 150, 34), "Sign out all", danger),
        }
    }

    pub fn scroll(&self) -> i32 {
        self.scroll
    }

    pub fn language(&self) -> &str {
        LANGUAGES
            .get(self.language.selected())
            .map_or(DEFAULT_LANGUAGE, |(code, _)| *code)
    }

    fn max_scroll(&self) -> i32 {
        (CONTENT_BOTTOM - self.base.rect.height).max(0)
    }

    fn scroll_by(&mut self, delta: i32) -> bool {
        let scroll = (self.scroll + delta).clamp(0, self.max_scroll());
        let changed = scroll != self.scroll;
        self.scroll = scroll;
        changed
    }

    fn checks_mut(&mut self) -> [(&mut CheckBox, fn(bool) -> SettingChange); 4] {
        [
            (&mut self.catholic_events, SettingChange::ShowCatholicEvents),
            (&mut self.filled_events, SettingChange::RenderFilledEvents),
            (&mut self.graphics, SettingChange::HighQualityGraphics),
            (&mut self.auto_sync, SettingChange::AutoSync),
        ]
    }

    /// `content` is in body coordinates (scroll already applied).
    fn register_body_event(&mut self, content: &Event, ctx: &mut FrameContext<'_>) -> bool {
        let was_open = self.language.is_open();
        let language = self.language.register_event(content);
        if let Some(index) = language.selected {
            if let Some((code, _)) = LANGUAGES.get(index) {
                ctx.events
                    .enqueue(EventKind::ChangeSetting(SettingChange::Language(code.to_string())));
            }
        }
        // The open list covers whatever is under it, and the click that
        // closes it goes nowhere else.
        if language.consumed || (was_open && content.is_click()) {
            return true;
        }

        let mut redraw = language.redraw;
        for (check, change) in self.checks_mut() {
            let response = check.register_event(content);
            redraw |= response.redraw;
            if response.changed {
                ctx.events
                    .enqueue(EventKind::ChangeSetting(change(check.is_checked())));
            }
        }

        let sync = self.sync.register_event(content);
        let sign_out_all = self.sign_out_all.register_event(content);
        redraw |= sync.redraw || sign_out_all.redraw;
        if sync.clicked {
            ctx.events.enqueue(EventKind::SyncCalendar);
        } else if sign_out_all.clicked {
            ctx.events.enqueue(EventKind::SignOutAll);
        }
        redraw
    }

    fn render_section(&self, canvas: &mut dyn Canvas, body: Point, y: i32, title: &str) {
        canvas.text(
            Point::new(body.x + LEFT, body.y + y),
            Align2::LEFT_CENTER,
            title,
            18.0,
            palette::TEXT,
        );
        canvas.fill_rect(
            Rect::new(body.x + LEFT, body.y + y + 14, self.base.rect.width - LEFT * 2, 1),
            palette::BORDER,
        );
    }
}

impl View for SettingsView {
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
        let local = self.base.local_rect();
        let position = event.position();
        let body_origin = Point::new(0, -self.scroll);

        // Clicks on the title band or outside the view only close the list.
        if event.is_click() && position.is_some_and(|p| !local.contains(p) || p.y < TITLE_HEIGHT) {
            return self.language.close();
        }

        if let EventKind::MouseWheelDown(_) | EventKind::MouseWheelUp(_) = &event.kind {
            if self.language.is_open() {
                let response = with_local(event, body_origin, |content| self.language.register_event(content));
                if response.consumed {
                    return response.redraw;
                }
            }
            if !position.is_some_and(|p| local.contains(p)) {
                return false;
            }
            let step = if matches!(event.kind, EventKind::MouseWheelDown(_)) {
                SCROLL_STEP
            } else {
                -SCROLL_STEP
            };
            return self.scroll_by(step);
        }

        with_local(event, body_origin, |content| self.register_body_event(content, ctx))
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        let rect = self.base.rect;
        canvas.fill_rect(rect, palette::BACKGROUND);

        let body = Point::new(rect.x, rect.y - self.scroll);
        self.render_section(canvas, body, GENERAL_TOP, "General");
        canvas.text(
            Point::new(body.x + LEFT, body.y + self.language.rect.center().y),
            Align2::LEFT_CENTER,
            "Language",
            14.0,
            palette::TEXT,
        );
        self.catholic_events.render(canvas, body);
        self.filled_events.render(canvas, body);
        self.graphics.render(canvas, body);

        self.render_section(canvas, body, ACCOUNT_TOP, "Account");
        self.auto_sync.render(canvas, body);
        self.sync.render(canvas, body);
        self.sign_out_all.render(canvas, body);
        self.language.render(canvas, body);

        canvas.fill_rect(Rect::new(rect.x, rect.y, rect.width, TITLE_HEIGHT), palette::BACKGROUND);
        canvas.text(
            Point::new(rect.x + LEFT, rect.y + TITLE_HEIGHT / 2),
            Align2::LEFT_CENTER,
            "Settings",
            28.0,
            palette::TEXT,
        );
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
        self.scroll = self.scroll.clamp(0, self.max_scroll());
        self.base.rendering = true;
    }
}
