// Switch accounts view
// Context menu listing the known accounts other than the current one, plus
// a way to add another

use egui::Align2;

use crate::events::{Event, EventKind};
use crate::services::account::AccountManager;
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Rect, Size};
use crate::ui_egui::view::{FrameContext, View, ViewBase, ViewRole};
use crate::ui_egui::views::palette;
use crate::ui_egui::widgets::{Button, ButtonColors};

const WIDTH: i32 = 240;
const TITLE_HEIGHT: i32 = 36;
const ROW_HEIGHT: i32 = 40;
const PADDING: i32 = 6;
const ADD_HEIGHT: i32 = 32;

#[derive(Debug)]
pub struct SwitchAccountsView {
    base: ViewBase,
    accounts: Vec<(String, Button)>,
    add: Button,
}

impl SwitchAccountsView {
    pub fn new(accounts: &AccountManager, anchor: Point) -> Self {
        let accounts: Vec<(String, Button)> = accounts
            .other_accounts()
            .enumerate()
            .map(|(i, user)| {
                let rect = Rect::new(PADDING, TITLE_HEIGHT + i as i32 * ROW_HEIGHT, WIDTH - PADDING * 2, ROW_HEIGHT - 4);
                let label = format!("{} <{}>", user.display_name(), user.email);
                (user.email.clone(), Button::new(rect, label, ButtonColors::LIGHT))
            })
            .collect();

        // Room for the "nothing here" line when the list is empty.
        let rows = accounts.len().max(1) as i32;
        let add_y = TITLE_HEIGHT + rows * ROW_HEIGHT + PADDING;
        let mut add_colors = ButtonColors::LIGHT;
        add_colors.text = palette::ACCENT;
        let size = Size::new(WIDTH, add_y + ADD_HEIGHT + PADDING);

        Self {
            base: ViewBase::new(Rect::from_origin_size(anchor, size)),
            accounts,
            add: Button::new(
                Rect::new(PADDING, add_y, WIDTH - PADDING * 2, ADD_HEIGHT),
                "+ Add account",
                add_colors,
            ),
        }
    }

    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.accounts.iter().map(|(email, _)| email.as_str())
    }
}

impl View for SwitchAccountsView {
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
        for (email, button) in &mut self.accounts {
            let response = button.register_event(event);
            redraw |= response.redraw;
            if response.clicked {
                chosen = Some(Some(email.clone()));
            }
        }
        let add = self.add.register_event(event);
        redraw |= add.redraw;
        if add.clicked {
            chosen = Some(None);
        }

        if let Some(email) = chosen {
            log::debug!("Switching account to {:?}", email);
            ctx.events.enqueue(EventKind::SignIn { email });
            ctx.events.enqueue(EventKind::CloseView(self.base.id));
            return true;
        }
        redraw
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        let rect = self.base.rect;
        let origin = rect.origin();
        canvas.fill_rounded_rect(rect, 6.0, palette::SURFACE);
        canvas.stroke_rect(rect, 1.0, palette::BORDER);
        canvas.text(
            Point::new(rect.x + PADDING + 4, rect.y + TITLE_HEIGHT / 2),
            Align2::LEFT_CENTER,
            "Choose account",
            15.0,
            palette::TEXT,
        );

        if self.accounts.is_empty() {
            canvas.text(
                Point::new(rect.center().x, rect.y + TITLE_HEIGHT + ROW_HEIGHT / 2),
                Align2::CENTER_CENTER,
                "No accounts to show.",
                13.0,
                palette::TEXT_MUTED,
            );
        }
        for (_, button) in &self.accounts {
            button.render(canvas, origin);
        }
        self.add.render(canvas, origin);
    }

    fn min_size(&self) -> Size {
        self.base.rect.size()
    }
}
