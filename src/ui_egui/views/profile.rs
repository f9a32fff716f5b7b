// Profile view
// Side panel with the signed-in account, sync controls and the way into the
// account switcher

use egui::Align2;

use crate::events::{Event, EventKind};
use crate::models::user::User;
use crate::services::account::AccountManager;
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Rect, Size};
use crate::ui_egui::panel_resize::{PanelResizeBorder, BORDER_WIDTH};
use crate::ui_egui::view::{FrameContext, PanelKind, View, ViewBase, ViewRole};
use crate::ui_egui::views::palette;
use crate::ui_egui::views::panel::{self, HEADER_HEIGHT};
use crate::ui_egui::views::SwitchAccountsView;
use crate::ui_egui::widgets::{Button, ButtonColors};

const BUTTON_HEIGHT: i32 = 34;
const BUTTONS_TOP: i32 = HEADER_HEIGHT + 70;

#[derive(Debug)]
pub struct ProfileView {
    base: ViewBase,
    current: Option<User>,
    /// Known accounts other than the current one.
    others: usize,
    sign_in: Button,
    sign_out: Button,
    sync: Button,
    switch: Button,
    border: PanelResizeBorder,
}

impl ProfileView {
    pub fn new(accounts: &AccountManager) -> Self {
        let base = ViewBase::new(Rect::new(0, 0, panel::DEFAULT_WIDTH, panel::MIN_SIZE.height));
        let border = PanelResizeBorder::new(base.id, panel::MIN_SIZE.width, base.rect);
        let mut view = Self {
            base,
            current: None,
            sign_in: Button::new(Rect::default(), "Sign in", ButtonColors::LIGHT),
            sign_out: Button::new(Rect::default(), "Sign out", ButtonColors::LIGHT),
            sync: Button::new(Rect::default(), "Sync now", ButtonColors::LIGHT),
            switch: Button::new(Rect::default(), "Switch account", ButtonColors::LIGHT),
            others: 0,
            border,
        };
        view.refresh(accounts);
        view
    }

    pub fn current(&self) -> Option<&User> {
        self.current.as_ref()
    }

    fn refresh(&mut self, accounts: &AccountManager) {
        self.current = accounts.current().cloned();
        self.others = accounts.other_accounts().count();
        self.layout();
    }

    fn layout(&mut self) {
        let rect = self.base.rect;
        let inner = rect.width - BORDER_WIDTH - 32;
        let half = (inner - 8) / 2;
        self.sign_in.rect = Rect::new(16, BUTTONS_TOP, half, BUTTON_HEIGHT);
        self.sign_out.rect = Rect::new(16, BUTTONS_TOP, half, BUTTON_HEIGHT);
        self.sync.rect = Rect::new(24 + half, BUTTONS_TOP, half, BUTTON_HEIGHT);
        self.switch.rect = Rect::new(16, BUTTONS_TOP + BUTTON_HEIGHT + 8, inner, BUTTON_HEIGHT);
        self.border.layout(rect.width, rect.height);
    }

    /// Open the switcher under `button`, a widget of this panel.
    fn open_switcher(&self, button: Rect, ctx: &mut FrameContext<'_>) {
        let origin = self.base.rect.origin();
        let anchor = Point::new(origin.x + button.x, origin.y + button.bottom() + 4);
        let switcher = SwitchAccountsView::new(ctx.accounts, anchor);
        ctx.events.enqueue(EventKind::OpenView(Box::new(switcher)));
    }
}

impl View for ProfileView {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn role(&self) -> ViewRole {
        ViewRole::Panel(PanelKind::Profile)
    }

    fn register_event(&mut self, event: &Event, ctx: &mut FrameContext<'_>) -> bool {
        if matches!(
            event.kind,
            EventKind::UserSignIn(_) | EventKind::SignOut | EventKind::SignOutAll
        ) {
            self.refresh(ctx.accounts);
            return true;
        }
        if self.border.register_event(event, ctx) {
            return true;
        }

        let mut redraw = false;
        if self.current.is_some() {
            let sign_out = self.sign_out.register_event(event);
            let sync = self.sync.register_event(event);
            let switch = self.switch.register_event(event);
            redraw |= sign_out.redraw || sync.redraw || switch.redraw;
            if sign_out.clicked {
                ctx.events.enqueue(EventKind::SignOut);
            } else if sync.clicked {
                ctx.events.enqueue(EventKind::SyncCalendar);
            } else if switch.clicked {
                self.open_switcher(self.switch.rect, ctx);
            }
        } else {
            let sign_in = self.sign_in.register_event(event);
            redraw |= sign_in.redraw;
            if sign_in.clicked && self.others > 0 {
                self.open_switcher(self.sign_in.rect, ctx);
            } else if sign_in.clicked {
                ctx.events.enqueue(EventKind::SignIn { email: None });
            }
        }
        redraw
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        let rect = self.base.rect;
        let origin = rect.origin();
        panel::render_chrome(canvas, rect, "Profile");

        let status = match &self.current {
            Some(user) => format!("Signed in as {}", user.display_name()),
            None => "Not signed in".to_string(),
        };
        canvas.text(
            Point::new(rect.x + 16, rect.y + HEADER_HEIGHT + 24),
            Align2::LEFT_CENTER,
            &status,
            14.0,
            palette::TEXT,
        );
        if let Some(user) = &self.current {
            canvas.text(
                Point::new(rect.x + 16, rect.y + HEADER_HEIGHT + 46),
                Align2::LEFT_CENTER,
                &user.email,
                12.0,
                palette::TEXT_MUTED,
            );
            self.sign_out.render(canvas, origin);
            self.sync.render(canvas, origin);
            self.switch.render(canvas, origin);
        } else {
            self.sign_in.render(canvas, origin);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui_egui::canvas::RecordingCanvas;
    use crate::ui_egui::test_support::{click, TestEnv};

    #[test]
    fn test_signed_out_offers_sign_in() {
        let mut env = TestEnv::new();
        let mut view = ProfileView::new(&env.accounts);
        env.send(&mut view, click(30, HEADER_HEIGHT + 80));
        assert!(matches!(
            env.drain()[0].kind,
            EventKind::SignIn { email: None }
        ));
    }

    #[test]
    fn test_refreshes_after_sign_in_and_offers_sync() {
        let mut env = TestEnv::new();
        let mut view = ProfileView::new(&env.accounts);
        let user = User::new("ana@example.com", "Ana");
        env.accounts.on_user_signed_in(user.clone());
        env.send(&mut view, Event::now(EventKind::UserSignIn(user)));
        assert_eq!(view.current().map(|u| u.email.as_str()), Some("ana@example.com"));

        let mut canvas = RecordingCanvas::new();
        view.render(&mut canvas);
        assert!(canvas.has_text("Signed in as Ana"));

        env.send(&mut view, click(250, HEADER_HEIGHT + 80));
        assert_eq!(env.drain_names(), vec!["SyncCalendar"]);
    }

    #[test]
    fn test_switch_account_opens_switcher_under_button() {
        let mut env = TestEnv::new();
        env.accounts.on_user_signed_in(User::new("ana@example.com", "Ana"));
        env.accounts.on_user_signed_in(User::new("bo@example.com", "Bo"));
        let mut view = ProfileView::new(&env.accounts);
        view.set_position(Point::new(60, 30));

        let y = 30 + BUTTONS_TOP + BUTTON_HEIGHT + 8 + 10;
        env.dispatch(&mut view, click(60 + 40, y));
        let events = env.drain();
        let EventKind::OpenView(switcher) = &events[0].kind else {
            panic!("expected OpenView, got {:?}", events[0].kind);
        };
        assert_eq!(switcher.role(), ViewRole::ContextMenu);
        assert_eq!(switcher.rect().y, 30 + BUTTONS_TOP + 2 * BUTTON_HEIGHT + 8 + 4);
    }

    #[test]
    fn test_sign_in_with_known_accounts_offers_switcher() {
        let mut env = TestEnv::new();
        env.accounts.on_user_signed_in(User::new("ana@example.com", "Ana"));
        env.accounts.sign_out();
        let mut view = ProfileView::new(&env.accounts);
        env.send(&mut view, click(30, BUTTONS_TOP + 10));
        assert_eq!(env.drain_names(), vec!["OpenView"]);
    }
}
