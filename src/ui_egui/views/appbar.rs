// Appbar view
// Custom window chrome: title, minimize / maximize / close, drag to move

use egui::Align2;

use crate::events::{Event, EventKind, MouseButton};
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Rect, Size};
use crate::ui_egui::view::{FrameContext, View, ViewBase, ViewRole};
use crate::ui_egui::views::palette;
use crate::ui_egui::widgets::{Button, ButtonColors};

/// Width of each window button.
pub const BUTTON_WIDTH: i32 = 45;
const TITLE_MIN_WIDTH: i32 = 120;

#[derive(Debug)]
pub struct AppbarView {
    base: ViewBase,
    title: String,
    minimize: Button,
    maximize: Button,
    close: Button,
    /// Press point in appbar coordinates while the window is being dragged.
    drag_anchor: Option<Point>,
    maximized: bool,
}

impl AppbarView {
    pub fn new(title: impl Into<String>, width: i32, height: i32) -> Self {
        let button = |label: &str, colors| Button::new(Rect::new(0, 0, BUTTON_WIDTH, height), label, colors);
        let mut view = Self {
            base: ViewBase::new(Rect::new(0, 0, width, height)),
            title: title.into(),
            minimize: button("—", ButtonColors::DARK),
            maximize: button("□", ButtonColors::DARK),
            close: button("✕", ButtonColors::DANGER),
            drag_anchor: None,
            maximized: false,
        };
        view.layout();
        view
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    fn layout(&mut self) {
        let width = self.base.rect.width;
        let height = self.base.rect.height;
        self.close.rect = Rect::new(width - BUTTON_WIDTH, 0, BUTTON_WIDTH, height);
        self.maximize.rect = Rect::new(width - BUTTON_WIDTH * 2, 0, BUTTON_WIDTH, height);
        self.minimize.rect = Rect::new(width - BUTTON_WIDTH * 3, 0, BUTTON_WIDTH, height);
    }

    fn on_button(&self, position: Point) -> bool {
        [&self.minimize, &self.maximize, &self.close]
            .iter()
            .any(|b| b.rect.contains(position))
    }
}

impl View for AppbarView {
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
        let mut redraw = false;
        if self.maximized != ctx.window.maximized {
            self.maximized = ctx.window.maximized;
            self.maximize.label = if self.maximized { "❐" } else { "□" }.to_string();
            redraw = true;
        }

        let minimize = self.minimize.register_event(event);
        let maximize = self.maximize.register_event(event);
        let close = self.close.register_event(event);
        redraw |= minimize.redraw || maximize.redraw || close.redraw;

        if close.clicked {
            log::debug!("Close requested from appbar");
            ctx.events.enqueue(EventKind::CloseWindow);
            return true;
        }
        if minimize.clicked {
            ctx.events.enqueue(EventKind::MinimizeWindow);
            return true;
        }
        if maximize.clicked {
            ctx.events.enqueue(EventKind::ToggleMaximize);
            return true;
        }

        let local = self.base.local_rect();
        match &event.kind {
            EventKind::MouseClick(click) if click.button == MouseButton::Left => {
                let position = Point::new(click.x, click.y);
                if local.contains(position) && !self.on_button(position) && !self.maximized {
                    self.drag_anchor = Some(position);
                }
            }
            EventKind::MouseMotion(motion) => {
                if let Some(anchor) = self.drag_anchor.filter(|_| !ctx.window.maximized) {
                    // Keep the grabbed point under the cursor.
                    let origin = ctx
                        .window
                        .position
                        .offset(motion.x - anchor.x, motion.y - anchor.y);
                    if origin != ctx.window.position {
                        ctx.events.enqueue(EventKind::WindowMove(origin));
                        ctx.window.position = origin;
                    }
                }
            }
            EventKind::MouseRelease(_) | EventKind::MouseFocusChanged { focused: false } => {
                self.drag_anchor = None;
            }
            _ => {}
        }
        redraw
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        let rect = self.base.rect;
        canvas.fill_rect(rect, palette::APPBAR);
        canvas.text(
            Point::new(rect.x + 12, rect.center().y),
            Align2::LEFT_CENTER,
            &self.title,
            13.0,
            palette::TEXT_ON_DARK,
        );
        let origin = rect.origin();
        self.minimize.render(canvas, origin);
        self.maximize.render(canvas, origin);
        self.close.render(canvas, origin);
    }

    fn min_size(&self) -> Size {
        Size::new(TITLE_MIN_WIDTH + BUTTON_WIDTH * 3, self.base.rect.height)
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
    use crate::events::MotionEvent;
    use crate::ui_egui::test_support::{click, TestEnv};
    use crate::ui_egui::view::WindowState;

    #[test]
    fn test_close_button_sits_at_right_edge() {
        let mut env = TestEnv::new();
        let mut view = AppbarView::new("Event Planner", 540, 30);
        env.send(&mut view, click(500, 20));
        assert_eq!(env.drain_names(), vec!["CloseWindow"]);
    }

    #[test]
    fn test_minimize_and_maximize_buttons() {
        let mut env = TestEnv::new();
        let mut view = AppbarView::new("Event Planner", 1200, 30);
        env.send(&mut view, click(1200 - 45 * 3 + 5, 10));
        env.send(&mut view, click(1200 - 45 * 2 + 5, 10));
        assert_eq!(env.drain_names(), vec!["MinimizeWindow", "ToggleMaximize"]);
    }

    #[test]
    fn test_drag_moves_window_but_not_when_maximized() {
        let motion = || {
            Event::now(EventKind::MouseMotion(MotionEvent {
                start_x: 200,
                start_y: 10,
                x: 230,
                y: 25,
            }))
        };

        let mut env = TestEnv::new();
        env.window = WindowState {
            position: Point::new(100, 100),
            size: Size::new(1200, 830),
            maximized: false,
        };
        let mut view = AppbarView::new("Event Planner", 1200, 30);
        env.send(&mut view, click(200, 10));
        assert!(view.is_dragging());
        env.send(&mut view, motion());
        let moved = env.events.next().unwrap();
        assert!(matches!(moved.kind, EventKind::WindowMove(p) if p == Point::new(130, 115)));

        env.window.maximized = true;
        let mut view = AppbarView::new("Event Planner", 1200, 30);
        env.send(&mut view, click(200, 10));
        env.send(&mut view, motion());
        assert!(!env.events.has_events());
    }
}
