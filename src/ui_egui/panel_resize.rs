// Panel resize border
// Drag handle on a side panel's right edge. Pressing it arms a drag; each
// motion while armed asks the view manager to resize the panel.

use crate::events::{Event, EventKind, MouseButton};
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Rect};
use crate::ui_egui::view::{with_local, FrameContext, ViewId};
use crate::ui_egui::views::palette;

/// Width of the grab band at the panel's right edge.
pub const BORDER_WIDTH: i32 = 5;
/// Widest a panel may be dragged.
pub const MAX_PANEL_WIDTH: i32 = 550;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle { hovered: bool },
    Dragging,
}

#[derive(Debug, Clone)]
pub struct PanelResizeBorder {
    panel: ViewId,
    min_width: i32,
    /// In the panel's frame.
    rect: Rect,
    state: DragState,
}

impl PanelResizeBorder {
    pub fn new(panel: ViewId, min_width: i32, panel_rect: Rect) -> Self {
        let mut border = Self {
            panel,
            min_width,
            rect: Rect::default(),
            state: DragState::Idle { hovered: false },
        };
        border.layout(panel_rect.width, panel_rect.height);
        border
    }

    pub fn layout(&mut self, panel_width: i32, panel_height: i32) {
        self.rect = Rect::new(panel_width - BORDER_WIDTH, 0, BORDER_WIDTH, panel_height);
    }

    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    /// `event` is in the panel's frame. Returns true when the event was
    /// consumed by the drag.
    pub fn register_event(&mut self, event: &Event, ctx: &mut FrameContext<'_>) -> bool {
        let rect = self.rect;
        with_local(event, rect.origin(), |local| self.handle_local(local, rect, ctx))
    }

    fn handle_local(&mut self, local: &Event, rect: Rect, ctx: &mut FrameContext<'_>) -> bool {
        let inside = local
            .position()
            .is_some_and(|p| Rect::new(0, 0, rect.width, rect.height).contains(p));

        match (self.state, &local.kind) {
            (DragState::Idle { .. }, EventKind::MouseClick(click))
                if click.button == MouseButton::Left && inside =>
            {
                self.state = DragState::Dragging;
                ctx.cursor = Some(egui::CursorIcon::ResizeHorizontal);
                true
            }
            (DragState::Idle { .. }, EventKind::MouseMotion(_)) => {
                self.state = DragState::Idle { hovered: inside };
                if inside {
                    ctx.cursor = Some(egui::CursorIcon::ResizeHorizontal);
                }
                false
            }
            (DragState::Dragging, EventKind::MouseMotion(motion)) => {
                // Panel-frame x of the cursor is the requested width.
                let width = (motion.x + rect.x).clamp(self.min_width, MAX_PANEL_WIDTH.max(self.min_width));
                ctx.cursor = Some(egui::CursorIcon::ResizeHorizontal);
                ctx.events.enqueue(EventKind::ResizeView {
                    view: self.panel,
                    width,
                });
                true
            }
            (DragState::Dragging, EventKind::MouseRelease(_))
            | (DragState::Dragging, EventKind::MouseFocusChanged { focused: false }) => {
                self.state = DragState::Idle { hovered: inside };
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, canvas: &mut dyn Canvas, origin: Point) {
        let highlighted = matches!(self.state, DragState::Dragging | DragState::Idle { hovered: true });
        let color = if highlighted { palette::ACCENT } else { palette::BORDER };
        let rect = self.rect.translate(origin);
        canvas.line(
            Point::new(rect.right() - 1, rect.top()),
            Point::new(rect.right() - 1, rect.bottom()),
            1.0,
            color,
        );
    }
}
