//! The view abstraction shared by bars, panels, dialogs and menus.
//!
//! A view owns a rectangle in window coordinates. The view manager hit-tests
//! with [`View::is_focused`] in that frame and hands events over through
//! [`dispatch`], which moves pointer coordinates into the view's local frame
//! first. Views do the same for their widgets.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::events::{Event, EventLoop};
use crate::services::account::AccountManager;
use crate::services::Models;
use crate::ui_egui::canvas::Canvas;
use crate::ui_egui::geometry::{Point, Rect, Size};

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl ViewId {
    pub fn next() -> Self {
        Self(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// The side panels; at most one is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelKind {
    Todo,
    Search,
    Profile,
    EventList,
}

/// Which composition slot a view belongs in when it is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewRole {
    /// Appbar or taskbar; fixed for the application's lifetime.
    Bar,
    Main,
    Panel(PanelKind),
    /// Centered dialog that dims the rest of the window.
    Modal,
    ContextMenu,
}

/// OS window geometry as last reported, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowState {
    pub position: Point,
    pub size: Size,
    pub maximized: bool,
}

/// Everything a view may touch while handling an event.
pub struct FrameContext<'a> {
    pub now: Instant,
    pub today: NaiveDate,
    /// One frame at the configured fps; the animation rate.
    pub frame_interval: Duration,
    pub events: &'a mut EventLoop,
    pub window: WindowState,
    pub models: &'a Models,
    pub accounts: &'a AccountManager,
    /// Cursor icon requested by whatever the pointer is over.
    pub cursor: Option<egui::CursorIcon>,
}

impl fmt::Debug for FrameContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameContext")
            .field("now", &self.now)
            .field("today", &self.today)
            .field("window", &self.window)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

/// State every view carries: identity, rectangle and dirty flag.
#[derive(Debug, Clone)]
pub struct ViewBase {
    pub id: ViewId,
    pub rect: Rect,
    pub rendering: bool,
}

impl ViewBase {
    pub fn new(rect: Rect) -> Self {
        Self {
            id: ViewId::next(),
            rect,
            rendering: true,
        }
    }

    /// Same rect, moved to the window origin.
    pub fn local_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.rect.size())
    }
}

pub trait View: fmt::Debug {
    fn base(&self) -> &ViewBase;
    fn base_mut(&mut self) -> &mut ViewBase;

    fn role(&self) -> ViewRole;

    /// Handle an event already translated into this view's frame. Returns
    /// whether the view needs to be redrawn.
    fn register_event(&mut self, event: &Event, ctx: &mut FrameContext<'_>) -> bool;

    /// Draw the current state. Must not change it.
    fn render(&self, canvas: &mut dyn Canvas);

    fn min_size(&self) -> Size;

    /// Recompute layout for a new size; `None` keeps that dimension.
    fn resize(&mut self, width: Option<i32>, height: Option<i32>) {
        let base = self.base_mut();
        if let Some(width) = width {
            base.rect.width = width;
        }
        if let Some(height) = height {
            base.rect.height = height;
        }
        base.rendering = true;
    }

    /// Release resources. Called once, right before the view is dropped.
    fn on_delete(&mut self) {}

    fn id(&self) -> ViewId {
        self.base().id
    }

    fn rect(&self) -> Rect {
        self.base().rect
    }

    fn set_position(&mut self, origin: Point) {
        let base = self.base_mut();
        base.rect.x = origin.x;
        base.rect.y = origin.y;
        base.rendering = true;
    }

    fn is_rendering(&self) -> bool {
        self.base().rendering
    }

    fn set_rendering(&mut self, rendering: bool) {
        self.base_mut().rendering = rendering;
    }

    /// Hit test for click, release and wheel events, in the parent's frame.
    fn is_focused(&self, event: &Event) -> bool {
        event.is_hit_testable() && event.position().is_some_and(|p| self.rect().contains(p))
    }
}

/// Run `f` with `event` moved into the frame whose origin is `origin`.
/// Events without coordinates are passed through as they are.
pub fn with_local<R>(event: &Event, origin: Point, f: impl FnOnce(&Event) -> R) -> R {
    match event.translated(origin) {
        Some(local) => f(&local),
        None => f(event),
    }
}

/// Hand an event in the parent's frame to `view`. Marks the view dirty when
/// it asks for a redraw.
pub fn dispatch(view: &mut dyn View, event: &Event, ctx: &mut FrameContext<'_>) -> bool {
    let origin = view.rect().origin();
    let redraw = with_local(event, origin, |local| view.register_event(local, ctx));
    if redraw {
        view.set_rendering(true);
    }
    redraw
}

/// Center `size` inside `area`.
pub fn centered(area: Size, size: Size) -> Point {
    Point::new((area.width - size.width) / 2, (area.height - size.height) / 2)
}
