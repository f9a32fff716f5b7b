//! Typed events flowing through the single-threaded dispatch loop.
//!
//! Every frame the [`EventLoop`] turns raw window input into [`Event`]s, adds
//! its own synthetic ones (repeating timers, animations, results handed back
//! by worker threads) and the application drains them into the view tree.
//! Views and controllers push new events back onto the same loop, so a click
//! on a button can turn into an `OpenView` that is processed later in the
//! same frame.
//!
//! Events are plain data once constructed. Pointer events are the only kinds
//! that carry coordinates; [`Event::translated`] rebuilds them in a child
//! view's frame without changing their kind.

pub mod event_loop;
pub mod input;
pub mod queue;

use std::time::Instant;

use chrono::{NaiveDate, NaiveTime};

use crate::models::calendar_event::{EventColor, Recurrence};
use crate::models::settings::SettingChange;
use crate::models::task::TaskImportance;
use crate::models::user::User;
use crate::services::calendar_sync::SyncSummary;
use crate::ui_egui::animation::AnimationId;
use crate::ui_egui::geometry::{Point, Size};
use crate::ui_egui::view::{PanelKind, View, ViewId};

pub use event_loop::{
    EventLoop, RepeatingKind, ThreadedEvent, ThreadedSender, TimerCallback, TimerEvent,
};
pub use input::{InputSource, RawInput};
pub use queue::{EventQueue, QueueError};

/// Mouse button after normalisation of the OS button number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    /// Pressing the scroll wheel.
    Middle,
    Right,
    Unknown,
}

impl MouseButton {
    /// OS numbering: 1 left, 2 wheel, 3 right.
    pub fn from_os(button: u8) -> Self {
        match button {
            1 => Self::Left,
            2 => Self::Middle,
            3 => Self::Right,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub x: i32,
    pub y: i32,
    pub button: MouseButton,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub x: i32,
    pub y: i32,
    /// Signed scroll magnitude as reported by the OS; positive scrolls up.
    pub amount: f32,
}

/// Pointer movement. Carries where the pointer came from so consumers can
/// compute a delta without keeping their own state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionEvent {
    pub start_x: i32,
    pub start_y: i32,
    pub x: i32,
    pub y: i32,
}

impl MotionEvent {
    pub fn move_vector(&self) -> (i32, i32) {
        (self.x - self.start_x, self.y - self.start_y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Physical key; `None` for pure text input.
    pub key: Option<egui::Key>,
    /// Decoded character, if the key produced one.
    pub character: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub description: String,
    pub importance: TaskImportance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEventDraft {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub description: String,
    pub color: EventColor,
    pub recurrence: Recurrence,
}

/// One variant per event kind.
#[derive(Debug)]
pub enum EventKind {
    // Input derived
    CloseWindow,
    MouseClick(ButtonEvent),
    MouseRelease(ButtonEvent),
    MouseWheelUp(WheelEvent),
    MouseWheelDown(WheelEvent),
    MouseMotion(MotionEvent),
    KeyPress(KeyEvent),
    KeyRelease(KeyEvent),
    MouseFocusChanged { focused: bool },
    /// The OS window lost focus.
    WindowMinimized,
    /// The OS window gained focus.
    WindowUnminimized,

    // Synthetic, produced by the loop itself
    RenderCursor,
    DeleteCharacter,
    Animation(AnimationId),
    Timer(TimerEvent),

    // Window requests
    WindowResize(Size),
    WindowMove(Point),
    MinimizeWindow,
    ToggleMaximize,

    // View composition
    OpenView(Box<dyn View>),
    CloseView(ViewId),
    ResizeView { view: ViewId, width: i32 },
    ShowTooltip { text: String, anchor: Point },
    HideTooltip,

    // Domain
    TogglePanel(PanelKind),
    /// Swap the settings view in for the calendar, or back.
    ToggleSettings,
    ChangeSetting(SettingChange),
    OpenEventList(NaiveDate),
    ChangeMonth { year: i32, month: u32 },
    AddTask { draft: TaskDraft, origin: ViewId },
    EditTask { id: i64, draft: TaskDraft, origin: ViewId },
    DeleteTask(i64),
    OpenEditTask(i64),
    UpdateTasks,
    AddCalendarEvent { draft: CalendarEventDraft, origin: ViewId },
    EditCalendarEvent { id: i64, draft: CalendarEventDraft, origin: ViewId },
    DeleteCalendarEvent(i64),
    OpenEditCalendarEvent(i64),
    UpdateCalendar,
    SignIn { email: Option<String> },
    SignOut,
    /// Forget every known account.
    SignOutAll,
    SyncCalendar,

    // Handed back by worker threads
    UserSignIn(User),
    CalendarSynced(SyncSummary),
}

#[derive(Debug)]
pub struct Event {
    pub time: Instant,
    pub kind: EventKind,
}

impl Event {
    pub fn new(time: Instant, kind: EventKind) -> Self {
        Self { time, kind }
    }

    pub fn now(kind: EventKind) -> Self {
        Self::new(Instant::now(), kind)
    }

    pub fn mouse_focus_changed(time: Instant, focused: bool) -> Self {
        Self::new(time, EventKind::MouseFocusChanged { focused })
    }

    /// Pointer position for click, release, wheel and motion events.
    pub fn position(&self) -> Option<Point> {
        match &self.kind {
            EventKind::MouseClick(e) | EventKind::MouseRelease(e) => Some(Point::new(e.x, e.y)),
            EventKind::MouseWheelUp(e) | EventKind::MouseWheelDown(e) => {
                Some(Point::new(e.x, e.y))
            }
            EventKind::MouseMotion(e) => Some(Point::new(e.x, e.y)),
            _ => None,
        }
    }

    /// Rebuild a pointer event in the frame whose origin is `origin`
    /// (`local = parent - origin`). The kind and every other field are kept.
    /// Returns `None` for events without coordinates; those are forwarded
    /// unchanged.
    pub fn translated(&self, origin: Point) -> Option<Event> {
        let shift = |x: i32, y: i32| Point::new(x, y).relative_to(origin);
        let kind = match &self.kind {
            EventKind::MouseClick(e) => {
                let p = shift(e.x, e.y);
                EventKind::MouseClick(ButtonEvent { x: p.x, y: p.y, ..*e })
            }
            EventKind::MouseRelease(e) => {
                let p = shift(e.x, e.y);
                EventKind::MouseRelease(ButtonEvent { x: p.x, y: p.y, ..*e })
            }
            EventKind::MouseWheelUp(e) => {
                let p = shift(e.x, e.y);
                EventKind::MouseWheelUp(WheelEvent { x: p.x, y: p.y, ..*e })
            }
            EventKind::MouseWheelDown(e) => {
                let p = shift(e.x, e.y);
                EventKind::MouseWheelDown(WheelEvent { x: p.x, y: p.y, ..*e })
            }
            EventKind::MouseMotion(e) => {
                let start = shift(e.start_x, e.start_y);
                let p = shift(e.x, e.y);
                EventKind::MouseMotion(MotionEvent {
                    start_x: start.x,
                    start_y: start.y,
                    x: p.x,
                    y: p.y,
                })
            }
            _ => return None,
        };
        Some(Event::new(self.time, kind))
    }

    /// Click, release or wheel: the kinds a view hit-tests with `is_focused`.
    pub fn is_hit_testable(&self) -> bool {
        matches!(
            self.kind,
            EventKind::MouseClick(_)
                | EventKind::MouseRelease(_)
                | EventKind::MouseWheelUp(_)
                | EventKind::MouseWheelDown(_)
        )
    }

    /// Pointer and keyboard input. Overlays capture these; everything else
    /// reaches every view.
    pub fn is_input(&self) -> bool {
        matches!(
            self.kind,
            EventKind::MouseClick(_)
                | EventKind::MouseRelease(_)
                | EventKind::MouseWheelUp(_)
                | EventKind::MouseWheelDown(_)
                | EventKind::MouseMotion(_)
                | EventKind::KeyPress(_)
                | EventKind::KeyRelease(_)
        )
    }

    pub fn is_click(&self) -> bool {
        matches!(self.kind, EventKind::MouseClick(_))
    }

    pub fn is_left_click(&self) -> bool {
        matches!(
            self.kind,
            EventKind::MouseClick(ButtonEvent {
                button: MouseButton::Left,
                ..
            })
        )
    }

    /// Add/edit commits coming out of a dialog. They must reach every view,
    /// including the dialog that produced them, regardless of overlays.
    pub fn is_commit(&self) -> bool {
        matches!(
            self.kind,
            EventKind::AddTask { .. }
                | EventKind::EditTask { .. }
                | EventKind::AddCalendarEvent { .. }
                | EventKind::EditCalendarEvent { .. }
        )
    }

    /// Short kind name for logs.
    pub fn name(&self) -> &'static str {
        match &self.kind {
            EventKind::CloseWindow => "CloseWindow",
            EventKind::MouseClick(_) => "MouseClick",
            EventKind::MouseRelease(_) => "MouseRelease",
            EventKind::MouseWheelUp(_) => "MouseWheelUp",
            EventKind::MouseWheelDown(_) => "MouseWheelDown",
            EventKind::MouseMotion(_) => "MouseMotion",
            EventKind::KeyPress(_) => "KeyPress",
            EventKind::KeyRelease(_) => "KeyRelease",
            EventKind::MouseFocusChanged { .. } => "MouseFocusChanged",
            EventKind::WindowMinimized => "WindowMinimized",
            EventKind::WindowUnminimized => "WindowUnminimized",
            EventKind::RenderCursor => "RenderCursor",
            EventKind::DeleteCharacter => "DeleteCharacter",
            EventKind::Animation(_) => "Animation",
            EventKind::Timer(_) => "Timer",
            EventKind::WindowResize(_) => "WindowResize",
            EventKind::WindowMove(_) => "WindowMove",
            EventKind::MinimizeWindow => "MinimizeWindow",
            EventKind::ToggleMaximize => "ToggleMaximize",
            EventKind::OpenView(_) => "OpenView",
            EventKind::CloseView(_) => "CloseView",
            EventKind::ResizeView { .. } => "ResizeView",
            EventKind::ShowTooltip { .. } => "ShowTooltip",
            EventKind::HideTooltip => "HideTooltip",
            EventKind::TogglePanel(_) => "TogglePanel",
            EventKind::ToggleSettings => "ToggleSettings",
            EventKind::ChangeSetting(_) => "ChangeSetting",
            EventKind::OpenEventList(_) => "OpenEventList",
            EventKind::ChangeMonth { .. } => "ChangeMonth",
            EventKind::AddTask { .. } => "AddTask",
            EventKind::EditTask { .. } => "EditTask",
            EventKind::DeleteTask(_) => "DeleteTask",
            EventKind::OpenEditTask(_) => "OpenEditTask",
            EventKind::UpdateTasks => "UpdateTasks",
            EventKind::AddCalendarEvent { .. } => "AddCalendarEvent",
            EventKind::EditCalendarEvent { .. } => "EditCalendarEvent",
            EventKind::DeleteCalendarEvent(_) => "DeleteCalendarEvent",
            EventKind::OpenEditCalendarEvent(_) => "OpenEditCalendarEvent",
            EventKind::UpdateCalendar => "UpdateCalendar",
            EventKind::SignIn { .. } => "SignIn",
            EventKind::SignOut => "SignOut",
            EventKind::SignOutAll => "SignOutAll",
            EventKind::SyncCalendar => "SyncCalendar",
            EventKind::UserSignIn(_) => "UserSignIn",
            EventKind::CalendarSynced(_) => "CalendarSynced",
        }
    }
}
