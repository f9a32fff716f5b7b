// Test fixtures - reusable views, input sources and contexts
// Shared by the integration and property tests
#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};

use event_planner::events::{
    ButtonEvent, Event, EventKind, EventLoop, InputSource, MotionEvent, MouseButton, RawInput,
};
use event_planner::models::calendar_event::CalendarEvent;
use event_planner::models::user::User;
use event_planner::services::account::AccountManager;
use event_planner::services::calendar_sync::{CalendarProvider, DisconnectedProvider};
use event_planner::services::Models;
use event_planner::ui_egui::canvas::Canvas;
use event_planner::ui_egui::geometry::{Point, Rect, Size};
use event_planner::ui_egui::view::{FrameContext, View, ViewBase, ViewRole, WindowState};
use event_planner::ui_egui::view_manager::ViewManager;

pub const WINDOW: Size = Size::new(1200, 830);

/// A view with a fixed role and minimum size that counts what happens to it.
#[derive(Debug)]
pub struct StubView {
    base: ViewBase,
    role: ViewRole,
    min: Size,
    deleted: Rc<Cell<u32>>,
    inputs: Rc<Cell<u32>>,
}

impl StubView {
    pub fn new(role: ViewRole, size: Size, min: Size) -> Self {
        Self {
            base: ViewBase::new(Rect::from_origin_size(Point::ZERO, size)),
            role,
            min,
            deleted: Rc::new(Cell::new(0)),
            inputs: Rc::new(Cell::new(0)),
        }
    }

    pub fn bar(height: i32) -> Self {
        Self::new(ViewRole::Bar, Size::new(WINDOW.width, height), Size::new(120, height))
    }

    pub fn side_bar() -> Self {
        Self::new(ViewRole::Bar, Size::new(60, 800), Size::new(60, 530))
    }

    pub fn main() -> Self {
        Self::new(ViewRole::Main, Size::new(1140, 800), Size::new(350, 530))
    }

    /// Times `on_delete` ran.
    pub fn deletions(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.deleted)
    }

    /// Input events that reached the view.
    pub fn inputs(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.inputs)
    }
}

impl View for StubView {
    fn base(&self) -> &ViewBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ViewBase {
        &mut self.base
    }

    fn role(&self) -> ViewRole {
        self.role
    }

    fn register_event(&mut self, event: &Event, _ctx: &mut FrameContext<'_>) -> bool {
        if event.is_input() {
            self.inputs.set(self.inputs.get() + 1);
        }
        false
    }

    fn render(&self, _canvas: &mut dyn Canvas) {}

    fn min_size(&self) -> Size {
        self.min
    }

    fn on_delete(&mut self) {
        self.deleted.set(self.deleted.get() + 1);
    }
}

/// View manager over stub bars and a stub main view.
pub fn stub_manager(window: Size) -> ViewManager {
    ViewManager::new(
        Box::new(StubView::bar(30)),
        Box::new(StubView::side_bar()),
        Box::new(StubView::main()),
        window,
    )
}

/// Input source that hands out one scripted batch per poll.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<Vec<RawInput>>,
    pub focused: bool,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self {
            frames: VecDeque::new(),
            focused: true,
        }
    }

    pub fn push_frame(&mut self, records: Vec<RawInput>) {
        self.frames.push_back(records);
    }

    /// Left press and release at a window position, in one frame.
    pub fn click(&mut self, x: i32, y: i32) {
        let pos = Point::new(x, y);
        self.push_frame(vec![
            RawInput::MouseDown { pos, button: 1 },
            RawInput::MouseUp { pos, button: 1 },
        ]);
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Vec<RawInput> {
        self.frames.pop_front().unwrap_or_default()
    }

    fn mouse_focused(&self) -> bool {
        self.focused
    }
}

/// Owner of everything a [`FrameContext`] borrows.
pub struct World {
    pub events: EventLoop,
    pub models: Models,
    pub accounts: AccountManager,
    pub window: WindowState,
}

impl World {
    pub fn new() -> Self {
        Self {
            events: EventLoop::new(),
            models: Models::in_memory().unwrap(),
            accounts: AccountManager::new(Arc::new(DisconnectedProvider)),
            window: WindowState {
                position: Point::new(100, 100),
                size: WINDOW,
                maximized: false,
            },
        }
    }

    pub fn ctx(&mut self) -> FrameContext<'_> {
        FrameContext {
            now: Instant::now(),
            today: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            frame_interval: Duration::from_millis(16),
            events: &mut self.events,
            window: self.window,
            models: &self.models,
            accounts: &self.accounts,
            cursor: None,
        }
    }

    pub fn drain(&mut self) -> Vec<Event> {
        let mut out = Vec::new();
        while self.events.has_events() {
            out.push(self.events.next().unwrap());
        }
        out
    }
}

/// Feed `manager` every queued event until the queue is empty, as the
/// application does within one frame.
pub fn settle(manager: &mut ViewManager, world: &mut World) {
    while world.events.has_events() {
        let event = world.events.next().unwrap();
        let mut ctx = world.ctx();
        manager.register_event(event, &mut ctx);
    }
}

pub fn click(x: i32, y: i32) -> Event {
    Event::now(EventKind::MouseClick(ButtonEvent {
        x,
        y,
        button: MouseButton::Left,
    }))
}

pub fn motion(x: i32, y: i32) -> Event {
    Event::now(EventKind::MouseMotion(MotionEvent {
        start_x: x,
        start_y: y,
        x,
        y,
    }))
}

/// Provider that signs anyone in and always has one remote event.
#[derive(Debug, Default)]
pub struct FakeProvider;

impl FakeProvider {
    pub fn remote_event() -> CalendarEvent {
        CalendarEvent::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            "Remote planning",
        )
        .unwrap()
    }
}

impl CalendarProvider for FakeProvider {
    fn authenticate(&self, email: Option<String>) -> Result<User> {
        Ok(User::new(email.unwrap_or_else(|| "ana@example.com".into()), "Ana"))
    }

    fn fetch_events(&self, _user: &User) -> Result<Vec<CalendarEvent>> {
        Ok(vec![Self::remote_event()])
    }

    fn insert_event(&self, _user: &User, _event: &CalendarEvent) -> Result<()> {
        Ok(())
    }
}
