// Shared helpers for the view unit tests

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::events::{ButtonEvent, Event, EventKind, EventLoop, KeyEvent, MotionEvent, MouseButton, WheelEvent};
use crate::services::account::AccountManager;
use crate::services::calendar_sync::DisconnectedProvider;
use crate::services::Models;
use crate::ui_egui::view::{dispatch, FrameContext, View, WindowState};

pub(crate) struct TestEnv {
    pub events: EventLoop,
    pub models: Models,
    pub accounts: AccountManager,
    pub window: WindowState,
    pub today: NaiveDate,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            events: EventLoop::new(),
            models: Models::in_memory().unwrap(),
            accounts: AccountManager::new(Arc::new(DisconnectedProvider)),
            window: WindowState::default(),
            today: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
        }
    }

    pub fn ctx(&mut self) -> FrameContext<'_> {
        FrameContext {
            now: Instant::now(),
            today: self.today,
            frame_interval: Duration::from_millis(16),
            events: &mut self.events,
            window: self.window,
            models: &self.models,
            accounts: &self.accounts,
            cursor: None,
        }
    }

    /// Deliver an event already in the view's frame.
    pub fn send(&mut self, view: &mut dyn View, event: Event) -> bool {
        let mut ctx = self.ctx();
        view.register_event(&event, &mut ctx)
    }

    /// Deliver an event in window coordinates.
    pub fn dispatch(&mut self, view: &mut dyn View, event: Event) -> bool {
        let mut ctx = self.ctx();
        dispatch(view, &event, &mut ctx)
    }

    pub fn drain(&mut self) -> Vec<Event> {
        let mut out = Vec::new();
        while self.events.has_events() {
            out.push(self.events.next().unwrap());
        }
        out
    }

    pub fn drain_names(&mut self) -> Vec<&'static str> {
        self.drain().iter().map(Event::name).collect()
    }
}

pub(crate) fn click(x: i32, y: i32) -> Event {
    Event::now(EventKind::MouseClick(ButtonEvent {
        x,
        y,
        button: MouseButton::Left,
    }))
}

pub(crate) fn right_click(x: i32, y: i32) -> Event {
    Event::now(EventKind::MouseClick(ButtonEvent {
        x,
        y,
        button: MouseButton::Right,
    }))
}

pub(crate) fn motion(x: i32, y: i32) -> Event {
    Event::now(EventKind::MouseMotion(MotionEvent {
        start_x: x,
        start_y: y,
        x,
        y,
    }))
}

pub(crate) fn wheel_down(x: i32, y: i32) -> Event {
    Event::now(EventKind::MouseWheelDown(WheelEvent { x, y, amount: -1.0 }))
}

pub(crate) fn typed(text: &str) -> Vec<Event> {
    text.chars()
        .map(|c| {
            Event::now(EventKind::KeyPress(KeyEvent {
                key: None,
                character: Some(c),
            }))
        })
        .collect()
}

pub(crate) fn key(key: egui::Key) -> Event {
    Event::now(EventKind::KeyPress(KeyEvent {
        key: Some(key),
        character: None,
    }))
}
