//! The per-frame event loop.
//!
//! Once per frame [`EventLoop::tick_at`] rebuilds the queue:
//!
//! 1. clear last frame's events and promote results handed over by worker
//!    threads,
//! 2. translate every polled [`RawInput`] into exactly one typed event,
//! 3. re-check whether the pointer is over the window,
//! 4. fire repeating events whose interval elapsed,
//! 5. run due timers.
//!
//! Input-derived events therefore always precede the frame's synthetic ones.

use std::fmt;
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError, TrySendError};
use std::time::{Duration, Instant};

use super::input::{InputSource, RawInput};
use super::queue::{EventQueue, QueueError};
use super::{ButtonEvent, Event, EventKind, KeyEvent, MotionEvent, MouseButton, WheelEvent};
use crate::models::user::User;
use crate::services::calendar_sync::SyncSummary;
use crate::ui_egui::animation::AnimationId;

/// Capacity of the worker-to-main channel.
const THREADED_CHANNEL_CAPACITY: usize = 64;

pub type TimerCallback = Box<dyn FnOnce(&mut EventLoop)>;

/// One-shot delayed callback. Enqueued like any other event but filed into
/// the loop's timer list instead of the queue.
pub struct TimerEvent {
    pub due: Instant,
    callback: TimerCallback,
}

impl TimerEvent {
    pub fn new(due: Instant, callback: impl FnOnce(&mut EventLoop) + 'static) -> Self {
        Self {
            due,
            callback: Box::new(callback),
        }
    }

    pub fn after(now: Instant, delay: Duration, callback: impl FnOnce(&mut EventLoop) + 'static) -> Self {
        Self::new(now + delay, callback)
    }
}

impl fmt::Debug for TimerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEvent").field("due", &self.due).finish_non_exhaustive()
    }
}

/// Event kinds the loop can re-fire on an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeatingKind {
    RenderCursor,
    DeleteCharacter,
    Animation(AnimationId),
}

impl RepeatingKind {
    fn to_event_kind(self) -> EventKind {
        match self {
            Self::RenderCursor => EventKind::RenderCursor,
            Self::DeleteCharacter => EventKind::DeleteCharacter,
            Self::Animation(id) => EventKind::Animation(id),
        }
    }
}

#[derive(Debug)]
struct RepeatingEvent {
    kind: RepeatingKind,
    interval: Duration,
    /// `None` until the first fire, which happens on the next tick.
    last_fired: Option<Instant>,
}

/// Results produced off the main thread.
#[derive(Debug, Clone, PartialEq)]
pub enum ThreadedEvent {
    UserSignIn(User),
    CalendarSynced(SyncSummary),
}

impl ThreadedEvent {
    fn into_event_kind(self) -> EventKind {
        match self {
            Self::UserSignIn(user) => EventKind::UserSignIn(user),
            Self::CalendarSynced(summary) => EventKind::CalendarSynced(summary),
        }
    }
}

/// Cloneable handle a worker thread uses to hand results back to the loop.
#[derive(Debug, Clone)]
pub struct ThreadedSender {
    tx: SyncSender<ThreadedEvent>,
}

impl ThreadedSender {
    /// Blocks while the channel is full. Returns false once the loop is gone.
    pub fn enqueue_threaded_event(&self, event: ThreadedEvent) -> bool {
        match self.tx.send(event) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Event loop dropped, discarding {:?}", err.0);
                false
            }
        }
    }
}

pub struct EventLoop {
    queue: EventQueue,
    repeating: Vec<RepeatingEvent>,
    timers: Vec<TimerEvent>,
    threaded_tx: SyncSender<ThreadedEvent>,
    threaded_rx: Receiver<ThreadedEvent>,
    mouse_focused: bool,
    running: bool,
}

impl fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLoop")
            .field("queued", &self.queue.len())
            .field("repeating", &self.repeating)
            .field("timers", &self.timers.len())
            .field("mouse_focused", &self.mouse_focused)
            .field("running", &self.running)
            .finish()
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        let (threaded_tx, threaded_rx) = mpsc::sync_channel(THREADED_CHANNEL_CAPACITY);
        Self {
            queue: EventQueue::new(),
            repeating: Vec::new(),
            timers: Vec::new(),
            threaded_tx,
            threaded_rx,
            mouse_focused: true,
            running: true,
        }
    }

    pub fn threaded_sender(&self) -> ThreadedSender {
        ThreadedSender {
            tx: self.threaded_tx.clone(),
        }
    }

    /// Main-thread variant of [`ThreadedSender::enqueue_threaded_event`].
    ///
    /// Best-effort: the main thread is the only consumer, so blocking here
    /// would deadlock. When the channel is full the event is dropped and
    /// logged as an error. Returns whether it was queued.
    pub fn enqueue_threaded_event(&self, event: ThreadedEvent) -> bool {
        match self.threaded_tx.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                log::error!("Threaded event channel full, dropping {:?}", event);
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Append to this frame's queue. Timer events go to the timer list.
    pub fn enqueue_event(&mut self, event: Event) {
        match event.kind {
            EventKind::Timer(timer) => self.timers.push(timer),
            kind => self.queue.push(Event::new(event.time, kind)),
        }
    }

    pub fn enqueue(&mut self, kind: EventKind) {
        self.enqueue_event(Event::now(kind));
    }

    pub fn next(&mut self) -> Result<Event, QueueError> {
        self.queue.next()
    }

    pub fn has_events(&self) -> bool {
        self.queue.has_events()
    }

    /// Register `kind` to fire every `interval`. Re-registering an existing
    /// kind only updates its interval.
    pub fn add_repeating_event(&mut self, kind: RepeatingKind, interval: Duration) {
        if let Some(existing) = self.repeating.iter_mut().find(|r| r.kind == kind) {
            existing.interval = interval;
            return;
        }
        self.repeating.push(RepeatingEvent {
            kind,
            interval,
            last_fired: None,
        });
    }

    /// Unknown kinds are ignored.
    pub fn remove_repeating_event(&mut self, kind: RepeatingKind) {
        self.repeating.retain(|r| r.kind != kind);
    }

    pub fn has_repeating_event(&self, kind: RepeatingKind) -> bool {
        self.repeating.iter().any(|r| r.kind == kind)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn tick(&mut self, input: &mut dyn InputSource) {
        self.tick_at(Instant::now(), input);
    }

    pub fn tick_at(&mut self, now: Instant, input: &mut dyn InputSource) {
        self.queue.clear();
        self.promote_threaded_events(now);

        for raw in input.poll() {
            let kind = self.translate(raw);
            log::trace!("input -> {:?}", kind);
            self.queue.push(Event::new(now, kind));
        }

        let focused = input.mouse_focused();
        if focused != self.mouse_focused {
            self.mouse_focused = focused;
            self.queue.push(Event::mouse_focus_changed(now, focused));
        }

        for repeating in &mut self.repeating {
            let elapsed = repeating
                .last_fired
                .map_or(true, |last| now.saturating_duration_since(last) >= repeating.interval);
            if elapsed {
                repeating.last_fired = Some(now);
                self.queue.push(Event::new(now, repeating.kind.to_event_kind()));
            }
        }

        // Pull due timers out first; callbacks may enqueue new timers.
        let (due, pending): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.timers).into_iter().partition(|t| t.due <= now);
        self.timers = pending;
        for timer in due {
            (timer.callback)(self);
        }
    }

    fn promote_threaded_events(&mut self, now: Instant) {
        loop {
            match self.threaded_rx.try_recv() {
                Ok(event) => {
                    log::debug!("Promoting threaded event {:?}", event);
                    self.queue.push(Event::new(now, event.into_event_kind()));
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn translate(&mut self, raw: RawInput) -> EventKind {
        match raw {
            RawInput::Quit => EventKind::CloseWindow,
            RawInput::MouseDown { pos, button } => EventKind::MouseClick(ButtonEvent {
                x: pos.x,
                y: pos.y,
                button: MouseButton::from_os(button),
            }),
            RawInput::MouseUp { pos, button } => EventKind::MouseRelease(ButtonEvent {
                x: pos.x,
                y: pos.y,
                button: MouseButton::from_os(button),
            }),
            RawInput::Wheel { pos, delta } => {
                let wheel = WheelEvent {
                    x: pos.x,
                    y: pos.y,
                    amount: delta,
                };
                if delta > 0.0 {
                    EventKind::MouseWheelUp(wheel)
                } else {
                    EventKind::MouseWheelDown(wheel)
                }
            }
            RawInput::Motion { pos, rel } => EventKind::MouseMotion(MotionEvent {
                start_x: pos.x - rel.x,
                start_y: pos.y - rel.y,
                x: pos.x,
                y: pos.y,
            }),
            RawInput::KeyDown { key, character } => EventKind::KeyPress(KeyEvent { key, character }),
            RawInput::KeyUp { key, character } => EventKind::KeyRelease(KeyEvent { key, character }),
            RawInput::WindowFocus(true) => EventKind::WindowUnminimized,
            RawInput::WindowFocus(false) => EventKind::WindowMinimized,
            RawInput::PointerInside(focused) => {
                self.mouse_focused = focused;
                EventKind::MouseFocusChanged { focused }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui_egui::geometry::Point;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Script {
        records: Vec<RawInput>,
        focused: bool,
    }

    impl InputSource for Script {
        fn poll(&mut self) -> Vec<RawInput> {
            std::mem::take(&mut self.records)
        }

        fn mouse_focused(&self) -> bool {
            self.focused
        }
    }

    fn script(records: Vec<RawInput>) -> Script {
        Script {
            records,
            focused: true,
        }
    }

    fn drain(event_loop: &mut EventLoop) -> Vec<Event> {
        let mut events = Vec::new();
        while event_loop.has_events() {
            events.push(event_loop.next().unwrap());
        }
        events
    }

    #[test]
    fn test_each_raw_record_becomes_one_event() {
        let mut event_loop = EventLoop::new();
        let mut input = script(vec![
            RawInput::MouseDown {
                pos: Point::new(10, 20),
                button: 3,
            },
            RawInput::Wheel {
                pos: Point::new(1, 1),
                delta: -2.0,
            },
            RawInput::Motion {
                pos: Point::new(15, 25),
                rel: Point::new(5, 5),
            },
            RawInput::Quit,
        ]);
        event_loop.tick_at(Instant::now(), &mut input);

        let events = drain(&mut event_loop);
        assert_eq!(events.len(), 4);
        match &events[0].kind {
            EventKind::MouseClick(click) => assert_eq!(click.button, MouseButton::Right),
            other => panic!("unexpected {other:?}"),
        }
        match &events[1].kind {
            EventKind::MouseWheelDown(wheel) => assert_eq!(wheel.amount, -2.0),
            other => panic!("unexpected {other:?}"),
        }
        match &events[2].kind {
            EventKind::MouseMotion(motion) => assert_eq!(motion.move_vector(), (5, 5)),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(events[3].kind, EventKind::CloseWindow));
    }

    #[test]
    fn test_queue_is_cleared_every_tick() {
        let mut event_loop = EventLoop::new();
        event_loop.enqueue(EventKind::UpdateTasks);
        event_loop.tick_at(Instant::now(), &mut script(vec![]));
        assert!(!event_loop.has_events());
    }

    #[test]
    fn test_focus_recheck_emits_change_once() {
        let mut event_loop = EventLoop::new();
        let mut input = script(vec![]);
        input.focused = false;
        event_loop.tick_at(Instant::now(), &mut input);
        let events = drain(&mut event_loop);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0].kind, EventKind::MouseFocusChanged { focused: false }));

        event_loop.tick_at(Instant::now(), &mut input);
        assert!(!event_loop.has_events());
    }

    #[test]
    fn test_pointer_inside_record_is_not_duplicated_by_recheck() {
        let mut event_loop = EventLoop::new();
        let mut input = script(vec![RawInput::PointerInside(false)]);
        input.focused = false;
        event_loop.tick_at(Instant::now(), &mut input);
        assert_eq!(drain(&mut event_loop).len(), 1);
    }

    #[test]
    fn test_repeating_event_fires_after_interval() {
        let mut event_loop = EventLoop::new();
        let start = Instant::now();
        event_loop.add_repeating_event(RepeatingKind::RenderCursor, Duration::from_millis(400));
        let mut input = script(vec![]);

        event_loop.tick_at(start, &mut input);
        assert_eq!(drain(&mut event_loop).len(), 1);

        event_loop.tick_at(start + Duration::from_millis(200), &mut input);
        assert!(!event_loop.has_events());

        event_loop.tick_at(start + Duration::from_millis(400), &mut input);
        let events = drain(&mut event_loop);
        assert!(matches!(events[0].kind, EventKind::RenderCursor));

        event_loop.remove_repeating_event(RepeatingKind::RenderCursor);
        event_loop.remove_repeating_event(RepeatingKind::DeleteCharacter);
        event_loop.tick_at(start + Duration::from_secs(2), &mut input);
        assert!(!event_loop.has_events());
    }

    #[test]
    fn test_input_events_precede_synthetic_events() {
        let mut event_loop = EventLoop::new();
        event_loop.add_repeating_event(RepeatingKind::DeleteCharacter, Duration::from_millis(50));
        let mut input = script(vec![RawInput::Quit]);
        event_loop.tick_at(Instant::now(), &mut input);
        let events = drain(&mut event_loop);
        assert!(matches!(events[0].kind, EventKind::CloseWindow));
        assert!(matches!(events[1].kind, EventKind::DeleteCharacter));
    }

    #[test]
    fn test_timer_runs_once_when_due() {
        let mut event_loop = EventLoop::new();
        let start = Instant::now();
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        event_loop.enqueue_event(Event::now(EventKind::Timer(TimerEvent::after(
            start,
            Duration::from_millis(100),
            move |event_loop| {
                counter.set(counter.get() + 1);
                event_loop.enqueue(EventKind::UpdateCalendar);
            },
        ))));
        assert!(!event_loop.has_events());
        assert_eq!(event_loop.pending_timers(), 1);

        let mut input = script(vec![]);
        event_loop.tick_at(start, &mut input);
        assert_eq!(fired.get(), 0);

        event_loop.tick_at(start + Duration::from_millis(100), &mut input);
        assert_eq!(fired.get(), 1);
        assert!(matches!(event_loop.next().unwrap().kind, EventKind::UpdateCalendar));

        event_loop.tick_at(start + Duration::from_secs(1), &mut input);
        assert_eq!(fired.get(), 1);
        assert_eq!(event_loop.pending_timers(), 0);
    }

    #[test]
    fn test_threaded_events_wait_for_next_tick() {
        let mut event_loop = EventLoop::new();
        let mut input = script(vec![]);
        event_loop.tick_at(Instant::now(), &mut input);

        event_loop.enqueue_threaded_event(ThreadedEvent::UserSignIn(User::new("a@b.c", "A")));
        assert!(!event_loop.has_events());

        event_loop.tick_at(Instant::now(), &mut input);
        let events = drain(&mut event_loop);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0].kind, EventKind::UserSignIn(_)));

        event_loop.tick_at(Instant::now(), &mut input);
        assert!(!event_loop.has_events());
    }

    #[test]
    fn test_main_thread_enqueue_drops_when_channel_full() {
        let mut event_loop = EventLoop::new();
        let mut input = script(vec![]);
        for _ in 0..THREADED_CHANNEL_CAPACITY {
            assert!(event_loop.enqueue_threaded_event(ThreadedEvent::UserSignIn(User::new("a@b.c", "A"))));
        }
        assert!(!event_loop.enqueue_threaded_event(ThreadedEvent::UserSignIn(User::new("x@y.z", "X"))));

        event_loop.tick_at(Instant::now(), &mut input);
        assert_eq!(drain(&mut event_loop).len(), THREADED_CHANNEL_CAPACITY);
    }
}
