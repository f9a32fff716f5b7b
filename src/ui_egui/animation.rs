// Value animation
// Time-based interpolation driven by the event loop's repeating events

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::events::{Event, EventKind, EventLoop, RepeatingKind};

static NEXT_ANIMATION_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationId(u64);

impl AnimationId {
    pub fn next() -> Self {
        Self(NEXT_ANIMATION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Linear interpolation of a vector of values. While running it keeps an
/// `Animation(id)` repeating event registered at the frame rate and
/// recomputes its values from elapsed time whenever that event arrives.
#[derive(Debug, Clone)]
pub struct ValueAnimation {
    id: AnimationId,
    duration: Duration,
    from: Vec<f32>,
    to: Vec<f32>,
    values: Vec<f32>,
    started: Option<Instant>,
}

impl ValueAnimation {
    pub fn new(initial: Vec<f32>, duration: Duration) -> Self {
        Self {
            id: AnimationId::next(),
            duration,
            from: initial.clone(),
            to: initial.clone(),
            values: initial,
            started: None,
        }
    }

    pub fn id(&self) -> AnimationId {
        self.id
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn value(&self, index: usize) -> f32 {
        self.values.get(index).copied().unwrap_or_default()
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Animate from the current values towards `target`.
    pub fn animate_to(&mut self, target: Vec<f32>, now: Instant, frame: Duration, events: &mut EventLoop) {
        self.from = self.values.clone();
        self.to = target;
        self.started = Some(now);
        events.add_repeating_event(RepeatingKind::Animation(self.id), frame);
    }

    /// Jump to `values` and stop.
    pub fn set(&mut self, values: Vec<f32>, events: &mut EventLoop) {
        self.values = values.clone();
        self.from = values.clone();
        self.to = values;
        self.stop(events);
    }

    /// Advance on this animation's own events. Returns true when the values
    /// changed.
    pub fn register_event(&mut self, event: &Event, events: &mut EventLoop) -> bool {
        let EventKind::Animation(id) = event.kind else {
            return false;
        };
        if id != self.id {
            return false;
        }
        let Some(started) = self.started else {
            return false;
        };

        let elapsed = event.time.saturating_duration_since(started);
        if elapsed >= self.duration || self.duration.is_zero() {
            self.values = self.to.clone();
            self.stop(events);
            return true;
        }

        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.values = self
            .from
            .iter()
            .zip(&self.to)
            .map(|(from, to)| from + (to - from) * t)
            .collect();
        true
    }

    fn stop(&mut self, events: &mut EventLoop) {
        self.started = None;
        events.remove_repeating_event(RepeatingKind::Animation(self.id));
    }
}
