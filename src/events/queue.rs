// Event queue
// FIFO buffer of the events pending for one frame

use std::collections::VecDeque;

use thiserror::Error;

use super::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// `next()` was called on an empty queue. Callers check `has_events()`
    /// first, so this is a bug in the caller.
    #[error("event queue underflow: next() called on an empty queue")]
    Underflow,
}

#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Pop the oldest event.
    pub fn next(&mut self) -> Result<Event, QueueError> {
        self.events.pop_front().ok_or(QueueError::Underflow)
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
