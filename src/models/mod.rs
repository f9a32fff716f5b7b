// Models module
// Plain in-memory records shared by the stores, controllers and views

pub mod calendar_event;
pub mod settings;
pub mod task;
pub mod user;

use thiserror::Error;

/// Reasons a record is rejected before it reaches a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("description cannot be empty")]
    EmptyDescription,
    #[error("invalid time of day '{0}', expected HH:MM")]
    InvalidTime(String),
    #[error("unknown {field} value {value}")]
    UnknownValue { field: &'static str, value: i64 },
}
