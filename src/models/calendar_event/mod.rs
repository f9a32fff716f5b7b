// Calendar event module
// Dated entries with an optional yearly/monthly/weekly repetition

use chrono::{Datelike, NaiveDate, NaiveTime};

use super::ValidationError;
use crate::utils::date::month_length;

/// How an event repeats after its first date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Recurrence {
    #[default]
    Never,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    pub const ALL: [Recurrence; 4] = [Self::Never, Self::Weekly, Self::Monthly, Self::Yearly];

    pub fn as_i64(self) -> i64 {
        match self {
            Self::Never => 0,
            Self::Weekly => 1,
            Self::Monthly => 2,
            Self::Yearly => 3,
        }
    }

    pub fn from_i64(value: i64) -> Result<Self, ValidationError> {
        match value {
            0 => Ok(Self::Never),
            1 => Ok(Self::Weekly),
            2 => Ok(Self::Monthly),
            3 => Ok(Self::Yearly),
            _ => Err(ValidationError::UnknownValue {
                field: "recurrence",
                value,
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Never => "Never",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }
}

/// Palette slot of an event; the views map it to an actual colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventColor {
    #[default]
    Blue,
    Pink,
    Green,
    Purple,
    Red,
    Yellow,
    Orange,
}

impl EventColor {
    pub const ALL: [EventColor; 7] = [
        Self::Blue,
        Self::Pink,
        Self::Green,
        Self::Purple,
        Self::Red,
        Self::Yellow,
        Self::Orange,
    ];

    pub fn as_i64(self) -> i64 {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0) as i64
    }

    pub fn from_i64(value: i64) -> Result<Self, ValidationError> {
        usize::try_from(value)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(ValidationError::UnknownValue {
                field: "color",
                value,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub description: String,
    pub color: EventColor,
    pub recurrence: Recurrence,
}

impl CalendarEvent {
    pub fn new(
        date: NaiveDate,
        time: NaiveTime,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let event = Self {
            id: None,
            date,
            time,
            description: description.into(),
            color: EventColor::default(),
            recurrence: Recurrence::Never,
        };
        event.validate()?;
        Ok(event)
    }

    pub fn with_color(mut self, color: EventColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(())
    }

    /// Whether this event (or one of its repetitions) falls on `date`.
    /// Repetitions never happen before the first date.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        if date < self.date {
            return false;
        }
        match self.recurrence {
            Recurrence::Never => date == self.date,
            Recurrence::Weekly => date.weekday() == self.date.weekday(),
            Recurrence::Monthly => date.day() == self.date.day(),
            Recurrence::Yearly => date.month() == self.date.month() && date.day() == self.date.day(),
        }
    }

    /// Copy of this event moved onto `date`, used when expanding repetitions.
    pub fn occurrence_on(&self, date: NaiveDate) -> CalendarEvent {
        CalendarEvent {
            date,
            ..self.clone()
        }
    }

    /// Dates in the given month on which this event occurs.
    pub fn occurrences_in_month(&self, year: i32, month: u32) -> Vec<NaiveDate> {
        (1..=month_length(year, month))
            .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
            .filter(|date| self.occurs_on(*date))
            .collect()
    }

    /// Two events describe the same entry when date, time, description and
    /// repetition agree; ids and colours are ignored.
    pub fn same_entry(&self, other: &CalendarEvent) -> bool {
        self.date == other.date
            && self.time == other.time
            && self.description == other.description
            && self.recurrence == other.recurrence
    }
}

/// Parse the "HH:MM" text typed into the add-event dialog.
pub fn parse_time_of_day(text: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M")
        .map_err(|_| ValidationError::InvalidTime(text.to_string()))
}
