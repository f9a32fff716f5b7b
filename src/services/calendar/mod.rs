// Calendar service
// CRUD for calendar events plus the date queries used by the calendar grid
// and the per-day event list

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use crate::models::calendar_event::{CalendarEvent, EventColor, Recurrence};

const SELECT_COLUMNS: &str = "SELECT id, date, time, description, color, recurrence FROM calendar_events";

pub struct CalendarStore<'a> {
    conn: &'a Connection,
}

impl<'a> CalendarStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, mut event: CalendarEvent) -> Result<CalendarEvent> {
        event.validate().map_err(|e| anyhow::anyhow!(e))?;

        self.conn
            .execute(
                "INSERT INTO calendar_events (date, time, description, color, recurrence)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    event.date,
                    event.time,
                    event.description,
                    event.color.as_i64(),
                    event.recurrence.as_i64(),
                ],
            )
            .context("Failed to insert calendar event")?;

        event.id = Some(self.conn.last_insert_rowid());
        Ok(event)
    }

    pub fn update(&self, event: &CalendarEvent) -> Result<()> {
        event.validate().map_err(|e| anyhow::anyhow!(e))?;
        let id = event.id.context("Cannot update a calendar event without an id")?;

        let changed = self
            .conn
            .execute(
                "UPDATE calendar_events
                 SET date = ?1, time = ?2, description = ?3, color = ?4, recurrence = ?5
                 WHERE id = ?6",
                params![
                    event.date,
                    event.time,
                    event.description,
                    event.color.as_i64(),
                    event.recurrence.as_i64(),
                    id,
                ],
            )
            .context("Failed to update calendar event")?;

        if changed == 0 {
            anyhow::bail!("Calendar event {} not found", id);
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM calendar_events WHERE id = ?1", params![id])
            .context("Failed to delete calendar event")?;
        Ok(())
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<CalendarEvent>> {
        let result = self.conn.query_row(
            &format!("{} WHERE id = ?1", SELECT_COLUMNS),
            params![id],
            Self::row_to_event,
        );

        match result {
            Ok(event) => Ok(Some(event)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(err).context("Failed to load calendar event"),
        }
    }

    /// Stored events (first occurrences only), ordered by date and time.
    pub fn list_all(&self) -> Result<Vec<CalendarEvent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY date ASC, time ASC", SELECT_COLUMNS))
            .context("Failed to prepare calendar event list query")?;

        let rows = stmt.query_map([], Self::row_to_event)?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to load calendar events")
    }

    /// Occurrences on one date, repetitions expanded, ordered by time.
    pub fn events_on(&self, date: NaiveDate) -> Result<Vec<CalendarEvent>> {
        let mut events: Vec<CalendarEvent> = self
            .candidates_until(date)?
            .into_iter()
            .filter(|event| event.occurs_on(date))
            .map(|event| event.occurrence_on(date))
            .collect();
        events.sort_by_key(|event| event.time);
        Ok(events)
    }

    /// Occurrences grouped by date for one month of the grid.
    pub fn events_in_month(&self, year: i32, month: u32) -> Result<BTreeMap<NaiveDate, Vec<CalendarEvent>>> {
        let mut by_date: BTreeMap<NaiveDate, Vec<CalendarEvent>> = BTreeMap::new();
        let last_day = crate::utils::date::month_length(year, month);
        let Some(month_end) = NaiveDate::from_ymd_opt(year, month, last_day) else {
            return Ok(by_date);
        };

        for event in self.candidates_until(month_end)? {
            for date in event.occurrences_in_month(year, month) {
                by_date.entry(date).or_default().push(event.occurrence_on(date));
            }
        }
        for events in by_date.values_mut() {
            events.sort_by_key(|event| event.time);
        }
        Ok(by_date)
    }

    /// Case-insensitive substring search over descriptions.
    pub fn search(&self, query: &str) -> Result<Vec<CalendarEvent>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|event| event.description.to_lowercase().contains(&needle))
            .collect())
    }

    /// Events whose first date is not after `date`; only these can occur
    /// on or before it.
    fn candidates_until(&self, date: NaiveDate) -> Result<Vec<CalendarEvent>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} WHERE date <= ?1", SELECT_COLUMNS))
            .context("Failed to prepare calendar date query")?;

        let rows = stmt.query_map(params![date], Self::row_to_event)?;
        rows.collect::<Result<Vec<_>, _>>()
            .context("Failed to load calendar events")
    }

    fn row_to_event(row: &Row<'_>) -> rusqlite::Result<CalendarEvent> {
        let color = EventColor::from_i64(row.get(4)?)
            .map_err(|err| rusqlite::Error::FromSqlConversionFailure(4, Type::Integer, Box::new(err)))?;
        let recurrence = Recurrence::from_i64(row.get(5)?)
            .map_err(|err| rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, Box::new(err)))?;
        Ok(CalendarEvent {
            id: Some(row.get(0)?),
            date: row.get(1)?,
            time: row.get(2)?,
            description: row.get(3)?,
            color,
            recurrence,
        })
    }
}
