// Database service module
// SQLite connection and schema for tasks and calendar events

use anyhow::{Context, Result};
use rusqlite::Connection;

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`; ":memory:" gives an
    /// in-memory database.
    ///
    /// ```
    /// use event_planner::services::database::Database;
    /// let db = Database::new(":memory:").unwrap();
    /// db.initialize_schema().unwrap();
    /// ```
    pub fn new(path: &str) -> Result<Self> {
        let conn =
            Connection::open(path).context(format!("Failed to open database at {}", path))?;

        conn.execute("PRAGMA foreign_keys = ON", [])
            .context("Failed to enable foreign keys")?;

        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self> {
        let db = Self::new(":memory:")?;
        db.initialize_schema()?;
        Ok(db)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Creates the tables if they don't exist.
    pub fn initialize_schema(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS tasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    description TEXT NOT NULL,
                    importance INTEGER NOT NULL DEFAULT 1,
                    position INTEGER NOT NULL DEFAULT 0
                )",
                [],
            )
            .context("Failed to create tasks table")?;

        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS calendar_events (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    date TEXT NOT NULL,
                    time TEXT NOT NULL,
                    description TEXT NOT NULL,
                    color INTEGER NOT NULL DEFAULT 0,
                    recurrence INTEGER NOT NULL DEFAULT 0
                )",
                [],
            )
            .context("Failed to create calendar_events table")?;

        self.conn
            .execute(
                "CREATE INDEX IF NOT EXISTS idx_calendar_events_date ON calendar_events(date)",
                [],
            )
            .context("Failed to create calendar_events date index")?;

        Ok(())
    }
}
