// Service module exports
// Persistence, configuration and background workers used by the controllers

pub mod account;
pub mod calendar;
pub mod calendar_sync;
pub mod database;
pub mod settings;
pub mod todo;

use anyhow::Result;

use crate::services::calendar::CalendarStore;
use crate::services::database::Database;
use crate::services::todo::TodoStore;

/// The domain models the controllers and views read from. Owns the database
/// and hands out short-lived stores.
pub struct Models {
    db: Database,
}

impl Models {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(Database::in_memory()?))
    }

    pub fn tasks(&self) -> TodoStore<'_> {
        TodoStore::new(self.db.connection())
    }

    pub fn calendar(&self) -> CalendarStore<'_> {
        CalendarStore::new(self.db.connection())
    }
}

impl std::fmt::Debug for Models {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Models").finish_non_exhaustive()
    }
}
