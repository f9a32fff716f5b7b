// To-do service
// CRUD for tasks shown by the to-do panel

use anyhow::{Context, Result};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use crate::models::task::{sort_for_display, Task, TaskImportance};

pub struct TodoStore<'a> {
    conn: &'a Connection,
}

impl<'a> TodoStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a task at the end of its list.
    pub fn create(&self, mut task: Task) -> Result<Task> {
        task.validate().map_err(|e| anyhow::anyhow!(e))?;

        let next_position: i64 = self
            .conn
            .query_row("SELECT COALESCE(MAX(position), -1) + 1 FROM tasks", [], |row| {
                row.get(0)
            })
            .context("Failed to compute task position")?;

        self.conn
            .execute(
                "INSERT INTO tasks (description, importance, position) VALUES (?1, ?2, ?3)",
                params![task.description, task.importance.as_i64(), next_position],
            )
            .context("Failed to insert task")?;

        task.id = Some(self.conn.last_insert_rowid());
        task.position = next_position;
        Ok(task)
    }

    pub fn update(&self, task: &Task) -> Result<()> {
        task.validate().map_err(|e| anyhow::anyhow!(e))?;
        let id = task.id.context("Cannot update a task without an id")?;

        let changed = self
            .conn
            .execute(
                "UPDATE tasks SET description = ?1, importance = ?2, position = ?3 WHERE id = ?4",
                params![task.description, task.importance.as_i64(), task.position, id],
            )
            .context("Failed to update task")?;

        if changed == 0 {
            anyhow::bail!("Task {} not found", id);
        }
        Ok(())
    }

    /// Deleting a missing id is not an error.
    pub fn delete(&self, id: i64) -> Result<()> {
        self.conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])
            .context("Failed to delete task")?;
        Ok(())
    }

    pub fn get_by_id(&self, id: i64) -> Result<Option<Task>> {
        let result = self.conn.query_row(
            "SELECT id, description, importance, position FROM tasks WHERE id = ?1",
            params![id],
            Self::row_to_task,
        );

        match result {
            Ok(task) => Ok(Some(task)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(err).context("Failed to load task"),
        }
    }

    /// All tasks in display order (importance first).
    pub fn list_all(&self) -> Result<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, description, importance, position FROM tasks")
            .context("Failed to prepare task list query")?;

        let rows = stmt.query_map([], Self::row_to_task)?;
        let mut tasks = rows
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to load tasks")?;
        sort_for_display(&mut tasks);
        Ok(tasks)
    }

    /// Case-insensitive substring search over descriptions.
    pub fn search(&self, query: &str) -> Result<Vec<Task>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|task| task.description.to_lowercase().contains(&needle))
            .collect())
    }

    fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
        let importance = TaskImportance::from_i64(row.get(2)?)
            .map_err(|err| rusqlite::Error::FromSqlConversionFailure(2, Type::Integer, Box::new(err)))?;
        Ok(Task {
            id: Some(row.get(0)?),
            description: row.get(1)?,
            importance,
            position: row.get(3)?,
        })
    }
}
