// Task module
// To-do entries shown by the to-do panel

use super::ValidationError;

/// How urgent a task is; the to-do panel sorts by this, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskImportance {
    Low,
    Medium,
    High,
}

impl TaskImportance {
    pub const ALL: [TaskImportance; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_i64(self) -> i64 {
        match self {
            Self::Low => 0,
            Self::Medium => 1,
            Self::High => 2,
        }
    }

    pub fn from_i64(value: i64) -> Result<Self, ValidationError> {
        match value {
            0 => Ok(Self::Low),
            1 => Ok(Self::Medium),
            2 => Ok(Self::High),
            _ => Err(ValidationError::UnknownValue {
                field: "importance",
                value,
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// A to-do entry. `id` is `None` until the store has persisted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: Option<i64>,
    pub description: String,
    pub importance: TaskImportance,
    /// Manual ordering inside one importance group.
    pub position: i64,
}

impl Task {
    pub fn new(
        description: impl Into<String>,
        importance: TaskImportance,
    ) -> Result<Self, ValidationError> {
        let task = Self {
            id: None,
            description: description.into(),
            importance,
            position: 0,
        };
        task.validate()?;
        Ok(task)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(())
    }
}

/// Order used by the to-do panel: importance descending, then position.
pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        b.importance
            .cmp(&a.importance)
            .then(a.position.cmp(&b.position))
    });
}
