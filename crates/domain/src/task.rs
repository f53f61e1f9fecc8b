use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tabula_core::{AppError, AppResult, FieldErrors, UserId};
use uuid::Uuid;

/// Minimum number of characters of a task title.
pub const TASK_TITLE_MIN_LENGTH: usize = 3;

/// Identifier of a task board card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a random task identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a task identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a task identifier from its transport representation.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid task id '{value}': {error}")))
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TaskId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Board column of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Status after the checkbox toggle: done reopens, anything else closes.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Done => Self::Todo,
            Self::Todo | Self::InProgress => Self::Done,
        }
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(AppError::Validation(format!(
                "unknown task status '{value}'"
            ))),
        }
    }
}

/// Validated input for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Trimmed title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Department the task is assigned to.
    pub assigned_department: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    /// Validates raw form input, collecting one message per failing field.
    pub fn new(
        title: &str,
        description: Option<String>,
        assigned_department: &str,
        due_date: Option<NaiveDate>,
    ) -> AppResult<Self> {
        let title = title.trim();
        let assigned_department = assigned_department.trim();

        let mut errors = FieldErrors::new();
        if title.chars().count() < TASK_TITLE_MIN_LENGTH {
            errors.push("title", "Title too short");
        }
        if assigned_department.is_empty() {
            errors.push("assigned_department", "Department required");
        }
        errors.into_result()?;

        Ok(Self {
            title: title.to_owned(),
            description: description.filter(|value| !value.trim().is_empty()),
            assigned_department: assigned_department.to_owned(),
            due_date,
        })
    }
}

/// Card on the task board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task id.
    pub id: TaskId,
    /// Title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Assigned department.
    pub assigned_department: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Board column.
    pub status: TaskStatus,
    /// Soft-delete marker.
    pub is_deleted: bool,
    /// Creating user.
    pub created_by: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Returns the JSON snapshot recorded in audit entries.
    #[must_use]
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "title": self.title,
            "description": self.description,
            "assigned_department": self.assigned_department,
            "due_date": self.due_date.map(|date| date.to_string()),
            "status": self.status.as_str(),
            "is_deleted": self.is_deleted,
        })
    }

    /// Board order: status column, then due date (undated last), then age.
    #[must_use]
    pub fn board_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.status
            .cmp(&other.status)
            .then_with(|| match (self.due_date, other.due_date) {
                (Some(left), Some(right)) => left.cmp(&right),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
            .then_with(|| self.created_at.cmp(&other.created_at))
    }
}
