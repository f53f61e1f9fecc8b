use chrono::NaiveDate;
use tabula_core::{AppResult, FieldErrors};
use tabula_domain::{DATE_COLUMN_FORMAT, Task};

use super::types::{CreateTaskRequest, TaskResponse};

impl CreateTaskRequest {
    /// Parses the optional due date; blank input means no due date.
    pub fn parsed_due_date(&self) -> AppResult<Option<NaiveDate>> {
        let Some(raw) = self
            .due_date
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        else {
            return Ok(None);
        };

        NaiveDate::parse_from_str(raw, DATE_COLUMN_FORMAT)
            .map(Some)
            .or_else(|_| {
                let mut errors = FieldErrors::new();
                errors.push("due_date", "Invalid date");
                errors.into_result().map(|()| None)
            })
    }
}

impl From<Task> for TaskResponse {
    fn from(value: Task) -> Self {
        Self {
            id: value.id.to_string(),
            due_date: value
                .due_date
                .map(|date| date.format(DATE_COLUMN_FORMAT).to_string()),
            status: value.status.as_str().to_owned(),
            created_by: value.created_by.map(|user_id| user_id.to_string()),
            created_at: value.created_at.to_rfc3339(),
            title: value.title,
            description: value.description,
            assigned_department: value.assigned_department,
        }
    }
}
