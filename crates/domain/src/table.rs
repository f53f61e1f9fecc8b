use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabula_core::{AppError, AppResult, NonEmptyString, UserId};
use uuid::Uuid;

use crate::TableSchema;

/// Minimum number of characters of a table name.
pub const TABLE_NAME_MIN_LENGTH: usize = 2;

/// Identifier of a dynamic table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(Uuid);

impl TableId {
    /// Creates a random table identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a table identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a table identifier from its transport representation.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid table id '{value}': {error}")))
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TableId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TableId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validates a table name, returning the trimmed value.
pub fn validate_table_name(name: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.chars().count() < TABLE_NAME_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "Table name must be at least {TABLE_NAME_MIN_LENGTH} characters."
        )));
    }

    Ok(trimmed.to_owned())
}

/// User-defined table whose columns come from a schema document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicTable {
    id: TableId,
    name: NonEmptyString,
    description: Option<String>,
    columns_schema: TableSchema,
    owner_id: UserId,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DynamicTable {
    /// Rehydrates a stored table, re-checking the name invariant.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: TableId,
        name: impl Into<String>,
        description: Option<String>,
        columns_schema: TableSchema,
        owner_id: UserId,
        is_deleted: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        let name = validate_table_name(name.into().as_str())?;

        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            description: description.filter(|value| !value.trim().is_empty()),
            columns_schema,
            owner_id,
            is_deleted,
            created_at,
            updated_at,
        })
    }

    /// Returns the table id.
    #[must_use]
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the ordered column schema.
    #[must_use]
    pub fn columns_schema(&self) -> &TableSchema {
        &self.columns_schema
    }

    /// Returns the creating user.
    #[must_use]
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns whether the table is soft-deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns a copy carrying a replaced schema.
    #[must_use]
    pub fn with_schema(&self, columns_schema: TableSchema, updated_at: DateTime<Utc>) -> Self {
        Self {
            columns_schema,
            updated_at,
            ..self.clone()
        }
    }

    /// Returns a copy carrying new name and description.
    pub fn with_details(
        &self,
        name: &str,
        description: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        Self::new(
            self.id,
            name,
            description,
            self.columns_schema.clone(),
            self.owner_id,
            self.is_deleted,
            self.created_at,
            updated_at,
        )
    }

    /// Returns the JSON snapshot recorded in audit entries.
    #[must_use]
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name.as_str(),
            "description": self.description,
            "columns_schema": self.columns_schema.to_json(),
            "owner_id": self.owner_id,
            "is_deleted": self.is_deleted,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tabula_core::UserId;

    use super::{DynamicTable, TableId, validate_table_name};
    use crate::TableSchema;

    #[test]
    fn short_names_are_rejected() {
        assert!(validate_table_name(" a ").is_err());
        assert_eq!(
            validate_table_name("  Leads ").unwrap_or_else(|_| unreachable!()),
            "Leads"
        );
    }

    #[test]
    fn blank_description_is_dropped() {
        let now = Utc::now();
        let table = DynamicTable::new(
            TableId::new(),
            "Leads",
            Some("   ".to_owned()),
            TableSchema::default(),
            UserId::new(),
            false,
            now,
            now,
        )
        .unwrap_or_else(|_| unreachable!());

        assert!(table.description().is_none());
        assert_eq!(table.snapshot()["name"], "Leads");
    }

    #[test]
    fn table_id_parses_display_form() {
        let table_id = TableId::new();
        assert_eq!(TableId::parse(&table_id.to_string()).ok(), Some(table_id));
        assert!(TableId::parse("t1").is_err());
    }
}
