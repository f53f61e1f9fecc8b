use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabula_core::{AppError, AppResult, UserId};
use uuid::Uuid;

use crate::TableId;

/// Mutation kind recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    /// Entity was created.
    Insert,
    /// Entity was changed.
    Update,
    /// Entity was deleted or soft-deleted.
    Delete,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "INSERT" => Ok(Self::Insert),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!(
                "unknown audit action '{value}'"
            ))),
        }
    }
}

/// Tracked entity collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntityType {
    /// `dynamic_tables`.
    DynamicTables,
    /// `table_rows`.
    TableRows,
    /// `table_permissions`.
    TablePermissions,
    /// `profiles`.
    Profiles,
    /// `tasks`.
    Tasks,
}

impl AuditEntityType {
    /// Returns the collection name used as `entity_type`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DynamicTables => "dynamic_tables",
            Self::TableRows => "table_rows",
            Self::TablePermissions => "table_permissions",
            Self::Profiles => "profiles",
            Self::Tasks => "tasks",
        }
    }
}

impl FromStr for AuditEntityType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "dynamic_tables" => Ok(Self::DynamicTables),
            "table_rows" => Ok(Self::TableRows),
            "table_permissions" => Ok(Self::TablePermissions),
            "profiles" => Ok(Self::Profiles),
            "tasks" => Ok(Self::Tasks),
            _ => Err(AppError::Validation(format!(
                "unknown audit entity type '{value}'"
            ))),
        }
    }
}

/// Immutable record of one mutating action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    id: Uuid,
    entity_type: AuditEntityType,
    entity_id: String,
    table_id: Option<TableId>,
    action: AuditAction,
    performed_by: Option<UserId>,
    performed_at: DateTime<Utc>,
    old_data: Option<Value>,
    new_data: Option<Value>,
}

impl AuditLogEntry {
    /// Creates an entry, checking that snapshots match the action:
    /// INSERT carries only `new_data`, UPDATE both, DELETE only `old_data`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: Uuid,
        entity_type: AuditEntityType,
        entity_id: impl Into<String>,
        table_id: Option<TableId>,
        action: AuditAction,
        performed_by: Option<UserId>,
        performed_at: DateTime<Utc>,
        old_data: Option<Value>,
        new_data: Option<Value>,
    ) -> AppResult<Self> {
        let entity_id = entity_id.into();
        if entity_id.trim().is_empty() {
            return Err(AppError::Validation(
                "audit entity id must not be empty".to_owned(),
            ));
        }

        let snapshots_match = match action {
            AuditAction::Insert => old_data.is_none() && new_data.is_some(),
            AuditAction::Update => old_data.is_some() && new_data.is_some(),
            AuditAction::Delete => old_data.is_some() && new_data.is_none(),
        };
        if !snapshots_match {
            return Err(AppError::Validation(format!(
                "audit snapshots do not match action '{}'",
                action.as_str()
            )));
        }

        Ok(Self {
            id,
            entity_type,
            entity_id,
            table_id,
            action,
            performed_by,
            performed_at,
            old_data,
            new_data,
        })
    }

    /// Returns the entry id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the tracked collection.
    #[must_use]
    pub fn entity_type(&self) -> AuditEntityType {
        self.entity_type
    }

    /// Returns the affected entity id.
    #[must_use]
    pub fn entity_id(&self) -> &str {
        self.entity_id.as_str()
    }

    /// Returns the owning table, when still referable.
    #[must_use]
    pub fn table_id(&self) -> Option<TableId> {
        self.table_id
    }

    /// Returns the mutation kind.
    #[must_use]
    pub fn action(&self) -> AuditAction {
        self.action
    }

    /// Returns the acting user.
    #[must_use]
    pub fn performed_by(&self) -> Option<UserId> {
        self.performed_by
    }

    /// Returns when the action happened.
    #[must_use]
    pub fn performed_at(&self) -> DateTime<Utc> {
        self.performed_at
    }

    /// Returns the snapshot before the action.
    #[must_use]
    pub fn old_data(&self) -> Option<&Value> {
        self.old_data.as_ref()
    }

    /// Returns the snapshot after the action.
    #[must_use]
    pub fn new_data(&self) -> Option<&Value> {
        self.new_data.as_ref()
    }

    /// Returns the snapshot describing the entity: the old one for DELETE,
    /// the new one otherwise.
    #[must_use]
    pub fn subject_data(&self) -> Option<&Value> {
        match self.action {
            AuditAction::Delete => self.old_data.as_ref(),
            AuditAction::Insert | AuditAction::Update => self.new_data.as_ref(),
        }
    }
}
