use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tabula_core::AppResult;
use tabula_domain::AuditAction;

/// Kind of change carried by a feed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeKind {
    /// A record was inserted.
    Insert,
    /// A record was updated.
    Update,
    /// A record was deleted.
    Delete,
}

impl From<AuditAction> for ChangeKind {
    fn from(value: AuditAction) -> Self {
        match value {
            AuditAction::Insert => Self::Insert,
            AuditAction::Update => Self::Update,
            AuditAction::Delete => Self::Delete,
        }
    }
}

/// Realtime notification about one stored record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeEvent {
    /// Change kind.
    pub event: ChangeKind,
    /// Storage collection name, e.g. `table_rows`.
    pub table: String,
    /// Record payload after the change, or before it for deletes.
    pub record: Value,
}

/// Port for the realtime change feed.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Publishes one event to current subscribers.
    async fn publish(&self, event: ChangeEvent) -> AppResult<()>;
}
