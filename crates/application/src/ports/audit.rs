use async_trait::async_trait;
use tabula_core::AppResult;
use tabula_domain::{AuditAction, AuditEntityType, AuditLogEntry};

/// Query inputs for audit trail listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditLogQuery {
    /// Maximum entries returned.
    pub limit: usize,
    /// Number of entries skipped for offset pagination.
    pub offset: usize,
    /// Optional action filter.
    pub action: Option<AuditAction>,
    /// Optional entity collection filter.
    pub entity_type: Option<AuditEntityType>,
}

/// Port for the append-only audit trail.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    /// Durably appends one entry.
    async fn append_entry(&self, entry: AuditLogEntry) -> AppResult<()>;

    /// Lists entries newest first.
    async fn list_recent(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>>;
}
