use async_trait::async_trait;
use tabula_application::ports::{AuditLogQuery, AuditRepository};
use tabula_core::{AppError, AppResult};
use tabula_domain::AuditLogEntry;

use super::InMemoryRepository;

#[async_trait]
impl AuditRepository for InMemoryRepository {
    async fn append_entry(&self, entry: AuditLogEntry) -> AppResult<()> {
        let mut entries = self.audit_entries.write().await;
        if entries.iter().any(|stored| stored.id() == entry.id()) {
            return Err(AppError::Conflict(format!(
                "audit entry '{}' already exists",
                entry.id()
            )));
        }

        entries.push(entry);
        Ok(())
    }

    async fn list_recent(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        let entries = self.audit_entries.read().await;
        let mut matching: Vec<&AuditLogEntry> = entries
            .iter()
            .filter(|entry| query.action.is_none_or(|action| entry.action() == action))
            .filter(|entry| {
                query
                    .entity_type
                    .is_none_or(|entity_type| entry.entity_type() == entity_type)
            })
            .collect();
        matching.sort_by(|left, right| right.performed_at().cmp(&left.performed_at()));

        Ok(matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect())
    }
}
