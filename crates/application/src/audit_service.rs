use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tabula_core::{AppError, AppResult, UserId, UserIdentity};
use tabula_domain::{
    AuditAction, AuditEntityType, AuditLogEntry, Capability, TableId, TableSchema, UserProfile,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::AuthorizationService;
use crate::ports::{
    AuditLogQuery, AuditRepository, ChangeEvent, ChangeFeed, ChangeKind, ProfileRepository,
    TableRepository,
};

mod feed;
mod summary;

pub use feed::AuditFeed;
pub use summary::AuditDetail;

/// Largest page accepted by the audit trail listing.
pub const AUDIT_LOG_MAX_LIMIT: usize = 200;

/// Storage collection name the audit trail is published under.
pub const AUDIT_LOG_FEED_TABLE: &str = "audit_logs";

/// Appends audit entries and announces them on the change feed.
#[derive(Clone)]
pub struct AuditRecorder {
    audit_repository: Arc<dyn AuditRepository>,
    change_feed: Arc<dyn ChangeFeed>,
}

impl AuditRecorder {
    /// Creates a recorder from its collaborators.
    #[must_use]
    pub fn new(audit_repository: Arc<dyn AuditRepository>, change_feed: Arc<dyn ChangeFeed>) -> Self {
        Self {
            audit_repository,
            change_feed,
        }
    }

    /// Records one mutation. Returns once the entry is durably stored;
    /// change-feed delivery afterwards is best effort.
    #[allow(clippy::too_many_arguments)]
    pub async fn record(
        &self,
        entity_type: AuditEntityType,
        entity_id: impl Into<String>,
        table_id: Option<TableId>,
        action: AuditAction,
        performed_by: UserId,
        old_data: Option<Value>,
        new_data: Option<Value>,
    ) -> AppResult<AuditLogEntry> {
        let entry = AuditLogEntry::new(
            Uuid::new_v4(),
            entity_type,
            entity_id,
            table_id,
            action,
            Some(performed_by),
            Utc::now(),
            old_data,
            new_data,
        )?;

        self.audit_repository.append_entry(entry.clone()).await?;
        info!(
            audit_id = %entry.id(),
            entity_type = entity_type.as_str(),
            entity_id = entry.entity_id(),
            action = action.as_str(),
            "audit entry recorded"
        );

        if let Some(record) = entry.subject_data() {
            self.publish(ChangeEvent {
                event: ChangeKind::from(action),
                table: entity_type.as_str().to_owned(),
                record: record.clone(),
            })
            .await;
        }
        match serde_json::to_value(&entry) {
            Ok(record) => {
                self.publish(ChangeEvent {
                    event: ChangeKind::Insert,
                    table: AUDIT_LOG_FEED_TABLE.to_owned(),
                    record,
                })
                .await;
            }
            Err(error) => warn!(%error, "failed to encode audit entry for change feed"),
        }

        Ok(entry)
    }

    async fn publish(&self, event: ChangeEvent) {
        let table = event.table.clone();
        if let Err(error) = self.change_feed.publish(event).await {
            warn!(%error, table, "change feed publication failed");
        }
    }
}

/// Filters of the audit trail listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditLogRequest {
    /// Page size; the configured default when absent.
    pub limit: Option<usize>,
    /// Entries skipped.
    pub offset: usize,
    /// Only this action.
    pub action: Option<AuditAction>,
    /// Only this entity collection.
    pub entity_type: Option<AuditEntityType>,
    /// Case-insensitive match on entity type, performer name or email.
    pub search: Option<String>,
}

/// Audit entry enriched for display.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditLogView {
    /// Stored entry.
    pub entry: AuditLogEntry,
    /// Performer display name, when the profile still exists.
    pub performer_name: Option<String>,
    /// Performer email, when known.
    pub performer_email: Option<String>,
    /// One-line human readable summary.
    pub summary: String,
    /// Labelled values of the relevant snapshot.
    pub details: Vec<AuditDetail>,
}

/// Read side of the audit trail.
#[derive(Clone)]
pub struct AuditService {
    audit_repository: Arc<dyn AuditRepository>,
    profile_repository: Arc<dyn ProfileRepository>,
    table_repository: Arc<dyn TableRepository>,
    authorization_service: AuthorizationService,
    default_limit: usize,
}

impl AuditService {
    /// Creates the audit read service.
    #[must_use]
    pub fn new(
        audit_repository: Arc<dyn AuditRepository>,
        profile_repository: Arc<dyn ProfileRepository>,
        table_repository: Arc<dyn TableRepository>,
        authorization_service: AuthorizationService,
        default_limit: usize,
    ) -> Self {
        Self {
            audit_repository,
            profile_repository,
            table_repository,
            authorization_service,
            default_limit: default_limit.clamp(1, AUDIT_LOG_MAX_LIMIT),
        }
    }

    /// Lists recent entries newest first, enriched with performer and labels.
    pub async fn list_audit_log(
        &self,
        actor: &UserIdentity,
        request: AuditLogRequest,
    ) -> AppResult<Vec<AuditLogView>> {
        self.authorization_service
            .require_capability(actor, Capability::ViewAuditLogs)
            .await?;

        let entries = self
            .audit_repository
            .list_recent(AuditLogQuery {
                limit: request
                    .limit
                    .unwrap_or(self.default_limit)
                    .clamp(1, AUDIT_LOG_MAX_LIMIT),
                offset: request.offset,
                action: request.action,
                entity_type: request.entity_type,
            })
            .await?;

        let views = self.enrich(entries).await?;
        let search = request
            .search
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty());

        Ok(match search {
            Some(term) => views
                .into_iter()
                .filter(|view| matches_search(view, term.as_str()))
                .collect(),
            None => views,
        })
    }

    /// Enriches one entry received from the change feed. The capability is
    /// checked again for every entry.
    pub async fn describe(
        &self,
        actor: &UserIdentity,
        entry: AuditLogEntry,
    ) -> AppResult<AuditLogView> {
        self.authorization_service
            .require_capability(actor, Capability::ViewAuditLogs)
            .await?;

        let mut views = self.enrich(vec![entry]).await?;
        views.pop().ok_or_else(|| {
            AppError::Internal("audit entry enrichment returned nothing".to_owned())
        })
    }

    async fn enrich(&self, entries: Vec<AuditLogEntry>) -> AppResult<Vec<AuditLogView>> {
        let mut profiles: HashMap<UserId, Option<UserProfile>> = HashMap::new();
        let mut schemas: HashMap<TableId, Option<TableSchema>> = HashMap::new();
        let mut views = Vec::with_capacity(entries.len());

        for entry in entries {
            let performer = match entry.performed_by() {
                Some(user_id) => {
                    if !profiles.contains_key(&user_id) {
                        let profile = self.profile_repository.find_profile(user_id).await?;
                        profiles.insert(user_id, profile);
                    }
                    profiles.get(&user_id).cloned().flatten()
                }
                None => None,
            };

            let schema = match entry.table_id() {
                Some(table_id) if entry.entity_type() == AuditEntityType::TableRows => {
                    if !schemas.contains_key(&table_id) {
                        let schema = self
                            .table_repository
                            .find_table(table_id)
                            .await?
                            .map(|table| table.columns_schema().clone());
                        schemas.insert(table_id, schema);
                    }
                    schemas.get(&table_id).cloned().flatten()
                }
                _ => None,
            };

            let summary = summary::summarize(&entry, schema.as_ref());
            let details = summary::details(&entry, schema.as_ref());
            views.push(AuditLogView {
                performer_name: performer
                    .as_ref()
                    .and_then(|profile| profile.full_name.clone()),
                performer_email: performer.and_then(|profile| profile.email),
                summary,
                details,
                entry,
            });
        }

        Ok(views)
    }
}

fn matches_search(view: &AuditLogView, term: &str) -> bool {
    let contains = |value: Option<&str>| {
        value
            .map(|value| value.to_lowercase().contains(term))
            .unwrap_or(false)
    };

    contains(Some(view.entry.entity_type().as_str()))
        || contains(view.performer_name.as_deref())
        || contains(view.performer_email.as_deref())
}
