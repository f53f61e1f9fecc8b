use std::sync::Arc;

use chrono::Utc;
use tabula_core::{AppError, AppResult, UserId, UserIdentity};
use tabula_domain::{
    AuditAction, AuditEntityType, DynamicTable, NotificationKind, TableAccess, TableId,
    TablePermission, TableShareRole,
};
use tracing::info;
use uuid::Uuid;

use crate::ports::{ProfileRepository, TablePermissionRepository, TableRepository};
use crate::{AuditRecorder, AuthorizationService, NotificationService};

/// Application service for per-table sharing.
#[derive(Clone)]
pub struct SharingService {
    table_repository: Arc<dyn TableRepository>,
    permission_repository: Arc<dyn TablePermissionRepository>,
    profile_repository: Arc<dyn ProfileRepository>,
    authorization_service: AuthorizationService,
    audit_recorder: AuditRecorder,
    notification_service: NotificationService,
}

impl SharingService {
    /// Creates a new sharing service.
    #[must_use]
    pub fn new(
        table_repository: Arc<dyn TableRepository>,
        permission_repository: Arc<dyn TablePermissionRepository>,
        profile_repository: Arc<dyn ProfileRepository>,
        authorization_service: AuthorizationService,
        audit_recorder: AuditRecorder,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            table_repository,
            permission_repository,
            profile_repository,
            authorization_service,
            audit_recorder,
            notification_service,
        }
    }

    /// Lists explicit shares of a table. The owner never appears here.
    pub async fn list_table_permissions(
        &self,
        actor: &UserIdentity,
        table_id: TableId,
    ) -> AppResult<Vec<TablePermission>> {
        self.table_with_access(actor, table_id, TableAccess::View)
            .await?;
        self.permission_repository.list_shares(table_id).await
    }

    /// Shares a table with a user, or changes the role of an existing share.
    pub async fn share_table(
        &self,
        actor: &UserIdentity,
        table_id: TableId,
        user_id: UserId,
        role: TableShareRole,
    ) -> AppResult<TablePermission> {
        let table = self
            .table_with_access(actor, table_id, TableAccess::Full)
            .await?;
        if table.owner_id() == user_id {
            return Err(AppError::Validation(
                "the table owner already has full access".to_owned(),
            ));
        }
        if self.profile_repository.find_profile(user_id).await?.is_none() {
            return Err(AppError::NotFound(format!("user '{user_id}' does not exist")));
        }

        let previous = self
            .permission_repository
            .find_share(table_id, user_id)
            .await?;
        let stored = self
            .permission_repository
            .upsert_share(TablePermission {
                id: Uuid::new_v4(),
                table_id,
                user_id,
                role,
                created_at: Utc::now(),
            })
            .await?;

        let (action, old_data) = match &previous {
            Some(previous) => (AuditAction::Update, Some(previous.snapshot())),
            None => (AuditAction::Insert, None),
        };
        self.audit_recorder
            .record(
                AuditEntityType::TablePermissions,
                stored.id.to_string(),
                Some(table_id),
                action,
                actor.user_id(),
                old_data,
                Some(stored.snapshot()),
            )
            .await?;

        info!(
            table_id = %table_id,
            user_id = %user_id,
            role = role.as_str(),
            "table shared"
        );
        if user_id != actor.user_id() {
            self.notification_service
                .notify(
                    user_id,
                    "Table shared",
                    format!("'{}' was shared with you as {}.", table.name(), role.as_str()),
                    NotificationKind::Success,
                )
                .await;
        }
        Ok(stored)
    }

    /// Removes a user's share on a table.
    pub async fn revoke_table_share(
        &self,
        actor: &UserIdentity,
        table_id: TableId,
        user_id: UserId,
    ) -> AppResult<()> {
        let table = self
            .table_with_access(actor, table_id, TableAccess::Full)
            .await?;

        let removed = self
            .permission_repository
            .delete_share(table_id, user_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "table '{table_id}' is not shared with user '{user_id}'"
                ))
            })?;

        self.audit_recorder
            .record(
                AuditEntityType::TablePermissions,
                removed.id.to_string(),
                Some(table_id),
                AuditAction::Delete,
                actor.user_id(),
                Some(removed.snapshot()),
                None,
            )
            .await?;

        info!(table_id = %table_id, user_id = %user_id, "table share revoked");
        if user_id != actor.user_id() {
            self.notification_service
                .notify(
                    user_id,
                    "Access removed",
                    format!("You no longer have access to '{}'.", table.name()),
                    NotificationKind::Warning,
                )
                .await;
        }
        Ok(())
    }

    async fn table_with_access(
        &self,
        actor: &UserIdentity,
        table_id: TableId,
        required: TableAccess,
    ) -> AppResult<DynamicTable> {
        let table = self
            .table_repository
            .find_table(table_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("table '{table_id}' does not exist")))?;
        self.authorization_service
            .require_table_access(actor, &table, required)
            .await?;

        Ok(table)
    }
}
