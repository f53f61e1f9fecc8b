use std::sync::Arc;

use chrono::Utc;
use tabula_core::{AppError, AppResult, FieldErrors, UserIdentity};
use tabula_domain::{
    AuditAction, AuditEntityType, Capability, DynamicTable, TableAccess, TableId, TableSchema,
    validate_table_name,
};
use tracing::info;

use crate::ports::TableRepository;
use crate::{AuditRecorder, AuthorizationService};

/// Application service for dynamic table definitions and their schema.
#[derive(Clone)]
pub struct TableService {
    table_repository: Arc<dyn TableRepository>,
    authorization_service: AuthorizationService,
    audit_recorder: AuditRecorder,
}

impl TableService {
    /// Creates a new table service.
    #[must_use]
    pub fn new(
        table_repository: Arc<dyn TableRepository>,
        authorization_service: AuthorizationService,
        audit_recorder: AuditRecorder,
    ) -> Self {
        Self {
            table_repository,
            authorization_service,
            audit_recorder,
        }
    }

    /// Creates an empty table owned by the actor.
    pub async fn create_table(
        &self,
        actor: &UserIdentity,
        name: &str,
        description: Option<String>,
    ) -> AppResult<DynamicTable> {
        let name = table_name_field(name)?;
        self.authorization_service
            .require_capability(actor, Capability::CreateTables)
            .await?;

        let now = Utc::now();
        let table = DynamicTable::new(
            TableId::new(),
            name,
            description,
            TableSchema::default(),
            actor.user_id(),
            false,
            now,
            now,
        )?;
        self.table_repository.create_table(table.clone()).await?;

        self.audit_recorder
            .record(
                AuditEntityType::DynamicTables,
                table.id().to_string(),
                Some(table.id()),
                AuditAction::Insert,
                actor.user_id(),
                None,
                Some(table.snapshot()),
            )
            .await?;

        info!(table_id = %table.id(), owner_id = %actor.user_id(), "table created");
        Ok(table)
    }

    /// Returns a live table the actor may view.
    pub async fn get_table(&self, actor: &UserIdentity, table_id: TableId) -> AppResult<DynamicTable> {
        let table = self.require_table(table_id).await?;
        self.authorization_service
            .require_table_access(actor, &table, TableAccess::View)
            .await?;

        Ok(table)
    }

    /// Returns the effective access of the actor on a table.
    pub async fn table_access(
        &self,
        actor: &UserIdentity,
        table: &DynamicTable,
    ) -> AppResult<TableAccess> {
        let profile = self.authorization_service.actor_profile(actor).await?;
        self.authorization_service.table_access(&profile, table).await
    }

    /// Lists live tables readable by the actor, newest first.
    pub async fn list_tables(&self, actor: &UserIdentity) -> AppResult<Vec<DynamicTable>> {
        let profile = self.authorization_service.actor_profile(actor).await?;
        let tables = self.table_repository.list_tables().await?;

        self.authorization_service
            .readable_tables(&profile, tables)
            .await
    }

    /// Renames a table and replaces its description.
    pub async fn update_table_details(
        &self,
        actor: &UserIdentity,
        table_id: TableId,
        name: &str,
        description: Option<String>,
    ) -> AppResult<DynamicTable> {
        let name = table_name_field(name)?;
        let table = self.require_table(table_id).await?;
        self.authorization_service
            .require_table_access(actor, &table, TableAccess::Edit)
            .await?;

        let updated = table.with_details(name.as_str(), description, Utc::now())?;
        self.persist_update(actor, &table, updated).await
    }

    /// Replaces the whole column list of a table.
    ///
    /// Row payloads are never migrated: values stay under their column id,
    /// so renaming a column's `name` is display-only while changing its `id`
    /// orphans existing values.
    pub async fn update_schema(
        &self,
        actor: &UserIdentity,
        table_id: TableId,
        columns_schema: TableSchema,
    ) -> AppResult<DynamicTable> {
        let table = self.require_table(table_id).await?;
        self.authorization_service
            .require_table_access(actor, &table, TableAccess::Edit)
            .await?;

        let updated = table.with_schema(columns_schema, Utc::now());
        self.persist_update(actor, &table, updated).await
    }

    /// Soft-deletes a table.
    ///
    /// The audit entry is written first and carries no `table_id`, so it
    /// never points at the removed table.
    pub async fn delete_table(&self, actor: &UserIdentity, table_id: TableId) -> AppResult<()> {
        self.authorization_service
            .require_capability(actor, Capability::DeleteTables)
            .await?;
        let table = self.require_table(table_id).await?;

        self.audit_recorder
            .record(
                AuditEntityType::DynamicTables,
                table.id().to_string(),
                None,
                AuditAction::Delete,
                actor.user_id(),
                Some(table.snapshot()),
                None,
            )
            .await?;
        self.table_repository
            .soft_delete_table(table.id(), Utc::now())
            .await?;

        info!(table_id = %table.id(), deleted_by = %actor.user_id(), "table deleted");
        Ok(())
    }

    async fn persist_update(
        &self,
        actor: &UserIdentity,
        previous: &DynamicTable,
        updated: DynamicTable,
    ) -> AppResult<DynamicTable> {
        self.table_repository.update_table(updated.clone()).await?;

        self.audit_recorder
            .record(
                AuditEntityType::DynamicTables,
                updated.id().to_string(),
                Some(updated.id()),
                AuditAction::Update,
                actor.user_id(),
                Some(previous.snapshot()),
                Some(updated.snapshot()),
            )
            .await?;

        info!(table_id = %updated.id(), "table updated");
        Ok(updated)
    }

    async fn require_table(&self, table_id: TableId) -> AppResult<DynamicTable> {
        self.table_repository
            .find_table(table_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("table '{table_id}' does not exist")))
    }
}

fn table_name_field(name: &str) -> AppResult<String> {
    validate_table_name(name).map_err(|error| {
        let mut errors = FieldErrors::new();
        let message = match error {
            AppError::Validation(message) => message,
            other => other.to_string(),
        };
        errors.push("name", message);
        AppError::InvalidFields(errors)
    })
}

#[cfg(test)]
mod tests;
