use std::sync::Arc;

use tabula_core::{AppError, AppResult, UserIdentity};
use tabula_domain::{
    AuditAction, AuditEntityType, CellValue, DynamicTable, RowData, RowId, TableAccess, TableId,
    TableRow,
};
use tracing::info;

use crate::ports::{RowRepository, TableRepository};
use crate::{AuditRecorder, AuthorizationService};

mod transfer;

pub use transfer::{ExportRecord, ImportRecord};

/// Application service for rows of dynamic tables.
#[derive(Clone)]
pub struct RowService {
    table_repository: Arc<dyn TableRepository>,
    row_repository: Arc<dyn RowRepository>,
    authorization_service: AuthorizationService,
    audit_recorder: AuditRecorder,
}

impl RowService {
    /// Creates a new row service.
    #[must_use]
    pub fn new(
        table_repository: Arc<dyn TableRepository>,
        row_repository: Arc<dyn RowRepository>,
        authorization_service: AuthorizationService,
        audit_recorder: AuditRecorder,
    ) -> Self {
        Self {
            table_repository,
            row_repository,
            authorization_service,
            audit_recorder,
        }
    }

    /// Lists live rows of a table in display order.
    pub async fn list_rows(&self, actor: &UserIdentity, table_id: TableId) -> AppResult<Vec<TableRow>> {
        self.table_with_access(actor, table_id, TableAccess::View)
            .await?;
        self.row_repository.list_rows(table_id).await
    }

    /// Appends one row after the current last row.
    ///
    /// Values under current column ids are checked like a cell edit.
    pub async fn add_row(
        &self,
        actor: &UserIdentity,
        table_id: TableId,
        data: RowData,
    ) -> AppResult<TableRow> {
        let table = self
            .table_with_access(actor, table_id, TableAccess::Edit)
            .await?;
        let data = table.columns_schema().normalize_row(&data)?;

        let mut inserted = self.insert_and_record(actor, table_id, vec![data]).await?;
        inserted
            .pop()
            .ok_or_else(|| AppError::Internal("row insert returned no row".to_owned()))
    }

    /// Appends imported records in input order.
    ///
    /// Record keys are matched to column ids by id or case-insensitive
    /// column name; unmatched keys are kept verbatim. Values are stored as
    /// handed over, without column checks.
    pub async fn import_rows(
        &self,
        actor: &UserIdentity,
        table_id: TableId,
        records: Vec<ImportRecord>,
    ) -> AppResult<Vec<TableRow>> {
        let table = self
            .table_with_access(actor, table_id, TableAccess::Edit)
            .await?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let rows = records
            .into_iter()
            .map(|record| transfer::import_record(table.columns_schema(), record))
            .collect::<AppResult<Vec<_>>>()?;
        let inserted = self.insert_and_record(actor, table_id, rows).await?;

        info!(table_id = %table_id, count = inserted.len(), "rows imported");
        Ok(inserted)
    }

    /// Replaces the whole payload of a row. Keys missing from `data` are
    /// removed; use [`RowService::update_cell`] to change a single value.
    pub async fn update_row_data(
        &self,
        actor: &UserIdentity,
        table_id: TableId,
        row_id: RowId,
        data: RowData,
    ) -> AppResult<TableRow> {
        let table = self
            .table_with_access(actor, table_id, TableAccess::Edit)
            .await?;
        let data = table.columns_schema().normalize_row(&data)?;
        let current = self.require_live_row(table_id, row_id).await?;

        self.replace_and_record(actor, &current, data).await
    }

    /// Changes one cell, keeping every other value of the row.
    ///
    /// The value is checked against the column; `null` or an empty string
    /// clears the cell.
    pub async fn update_cell(
        &self,
        actor: &UserIdentity,
        table_id: TableId,
        row_id: RowId,
        column_id: &str,
        value: CellValue,
    ) -> AppResult<TableRow> {
        let table = self
            .table_with_access(actor, table_id, TableAccess::Edit)
            .await?;
        let column = table.columns_schema().column(column_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "column '{column_id}' does not exist in table '{table_id}'"
            ))
        })?;
        let value = column.normalize_value(value)?;

        let current = self.require_live_row(table_id, row_id).await?;
        let mut patch = RowData::new();
        patch.insert(column_id, value);
        let merged = current.data().merged(&patch);

        self.replace_and_record(actor, &current, merged).await
    }

    /// Soft-deletes a row. Deleting an already deleted row succeeds without
    /// writing anything.
    pub async fn delete_row(
        &self,
        actor: &UserIdentity,
        table_id: TableId,
        row_id: RowId,
    ) -> AppResult<()> {
        self.table_with_access(actor, table_id, TableAccess::Edit)
            .await?;
        let current = self
            .row_repository
            .find_row(table_id, row_id)
            .await?
            .ok_or_else(|| row_not_found(table_id, row_id))?;
        if current.is_deleted() {
            return Ok(());
        }

        let deleted = self
            .row_repository
            .soft_delete_row(table_id, row_id, actor.user_id())
            .await?;

        self.audit_recorder
            .record(
                AuditEntityType::TableRows,
                row_id.to_string(),
                Some(table_id),
                AuditAction::Delete,
                actor.user_id(),
                Some(current.snapshot()),
                None,
            )
            .await?;

        info!(table_id = %table_id, row_id = %deleted.id(), "row deleted");
        Ok(())
    }

    /// Exports live rows as flat records keyed by column name in schema
    /// order; missing values are exported as null.
    pub async fn export_rows(
        &self,
        actor: &UserIdentity,
        table_id: TableId,
    ) -> AppResult<Vec<ExportRecord>> {
        let table = self
            .table_with_access(actor, table_id, TableAccess::View)
            .await?;
        let rows = self.row_repository.list_rows(table_id).await?;

        Ok(rows
            .iter()
            .map(|row| transfer::export_record(table.columns_schema(), row))
            .collect())
    }

    async fn insert_and_record(
        &self,
        actor: &UserIdentity,
        table_id: TableId,
        rows: Vec<RowData>,
    ) -> AppResult<Vec<TableRow>> {
        let inserted = self
            .row_repository
            .insert_rows(table_id, actor.user_id(), rows)
            .await?;

        for row in &inserted {
            self.audit_recorder
                .record(
                    AuditEntityType::TableRows,
                    row.id().to_string(),
                    Some(table_id),
                    AuditAction::Insert,
                    actor.user_id(),
                    None,
                    Some(row.snapshot()),
                )
                .await?;
            info!(table_id = %table_id, row_id = %row.id(), row_order = row.row_order(), "row added");
        }

        Ok(inserted)
    }

    async fn replace_and_record(
        &self,
        actor: &UserIdentity,
        current: &TableRow,
        data: RowData,
    ) -> AppResult<TableRow> {
        let updated = self
            .row_repository
            .replace_row_data(current.table_id(), current.id(), data, actor.user_id())
            .await?;

        self.audit_recorder
            .record(
                AuditEntityType::TableRows,
                updated.id().to_string(),
                Some(updated.table_id()),
                AuditAction::Update,
                actor.user_id(),
                Some(current.snapshot()),
                Some(updated.snapshot()),
            )
            .await?;

        info!(table_id = %updated.table_id(), row_id = %updated.id(), "row updated");
        Ok(updated)
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

    async fn require_live_row(&self, table_id: TableId, row_id: RowId) -> AppResult<TableRow> {
        self.row_repository
            .find_row(table_id, row_id)
            .await?
            .filter(|row| !row.is_deleted())
            .ok_or_else(|| row_not_found(table_id, row_id))
    }
}

fn row_not_found(table_id: TableId, row_id: RowId) -> AppError {
    AppError::NotFound(format!(
        "row '{row_id}' does not exist in table '{table_id}'"
    ))
}
