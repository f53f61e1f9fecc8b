use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tabula_core::{AppResult, UserId};
use tabula_domain::{DynamicTable, RowData, RowId, TableId, TableRow};

/// Repository port for dynamic table definitions.
#[async_trait]
pub trait TableRepository: Send + Sync {
    /// Inserts a new table.
    async fn create_table(&self, table: DynamicTable) -> AppResult<()>;

    /// Finds a table that is not soft-deleted.
    async fn find_table(&self, table_id: TableId) -> AppResult<Option<DynamicTable>>;

    /// Lists tables that are not soft-deleted, newest first.
    async fn list_tables(&self) -> AppResult<Vec<DynamicTable>>;

    /// Persists name, description, schema and `updated_at` of a table.
    /// Last write wins.
    async fn update_table(&self, table: DynamicTable) -> AppResult<()>;

    /// Marks a table as deleted.
    async fn soft_delete_table(&self, table_id: TableId, deleted_at: DateTime<Utc>)
    -> AppResult<()>;
}

/// Repository port for rows of dynamic tables.
#[async_trait]
pub trait RowRepository: Send + Sync {
    /// Lists live rows of a table in display order.
    async fn list_rows(&self, table_id: TableId) -> AppResult<Vec<TableRow>>;

    /// Finds a row of a table, including soft-deleted rows.
    async fn find_row(&self, table_id: TableId, row_id: RowId) -> AppResult<Option<TableRow>>;

    /// Inserts rows in the given order.
    ///
    /// Implementations assign `row_order` atomically: the first row gets the
    /// table's current maximum (deleted rows included, `0` when empty) plus
    /// one and each following row the next integer.
    async fn insert_rows(
        &self,
        table_id: TableId,
        created_by: UserId,
        rows: Vec<RowData>,
    ) -> AppResult<Vec<TableRow>>;

    /// Replaces the whole payload of a live row.
    async fn replace_row_data(
        &self,
        table_id: TableId,
        row_id: RowId,
        data: RowData,
        updated_by: UserId,
    ) -> AppResult<TableRow>;

    /// Marks a live row as deleted and returns the stored result.
    async fn soft_delete_row(
        &self,
        table_id: TableId,
        row_id: RowId,
        deleted_by: UserId,
    ) -> AppResult<TableRow>;
}
