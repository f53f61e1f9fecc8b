use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tabula_application::ports::{RowRepository, TableRepository};
use tabula_core::{AppError, AppResult, UserId};
use tabula_domain::{DynamicTable, RowData, RowId, TableId, TableRow};

use super::InMemoryRepository;

#[async_trait]
impl TableRepository for InMemoryRepository {
    async fn create_table(&self, table: DynamicTable) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.contains_key(&table.id()) {
            return Err(AppError::Conflict(format!(
                "table '{}' already exists",
                table.id()
            )));
        }

        tables.insert(table.id(), table);
        Ok(())
    }

    async fn find_table(&self, table_id: TableId) -> AppResult<Option<DynamicTable>> {
        Ok(self
            .tables
            .read()
            .await
            .get(&table_id)
            .filter(|table| !table.is_deleted())
            .cloned())
    }

    async fn list_tables(&self) -> AppResult<Vec<DynamicTable>> {
        let mut tables: Vec<DynamicTable> = self
            .tables
            .read()
            .await
            .values()
            .filter(|table| !table.is_deleted())
            .cloned()
            .collect();
        tables.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(tables)
    }

    async fn update_table(&self, table: DynamicTable) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        match tables.get_mut(&table.id()) {
            Some(stored) if !stored.is_deleted() => {
                *stored = table;
                Ok(())
            }
            _ => Err(AppError::NotFound(format!(
                "table '{}' does not exist",
                table.id()
            ))),
        }
    }

    async fn soft_delete_table(
        &self,
        table_id: TableId,
        deleted_at: DateTime<Utc>,
    ) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let Some(stored) = tables.get_mut(&table_id).filter(|table| !table.is_deleted()) else {
            return Err(AppError::NotFound(format!(
                "table '{table_id}' does not exist"
            )));
        };

        *stored = DynamicTable::new(
            stored.id(),
            stored.name(),
            stored.description().map(ToOwned::to_owned),
            stored.columns_schema().clone(),
            stored.owner_id(),
            true,
            stored.created_at(),
            deleted_at,
        )?;
        Ok(())
    }
}

#[async_trait]
impl RowRepository for InMemoryRepository {
    async fn list_rows(&self, table_id: TableId) -> AppResult<Vec<TableRow>> {
        let mut rows: Vec<TableRow> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|row| row.table_id() == table_id && !row.is_deleted())
            .cloned()
            .collect();
        rows.sort_by(TableRow::display_cmp);
        Ok(rows)
    }

    async fn find_row(&self, table_id: TableId, row_id: RowId) -> AppResult<Option<TableRow>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|row| row.table_id() == table_id && row.id() == row_id)
            .cloned())
    }

    async fn insert_rows(
        &self,
        table_id: TableId,
        created_by: UserId,
        rows: Vec<RowData>,
    ) -> AppResult<Vec<TableRow>> {
        let table_exists = self
            .tables
            .read()
            .await
            .get(&table_id)
            .is_some_and(|table| !table.is_deleted());
        if !table_exists {
            return Err(AppError::NotFound(format!(
                "table '{table_id}' does not exist"
            )));
        }

        let mut stored = self.rows.write().await;
        // Deleted rows keep their slot so orders are never reused.
        let current_max = stored
            .iter()
            .filter(|row| row.table_id() == table_id)
            .map(TableRow::row_order)
            .max()
            .unwrap_or(0);
        let now = Utc::now();

        let inserted: Vec<TableRow> = rows
            .into_iter()
            .zip(current_max + 1..)
            .map(|(data, row_order)| {
                TableRow::new(
                    RowId::new(),
                    table_id,
                    data,
                    row_order,
                    false,
                    Some(created_by),
                    None,
                    now,
                    now,
                )
            })
            .collect();
        stored.extend(inserted.iter().cloned());

        Ok(inserted)
    }

    async fn replace_row_data(
        &self,
        table_id: TableId,
        row_id: RowId,
        data: RowData,
        updated_by: UserId,
    ) -> AppResult<TableRow> {
        let mut rows = self.rows.write().await;
        let row = live_row_mut(&mut rows, table_id, row_id)?;
        *row = row.with_data(data, updated_by, Utc::now());
        Ok(row.clone())
    }

    async fn soft_delete_row(
        &self,
        table_id: TableId,
        row_id: RowId,
        deleted_by: UserId,
    ) -> AppResult<TableRow> {
        let mut rows = self.rows.write().await;
        let row = live_row_mut(&mut rows, table_id, row_id)?;
        *row = row.deleted(deleted_by, Utc::now());
        Ok(row.clone())
    }
}

fn live_row_mut(rows: &mut [TableRow], table_id: TableId, row_id: RowId) -> AppResult<&mut TableRow> {
    rows.iter_mut()
        .find(|row| row.table_id() == table_id && row.id() == row_id && !row.is_deleted())
        .ok_or_else(|| AppError::NotFound(format!("row '{row_id}' does not exist")))
}
