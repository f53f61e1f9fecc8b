use tabula_core::AppError;
use tabula_domain::{
    AuditAction, AuditEntityType, CellValue, ColumnDefinition, ColumnType, RowData, Role,
    TableSchema,
};

use crate::test_support::{Harness, flags};

fn schema(columns: &[(&str, &str)]) -> TableSchema {
    TableSchema::new(
        columns
            .iter()
            .map(|(id, name)| {
                ColumnDefinition::new(*id, *name, ColumnType::Text, None)
                    .unwrap_or_else(|_| unreachable!())
            })
            .collect(),
    )
    .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn create_table_without_capability_writes_nothing() {
    let harness = Harness::new();
    let user = harness
        .user("Ayla", Role::Manager, flags(|flags| flags.can_edit_tables = true))
        .await;

    let result = harness
        .table_service()
        .create_table(&user, "Leads", None)
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(harness.tables.tables.lock().await.is_empty());
    assert_eq!(harness.audit_count().await, 0);
}

#[tokio::test]
async fn short_table_name_is_a_field_error() {
    let harness = Harness::new();
    let admin = harness.admin().await;

    match harness.table_service().create_table(&admin, " x ", None).await {
        Err(AppError::InvalidFields(errors)) => {
            assert_eq!(
                errors.messages("name"),
                ["Table name must be at least 2 characters.".to_owned()]
            );
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(harness.audit_count().await, 0);
}

#[tokio::test]
async fn create_table_records_insert_and_lists_for_owner() {
    let harness = Harness::new();
    let creator = harness
        .user("Ayla", Role::User, flags(|flags| flags.can_create_tables = true))
        .await;
    let stranger = harness.user("Deniz", Role::User, None).await;
    let service = harness.table_service();

    let table = service
        .create_table(&creator, " Leads ", Some("Inbound".to_owned()))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(table.name(), "Leads");
    assert_eq!(table.owner_id(), creator.user_id());
    assert!(table.columns_schema().is_empty());

    let entries = harness.audit.entries.lock().await.clone();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action(), AuditAction::Insert);
    assert_eq!(entries[0].table_id(), Some(table.id()));

    let listed = service
        .list_tables(&creator)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(listed.len(), 1);
    assert!(
        service
            .list_tables(&stranger)
            .await
            .unwrap_or_else(|_| unreachable!())
            .is_empty()
    );
    assert!(matches!(
        service.get_table(&stranger, table.id()).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn delete_table_records_one_entry_without_table_id() {
    let harness = Harness::new();
    let admin = harness.admin().await;
    let service = harness.table_service();
    let table = service
        .create_table(&admin, "Leads", None)
        .await
        .unwrap_or_else(|_| unreachable!());
    harness.audit.entries.lock().await.clear();

    service
        .delete_table(&admin, table.id())
        .await
        .unwrap_or_else(|_| unreachable!());

    let entries = harness.audit.entries.lock().await.clone();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.entity_type(), AuditEntityType::DynamicTables);
    assert_eq!(entry.entity_id(), table.id().to_string());
    assert_eq!(entry.table_id(), None);
    assert_eq!(entry.action(), AuditAction::Delete);
    assert_eq!(
        entry.old_data().map(|data| data["name"].clone()),
        Some(serde_json::json!("Leads"))
    );

    assert!(matches!(
        service.get_table(&admin, table.id()).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn delete_table_requires_delete_capability_even_for_owner() {
    let harness = Harness::new();
    let owner = harness
        .user("Ayla", Role::User, flags(|flags| flags.can_create_tables = true))
        .await;
    let service = harness.table_service();
    let table = service
        .create_table(&owner, "Leads", None)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(matches!(
        service.delete_table(&owner, table.id()).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(service.get_table(&owner, table.id()).await.is_ok());
}

#[tokio::test]
async fn schema_update_records_before_and_after() {
    let harness = Harness::new();
    let admin = harness.admin().await;
    let service = harness.table_service();
    let table = service
        .create_table(&admin, "Leads", None)
        .await
        .unwrap_or_else(|_| unreachable!());

    let updated = service
        .update_schema(&admin, table.id(), schema(&[("c1", "Old")]))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(updated.columns_schema().columns().len(), 1);
    let entries = harness.audit.entries.lock().await.clone();
    let last = entries.last().unwrap_or_else(|| unreachable!());
    assert_eq!(last.action(), AuditAction::Update);
    assert_eq!(
        last.old_data().map(|data| data["columns_schema"].clone()),
        Some(serde_json::json!([]))
    );
    assert_eq!(
        last.new_data().map(|data| data["columns_schema"][0]["name"].clone()),
        Some(serde_json::json!("Old"))
    );
}

#[tokio::test]
async fn column_rename_keeps_values_and_id_change_orphans_them() {
    let harness = Harness::new();
    let admin = harness.admin().await;
    let tables = harness.table_service();
    let rows = harness.row_service();
    let table = tables
        .create_table(&admin, "Leads", None)
        .await
        .unwrap_or_else(|_| unreachable!());
    tables
        .update_schema(&admin, table.id(), schema(&[("c1", "Old")]))
        .await
        .unwrap_or_else(|_| unreachable!());
    let mut data = RowData::new();
    data.insert("c1", CellValue::from("Acme"));
    rows.add_row(&admin, table.id(), data)
        .await
        .unwrap_or_else(|_| unreachable!());

    let renamed = tables
        .update_schema(&admin, table.id(), schema(&[("c1", "New")]))
        .await
        .unwrap_or_else(|_| unreachable!());
    let exported = rows
        .export_rows(&admin, table.id())
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(renamed.columns_schema().label_for("c1"), "New");
    assert_eq!(
        exported[0].fields(),
        [("New".to_owned(), CellValue::from("Acme"))]
    );

    let rekeyed = tables
        .update_schema(&admin, table.id(), schema(&[("c2", "New")]))
        .await
        .unwrap_or_else(|_| unreachable!());
    let listed = rows
        .list_rows(&admin, table.id())
        .await
        .unwrap_or_else(|_| unreachable!());
    let exported = rows
        .export_rows(&admin, table.id())
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(rekeyed.columns_schema().column("c1").is_none());
    assert_eq!(listed[0].data().get("c1"), Some(&CellValue::from("Acme")));
    assert_eq!(exported[0].fields(), [("New".to_owned(), CellValue::Null)]);
}

#[tokio::test]
async fn table_details_need_edit_access() {
    let harness = Harness::new();
    let admin = harness.admin().await;
    let viewer = harness.user("Viewer", Role::User, None).await;
    let service = harness.table_service();
    let table = service
        .create_table(&admin, "Leads", None)
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(matches!(
        service
            .update_table_details(&viewer, table.id(), "Prospects", None)
            .await,
        Err(AppError::Forbidden(_))
    ));

    let updated = service
        .update_table_details(&admin, table.id(), "Prospects", Some("Q3".to_owned()))
        .await
        .unwrap_or_else(|_| unreachable!());
    assert_eq!(updated.name(), "Prospects");
    assert_eq!(updated.description(), Some("Q3"));
}
