use serde_json::{Map, Value};
use tabula_domain::{AuditEntityType, AuditLogEntry, TableSchema};

const SUMMARY_IGNORED_KEYS: &[&str] = &[
    "id",
    "created_at",
    "updated_at",
    "avatar_url",
    "table_id",
    "owner_id",
    "is_deleted",
];

const DETAIL_IGNORED_KEYS: &[&str] = &["id", "table_id", "created_at", "updated_at", "owner_id"];

/// One labelled value of an audit snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditDetail {
    /// Column display name or raw key.
    pub label: String,
    /// Rendered value.
    pub value: String,
}

/// Builds the one-line summary shown in the audit trail listing.
pub(super) fn summarize(entry: &AuditLogEntry, schema: Option<&TableSchema>) -> String {
    let Some(data) = entry.subject_data().and_then(Value::as_object) else {
        return "No data".to_owned();
    };

    if let Some(row_data) = row_payload(entry, data) {
        return row_data
            .iter()
            .map(|(key, value)| format!("{}: {}", column_label(schema, key), render(value)))
            .collect::<Vec<_>>()
            .join(", ");
    }

    if entry.entity_type() == AuditEntityType::DynamicTables {
        let mut parts = Vec::new();
        if let Some(name) = data.get("name").filter(|value| is_present(value)) {
            parts.push(format!("Name: {}", render(name)));
        }
        if let Some(description) = data.get("description").filter(|value| is_present(value)) {
            parts.push(format!("Desc: {}", render(description)));
        }
        return parts.join(", ");
    }

    let parts: Vec<String> = data
        .iter()
        .filter(|(key, value)| {
            !SUMMARY_IGNORED_KEYS.contains(&key.as_str()) && !value.is_object() && !value.is_array()
        })
        .map(|(key, value)| format!("{key}: {}", render(value)))
        .collect();

    if parts.is_empty() {
        "Complex Update".to_owned()
    } else {
        parts.join(", ")
    }
}

/// Lists the labelled values of the relevant snapshot for the detail view.
pub(super) fn details(entry: &AuditLogEntry, schema: Option<&TableSchema>) -> Vec<AuditDetail> {
    let Some(data) = entry.subject_data().and_then(Value::as_object) else {
        return Vec::new();
    };

    if let Some(row_data) = row_payload(entry, data) {
        return row_data
            .iter()
            .filter(|(key, _)| !DETAIL_IGNORED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| AuditDetail {
                label: column_label(schema, key).to_owned(),
                value: render(value),
            })
            .collect();
    }

    data.iter()
        .filter(|(key, _)| !DETAIL_IGNORED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| AuditDetail {
            label: key.clone(),
            value: render(value),
        })
        .collect()
}

fn row_payload<'a>(
    entry: &AuditLogEntry,
    data: &'a Map<String, Value>,
) -> Option<&'a Map<String, Value>> {
    if entry.entity_type() != AuditEntityType::TableRows {
        return None;
    }

    data.get("data").and_then(Value::as_object)
}

fn column_label<'a>(schema: Option<&'a TableSchema>, key: &'a str) -> &'a str {
    schema.map(|schema| schema.label_for(key)).unwrap_or(key)
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
