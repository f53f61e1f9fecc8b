use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;
use tabula_core::{AppError, AppResult, UserId};
use uuid::Uuid;

use crate::TableId;

/// Identifier of a dynamic table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(Uuid);

impl RowId {
    /// Creates a random row identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a row identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a row identifier from its transport representation.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|error| AppError::Validation(format!("invalid row id '{value}': {error}")))
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RowId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Scalar value stored in one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Empty cell.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value, kept exactly as submitted.
    Number(Number),
    /// Text value; dates and select choices are text too.
    Text(String),
}

impl CellValue {
    /// Returns whether the value clears the cell.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(text) => text.is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    /// Converts a JSON value when it is a scalar.
    pub fn from_json(value: serde_json::Value) -> AppResult<Self> {
        match value {
            serde_json::Value::Null => Ok(Self::Null),
            serde_json::Value::Bool(value) => Ok(Self::Bool(value)),
            serde_json::Value::Number(value) => Ok(Self::Number(value)),
            serde_json::Value::String(value) => Ok(Self::Text(value)),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Err(
                AppError::Validation("cell values must be scalars".to_owned()),
            ),
        }
    }

    /// Returns the value as JSON.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(value) => serde_json::Value::Bool(*value),
            Self::Number(value) => serde_json::Value::Number(value.clone()),
            Self::Text(value) => serde_json::Value::String(value.clone()),
        }
    }
}

impl Display for CellValue {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(formatter, "null"),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Number(value) => write!(formatter, "{value}"),
            Self::Text(value) => write!(formatter, "{value}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Open key-value payload of a row, keyed by column id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowData(BTreeMap<String, CellValue>);

impl RowData {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a JSON object whose values are all scalars.
    pub fn from_json(value: serde_json::Value) -> AppResult<Self> {
        let serde_json::Value::Object(object) = value else {
            return Err(AppError::Validation(
                "row data must be a JSON object".to_owned(),
            ));
        };

        object
            .into_iter()
            .map(|(key, value)| Ok((key, CellValue::from_json(value)?)))
            .collect::<AppResult<BTreeMap<_, _>>>()
            .map(Self)
    }

    /// Returns the payload as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }

    /// Returns the value stored under a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.0.get(key)
    }

    /// Stores a value under a key, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: CellValue) {
        self.0.insert(key.into(), value);
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the payload has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a copy with every key of `patch` applied over this payload.
    #[must_use]
    pub fn merged(&self, patch: &RowData) -> RowData {
        let mut merged = self.0.clone();
        for (key, value) in &patch.0 {
            merged.insert(key.clone(), value.clone());
        }
        RowData(merged)
    }
}

impl FromIterator<(String, CellValue)> for RowData {
    fn from_iter<T: IntoIterator<Item = (String, CellValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One record of a dynamic table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    id: RowId,
    table_id: TableId,
    data: RowData,
    row_order: i64,
    is_deleted: bool,
    created_by: Option<UserId>,
    updated_by: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TableRow {
    /// Rehydrates a stored row.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        id: RowId,
        table_id: TableId,
        data: RowData,
        row_order: i64,
        is_deleted: bool,
        created_by: Option<UserId>,
        updated_by: Option<UserId>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            table_id,
            data,
            row_order,
            is_deleted,
            created_by,
            updated_by,
            created_at,
            updated_at,
        }
    }

    /// Returns the row id.
    #[must_use]
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Returns the owning table id.
    #[must_use]
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Returns the cell payload.
    #[must_use]
    pub fn data(&self) -> &RowData {
        &self.data
    }

    /// Returns the display order position.
    #[must_use]
    pub fn row_order(&self) -> i64 {
        self.row_order
    }

    /// Returns whether the row is soft-deleted.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Returns the inserting user.
    #[must_use]
    pub fn created_by(&self) -> Option<UserId> {
        self.created_by
    }

    /// Returns the last editing user.
    #[must_use]
    pub fn updated_by(&self) -> Option<UserId> {
        self.updated_by
    }

    /// Returns the insertion timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns a copy carrying a replaced payload.
    #[must_use]
    pub fn with_data(&self, data: RowData, updated_by: UserId, updated_at: DateTime<Utc>) -> Self {
        Self {
            data,
            updated_by: Some(updated_by),
            updated_at,
            ..self.clone()
        }
    }

    /// Returns a soft-deleted copy.
    #[must_use]
    pub fn deleted(&self, deleted_by: UserId, deleted_at: DateTime<Utc>) -> Self {
        Self {
            is_deleted: true,
            updated_by: Some(deleted_by),
            updated_at: deleted_at,
            ..self.clone()
        }
    }

    /// Total display order: `row_order`, then insertion time, then id.
    #[must_use]
    pub fn display_cmp(&self, other: &Self) -> Ordering {
        self.row_order
            .cmp(&other.row_order)
            .then_with(|| self.created_at.cmp(&other.created_at))
            .then_with(|| self.id.cmp(&other.id))
    }

    /// Returns the JSON snapshot recorded in audit entries.
    #[must_use]
    pub fn snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "table_id": self.table_id,
            "data": self.data.to_json(),
            "row_order": self.row_order,
            "is_deleted": self.is_deleted,
            "created_by": self.created_by,
            "updated_by": self.updated_by,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use serde_json::json;
    use tabula_core::UserId;

    use super::{CellValue, RowData, RowId, TableRow};
    use crate::TableId;

    #[test]
    fn row_data_rejects_nested_values() {
        assert!(RowData::from_json(json!({"c1": {"nested": true}})).is_err());
        assert!(RowData::from_json(json!(["c1"])).is_err());
    }

    #[test]
    fn row_data_keeps_scalars_exactly() {
        let data = RowData::from_json(json!({"c1": "x", "c2": 3, "c3": 1.5, "c4": null, "c5": true}))
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(data.get("c2"), Some(&CellValue::from(3_i64)));
        assert_eq!(
            data.to_json(),
            json!({"c1": "x", "c2": 3, "c3": 1.5, "c4": null, "c5": true})
        );
    }

    #[test]
    fn merge_keeps_unrelated_keys() {
        let mut current = RowData::new();
        current.insert("a", CellValue::from("1"));
        current.insert("b", CellValue::from("2"));
        let mut patch = RowData::new();
        patch.insert("b", CellValue::from("3"));

        let merged = current.merged(&patch);
        assert_eq!(merged.get("a"), Some(&CellValue::from("1")));
        assert_eq!(merged.get("b"), Some(&CellValue::from("3")));
    }

    #[test]
    fn duplicate_orders_fall_back_to_creation_then_id() {
        let table_id = TableId::new();
        let now = Utc::now();
        let build = |created_at| {
            TableRow::new(
                RowId::new(),
                table_id,
                RowData::new(),
                4,
                false,
                Some(UserId::new()),
                None,
                created_at,
                created_at,
            )
        };
        let earlier = build(now - Duration::seconds(5));
        let later = build(now);

        assert!(earlier.display_cmp(&later).is_lt());
        assert!(later.display_cmp(&earlier).is_gt());
        assert!(earlier.display_cmp(&earlier).is_eq());
    }
}
