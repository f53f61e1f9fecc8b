use std::collections::HashSet;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use tabula_core::{AppError, AppResult};

use crate::{CellValue, RowData};

/// Date format accepted for `date` columns.
pub const DATE_COLUMN_FORMAT: &str = "%Y-%m-%d";

/// Supported dynamic column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Free text.
    Text,
    /// Numeric value.
    Number,
    /// Calendar date in `YYYY-MM-DD` form.
    Date,
    /// One value out of the column's option list.
    Select,
}

impl ColumnType {
    /// Returns a stable storage value for the column type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Select => "select",
        }
    }
}

impl FromStr for ColumnType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            "select" => Ok(Self::Select),
            _ => Err(AppError::Validation(format!(
                "unknown column type '{value}'"
            ))),
        }
    }
}

/// One column of a dynamic table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    id: String,
    name: String,
    #[serde(rename = "type")]
    column_type: ColumnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
}

impl ColumnDefinition {
    /// Creates a validated column definition.
    ///
    /// Options are only kept for `select` columns; a `select` column without
    /// options gets an empty list, meaning no valid choices yet.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        column_type: ColumnType,
        options: Option<Vec<String>>,
    ) -> AppResult<Self> {
        let id = id.into().trim().to_owned();
        let name = name.into().trim().to_owned();

        if id.is_empty() {
            return Err(AppError::Validation(
                "column id must not be empty".to_owned(),
            ));
        }

        if name.is_empty() {
            return Err(AppError::Validation(format!(
                "column '{id}' must have a name"
            )));
        }

        let options = match column_type {
            ColumnType::Select => {
                let options = options.unwrap_or_default();
                let mut seen = HashSet::new();
                for option in &options {
                    if option.trim().is_empty() {
                        return Err(AppError::Validation(format!(
                            "column '{id}' has an empty select option"
                        )));
                    }
                    if !seen.insert(option.as_str()) {
                        return Err(AppError::Validation(format!(
                            "column '{id}' repeats select option '{option}'"
                        )));
                    }
                }
                Some(options)
            }
            _ => None,
        };

        Ok(Self {
            id,
            name,
            column_type,
            options,
        })
    }

    /// Returns the column id used as key in row data.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the display label.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the column type.
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Returns the allowed values of a `select` column.
    #[must_use]
    pub fn options(&self) -> Option<&[String]> {
        self.options.as_deref()
    }

    /// Checks a cell value entered through the editor and returns the value
    /// to store.
    ///
    /// `null` and the empty string always clear the cell. Number columns
    /// also take text holding a number, stored as a JSON number.
    pub fn normalize_value(&self, value: CellValue) -> AppResult<CellValue> {
        if value.is_blank() {
            return Ok(value);
        }

        let normalized = match (self.column_type, value) {
            (ColumnType::Text, value @ CellValue::Text(_)) => Some(value),
            (ColumnType::Number, value @ CellValue::Number(_)) => Some(value),
            (ColumnType::Number, CellValue::Text(text)) => {
                text.trim().parse::<Number>().ok().map(CellValue::Number)
            }
            (ColumnType::Date, CellValue::Text(text)) => {
                NaiveDate::parse_from_str(text.as_str(), DATE_COLUMN_FORMAT)
                    .is_ok()
                    .then_some(CellValue::Text(text))
            }
            (ColumnType::Select, CellValue::Text(text)) => self
                .options()
                .is_some_and(|options| options.iter().any(|option| *option == text))
                .then_some(CellValue::Text(text)),
            _ => None,
        };

        normalized.ok_or_else(|| {
            AppError::Validation(format!(
                "value is not valid for {} column '{}'",
                self.column_type.as_str(),
                self.name
            ))
        })
    }
}

/// Ordered column list of a dynamic table; order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableSchema(Vec<ColumnDefinition>);

impl TableSchema {
    /// Creates a schema, rejecting duplicate column ids.
    pub fn new(columns: Vec<ColumnDefinition>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.id()) {
                return Err(AppError::Validation(format!(
                    "duplicate column id '{}' in table schema",
                    column.id()
                )));
            }
        }

        Ok(Self(columns))
    }

    /// Decodes a stored schema document and re-checks its invariants.
    pub fn from_json(value: serde_json::Value) -> AppResult<Self> {
        let columns: Vec<ColumnDefinition> = serde_json::from_value(value)
            .map_err(|error| AppError::Validation(format!("invalid columns schema: {error}")))?;

        let columns = columns
            .into_iter()
            .map(|column| {
                ColumnDefinition::new(column.id, column.name, column.column_type, column.options)
            })
            .collect::<AppResult<Vec<_>>>()?;

        Self::new(columns)
    }

    /// Returns the schema as a JSON document.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.0
                .iter()
                .map(|column| {
                    let mut object = serde_json::Map::new();
                    object.insert("id".to_owned(), column.id.clone().into());
                    object.insert("name".to_owned(), column.name.clone().into());
                    object.insert("type".to_owned(), column.column_type.as_str().into());
                    if let Some(options) = &column.options {
                        object.insert("options".to_owned(), options.clone().into());
                    }
                    serde_json::Value::Object(object)
                })
                .collect(),
        )
    }

    /// Returns the columns in display order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.0
    }

    /// Returns whether the schema has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Finds a column by id.
    #[must_use]
    pub fn column(&self, column_id: &str) -> Option<&ColumnDefinition> {
        self.0.iter().find(|column| column.id() == column_id)
    }

    /// Returns the display label for a row data key, or the key itself when
    /// no current column carries that id.
    #[must_use]
    pub fn label_for<'a>(&'a self, key: &'a str) -> &'a str {
        self.column(key).map(ColumnDefinition::name).unwrap_or(key)
    }

    /// Resolves an imported header to a column id, by id first and then by
    /// case-insensitive display name.
    #[must_use]
    pub fn resolve_header(&self, header: &str) -> Option<&str> {
        let header = header.trim();
        self.column(header)
            .or_else(|| {
                self.0
                    .iter()
                    .find(|column| column.name().eq_ignore_ascii_case(header))
            })
            .map(ColumnDefinition::id)
    }

    /// Checks every value whose key names a current column and returns the
    /// payload to store. Keys without a column are kept as they are.
    pub fn normalize_row(&self, data: &RowData) -> AppResult<RowData> {
        data.iter()
            .map(|(key, value)| {
                let value = match self.column(key) {
                    Some(column) => column.normalize_value(value.clone())?,
                    None => value.clone(),
                };
                Ok::<_, AppError>((key.to_owned(), value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::{ColumnDefinition, ColumnType, TableSchema};
    use crate::{CellValue, RowData};

    fn column(id: &str, name: &str, column_type: ColumnType) -> ColumnDefinition {
        ColumnDefinition::new(id, name, column_type, None).unwrap_or_else(|_| unreachable!())
    }

    #[test]
    fn duplicate_column_ids_are_rejected() {
        let result = TableSchema::new(vec![
            column("c1", "Name", ColumnType::Text),
            column("c1", "Other", ColumnType::Number),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn options_are_dropped_for_non_select_columns() {
        let column =
            ColumnDefinition::new("c1", "Name", ColumnType::Text, Some(vec!["a".to_owned()]))
                .unwrap_or_else(|_| unreachable!());
        assert!(column.options().is_none());
    }

    #[test]
    fn select_without_options_accepts_only_blank_values() {
        let column = column("c1", "Status", ColumnType::Select);
        assert_eq!(column.options(), Some(&[][..]));
        assert!(column.normalize_value(CellValue::Null).is_ok());
        assert!(column.normalize_value(CellValue::from("open")).is_err());
    }

    #[test]
    fn select_accepts_listed_options() {
        let column = ColumnDefinition::new(
            "c1",
            "Status",
            ColumnType::Select,
            Some(vec!["open".to_owned(), "closed".to_owned()]),
        )
        .unwrap_or_else(|_| unreachable!());

        assert!(column.normalize_value(CellValue::from("closed")).is_ok());
        assert!(column.normalize_value(CellValue::from("pending")).is_err());
    }

    #[test]
    fn date_and_number_values_are_checked() {
        let date = column("d", "Due", ColumnType::Date);
        assert!(date.normalize_value(CellValue::from("2025-02-28")).is_ok());
        assert!(date.normalize_value(CellValue::from("28/02/2025")).is_err());

        let number = column("n", "Amount", ColumnType::Number);
        assert!(number.normalize_value(CellValue::from(12_i64)).is_ok());
        assert!(number.normalize_value(CellValue::from("12,5")).is_err());
        assert!(number.normalize_value(CellValue::from(true)).is_err());
    }

    #[test]
    fn numeric_text_is_stored_as_a_number() {
        let number = column("n", "Amount", ColumnType::Number);
        assert_eq!(
            number.normalize_value(CellValue::from(" 12 ")).ok(),
            Some(CellValue::from(12_i64))
        );
        assert_eq!(
            number
                .normalize_value(CellValue::from("2.5"))
                .ok()
                .map(|value| value.to_json()),
            Some(json!(2.5))
        );
        assert_eq!(
            number.normalize_value(CellValue::from("")).ok(),
            Some(CellValue::from(""))
        );
    }

    #[test]
    fn row_values_are_checked_only_for_known_columns() {
        let schema = TableSchema::new(vec![
            column("c1", "Name", ColumnType::Text),
            column("c2", "Seats", ColumnType::Number),
        ])
        .unwrap_or_else(|_| unreachable!());

        let mut data = RowData::new();
        data.insert("c2", CellValue::from("7"));
        data.insert("legacy", CellValue::from(true));
        let normalized = schema.normalize_row(&data).unwrap_or_else(|_| unreachable!());
        assert_eq!(normalized.get("c2"), Some(&CellValue::from(7_i64)));
        assert_eq!(normalized.get("legacy"), Some(&CellValue::from(true)));

        data.insert("c1", CellValue::from(3_i64));
        assert!(schema.normalize_row(&data).is_err());
    }

    #[test]
    fn label_falls_back_to_raw_key() {
        let schema = TableSchema::new(vec![column("c1", "Name", ColumnType::Text)])
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(schema.label_for("c1"), "Name");
        assert_eq!(schema.label_for("c9"), "c9");
    }

    #[test]
    fn headers_resolve_by_id_or_name() {
        let schema = TableSchema::new(vec![column("c1", "Full Name", ColumnType::Text)])
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(schema.resolve_header("c1"), Some("c1"));
        assert_eq!(schema.resolve_header("full name"), Some("c1"));
        assert_eq!(schema.resolve_header("Email"), None);
    }

    #[test]
    fn stored_schema_document_is_revalidated() {
        let schema = TableSchema::from_json(json!([
            {"id": "c1", "name": "Name", "type": "text"},
            {"id": "c2", "name": "Status", "type": "select", "options": ["a", "b"]}
        ]))
        .unwrap_or_else(|_| unreachable!());
        assert_eq!(schema.columns().len(), 2);
        assert_eq!(schema.to_json()[1]["options"], json!(["a", "b"]));
        assert!(schema.to_json()[0].get("options").is_none());

        let duplicate = TableSchema::from_json(json!([
            {"id": "c1", "name": "A", "type": "text"},
            {"id": "c1", "name": "B", "type": "text"}
        ]));
        assert!(duplicate.is_err());
    }

    proptest! {
        #[test]
        fn schema_accepts_exactly_the_unique_id_lists(ids in proptest::collection::vec("[a-c]{1,2}", 0..6)) {
            let columns: Vec<ColumnDefinition> = ids
                .iter()
                .map(|id| column(id, "Label", ColumnType::Text))
                .collect();
            let unique: std::collections::HashSet<&String> = ids.iter().collect();

            prop_assert_eq!(TableSchema::new(columns).is_ok(), unique.len() == ids.len());
        }
    }
}
