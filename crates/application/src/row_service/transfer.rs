use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use tabula_core::{AppError, AppResult};
use tabula_domain::{CellValue, RowData, TableRow, TableSchema};

/// Flat spreadsheet record handed over by the import collaborator,
/// keyed by header.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ImportRecord(BTreeMap<String, CellValue>);

impl FromIterator<(String, CellValue)> for ImportRecord {
    fn from_iter<T: IntoIterator<Item = (String, CellValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Flat record handed to the export collaborator. Serializes as an object
/// whose keys follow schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord(Vec<(String, CellValue)>);

impl ExportRecord {
    /// Returns the `(column name, value)` pairs in schema order.
    #[must_use]
    pub fn fields(&self) -> &[(String, CellValue)] {
        &self.0
    }
}

impl Serialize for ExportRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Maps record headers to column ids.
///
/// A header equal to a column id wins over headers matching that column by
/// name; two name matches for one column are rejected.
pub(super) fn import_record(schema: &TableSchema, record: ImportRecord) -> AppResult<RowData> {
    let mut by_id = BTreeMap::new();
    let mut by_name: BTreeMap<String, (String, CellValue)> = BTreeMap::new();
    let mut unmatched = Vec::new();

    for (header, value) in record.0 {
        if let Some(column) = schema.column(header.trim()) {
            by_id.insert(column.id().to_owned(), value);
            continue;
        }

        let Some(column_id) = schema.resolve_header(header.as_str()) else {
            unmatched.push((header, value));
            continue;
        };
        if let Some((previous, _)) = by_name.get(column_id) {
            return Err(AppError::Validation(format!(
                "import headers '{previous}' and '{header}' both match column '{}'",
                schema.label_for(column_id)
            )));
        }
        by_name.insert(column_id.to_owned(), (header, value));
    }

    let mut data: RowData = unmatched.into_iter().collect();
    for (column_id, (_, value)) in by_name {
        if !by_id.contains_key(&column_id) {
            data.insert(column_id, value);
        }
    }
    for (column_id, value) in by_id {
        data.insert(column_id, value);
    }

    Ok(data)
}

pub(super) fn export_record(schema: &TableSchema, row: &TableRow) -> ExportRecord {
    ExportRecord(
        schema
            .columns()
            .iter()
            .map(|column| {
                let value = row.data().get(column.id()).cloned().unwrap_or(CellValue::Null);
                (column.name().to_owned(), value)
            })
            .collect(),
    )
}
