use std::str::FromStr;

use tabula_core::AppResult;
use tabula_domain::{ColumnDefinition, ColumnType, DynamicTable, TableAccess, TableSchema};

use super::types::{ColumnDefinitionPayload, TableResponse, UpdateTableSchemaRequest};

impl From<&ColumnDefinition> for ColumnDefinitionPayload {
    fn from(value: &ColumnDefinition) -> Self {
        Self {
            id: value.id().to_owned(),
            name: value.name().to_owned(),
            column_type: value.column_type().as_str().to_owned(),
            options: value.options().map(<[String]>::to_vec),
        }
    }
}

impl TryFrom<ColumnDefinitionPayload> for ColumnDefinition {
    type Error = tabula_core::AppError;

    fn try_from(value: ColumnDefinitionPayload) -> Result<Self, Self::Error> {
        ColumnDefinition::new(
            value.id,
            value.name,
            ColumnType::from_str(value.column_type.as_str())?,
            value.options,
        )
    }
}

impl UpdateTableSchemaRequest {
    /// Validates the submitted columns into a schema.
    pub fn into_schema(self) -> AppResult<TableSchema> {
        let columns = self
            .columns
            .into_iter()
            .map(ColumnDefinition::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        TableSchema::new(columns)
    }
}

impl TableResponse {
    /// Builds the response for a table as seen with the given access.
    #[must_use]
    pub fn from_table(table: &DynamicTable, access: TableAccess) -> Self {
        Self {
            id: table.id().to_string(),
            name: table.name().to_owned(),
            description: table.description().map(ToOwned::to_owned),
            columns_schema: table
                .columns_schema()
                .columns()
                .iter()
                .map(ColumnDefinitionPayload::from)
                .collect(),
            owner_id: table.owner_id().to_string(),
            access: access_label(access).to_owned(),
            created_at: table.created_at().to_rfc3339(),
            updated_at: table.updated_at().to_rfc3339(),
        }
    }
}

fn access_label(access: TableAccess) -> &'static str {
    match access {
        TableAccess::None => "none",
        TableAccess::View => "view",
        TableAccess::Edit => "edit",
        TableAccess::Full => "full",
    }
}
