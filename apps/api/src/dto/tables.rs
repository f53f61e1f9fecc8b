mod conversions;
mod types;

pub use types::{
    ColumnDefinitionPayload, CreateTableRequest, TableResponse, UpdateTableRequest,
    UpdateTableSchemaRequest,
};
