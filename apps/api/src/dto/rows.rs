mod conversions;
mod types;

pub use types::{
    ExportRowsResponse, ImportRowsRequest, RowDataRequest, RowResponse, UpdateCellRequest,
};
