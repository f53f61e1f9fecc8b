mod conversions;
mod types;

pub use types::{ShareTableRequest, TablePermissionResponse};
