mod conversions;
mod types;

pub use types::{AuditDetailResponse, AuditLogEntryResponse};
