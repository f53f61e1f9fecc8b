//! Domain entities and invariants.

#![forbid(unsafe_code)]

pub mod access;
mod audit;
mod notification;
mod preferences;
mod row;
mod schema;
mod table;
mod task;

pub use access::{
    Capability, CapabilityFlags, Role, TableAccess, TablePermission, TableShareRole, UserProfile,
};
pub use audit::{AuditAction, AuditEntityType, AuditLogEntry};
pub use notification::{
    NOTIFICATION_INBOX_LIMIT, Notification, NotificationId, NotificationKind,
};
pub use preferences::Language;
pub use row::{CellValue, RowData, RowId, TableRow};
pub use schema::{ColumnDefinition, ColumnType, DATE_COLUMN_FORMAT, TableSchema};
pub use table::{DynamicTable, TABLE_NAME_MIN_LENGTH, TableId, validate_table_name};
pub use task::{TASK_TITLE_MIN_LENGTH, Task, TaskDraft, TaskId, TaskStatus};
