mod access;
mod audit;
mod change_feed;
mod notifications;
mod tables;
mod tasks;

pub use access::{ProfileRepository, TablePermissionRepository};
pub use audit::{AuditLogQuery, AuditRepository};
pub use change_feed::{ChangeEvent, ChangeFeed, ChangeKind};
pub use notifications::NotificationRepository;
pub use tables::{RowRepository, TableRepository};
pub use tasks::TaskRepository;
