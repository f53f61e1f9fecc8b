//! Tabula infrastructure adapters.

#![forbid(unsafe_code)]

mod broadcast_change_feed;
mod in_memory_repository;
mod postgres_audit_repository;
mod postgres_notification_repository;
mod postgres_profile_repository;
mod postgres_row_repository;
mod postgres_table_permission_repository;
mod postgres_table_repository;
mod postgres_task_repository;

pub use broadcast_change_feed::{BroadcastChangeFeed, DEFAULT_CHANGE_FEED_CAPACITY};
pub use in_memory_repository::InMemoryRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_notification_repository::PostgresNotificationRepository;
pub use postgres_profile_repository::PostgresProfileRepository;
pub use postgres_row_repository::PostgresRowRepository;
pub use postgres_table_permission_repository::PostgresTablePermissionRepository;
pub use postgres_table_repository::PostgresTableRepository;
pub use postgres_task_repository::PostgresTaskRepository;
