//! In-memory adapters for every storage port.
//!
//! One repository value backs all ports so that row inserts can check the
//! owning table and allocate `row_order` under the same write lock.

use std::collections::HashMap;

use tabula_core::UserId;
use tabula_domain::{
    AuditLogEntry, DynamicTable, Notification, TableId, TablePermission, TableRow, Task, TaskId,
    UserProfile,
};
use tokio::sync::RwLock;

mod access;
mod audit;
mod notifications;
mod tables;
mod tasks;

/// In-memory storage implementation.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
    shares: RwLock<HashMap<(TableId, UserId), TablePermission>>,
    tables: RwLock<HashMap<TableId, DynamicTable>>,
    rows: RwLock<Vec<TableRow>>,
    audit_entries: RwLock<Vec<AuditLogEntry>>,
    tasks: RwLock<HashMap<TaskId, Task>>,
    notifications: RwLock<Vec<Notification>>,
}

impl InMemoryRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
