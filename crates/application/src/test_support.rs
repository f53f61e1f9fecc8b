//! Hand-written fakes shared by the service tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tabula_core::{AppError, AppResult, UserId, UserIdentity};
use tabula_domain::{
    AuditLogEntry, CapabilityFlags, DynamicTable, Notification, NotificationId, Role, RowData,
    RowId, TableId, TablePermission, TableRow, Task, TaskId, UserProfile,
};
use tokio::sync::Mutex;

use crate::ports::{
    AuditLogQuery, AuditRepository, ChangeEvent, ChangeFeed, NotificationRepository,
    ProfileRepository, RowRepository, TablePermissionRepository, TableRepository, TaskRepository,
};
use crate::{
    AuditRecorder, AuditService, AuthorizationService, DashboardService, NotificationService,
    RowService, SharingService, TableService, TaskService, UserAdminService,
};

#[derive(Default)]
pub(crate) struct FakeProfiles {
    pub(crate) profiles: Mutex<HashMap<UserId, UserProfile>>,
}

#[async_trait]
impl ProfileRepository for FakeProfiles {
    async fn find_profile(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        Ok(self.profiles.lock().await.get(&user_id).cloned())
    }

    async fn find_profile_by_email(&self, email: &str) -> AppResult<Option<UserProfile>> {
        Ok(self
            .profiles
            .lock()
            .await
            .values()
            .find(|profile| {
                profile
                    .email
                    .as_deref()
                    .map(|stored| stored.eq_ignore_ascii_case(email))
                    .unwrap_or(false)
            })
            .cloned())
    }

    async fn list_profiles(&self) -> AppResult<Vec<UserProfile>> {
        let mut profiles: Vec<UserProfile> =
            self.profiles.lock().await.values().cloned().collect();
        profiles.sort_by(|left, right| left.email.cmp(&right.email));
        Ok(profiles)
    }

    async fn save_profile(&self, profile: UserProfile) -> AppResult<()> {
        self.profiles.lock().await.insert(profile.id, profile);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeShares {
    pub(crate) shares: Mutex<Vec<TablePermission>>,
}

#[async_trait]
impl TablePermissionRepository for FakeShares {
    async fn find_share(
        &self,
        table_id: TableId,
        user_id: UserId,
    ) -> AppResult<Option<TablePermission>> {
        Ok(self
            .shares
            .lock()
            .await
            .iter()
            .find(|share| share.table_id == table_id && share.user_id == user_id)
            .cloned())
    }

    async fn list_shares(&self, table_id: TableId) -> AppResult<Vec<TablePermission>> {
        Ok(self
            .shares
            .lock()
            .await
            .iter()
            .filter(|share| share.table_id == table_id)
            .cloned()
            .collect())
    }

    async fn list_shares_for_user(&self, user_id: UserId) -> AppResult<Vec<TablePermission>> {
        Ok(self
            .shares
            .lock()
            .await
            .iter()
            .filter(|share| share.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn upsert_share(&self, share: TablePermission) -> AppResult<TablePermission> {
        let mut shares = self.shares.lock().await;
        if let Some(existing) = shares
            .iter_mut()
            .find(|stored| stored.table_id == share.table_id && stored.user_id == share.user_id)
        {
            existing.role = share.role;
            return Ok(existing.clone());
        }

        shares.push(share.clone());
        Ok(share)
    }

    async fn delete_share(
        &self,
        table_id: TableId,
        user_id: UserId,
    ) -> AppResult<Option<TablePermission>> {
        let mut shares = self.shares.lock().await;
        let position = shares
            .iter()
            .position(|share| share.table_id == table_id && share.user_id == user_id);
        Ok(position.map(|position| shares.remove(position)))
    }
}

#[derive(Default)]
pub(crate) struct FakeTables {
    pub(crate) tables: Mutex<HashMap<TableId, (DynamicTable, bool)>>,
}

#[async_trait]
impl TableRepository for FakeTables {
    async fn create_table(&self, table: DynamicTable) -> AppResult<()> {
        self.tables.lock().await.insert(table.id(), (table, false));
        Ok(())
    }

    async fn find_table(&self, table_id: TableId) -> AppResult<Option<DynamicTable>> {
        Ok(self
            .tables
            .lock()
            .await
            .get(&table_id)
            .filter(|(_, deleted)| !deleted)
            .map(|(table, _)| table.clone()))
    }

    async fn list_tables(&self) -> AppResult<Vec<DynamicTable>> {
        let mut tables: Vec<DynamicTable> = self
            .tables
            .lock()
            .await
            .values()
            .filter(|(_, deleted)| !deleted)
            .map(|(table, _)| table.clone())
            .collect();
        tables.sort_by_key(|table| std::cmp::Reverse(table.created_at()));
        Ok(tables)
    }

    async fn update_table(&self, table: DynamicTable) -> AppResult<()> {
        let mut tables = self.tables.lock().await;
        match tables.get_mut(&table.id()) {
            Some((stored, false)) => {
                *stored = table;
                Ok(())
            }
            _ => Err(AppError::NotFound(format!("table '{}'", table.id()))),
        }
    }

    async fn soft_delete_table(
        &self,
        table_id: TableId,
        _deleted_at: DateTime<Utc>,
    ) -> AppResult<()> {
        match self.tables.lock().await.get_mut(&table_id) {
            Some((_, deleted)) => {
                *deleted = true;
                Ok(())
            }
            None => Err(AppError::NotFound(format!("table '{table_id}'"))),
        }
    }
}

#[derive(Default)]
pub(crate) struct FakeRows {
    pub(crate) rows: Mutex<Vec<TableRow>>,
}

#[async_trait]
impl RowRepository for FakeRows {
    async fn list_rows(&self, table_id: TableId) -> AppResult<Vec<TableRow>> {
        let mut rows: Vec<TableRow> = self
            .rows
            .lock()
            .await
            .iter()
            .filter(|row| row.table_id() == table_id && !row.is_deleted())
            .cloned()
            .collect();
        rows.sort_by(TableRow::display_cmp);
        Ok(rows)
    }

    async fn find_row(&self, table_id: TableId, row_id: RowId) -> AppResult<Option<TableRow>> {
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .find(|row| row.table_id() == table_id && row.id() == row_id)
            .cloned())
    }

    async fn insert_rows(
        &self,
        table_id: TableId,
        created_by: UserId,
        rows: Vec<RowData>,
    ) -> AppResult<Vec<TableRow>> {
        let mut stored = self.rows.lock().await;
        let current_max = stored
            .iter()
            .filter(|row| row.table_id() == table_id)
            .map(TableRow::row_order)
            .max()
            .unwrap_or(0);
        let now = Utc::now();

        let inserted: Vec<TableRow> = rows
            .into_iter()
            .zip(1_i64..)
            .map(|(data, offset)| {
                TableRow::new(
                    RowId::new(),
                    table_id,
                    data,
                    current_max + offset,
                    false,
                    Some(created_by),
                    None,
                    now,
                    now,
                )
            })
            .collect();
        stored.extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn replace_row_data(
        &self,
        table_id: TableId,
        row_id: RowId,
        data: RowData,
        updated_by: UserId,
    ) -> AppResult<TableRow> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|row| row.table_id() == table_id && row.id() == row_id && !row.is_deleted())
            .ok_or_else(|| AppError::NotFound(format!("row '{row_id}'")))?;
        *row = row.with_data(data, updated_by, Utc::now());
        Ok(row.clone())
    }

    async fn soft_delete_row(
        &self,
        table_id: TableId,
        row_id: RowId,
        deleted_by: UserId,
    ) -> AppResult<TableRow> {
        let mut rows = self.rows.lock().await;
        let row = rows
            .iter_mut()
            .find(|row| row.table_id() == table_id && row.id() == row_id && !row.is_deleted())
            .ok_or_else(|| AppError::NotFound(format!("row '{row_id}'")))?;
        *row = row.deleted(deleted_by, Utc::now());
        Ok(row.clone())
    }
}

#[derive(Default)]
pub(crate) struct FakeAudit {
    pub(crate) entries: Mutex<Vec<AuditLogEntry>>,
}

#[async_trait]
impl AuditRepository for FakeAudit {
    async fn append_entry(&self, entry: AuditLogEntry) -> AppResult<()> {
        self.entries.lock().await.push(entry);
        Ok(())
    }

    async fn list_recent(&self, query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
        let mut entries: Vec<AuditLogEntry> = self
            .entries
            .lock()
            .await
            .iter()
            .filter(|entry| query.action.is_none_or(|action| entry.action() == action))
            .filter(|entry| {
                query
                    .entity_type
                    .is_none_or(|entity_type| entry.entity_type() == entity_type)
            })
            .cloned()
            .collect();
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.performed_at()));
        Ok(entries
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct FakeTasks {
    pub(crate) tasks: Mutex<HashMap<TaskId, Task>>,
}

#[async_trait]
impl TaskRepository for FakeTasks {
    async fn create_task(&self, task: Task) -> AppResult<()> {
        self.tasks.lock().await.insert(task.id, task);
        Ok(())
    }

    async fn find_task(&self, task_id: TaskId) -> AppResult<Option<Task>> {
        Ok(self
            .tasks
            .lock()
            .await
            .get(&task_id)
            .filter(|task| !task.is_deleted)
            .cloned())
    }

    async fn list_tasks(&self) -> AppResult<Vec<Task>> {
        Ok(self
            .tasks
            .lock()
            .await
            .values()
            .filter(|task| !task.is_deleted)
            .cloned()
            .collect())
    }

    async fn update_task(&self, task: Task) -> AppResult<()> {
        self.tasks.lock().await.insert(task.id, task);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeNotifications {
    pub(crate) notifications: Mutex<Vec<Notification>>,
}

#[async_trait]
impl NotificationRepository for FakeNotifications {
    async fn create_notification(&self, notification: Notification) -> AppResult<()> {
        self.notifications.lock().await.push(notification);
        Ok(())
    }

    async fn list_notifications(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> AppResult<Vec<Notification>> {
        let mut owned: Vec<Notification> = self
            .notifications
            .lock()
            .await
            .iter()
            .rev()
            .filter(|notification| notification.user_id() == user_id)
            .cloned()
            .collect();
        owned.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        owned.truncate(limit);
        Ok(owned)
    }

    async fn count_unread_notifications(&self, user_id: UserId) -> AppResult<u64> {
        Ok(self
            .notifications
            .lock()
            .await
            .iter()
            .filter(|notification| notification.user_id() == user_id && !notification.is_read())
            .count() as u64)
    }

    async fn mark_notification_read(
        &self,
        user_id: UserId,
        notification_id: NotificationId,
    ) -> AppResult<Option<Notification>> {
        let mut notifications = self.notifications.lock().await;
        let Some(stored) = notifications.iter_mut().find(|notification| {
            notification.id() == notification_id && notification.user_id() == user_id
        }) else {
            return Ok(None);
        };
        *stored = stored.marked_read();
        Ok(Some(stored.clone()))
    }

    async fn mark_all_notifications_read(&self, user_id: UserId) -> AppResult<u64> {
        let mut changed = 0;
        for stored in self.notifications.lock().await.iter_mut() {
            if stored.user_id() == user_id && !stored.is_read() {
                *stored = stored.marked_read();
                changed += 1;
            }
        }
        Ok(changed)
    }
}

#[derive(Default)]
pub(crate) struct FakeFeed {
    pub(crate) events: Mutex<Vec<ChangeEvent>>,
    pub(crate) failing: bool,
}

#[async_trait]
impl ChangeFeed for FakeFeed {
    async fn publish(&self, event: ChangeEvent) -> AppResult<()> {
        if self.failing {
            return Err(AppError::Internal("feed is down".to_owned()));
        }
        self.events.lock().await.push(event);
        Ok(())
    }
}

/// Wires every service over fresh fakes.
pub(crate) struct Harness {
    pub(crate) profiles: Arc<FakeProfiles>,
    pub(crate) shares: Arc<FakeShares>,
    pub(crate) tables: Arc<FakeTables>,
    pub(crate) rows: Arc<FakeRows>,
    pub(crate) audit: Arc<FakeAudit>,
    pub(crate) tasks: Arc<FakeTasks>,
    pub(crate) notifications: Arc<FakeNotifications>,
    pub(crate) feed: Arc<FakeFeed>,
}

impl Harness {
    pub(crate) fn new() -> Self {
        Self::with_feed(FakeFeed::default())
    }

    pub(crate) fn with_feed(feed: FakeFeed) -> Self {
        Self {
            profiles: Arc::new(FakeProfiles::default()),
            shares: Arc::new(FakeShares::default()),
            tables: Arc::new(FakeTables::default()),
            rows: Arc::new(FakeRows::default()),
            audit: Arc::new(FakeAudit::default()),
            tasks: Arc::new(FakeTasks::default()),
            notifications: Arc::new(FakeNotifications::default()),
            feed: Arc::new(feed),
        }
    }

    pub(crate) fn authorization(&self) -> AuthorizationService {
        AuthorizationService::new(self.profiles.clone(), self.shares.clone())
    }

    pub(crate) fn recorder(&self) -> AuditRecorder {
        AuditRecorder::new(self.audit.clone(), self.feed.clone())
    }

    pub(crate) fn table_service(&self) -> TableService {
        TableService::new(self.tables.clone(), self.authorization(), self.recorder())
    }

    pub(crate) fn row_service(&self) -> RowService {
        RowService::new(
            self.tables.clone(),
            self.rows.clone(),
            self.authorization(),
            self.recorder(),
        )
    }

    pub(crate) fn sharing_service(&self) -> SharingService {
        SharingService::new(
            self.tables.clone(),
            self.shares.clone(),
            self.profiles.clone(),
            self.authorization(),
            self.recorder(),
            self.notification_service(),
        )
    }

    pub(crate) fn user_admin_service(&self) -> UserAdminService {
        UserAdminService::new(
            self.profiles.clone(),
            self.authorization(),
            self.recorder(),
            self.notification_service(),
        )
    }

    pub(crate) fn notification_service(&self) -> NotificationService {
        NotificationService::new(self.notifications.clone())
    }

    pub(crate) fn dashboard_service(&self) -> DashboardService {
        DashboardService::new(
            self.table_service(),
            self.tasks.clone(),
            self.authorization(),
            self.audit_service(),
        )
    }

    pub(crate) fn task_service(&self) -> TaskService {
        TaskService::new(self.tasks.clone(), self.recorder())
    }

    pub(crate) fn audit_service(&self) -> AuditService {
        AuditService::new(
            self.audit.clone(),
            self.profiles.clone(),
            self.tables.clone(),
            self.authorization(),
            50,
        )
    }

    /// Stores a profile and returns the matching session identity.
    pub(crate) async fn user(
        &self,
        name: &str,
        role: Role,
        permissions: Option<CapabilityFlags>,
    ) -> UserIdentity {
        let profile = UserProfile {
            id: UserId::new(),
            full_name: Some(name.to_owned()),
            email: Some(format!("{}@example.com", name.to_lowercase())),
            department: None,
            role,
            permissions,
        };
        let identity = UserIdentity::new(profile.id, name, profile.email.clone());
        self.profiles
            .profiles
            .lock()
            .await
            .insert(profile.id, profile);
        identity
    }

    pub(crate) async fn admin(&self) -> UserIdentity {
        self.user("Admin", Role::Admin, None).await
    }

    pub(crate) async fn audit_count(&self) -> usize {
        self.audit.entries.lock().await.len()
    }
}

pub(crate) fn flags(configure: impl FnOnce(&mut CapabilityFlags)) -> Option<CapabilityFlags> {
    let mut flags = CapabilityFlags::default();
    configure(&mut flags);
    Some(flags)
}
