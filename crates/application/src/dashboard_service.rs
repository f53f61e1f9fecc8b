use std::sync::Arc;

use tabula_core::{AppResult, UserIdentity};
use tabula_domain::access::has_capability;
use tabula_domain::{Capability, TaskStatus};

use crate::ports::TaskRepository;
use crate::{AuditLogRequest, AuditLogView, AuditService, AuthorizationService, TableService};

/// Number of audit entries shown on the dashboard.
pub const DASHBOARD_RECENT_AUDIT_LIMIT: usize = 5;

/// Landing page counters of one user.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// Live tables the user can open.
    pub tables_count: u64,
    /// Live tasks on the board.
    pub tasks_count: u64,
    /// Live tasks in the done column.
    pub completed_tasks_count: u64,
    /// Newest audit entries; empty without the audit capability.
    pub recent_audit_logs: Vec<AuditLogView>,
}

/// Read-only aggregation over tables, tasks and the audit trail.
#[derive(Clone)]
pub struct DashboardService {
    table_service: TableService,
    task_repository: Arc<dyn TaskRepository>,
    authorization_service: AuthorizationService,
    audit_service: AuditService,
}

impl DashboardService {
    /// Creates a new dashboard service.
    #[must_use]
    pub fn new(
        table_service: TableService,
        task_repository: Arc<dyn TaskRepository>,
        authorization_service: AuthorizationService,
        audit_service: AuditService,
    ) -> Self {
        Self {
            table_service,
            task_repository,
            authorization_service,
            audit_service,
        }
    }

    /// Builds the actor's dashboard summary.
    pub async fn summary(&self, actor: &UserIdentity) -> AppResult<DashboardSummary> {
        let tables = self.table_service.list_tables(actor).await?;
        let tasks = self.task_repository.list_tasks().await?;
        let completed = tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Done)
            .count();

        let profile = self.authorization_service.actor_profile(actor).await?;
        let recent_audit_logs = if has_capability(&profile, Capability::ViewAuditLogs) {
            self.audit_service
                .list_audit_log(
                    actor,
                    AuditLogRequest {
                        limit: Some(DASHBOARD_RECENT_AUDIT_LIMIT),
                        ..AuditLogRequest::default()
                    },
                )
                .await?
        } else {
            Vec::new()
        };

        Ok(DashboardSummary {
            tables_count: tables.len() as u64,
            tasks_count: tasks.len() as u64,
            completed_tasks_count: completed as u64,
            recent_audit_logs,
        })
    }
}
