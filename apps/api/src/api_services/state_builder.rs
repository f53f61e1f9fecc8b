use std::sync::Arc;

use sqlx::PgPool;
use tabula_application::ports::{
    AuditRepository, ChangeFeed, NotificationRepository, ProfileRepository, RowRepository,
    TablePermissionRepository, TableRepository, TaskRepository,
};
use tabula_application::{
    AuditRecorder, AuditService, AuthorizationService, DashboardService, NotificationService,
    RowService, SharingService, TableService, TaskService, UserAdminService,
};
#[cfg(test)]
use tabula_infrastructure::InMemoryRepository;
use tabula_infrastructure::{
    BroadcastChangeFeed, DEFAULT_CHANGE_FEED_CAPACITY, PostgresAuditRepository,
    PostgresNotificationRepository, PostgresProfileRepository, PostgresRowRepository, PostgresTablePermissionRepository,
    PostgresTableRepository, PostgresTaskRepository,
};

use crate::api_config::ApiConfig;
use crate::state::AppState;

struct RepositorySet {
    profile_repository: Arc<dyn ProfileRepository>,
    permission_repository: Arc<dyn TablePermissionRepository>,
    table_repository: Arc<dyn TableRepository>,
    row_repository: Arc<dyn RowRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    task_repository: Arc<dyn TaskRepository>,
    notification_repository: Arc<dyn NotificationRepository>,
}

impl RepositorySet {
    fn postgres(pool: &PgPool) -> Self {
        Self {
            profile_repository: Arc::new(PostgresProfileRepository::new(pool.clone())),
            permission_repository: Arc::new(PostgresTablePermissionRepository::new(pool.clone())),
            table_repository: Arc::new(PostgresTableRepository::new(pool.clone())),
            row_repository: Arc::new(PostgresRowRepository::new(pool.clone())),
            audit_repository: Arc::new(PostgresAuditRepository::new(pool.clone())),
            task_repository: Arc::new(PostgresTaskRepository::new(pool.clone())),
            notification_repository: Arc::new(PostgresNotificationRepository::new(pool.clone())),
        }
    }

    #[cfg(test)]
    fn in_memory(repository: &Arc<InMemoryRepository>) -> Self {
        Self {
            profile_repository: repository.clone(),
            permission_repository: repository.clone(),
            table_repository: repository.clone(),
            row_repository: repository.clone(),
            audit_repository: repository.clone(),
            task_repository: repository.clone(),
            notification_repository: repository.clone(),
        }
    }
}

/// Wires the Postgres adapters into the application services.
pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    assemble_app_state(RepositorySet::postgres(&pool), config)
}

/// Wires a shared in-memory store into the application services.
#[cfg(test)]
pub fn build_in_memory_app_state(config: &ApiConfig) -> (AppState, Arc<InMemoryRepository>) {
    let repository = Arc::new(InMemoryRepository::new());
    let state = assemble_app_state(RepositorySet::in_memory(&repository), config);
    (state, repository)
}

fn assemble_app_state(repositories: RepositorySet, config: &ApiConfig) -> AppState {
    let change_feed = BroadcastChangeFeed::new(DEFAULT_CHANGE_FEED_CAPACITY);
    let change_feed_port: Arc<dyn ChangeFeed> = Arc::new(change_feed.clone());

    let authorization_service = AuthorizationService::new(
        repositories.profile_repository.clone(),
        repositories.permission_repository.clone(),
    );
    let audit_recorder =
        AuditRecorder::new(repositories.audit_repository.clone(), change_feed_port);

    let notification_service = NotificationService::new(repositories.notification_repository);
    let table_service = TableService::new(
        repositories.table_repository.clone(),
        authorization_service.clone(),
        audit_recorder.clone(),
    );
    let audit_service = AuditService::new(
        repositories.audit_repository,
        repositories.profile_repository.clone(),
        repositories.table_repository.clone(),
        authorization_service.clone(),
        config.audit_log_default_limit,
    );

    AppState {
        row_service: RowService::new(
            repositories.table_repository.clone(),
            repositories.row_repository,
            authorization_service.clone(),
            audit_recorder.clone(),
        ),
        sharing_service: SharingService::new(
            repositories.table_repository,
            repositories.permission_repository,
            repositories.profile_repository.clone(),
            authorization_service.clone(),
            audit_recorder.clone(),
            notification_service.clone(),
        ),
        user_admin_service: UserAdminService::new(
            repositories.profile_repository,
            authorization_service.clone(),
            audit_recorder.clone(),
            notification_service.clone(),
        ),
        task_service: TaskService::new(repositories.task_repository.clone(), audit_recorder),
        dashboard_service: DashboardService::new(
            table_service.clone(),
            repositories.task_repository,
            authorization_service.clone(),
            audit_service.clone(),
        ),
        table_service,
        audit_service,
        notification_service,
        authorization_service,
        change_feed,
        frontend_url: config.frontend_url.clone(),
        bootstrap_token: config.bootstrap_token.clone(),
        bootstrap_admin_email: config.bootstrap_admin_email.clone(),
        default_language: config.default_language,
    }
}
