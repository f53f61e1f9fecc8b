use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post, put};
use tabula_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;


pub fn build_router<Store>(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<Store>,
) -> Result<Router, AppError>
where
    Store: SessionStore + Clone,
{
    let cors_layer = cors::build_cors_layer(frontend_url)?;

    let protected_routes = Router::new()
        .route(
            "/api/tables",
            get(handlers::tables::list_tables_handler)
                .post(handlers::tables::create_table_handler),
        )
        .route(
            "/api/tables/{table_id}",
            get(handlers::tables::get_table_handler)
                .put(handlers::tables::update_table_handler)
                .delete(handlers::tables::delete_table_handler),
        )
        .route(
            "/api/tables/{table_id}/schema",
            put(handlers::tables::update_table_schema_handler),
        )
        .route(
            "/api/tables/{table_id}/rows",
            get(handlers::rows::list_rows_handler).post(handlers::rows::add_row_handler),
        )
        .route(
            "/api/tables/{table_id}/rows/import",
            post(handlers::rows::import_rows_handler),
        )
        .route(
            "/api/tables/{table_id}/rows/export",
            get(handlers::rows::export_rows_handler),
        )
        .route(
            "/api/tables/{table_id}/rows/{row_id}",
            put(handlers::rows::update_row_handler).delete(handlers::rows::delete_row_handler),
        )
        .route(
            "/api/tables/{table_id}/rows/{row_id}/cells/{column_id}",
            put(handlers::rows::update_cell_handler),
        )
        .route(
            "/api/tables/{table_id}/permissions",
            get(handlers::sharing::list_table_permissions_handler)
                .post(handlers::sharing::share_table_handler),
        )
        .route(
            "/api/tables/{table_id}/permissions/{user_id}",
            delete(handlers::sharing::revoke_table_share_handler),
        )
        .route(
            "/api/audit-logs",
            get(handlers::audit::list_audit_log_handler),
        )
        .route(
            "/api/audit-logs/stream",
            get(handlers::audit::stream_audit_log_handler),
        )
        .route("/api/users", get(handlers::users::list_users_handler))
        .route(
            "/api/users/{user_id}/role",
            put(handlers::users::update_user_role_handler),
        )
        .route(
            "/api/users/{user_id}/permissions",
            put(handlers::users::update_user_permissions_handler),
        )
        .route(
            "/api/profile",
            get(handlers::users::own_profile_handler)
                .put(handlers::users::update_own_profile_handler),
        )
        .route(
            "/api/tasks",
            get(handlers::tasks::list_tasks_handler).post(handlers::tasks::create_task_handler),
        )
        .route(
            "/api/tasks/{task_id}",
            delete(handlers::tasks::delete_task_handler),
        )
        .route(
            "/api/tasks/{task_id}/status",
            put(handlers::tasks::update_task_status_handler),
        )
        .route(
            "/api/tasks/{task_id}/toggle",
            post(handlers::tasks::toggle_task_status_handler),
        )
        .route(
            "/api/notifications",
            get(handlers::notifications::list_notifications_handler),
        )
        .route(
            "/api/notifications/read-all",
            post(handlers::notifications::mark_all_notifications_read_handler),
        )
        .route(
            "/api/notifications/{notification_id}/read",
            post(handlers::notifications::mark_notification_read_handler),
        )
        .route("/api/dashboard", get(handlers::dashboard::dashboard_handler))
        .route(
            "/api/preferences/language",
            get(handlers::preferences::language_preference_handler)
                .put(handlers::preferences::update_language_preference_handler),
        )
        .route("/auth/me", get(auth::me_handler))
        .route_layer(from_fn(middleware::require_auth));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/bootstrap", post(auth::bootstrap_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state))
}
