use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use tabula_core::{AppError, UserIdentity};
use tower_sessions::Session;
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;

use super::SESSION_USER_KEY;

#[derive(Debug, Deserialize)]
pub struct BootstrapRequest {
    pub email: String,
    pub token: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Signs a user in with the shared bootstrap token, creating the profile
/// on first sight.
pub async fn bootstrap_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<BootstrapRequest>,
) -> ApiResult<StatusCode> {
    if payload.token != state.bootstrap_token {
        return Err(AppError::Unauthorized("invalid bootstrap token".to_owned()).into());
    }

    let grant_admin = state
        .bootstrap_admin_email
        .as_deref()
        .is_some_and(|admin_email| admin_email.eq_ignore_ascii_case(payload.email.trim()));
    let profile = state
        .user_admin_service
        .ensure_profile(&payload.email, payload.full_name, grant_admin)
        .await?;

    let identity = UserIdentity::new(
        profile.id,
        profile.display_name().to_owned(),
        profile.email.clone(),
    );

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    info!(user_id = %profile.id, role = profile.role.as_str(), "session started");
    Ok(StatusCode::NO_CONTENT)
}
