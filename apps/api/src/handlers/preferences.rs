use std::str::FromStr;

use axum::Json;
use axum::extract::State;
use tabula_core::AppError;
use tabula_domain::Language;
use tower_sessions::Session;

use crate::auth::SESSION_LANGUAGE_KEY;
use crate::dto::{LanguagePreferenceResponse, MutationResponse, UpdateLanguagePreferenceRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn language_preference_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<LanguagePreferenceResponse>> {
    let language = session
        .get::<Language>(SESSION_LANGUAGE_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session language: {error}")))?
        .unwrap_or(state.default_language);

    Ok(Json(LanguagePreferenceResponse::from(language)))
}

pub async fn update_language_preference_handler(
    session: Session,
    Json(payload): Json<UpdateLanguagePreferenceRequest>,
) -> ApiResult<Json<MutationResponse<LanguagePreferenceResponse>>> {
    let language = Language::from_str(&payload.language)?;
    session
        .insert(SESSION_LANGUAGE_KEY, language)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session language: {error}"))
        })?;

    Ok(Json(MutationResponse::new(
        "Language updated",
        LanguagePreferenceResponse::from(language),
    )))
}
