use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Envelope returned by successful mutations.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/mutation-response.ts"
)]
pub struct MutationResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub user_id: String,
    pub display_name: String,
    pub email: Option<String>,
}

/// Interface language of the current session.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/language-preference-response.ts"
)]
pub struct LanguagePreferenceResponse {
    #[ts(type = "\"en\" | \"tr\"")]
    pub language: String,
}

/// Incoming payload for switching the session language.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-language-preference-request.ts"
)]
pub struct UpdateLanguagePreferenceRequest {
    pub language: String,
}
