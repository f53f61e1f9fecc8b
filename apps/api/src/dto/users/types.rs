use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Capability flags as exchanged with the user administration page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/capability-flags-payload.ts"
)]
pub struct CapabilityFlagsPayload {
    pub can_create_tables: bool,
    pub can_edit_tables: bool,
    pub can_delete_tables: bool,
    pub can_view_audit_logs: bool,
    pub can_manage_users: bool,
}

/// API representation of a user profile.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-profile-response.ts"
)]
pub struct UserProfileResponse {
    pub id: String,
    pub display_name: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    #[ts(type = "\"user\" | \"admin\" | \"manager\"")]
    pub role: String,
    pub permissions: Option<CapabilityFlagsPayload>,
}

/// Incoming payload for changing a user's global role.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-user-role-request.ts"
)]
pub struct UpdateUserRoleRequest {
    pub role: String,
}

/// Incoming payload for editing the caller's own profile.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-profile-request.ts"
)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub department: Option<String>,
}
