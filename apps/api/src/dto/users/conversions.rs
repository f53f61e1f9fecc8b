use tabula_domain::{CapabilityFlags, UserProfile};

use super::types::{CapabilityFlagsPayload, UserProfileResponse};

impl From<CapabilityFlags> for CapabilityFlagsPayload {
    fn from(value: CapabilityFlags) -> Self {
        Self {
            can_create_tables: value.can_create_tables,
            can_edit_tables: value.can_edit_tables,
            can_delete_tables: value.can_delete_tables,
            can_view_audit_logs: value.can_view_audit_logs,
            can_manage_users: value.can_manage_users,
        }
    }
}

impl From<CapabilityFlagsPayload> for CapabilityFlags {
    fn from(value: CapabilityFlagsPayload) -> Self {
        Self {
            can_create_tables: value.can_create_tables,
            can_edit_tables: value.can_edit_tables,
            can_delete_tables: value.can_delete_tables,
            can_view_audit_logs: value.can_view_audit_logs,
            can_manage_users: value.can_manage_users,
        }
    }
}

impl From<UserProfile> for UserProfileResponse {
    fn from(value: UserProfile) -> Self {
        Self {
            id: value.id.to_string(),
            display_name: value.display_name().to_owned(),
            role: value.role.as_str().to_owned(),
            permissions: value.permissions.map(CapabilityFlagsPayload::from),
            full_name: value.full_name,
            email: value.email,
            department: value.department,
        }
    }
}
