use std::sync::Arc;

use tabula_application::ports::ProfileRepository;
use tabula_core::{UserId, UserIdentity};
use tabula_domain::{CapabilityFlags, Role, UserProfile};
use tabula_infrastructure::InMemoryRepository;

use crate::api_config::ApiConfig;
use crate::api_services::build_in_memory_app_state;
use crate::state::AppState;

pub(crate) const TEST_FRONTEND_URL: &str = "http://localhost:3000";
pub(crate) const TEST_BOOTSTRAP_TOKEN: &str = "bootstrap-token";
pub(crate) const TEST_ADMIN_EMAIL: &str = "admin@example.com";

pub(crate) fn test_config() -> ApiConfig {
    ApiConfig::from_lookup(false, |name| {
        let value = match name {
            "DATABASE_URL" => "postgres://localhost/tabula_test",
            "AUTH_BOOTSTRAP_TOKEN" => TEST_BOOTSTRAP_TOKEN,
            "SESSION_SECRET" => "0123456789abcdef0123456789abcdef",
            "FRONTEND_URL" => TEST_FRONTEND_URL,
            "BOOTSTRAP_ADMIN_EMAIL" => TEST_ADMIN_EMAIL,
            _ => return None,
        };
        Some(value.to_owned())
    })
    .unwrap_or_else(|_| unreachable!())
}

pub(crate) fn test_state() -> (AppState, Arc<InMemoryRepository>) {
    build_in_memory_app_state(&test_config())
}

pub(crate) async fn seed_user(
    repository: &InMemoryRepository,
    name: &str,
    role: Role,
    permissions: Option<CapabilityFlags>,
) -> UserIdentity {
    let email = format!("{}@example.com", name.to_lowercase());
    let profile = UserProfile {
        id: UserId::new(),
        full_name: Some(name.to_owned()),
        email: Some(email.clone()),
        department: None,
        role,
        permissions,
    };
    let identity = UserIdentity::new(profile.id, name, Some(email));

    assert!(repository.save_profile(profile).await.is_ok());
    identity
}

pub(crate) fn creator_flags() -> CapabilityFlags {
    CapabilityFlags {
        can_create_tables: true,
        ..CapabilityFlags::default()
    }
}
