use std::sync::Arc;

use tabula_core::{AppError, AppResult, FieldErrors, UserId, UserIdentity};
use tabula_domain::{
    AuditAction, AuditEntityType, Capability, CapabilityFlags, NotificationKind, Role, UserProfile,
};
use tracing::info;

use crate::ports::ProfileRepository;
use crate::{AuditRecorder, AuthorizationService, NotificationService};

/// Minimum number of characters of a profile's full name.
pub const FULL_NAME_MIN_LENGTH: usize = 2;

/// Application service for user profiles, roles and capability flags.
#[derive(Clone)]
pub struct UserAdminService {
    profile_repository: Arc<dyn ProfileRepository>,
    authorization_service: AuthorizationService,
    audit_recorder: AuditRecorder,
    notification_service: NotificationService,
}

impl UserAdminService {
    /// Creates a new user administration service.
    #[must_use]
    pub fn new(
        profile_repository: Arc<dyn ProfileRepository>,
        authorization_service: AuthorizationService,
        audit_recorder: AuditRecorder,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            profile_repository,
            authorization_service,
            audit_recorder,
            notification_service,
        }
    }

    /// Returns the profile for an email handed over by the auth provider,
    /// creating it on first sight.
    pub async fn ensure_profile(
        &self,
        email: &str,
        full_name: Option<String>,
        grant_admin: bool,
    ) -> AppResult<UserProfile> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            let mut errors = FieldErrors::new();
            errors.push("email", "A valid email address is required.");
            return Err(AppError::InvalidFields(errors));
        }

        if let Some(existing) = self.profile_repository.find_profile_by_email(email).await? {
            return Ok(existing);
        }

        let profile = UserProfile {
            id: UserId::new(),
            full_name: full_name.filter(|name| !name.trim().is_empty()),
            email: Some(email.to_owned()),
            department: None,
            role: if grant_admin { Role::Admin } else { Role::User },
            permissions: None,
        };
        self.profile_repository.save_profile(profile.clone()).await?;

        self.audit_recorder
            .record(
                AuditEntityType::Profiles,
                profile.id.to_string(),
                None,
                AuditAction::Insert,
                profile.id,
                None,
                Some(profile.snapshot()),
            )
            .await?;

        info!(user_id = %profile.id, role = profile.role.as_str(), "profile created");
        Ok(profile)
    }

    /// Returns the actor's own profile.
    pub async fn own_profile(&self, actor: &UserIdentity) -> AppResult<UserProfile> {
        self.authorization_service.actor_profile(actor).await
    }

    /// Lists every user profile.
    pub async fn list_users(&self, actor: &UserIdentity) -> AppResult<Vec<UserProfile>> {
        self.authorization_service
            .require_capability(actor, Capability::ManageUsers)
            .await?;
        self.profile_repository.list_profiles().await
    }

    /// Changes the global role of a user.
    pub async fn update_user_role(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        role: Role,
    ) -> AppResult<UserProfile> {
        self.authorization_service.require_admin(actor).await?;
        let current = self.require_profile(user_id).await?;

        let updated = UserProfile {
            role,
            ..current.clone()
        };
        let updated = self.persist_update(actor, &current, updated).await?;
        self.notify_target(actor, user_id, format!("Your role is now {}.", role.as_str()))
            .await;
        Ok(updated)
    }

    /// Replaces the capability flags of a user.
    pub async fn update_user_permissions(
        &self,
        actor: &UserIdentity,
        user_id: UserId,
        permissions: CapabilityFlags,
    ) -> AppResult<UserProfile> {
        self.authorization_service.require_admin(actor).await?;
        let current = self.require_profile(user_id).await?;

        let updated = UserProfile {
            permissions: Some(permissions),
            ..current.clone()
        };
        let updated = self.persist_update(actor, &current, updated).await?;
        self.notify_target(
            actor,
            user_id,
            "An administrator changed your permissions.".to_owned(),
        )
        .await;
        Ok(updated)
    }

    /// Updates the actor's own name and department.
    pub async fn update_own_profile(
        &self,
        actor: &UserIdentity,
        full_name: &str,
        department: Option<String>,
    ) -> AppResult<UserProfile> {
        let full_name = full_name.trim();
        if full_name.chars().count() < FULL_NAME_MIN_LENGTH {
            let mut errors = FieldErrors::new();
            errors.push(
                "full_name",
                format!("Full name must be at least {FULL_NAME_MIN_LENGTH} characters."),
            );
            return Err(AppError::InvalidFields(errors));
        }

        let current = self.authorization_service.actor_profile(actor).await?;
        let updated = UserProfile {
            full_name: Some(full_name.to_owned()),
            department: department.filter(|value| !value.trim().is_empty()),
            ..current.clone()
        };
        self.persist_update(actor, &current, updated).await
    }

    async fn persist_update(
        &self,
        actor: &UserIdentity,
        previous: &UserProfile,
        updated: UserProfile,
    ) -> AppResult<UserProfile> {
        self.profile_repository.save_profile(updated.clone()).await?;

        self.audit_recorder
            .record(
                AuditEntityType::Profiles,
                updated.id.to_string(),
                None,
                AuditAction::Update,
                actor.user_id(),
                Some(previous.snapshot()),
                Some(updated.snapshot()),
            )
            .await?;

        info!(user_id = %updated.id, updated_by = %actor.user_id(), "profile updated");
        Ok(updated)
    }

    async fn notify_target(&self, actor: &UserIdentity, user_id: UserId, message: String) {
        if user_id == actor.user_id() {
            return;
        }
        self.notification_service
            .notify(user_id, "Account updated", message, NotificationKind::Info)
            .await;
    }

    async fn require_profile(&self, user_id: UserId) -> AppResult<UserProfile> {
        self.profile_repository
            .find_profile(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }
}
