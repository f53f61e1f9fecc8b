use std::sync::Arc;

use tabula_core::{AppError, AppResult, UserIdentity};
use tabula_domain::access::{self, can_manage_permissions, has_capability};
use tabula_domain::{Capability, DynamicTable, TableAccess, UserProfile};
use tracing::warn;

use crate::ports::{ProfileRepository, TablePermissionRepository};

/// Application service resolving what an actor may do.
///
/// Every check loads the actor's profile again, so a role or flag change
/// applies to the next operation and is never cached across operations.
#[derive(Clone)]
pub struct AuthorizationService {
    profile_repository: Arc<dyn ProfileRepository>,
    permission_repository: Arc<dyn TablePermissionRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from repository implementations.
    #[must_use]
    pub fn new(
        profile_repository: Arc<dyn ProfileRepository>,
        permission_repository: Arc<dyn TablePermissionRepository>,
    ) -> Self {
        Self {
            profile_repository,
            permission_repository,
        }
    }

    /// Loads the current profile of the actor.
    pub async fn actor_profile(&self, actor: &UserIdentity) -> AppResult<UserProfile> {
        self.profile_repository
            .find_profile(actor.user_id())
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized(format!("no profile exists for user '{}'", actor.user_id()))
            })
    }

    /// Ensures the actor holds a capability and returns its profile.
    pub async fn require_capability(
        &self,
        actor: &UserIdentity,
        capability: Capability,
    ) -> AppResult<UserProfile> {
        let profile = self.actor_profile(actor).await?;
        if !has_capability(&profile, capability) {
            warn!(
                user_id = %actor.user_id(),
                capability = capability.flag_name(),
                "capability check denied"
            );
            return Err(AppError::Forbidden(format!(
                "user '{}' is missing capability '{}'",
                actor.user_id(),
                capability.flag_name()
            )));
        }

        Ok(profile)
    }

    /// Ensures the actor may manage roles and permissions.
    pub async fn require_admin(&self, actor: &UserIdentity) -> AppResult<UserProfile> {
        let profile = self.actor_profile(actor).await?;
        if !can_manage_permissions(&profile) {
            warn!(user_id = %actor.user_id(), "admin check denied");
            return Err(AppError::Forbidden(
                "only admins can manage permissions".to_owned(),
            ));
        }

        Ok(profile)
    }

    /// Resolves the access a profile has on a table.
    pub async fn table_access(
        &self,
        profile: &UserProfile,
        table: &DynamicTable,
    ) -> AppResult<TableAccess> {
        if access::table_access(profile, table, None) == TableAccess::Full {
            return Ok(TableAccess::Full);
        }

        let share = self
            .permission_repository
            .find_share(table.id(), profile.id)
            .await?;

        Ok(access::table_access(profile, table, share.as_ref()))
    }

    /// Ensures the actor has at least `required` access on a table.
    pub async fn require_table_access(
        &self,
        actor: &UserIdentity,
        table: &DynamicTable,
        required: TableAccess,
    ) -> AppResult<UserProfile> {
        let profile = self.actor_profile(actor).await?;
        let granted = self.table_access(&profile, table).await?;
        if granted < required {
            warn!(
                user_id = %actor.user_id(),
                table_id = %table.id(),
                ?granted,
                ?required,
                "table access denied"
            );
            return Err(AppError::Forbidden(format!(
                "user '{}' does not have {} access to table '{}'",
                actor.user_id(),
                access_label(required),
                table.id()
            )));
        }

        Ok(profile)
    }

    /// Keeps the tables the profile may view.
    pub async fn readable_tables(
        &self,
        profile: &UserProfile,
        tables: Vec<DynamicTable>,
    ) -> AppResult<Vec<DynamicTable>> {
        let shares = self
            .permission_repository
            .list_shares_for_user(profile.id)
            .await?;

        Ok(tables
            .into_iter()
            .filter(|table| {
                let share = shares.iter().find(|share| share.table_id == table.id());
                access::table_access(profile, table, share).can_view()
            })
            .collect())
    }
}

fn access_label(access: TableAccess) -> &'static str {
    match access {
        TableAccess::None => "any",
        TableAccess::View => "view",
        TableAccess::Edit => "edit",
        TableAccess::Full => "full",
    }
}
