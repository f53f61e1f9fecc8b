use async_trait::async_trait;
use tabula_core::{AppResult, UserId};
use tabula_domain::{TableId, TablePermission, UserProfile};

/// Repository port for user profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Finds a profile by user id.
    async fn find_profile(&self, user_id: UserId) -> AppResult<Option<UserProfile>>;

    /// Finds a profile by email, compared case-insensitively.
    async fn find_profile_by_email(&self, email: &str) -> AppResult<Option<UserProfile>>;

    /// Lists every profile ordered by name, then email.
    async fn list_profiles(&self) -> AppResult<Vec<UserProfile>>;

    /// Inserts or replaces a profile.
    async fn save_profile(&self, profile: UserProfile) -> AppResult<()>;
}

/// Repository port for per-table share grants.
#[async_trait]
pub trait TablePermissionRepository: Send + Sync {
    /// Finds the share of one user on one table.
    async fn find_share(
        &self,
        table_id: TableId,
        user_id: UserId,
    ) -> AppResult<Option<TablePermission>>;

    /// Lists the shares of a table, oldest first.
    async fn list_shares(&self, table_id: TableId) -> AppResult<Vec<TablePermission>>;

    /// Lists every share granted to a user.
    async fn list_shares_for_user(&self, user_id: UserId) -> AppResult<Vec<TablePermission>>;

    /// Inserts a share, or updates the role when the pair already exists.
    /// Returns the stored share.
    async fn upsert_share(&self, share: TablePermission) -> AppResult<TablePermission>;

    /// Removes a share and returns it, or `None` when it did not exist.
    async fn delete_share(
        &self,
        table_id: TableId,
        user_id: UserId,
    ) -> AppResult<Option<TablePermission>>;
}
