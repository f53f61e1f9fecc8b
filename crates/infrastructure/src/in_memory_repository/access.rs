use async_trait::async_trait;
use tabula_application::ports::{ProfileRepository, TablePermissionRepository};
use tabula_core::{AppResult, UserId};
use tabula_domain::{TableId, TablePermission, UserProfile};

use super::InMemoryRepository;

#[async_trait]
impl ProfileRepository for InMemoryRepository {
    async fn find_profile(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }

    async fn find_profile_by_email(&self, email: &str) -> AppResult<Option<UserProfile>> {
        let email = email.trim();
        Ok(self
            .profiles
            .read()
            .await
            .values()
            .find(|profile| {
                profile
                    .email
                    .as_deref()
                    .is_some_and(|stored| stored.eq_ignore_ascii_case(email))
            })
            .cloned())
    }

    async fn list_profiles(&self) -> AppResult<Vec<UserProfile>> {
        let mut profiles: Vec<UserProfile> =
            self.profiles.read().await.values().cloned().collect();
        profiles.sort_by(|left, right| {
            left.display_name()
                .to_lowercase()
                .cmp(&right.display_name().to_lowercase())
                .then_with(|| left.id.as_uuid().cmp(&right.id.as_uuid()))
        });
        Ok(profiles)
    }

    async fn save_profile(&self, profile: UserProfile) -> AppResult<()> {
        self.profiles.write().await.insert(profile.id, profile);
        Ok(())
    }
}

#[async_trait]
impl TablePermissionRepository for InMemoryRepository {
    async fn find_share(
        &self,
        table_id: TableId,
        user_id: UserId,
    ) -> AppResult<Option<TablePermission>> {
        Ok(self.shares.read().await.get(&(table_id, user_id)).cloned())
    }

    async fn list_shares(&self, table_id: TableId) -> AppResult<Vec<TablePermission>> {
        let mut shares: Vec<TablePermission> = self
            .shares
            .read()
            .await
            .values()
            .filter(|share| share.table_id == table_id)
            .cloned()
            .collect();
        shares.sort_by_key(|share| (share.created_at, share.id));
        Ok(shares)
    }

    async fn list_shares_for_user(&self, user_id: UserId) -> AppResult<Vec<TablePermission>> {
        Ok(self
            .shares
            .read()
            .await
            .values()
            .filter(|share| share.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn upsert_share(&self, share: TablePermission) -> AppResult<TablePermission> {
        let mut shares = self.shares.write().await;
        let stored = shares
            .entry((share.table_id, share.user_id))
            .and_modify(|existing| existing.role = share.role)
            .or_insert(share);
        Ok(stored.clone())
    }

    async fn delete_share(
        &self,
        table_id: TableId,
        user_id: UserId,
    ) -> AppResult<Option<TablePermission>> {
        Ok(self.shares.write().await.remove(&(table_id, user_id)))
    }
}
