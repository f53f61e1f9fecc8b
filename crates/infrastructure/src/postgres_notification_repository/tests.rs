use chrono::{Duration, Utc};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tabula_application::ports::{NotificationRepository, ProfileRepository};
use tabula_core::UserId;
use tabula_domain::{Notification, NotificationId, NotificationKind, Role, UserProfile};

use super::PostgresNotificationRepository;
use crate::PostgresProfileRepository;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres notification tests: {error}");
    }

    Some(pool)
}

async fn seed_user(pool: &PgPool) -> UserId {
    let user_id = UserId::new();
    let saved = PostgresProfileRepository::new(pool.clone())
        .save_profile(UserProfile {
            id: user_id,
            full_name: Some("Inbox Owner".to_owned()),
            email: Some(format!("{user_id}@example.com")),
            department: None,
            role: Role::User,
            permissions: None,
        })
        .await;
    assert!(saved.is_ok());
    user_id
}

fn notification(user_id: UserId, title: &str, offset_minutes: i64) -> Notification {
    Notification::new(
        NotificationId::new(),
        user_id,
        title,
        "",
        NotificationKind::Info,
        false,
        Utc::now() + Duration::minutes(offset_minutes),
    )
    .unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn inbox_is_newest_first_and_scoped_to_its_owner() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresNotificationRepository::new(pool.clone());
    let owner = seed_user(&pool).await;
    let other = seed_user(&pool).await;

    for (title, offset) in [("Older", 0), ("Newest", 2), ("Middle", 1)] {
        assert!(
            repository
                .create_notification(notification(owner, title, offset))
                .await
                .is_ok()
        );
    }
    assert!(
        repository
            .create_notification(notification(other, "Elsewhere", 5))
            .await
            .is_ok()
    );

    let listed = repository
        .list_notifications(owner, 2)
        .await
        .unwrap_or_else(|_| unreachable!());
    let titles: Vec<&str> = listed.iter().map(Notification::title).collect();
    assert_eq!(titles, vec!["Newest", "Middle"]);
    assert_eq!(
        repository.count_unread_notifications(owner).await.ok(),
        Some(3)
    );
}

#[tokio::test]
async fn marking_read_respects_the_owner() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresNotificationRepository::new(pool.clone());
    let owner = seed_user(&pool).await;
    let other = seed_user(&pool).await;
    let first = notification(owner, "First", 0);
    let first_id = first.id();
    assert!(repository.create_notification(first).await.is_ok());
    assert!(
        repository
            .create_notification(notification(owner, "Second", 1))
            .await
            .is_ok()
    );

    let foreign = repository
        .mark_notification_read(other, first_id)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(foreign.is_none());

    let marked = repository
        .mark_notification_read(owner, first_id)
        .await
        .unwrap_or_else(|_| unreachable!());
    assert!(marked.is_some_and(|notification| notification.is_read()));

    assert_eq!(
        repository.mark_all_notifications_read(owner).await.ok(),
        Some(1)
    );
    assert_eq!(
        repository.count_unread_notifications(owner).await.ok(),
        Some(0)
    );
}
