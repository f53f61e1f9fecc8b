use std::time::Duration;

use axum::Json;
use axum::extract::{Extension, Query, State};
use tabula_core::AppError;
use tabula_domain::{CapabilityFlags, Role};

use crate::dto::CreateTableRequest;
use crate::error::ApiError;
use crate::handlers::tables::create_table_handler;
use crate::handlers::test_support::{creator_flags, seed_user, test_state};

use super::{AuditLogQuery, AuditSubscriber, list_audit_log_handler, stream_audit_log_handler};

fn auditor_flags() -> CapabilityFlags {
    CapabilityFlags {
        can_view_audit_logs: true,
        ..creator_flags()
    }
}

fn create_request(name: &str) -> Json<CreateTableRequest> {
    Json(CreateTableRequest {
        name: name.to_owned(),
        description: None,
    })
}

#[tokio::test]
async fn listing_returns_enriched_entries_newest_first() {
    let (state, repository) = test_state();
    let auditor = seed_user(&repository, "Auditor", Role::User, Some(auditor_flags())).await;

    for name in ["First", "Second"] {
        create_table_handler(
            State(state.clone()),
            Extension(auditor.clone()),
            create_request(name),
        )
        .await
        .unwrap_or_else(|_| unreachable!());
    }

    let Json(entries) = list_audit_log_handler(
        State(state),
        Extension(auditor),
        Query(AuditLogQuery {
            entity_type: Some("dynamic_tables".to_owned()),
            ..AuditLogQuery::default()
        }),
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    assert_eq!(entries.len(), 2);
    assert!(entries[0].performed_at >= entries[1].performed_at);
    assert_eq!(entries[0].action, "INSERT");
    assert_eq!(entries[0].performer_name.as_deref(), Some("Auditor"));
    assert!(!entries[0].summary.is_empty());
}

#[tokio::test]
async fn unknown_action_filter_is_rejected() {
    let (state, repository) = test_state();
    let auditor = seed_user(&repository, "Auditor", Role::User, Some(auditor_flags())).await;

    let result = list_audit_log_handler(
        State(state),
        Extension(auditor),
        Query(AuditLogQuery {
            action: Some("UPSERT".to_owned()),
            ..AuditLogQuery::default()
        }),
    )
    .await;

    assert!(matches!(result, Err(ApiError(AppError::Validation(_)))));
}

#[tokio::test]
async fn listing_and_streaming_require_the_capability() {
    let (state, repository) = test_state();
    let member = seed_user(&repository, "Member", Role::User, None).await;

    let listed = list_audit_log_handler(
        State(state.clone()),
        Extension(member.clone()),
        Query(AuditLogQuery::default()),
    )
    .await;
    assert!(matches!(listed, Err(ApiError(AppError::Forbidden(_)))));

    let streamed = stream_audit_log_handler(State(state), Extension(member)).await;
    assert!(matches!(streamed, Err(ApiError(AppError::Forbidden(_)))));
}

#[tokio::test]
async fn subscriber_receives_new_entries() {
    let (state, repository) = test_state();
    let auditor = seed_user(&repository, "Auditor", Role::User, Some(auditor_flags())).await;
    let mut subscriber = AuditSubscriber {
        receiver: state.change_feed.subscribe(),
        audit_service: state.audit_service.clone(),
        user: auditor.clone(),
    };

    create_table_handler(
        State(state),
        Extension(auditor),
        create_request("Streamed"),
    )
    .await
    .unwrap_or_else(|_| unreachable!());

    let received = tokio::time::timeout(Duration::from_secs(1), subscriber.next_entry())
        .await
        .unwrap_or_else(|_| unreachable!())
        .unwrap_or_else(|| unreachable!());
    assert_eq!(received.entity_type, "dynamic_tables");
    assert_eq!(received.action, "INSERT");
}
