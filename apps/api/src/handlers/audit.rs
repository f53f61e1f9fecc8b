use std::convert::Infallible;
use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use futures::stream;
use serde::Deserialize;
use tabula_application::ports::ChangeEvent;
use tabula_application::{AUDIT_LOG_FEED_TABLE, AuditLogRequest, AuditService};
use tabula_core::{AppError, UserIdentity};
use tabula_domain::{AuditAction, AuditEntityType, AuditLogEntry, Capability};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::dto::AuditLogEntryResponse;
use crate::error::ApiResult;
use crate::state::AppState;

#[cfg(test)]
mod tests;

const AUDIT_STREAM_EVENT: &str = "audit_log";

#[derive(Debug, Default, Deserialize)]
pub struct AuditLogQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub search: Option<String>,
}

impl AuditLogQuery {
    fn into_request(self) -> Result<AuditLogRequest, AppError> {
        Ok(AuditLogRequest {
            limit: self.limit,
            offset: self.offset.unwrap_or(0),
            action: non_blank(self.action)
                .map(|action| AuditAction::from_str(&action))
                .transpose()?,
            entity_type: non_blank(self.entity_type)
                .map(|entity_type| AuditEntityType::from_str(&entity_type))
                .transpose()?,
            search: non_blank(self.search),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<AuditLogQuery>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    let entries = state
        .audit_service
        .list_audit_log(&user, query.into_request()?)
        .await?
        .into_iter()
        .map(AuditLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}

/// Streams newly recorded audit entries as server-sent events.
pub async fn stream_audit_log_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    state
        .authorization_service
        .require_capability(&user, Capability::ViewAuditLogs)
        .await?;

    let subscriber = AuditSubscriber {
        receiver: state.change_feed.subscribe(),
        audit_service: state.audit_service.clone(),
        user,
    };

    let events = stream::unfold(subscriber, |mut subscriber| async move {
        let response = subscriber.next_entry().await?;
        match Event::default().event(AUDIT_STREAM_EVENT).json_data(&response) {
            Ok(event) => Some((Ok(event), subscriber)),
            Err(error) => {
                warn!(%error, "failed to encode audit stream event");
                None
            }
        }
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

struct AuditSubscriber {
    receiver: broadcast::Receiver<ChangeEvent>,
    audit_service: AuditService,
    user: UserIdentity,
}

impl AuditSubscriber {
    /// Waits for the next audit entry the subscriber may still see. Ends the
    /// stream when the feed closes or the capability was revoked.
    async fn next_entry(&mut self) -> Option<AuditLogEntryResponse> {
        loop {
            let event = match self.receiver.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "audit stream subscriber lagged behind");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            };
            if event.table != AUDIT_LOG_FEED_TABLE {
                continue;
            }

            let entry = match serde_json::from_value::<AuditLogEntry>(event.record) {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(%error, "skipping undecodable audit feed record");
                    continue;
                }
            };

            match self.audit_service.describe(&self.user, entry).await {
                Ok(view) => return Some(AuditLogEntryResponse::from(view)),
                Err(AppError::Forbidden(_)) => {
                    debug!(user_id = %self.user.user_id(), "audit stream closed after capability change");
                    return None;
                }
                Err(error) => warn!(%error, "failed to describe streamed audit entry"),
            }
        }
    }
}
