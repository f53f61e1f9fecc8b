use axum::Json;
use axum::extract::{Extension, Path, State};
use tabula_core::UserIdentity;
use tabula_domain::NotificationId;

use crate::dto::{
    MarkAllNotificationsReadResponse, MutationResponse, NotificationInboxResponse,
    NotificationResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

#[cfg(test)]
mod tests;

pub async fn list_notifications_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<NotificationInboxResponse>> {
    let inbox = state.notification_service.list_notifications(&user).await?;
    Ok(Json(NotificationInboxResponse::from(inbox)))
}

pub async fn mark_notification_read_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(notification_id): Path<String>,
) -> ApiResult<Json<MutationResponse<NotificationResponse>>> {
    let notification = state
        .notification_service
        .mark_notification_read(&user, NotificationId::parse(&notification_id)?)
        .await?;

    Ok(Json(MutationResponse::new(
        "Notification marked as read",
        NotificationResponse::from(notification),
    )))
}

pub async fn mark_all_notifications_read_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<MutationResponse<MarkAllNotificationsReadResponse>>> {
    let updated = state
        .notification_service
        .mark_all_notifications_read(&user)
        .await?;

    Ok(Json(MutationResponse::new(
        "All notifications marked as read",
        MarkAllNotificationsReadResponse { updated },
    )))
}
