use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    dto::notifications::{NotificationList, UnreadCount},
    entity::notifications::{
        ActiveModel as NotificationActive, Column as NotifCol, Entity as Notifications,
        Model as NotificationModel,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Categorie, Notification},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Insert a notification addressed to a client. Callers performing a statut
/// transition treat a failure here as advisory and log it instead of rolling
/// back.
pub async fn notifier(
    state: &AppState,
    client_id: Uuid,
    categorie: Categorie,
    message: &str,
) -> AppResult<NotificationModel> {
    let created = NotificationActive {
        id: Set(Uuid::new_v4()),
        client_id: Set(client_id),
        categorie: Set(categorie),
        message: Set(message.to_string()),
        lu: Set(false),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(created)
}

/// A client's own notifications, unread first, newest first within each group.
pub async fn list_notifications(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<NotificationList>> {
    let items = Notifications::find()
        .filter(NotifCol::ClientId.eq(user.user_id))
        .order_by_asc(NotifCol::Lu)
        .order_by_desc(NotifCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(notification_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Notifications",
        NotificationList { items },
        Some(Meta::empty()),
    ))
}

pub async fn unread_count(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UnreadCount>> {
    let non_lues = Notifications::find()
        .filter(NotifCol::ClientId.eq(user.user_id))
        .filter(NotifCol::Lu.eq(false))
        .count(&state.orm)
        .await? as i64;

    Ok(ApiResponse::success(
        "Ok",
        UnreadCount { non_lues },
        Some(Meta::empty()),
    ))
}

/// Flip the read flag. The only mutation a notification ever receives.
pub async fn mark_read(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Notification>> {
    let notification = Notifications::find_by_id(id)
        .filter(NotifCol::ClientId.eq(user.user_id))
        .one(&state.orm)
        .await?;
    let notification = match notification {
        Some(n) => n,
        None => return Err(AppError::NotFound),
    };

    let mut active: NotificationActive = notification.into();
    active.lu = Set(true);
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Notification lue",
        notification_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub fn notification_from_entity(model: NotificationModel) -> Notification {
    Notification {
        id: model.id,
        client_id: model.client_id,
        categorie: model.categorie,
        message: model.message,
        lu: model.lu,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
