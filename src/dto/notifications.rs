use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Notification;

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationList {
    pub items: Vec<Notification>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCount {
    pub non_lues: i64,
}
