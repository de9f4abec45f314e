use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use uuid::Uuid;

use crate::{
    dto::commandes::{RejectRequest, ValidateRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Commande,
    response::ApiResponse,
    services::lifecycle_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/commandes/{id}/validate", post(validate_commande))
        .route("/commandes/{id}/reject", post(reject_commande))
}

#[utoipa::path(
    post,
    path = "/assistant/commandes/{id}/validate",
    params(("id" = Uuid, Path, description = "Commande ID")),
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Commande validated and assigned to an agent", body = ApiResponse<Commande>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Commande or agent not found"),
        (status = 409, description = "Commande is not awaiting validation"),
    ),
    security(("bearer_auth" = [])),
    tag = "Assistant"
)]
pub async fn validate_commande(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ValidateRequest>,
) -> AppResult<Json<ApiResponse<Commande>>> {
    let resp = lifecycle_service::validate(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/assistant/commandes/{id}/reject",
    params(("id" = Uuid, Path, description = "Commande ID")),
    request_body = RejectRequest,
    responses(
        (status = 200, description = "Commande rejected", body = ApiResponse<Commande>),
        (status = 400, description = "Missing motif"),
        (status = 409, description = "Commande already past the rejection stage"),
    ),
    security(("bearer_auth" = [])),
    tag = "Assistant"
)]
pub async fn reject_commande(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectRequest>,
) -> AppResult<Json<ApiResponse<Commande>>> {
    let resp = lifecycle_service::reject(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
