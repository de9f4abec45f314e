use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::commandes::{CommandeList, RejectRequest, UpdateAddressRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Commande,
    response::ApiResponse,
    routes::params::CommandeListQuery,
    services::{commande_service, lifecycle_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/commandes", get(list_assigned))
        .route("/commandes/{id}/accept", post(accept_commande))
        .route("/commandes/{id}/reject", post(reject_commande))
        .route("/commandes/{id}/ship", post(ship_commande))
        .route("/commandes/{id}/deliver", post(deliver_commande))
        .route("/commandes/{id}/position", patch(update_position))
}

#[utoipa::path(get, path = "/agent/commandes", tag = "Agent")]
pub async fn list_assigned(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CommandeListQuery>,
) -> AppResult<Json<ApiResponse<CommandeList>>> {
    let resp = commande_service::list_assigned_commandes(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/agent/commandes/{id}/accept",
    params(("id" = Uuid, Path, description = "Commande ID")),
    responses(
        (status = 200, description = "Commande accepted by the assigned agent", body = ApiResponse<Commande>),
        (status = 403, description = "Not the assigned agent"),
        (status = 409, description = "Commande is not validated"),
    ),
    security(("bearer_auth" = [])),
    tag = "Agent"
)]
pub async fn accept_commande(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Commande>>> {
    let resp = lifecycle_service::accept(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/agent/commandes/{id}/reject",
    request_body = RejectRequest,
    security(("bearer_auth" = [])),
    tag = "Agent"
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

#[utoipa::path(post, path = "/agent/commandes/{id}/ship", tag = "Agent")]
pub async fn ship_commande(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Commande>>> {
    let resp = lifecycle_service::mark_shipped(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(post, path = "/agent/commandes/{id}/deliver", tag = "Agent")]
pub async fn deliver_commande(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Commande>>> {
    let resp = lifecycle_service::mark_delivered(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/agent/commandes/{id}/position",
    request_body = UpdateAddressRequest,
    responses(
        (status = 200, description = "Current address updated, statut unchanged", body = ApiResponse<Commande>),
        (status = 400, description = "Empty address"),
        (status = 409, description = "Commande is not in transit"),
    ),
    security(("bearer_auth" = [])),
    tag = "Agent"
)]
pub async fn update_position(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAddressRequest>,
) -> AppResult<Json<ApiResponse<Commande>>> {
    let resp = lifecycle_service::update_current_address(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
