use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::commandes::CommandeList,
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
        .route("/commandes", get(list_all_commandes))
        .route("/commandes/{id}/cancel", post(cancel_commande))
}

#[utoipa::path(
    get,
    path = "/admin/commandes",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("statut" = Option<String>, Query, description = "Filter by canonical statut label"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "Get all commandes (admin only)", body = ApiResponse<CommandeList>),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal Server Error"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_commandes(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CommandeListQuery>,
) -> AppResult<Json<ApiResponse<CommandeList>>> {
    let resp = commande_service::list_all_commandes(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/admin/commandes/{id}/cancel",
    params(("id" = Uuid, Path, description = "Commande ID")),
    responses(
        (status = 200, description = "Commande cancelled", body = ApiResponse<Commande>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Commande already terminal"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn cancel_commande(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Commande>>> {
    let resp = lifecycle_service::cancel(&state, &user, id).await?;
    Ok(Json(resp))
}
