use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::commandes::{CommandeDetail, CommandeList, Facturabilite},
    dto::factures::FactureList,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::CommandeListQuery,
    services::{commande_service, facture_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_commandes))
        .route("/{id}", get(get_commande))
        .route("/{id}/facturable", get(facturabilite))
        .route("/{id}/factures", get(list_factures))
}

#[utoipa::path(
    get,
    path = "/commandes",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("statut" = Option<String>, Query, description = "Filter by canonical statut label"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "The client's own commandes", body = ApiResponse<CommandeList>),
    ),
    security(("bearer_auth" = [])),
    tag = "Commandes"
)]
pub async fn list_commandes(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CommandeListQuery>,
) -> AppResult<Json<ApiResponse<CommandeList>>> {
    let resp = commande_service::list_commandes(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/commandes/{id}", tag = "Commandes")]
pub async fn get_commande(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CommandeDetail>>> {
    let resp = commande_service::get_commande(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/commandes/{id}/facturable",
    responses(
        (status = 200, description = "Invoice eligibility for the commande", body = ApiResponse<Facturabilite>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Commandes"
)]
pub async fn facturabilite(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Facturabilite>>> {
    let resp = commande_service::facturabilite(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(get, path = "/commandes/{id}/factures", tag = "Commandes")]
pub async fn list_factures(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<FactureList>>> {
    let resp = facture_service::list_factures(&state, &user, id).await?;
    Ok(Json(resp))
}
