use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::factures::CreateFactureRequest,
    error::AppResult,
    middleware::auth::AuthUser,
    models::Facture,
    response::ApiResponse,
    services::facture_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_facture))
}

#[utoipa::path(
    post,
    path = "/factures",
    request_body = CreateFactureRequest,
    responses(
        (status = 200, description = "Facture issued", body = ApiResponse<Facture>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Commande not found"),
        (status = 409, description = "Commande not in a facturable statut"),
    ),
    security(("bearer_auth" = [])),
    tag = "Factures"
)]
pub async fn create_facture(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateFactureRequest>,
) -> AppResult<Json<ApiResponse<Facture>>> {
    let resp = facture_service::create_facture(&state, &user, payload).await?;
    Ok(Json(resp))
}
