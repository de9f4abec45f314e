use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod agent;
pub mod assistant;
pub mod commandes;
pub mod doc;
pub mod factures;
pub mod health;
pub mod notifications;
pub mod params;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/commandes", commandes::router())
        .nest("/factures", factures::router())
        .nest("/notifications", notifications::router())
        .nest("/assistant", assistant::router())
        .nest("/agent", agent::router())
        .nest("/admin", admin::router())
}
