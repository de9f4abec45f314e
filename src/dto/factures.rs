use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Facture;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFactureRequest {
    pub commande_id: Uuid,
    pub montant: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FactureList {
    pub items: Vec<Facture>,
}
