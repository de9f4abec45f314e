use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Commande, CommandeProduit, Statut};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidateRequest {
    pub agent_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RejectRequest {
    pub motif: String,
    pub commentaire: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAddressRequest {
    pub adresse: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommandeList {
    pub items: Vec<Commande>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommandeDetail {
    pub commande: Commande,
    pub produits: Vec<CommandeProduit>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Facturabilite {
    pub commande_id: Uuid,
    pub statut: Statut,
    pub facturable: bool,
}
