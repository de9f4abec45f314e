use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::StringLen;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle state of a commande. Persisted as the canonical display string;
/// the database column is constrained to this set, so ad-hoc statuses cannot
/// leak in through raw writes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum Statut {
    #[sea_orm(string_value = "En attente")]
    #[serde(rename = "En attente")]
    EnAttente,
    #[sea_orm(string_value = "Validée Par Assistant")]
    #[serde(rename = "Validée Par Assistant")]
    ValideeParAssistant,
    #[sea_orm(string_value = "Acceptée")]
    #[serde(rename = "Acceptée")]
    Acceptee,
    #[sea_orm(string_value = "Expédiée")]
    #[serde(rename = "Expédiée")]
    Expediee,
    #[sea_orm(string_value = "Livrée")]
    #[serde(rename = "Livrée")]
    Livree,
    #[sea_orm(string_value = "Annulée")]
    #[serde(rename = "Annulée")]
    Annulee,
    #[sea_orm(string_value = "Rejetée")]
    #[serde(rename = "Rejetée")]
    Rejetee,
    #[sea_orm(string_value = "Archivée")]
    #[serde(rename = "Archivée")]
    Archivee,
}

impl Statut {
    pub fn label(&self) -> &'static str {
        match self {
            Statut::EnAttente => "En attente",
            Statut::ValideeParAssistant => "Validée Par Assistant",
            Statut::Acceptee => "Acceptée",
            Statut::Expediee => "Expédiée",
            Statut::Livree => "Livrée",
            Statut::Annulee => "Annulée",
            Statut::Rejetee => "Rejetée",
            Statut::Archivee => "Archivée",
        }
    }

    /// Terminal statuses admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Statut::Livree | Statut::Annulee | Statut::Rejetee | Statut::Archivee
        )
    }

    /// The canonical transition table. Cancellation is reachable from every
    /// non-terminal status; everything else follows the forward progression.
    pub fn can_transition_to(&self, next: Statut) -> bool {
        if next == Statut::Annulee {
            return !self.is_terminal();
        }
        matches!(
            (self, next),
            (Statut::EnAttente, Statut::ValideeParAssistant)
                | (Statut::EnAttente, Statut::Rejetee)
                | (Statut::ValideeParAssistant, Statut::Acceptee)
                | (Statut::ValideeParAssistant, Statut::Rejetee)
                | (Statut::Acceptee, Statut::Expediee)
                | (Statut::Expediee, Statut::Livree)
        )
    }

    /// A first facture may only be issued against a commande in one of these
    /// statuses.
    pub fn facturable(&self) -> bool {
        matches!(self, Statut::Acceptee | Statut::Expediee | Statut::Livree)
    }

    /// Position updates are only meaningful while the merchandise moves.
    pub fn en_transit(&self) -> bool {
        matches!(self, Statut::Acceptee | Statut::Expediee)
    }
}

impl std::fmt::Display for Statut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Notification category shown in the client's inbox.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Categorie {
    #[sea_orm(string_value = "Commande")]
    Commande,
    #[sea_orm(string_value = "Facture")]
    Facture,
    #[sea_orm(string_value = "Support")]
    Support,
    #[sea_orm(string_value = "Système")]
    #[serde(rename = "Système")]
    Systeme,
}

/// One lifecycle operation, with its operation-specific payload. Route
/// handlers build a variant from their typed request body and hand it to the
/// lifecycle service, which is the only code allowed to mutate `statut`.
#[derive(Debug, Clone)]
pub enum Transition {
    Validate { agent_id: Uuid },
    Reject { motif: String, commentaire: Option<String> },
    Accept,
    MarkShipped,
    MarkDelivered,
    Cancel,
    UpdateAddress { adresse: String },
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub nom: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Commande {
    pub id: Uuid,
    pub client_id: Uuid,
    pub agent_id: Option<Uuid>,
    pub assistant_id: Option<Uuid>,
    pub statut: Statut,
    pub adresse_depart: String,
    pub adresse_arrivee: String,
    pub adresse_actuelle: Option<String>,
    pub valeur_marchandise: i64,
    pub type_transport: String,
    pub modalite_paiement: String,
    pub motif_rejet: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CommandeProduit {
    pub id: Uuid,
    pub commande_id: Uuid,
    pub nom: String,
    pub quantite: i32,
    pub poids_kg: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Facture {
    pub id: Uuid,
    pub commande_id: Uuid,
    pub client_id: Uuid,
    pub numero: String,
    pub montant: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub client_id: Uuid,
    pub categorie: Categorie,
    pub message: String,
    pub lu: bool,
    pub created_at: DateTime<Utc>,
}
