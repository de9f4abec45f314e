use sea_orm::entity::prelude::*;

use crate::models::Statut;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "commandes")]
pub struct Model {
    #[sea_orm(primary_key)]
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
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ClientId",
        to = "super::users::Column::Id"
    )]
    Client,
    #[sea_orm(has_many = "super::commande_produits::Entity")]
    CommandeProduits,
    #[sea_orm(has_many = "super::factures::Entity")]
    Factures,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::commande_produits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommandeProduits.def()
    }
}

impl Related<super::factures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Factures.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
