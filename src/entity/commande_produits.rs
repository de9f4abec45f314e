use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "commande_produits")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub commande_id: Uuid,
    pub nom: String,
    pub quantite: i32,
    pub poids_kg: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::commandes::Entity",
        from = "Column::CommandeId",
        to = "super::commandes::Column::Id"
    )]
    Commande,
}

impl Related<super::commandes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Commande.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
