use fret_backoffice_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        commande_produits::ActiveModel as ProduitActive,
        commandes::{ActiveModel as CommandeActive, Column as CommandeCol, Entity as Commandes},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    models::Statut,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "Administrateur", "admin@example.com", "admin").await?;
    let assistant_id = ensure_user(&orm, "Assistant", "assistant@example.com", "assistant").await?;
    let agent_id = ensure_user(&orm, "Agent", "agent@example.com", "agent").await?;
    let client_id = ensure_user(&orm, "Client", "client@example.com", "client").await?;

    seed_commande(&orm, client_id).await?;

    println!(
        "Seed completed. Admin: {admin_id}, Assistant: {assistant_id}, Agent: {agent_id}, Client: {client_id}"
    );
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    nom: &str,
    email: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(orm)
        .await?
    {
        println!("User {email} already present (role={})", existing.role);
        return Ok(existing.id);
    }

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        nom: Set(nom.to_string()),
        email: Set(email.to_string()),
        role: Set(role.to_string()),
        created_at: NotSet,
    }
    .insert(orm)
    .await?;

    println!("Created user {email} (role={role})");
    Ok(user.id)
}

async fn seed_commande(orm: &DatabaseConnection, client_id: Uuid) -> anyhow::Result<()> {
    let existing = Commandes::find()
        .filter(CommandeCol::ClientId.eq(client_id))
        .count(orm)
        .await?;
    if existing > 0 {
        println!("Sample commande already present");
        return Ok(());
    }

    let commande = CommandeActive {
        id: Set(Uuid::new_v4()),
        client_id: Set(client_id),
        agent_id: Set(None),
        assistant_id: Set(None),
        statut: Set(Statut::EnAttente),
        adresse_depart: Set("12 Quai des Docks, Marseille".into()),
        adresse_arrivee: Set("45 Avenue du Port, Dakar".into()),
        adresse_actuelle: Set(None),
        valeur_marchandise: Set(250_000),
        type_transport: Set("maritime".into()),
        modalite_paiement: Set("30 jours fin de mois".into()),
        motif_rejet: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(orm)
    .await?;

    let produits = [("Palette de textiles", 4, 320), ("Pièces détachées", 2, 150)];
    for (nom, quantite, poids_kg) in produits {
        ProduitActive {
            id: Set(Uuid::new_v4()),
            commande_id: Set(commande.id),
            nom: Set(nom.to_string()),
            quantite: Set(quantite),
            poids_kg: Set(poids_kg),
            created_at: NotSet,
        }
        .insert(orm)
        .await?;
    }

    println!("Seeded sample commande {}", commande.id);
    Ok(())
}
