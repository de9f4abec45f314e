use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::factures::{CreateFactureRequest, FactureList},
    entity::commandes::{Column as CommandeCol, Entity as Commandes},
    entity::factures::{
        ActiveModel as FactureActive, Column as FactureCol, Entity as Factures,
        Model as FactureModel,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Categorie, Facture},
    response::{ApiResponse, Meta},
    services::notification_service,
    state::AppState,
};

/// Issue a facture against a commande. The commande row is locked so a
/// concurrent cancellation cannot slip past the eligibility check.
pub async fn create_facture(
    state: &AppState,
    user: &AuthUser,
    payload: CreateFactureRequest,
) -> AppResult<ApiResponse<Facture>> {
    if user.role != "admin" && user.role != "assistant" {
        return Err(AppError::Forbidden);
    }
    if payload.montant <= 0 {
        return Err(AppError::BadRequest("Le montant doit être positif".into()));
    }

    let txn = state.orm.begin().await?;

    let commande = Commandes::find_by_id(payload.commande_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let commande = match commande {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    if !commande.statut.facturable() {
        return Err(AppError::InvalidTransition(format!(
            "commande non facturable depuis {}",
            commande.statut
        )));
    }

    let facture_id = Uuid::new_v4();
    let facture = FactureActive {
        id: Set(facture_id),
        commande_id: Set(commande.id),
        client_id: Set(commande.client_id),
        numero: Set(build_facture_numero(facture_id)),
        montant: Set(payload.montant),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    let message = format!("Une facture {} a été émise pour votre commande.", facture.numero);
    if let Err(err) =
        notification_service::notifier(state, facture.client_id, Categorie::Facture, &message).await
    {
        tracing::warn!(error = %err, facture_id = %facture.id, "notification non envoyée");
    }
    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        "facture_emise",
        Some("factures"),
        Some(serde_json::json!({
            "facture_id": facture.id,
            "commande_id": facture.commande_id,
            "numero": facture.numero,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Facture émise",
        facture_from_entity(facture),
        Some(Meta::empty()),
    ))
}

/// Factures issued against one commande, newest first. Clients only see
/// their own.
pub async fn list_factures(
    state: &AppState,
    user: &AuthUser,
    commande_id: Uuid,
) -> AppResult<ApiResponse<FactureList>> {
    let mut finder = Commandes::find_by_id(commande_id);
    if user.role == "client" {
        finder = finder.filter(CommandeCol::ClientId.eq(user.user_id));
    }
    if finder.one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let items = Factures::find()
        .filter(FactureCol::CommandeId.eq(commande_id))
        .order_by_desc(FactureCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(facture_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Factures",
        FactureList { items },
        Some(Meta::empty()),
    ))
}

fn build_facture_numero(facture_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = facture_id.to_string();
    let short = &suffix[..8];
    format!("FAC-{date}-{short}")
}

fn facture_from_entity(model: FactureModel) -> Facture {
    Facture {
        id: model.id,
        commande_id: model.commande_id,
        client_id: model.client_id,
        numero: model.numero,
        montant: model.montant,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
