use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    dto::commandes::{CommandeDetail, CommandeList, Facturabilite},
    entity::commande_produits::{
        Column as ProduitCol, Entity as CommandeProduits, Model as ProduitModel,
    },
    entity::commandes::{Column as CommandeCol, Entity as Commandes},
    error::{AppError, AppResult},
    middleware::auth::{ensure_admin, ensure_agent, AuthUser},
    models::CommandeProduit,
    response::{ApiResponse, Meta},
    routes::params::{CommandeListQuery, SortOrder},
    services::lifecycle_service::commande_from_entity,
    state::AppState,
};

/// A client's own commandes, paginated and filterable by statut.
pub async fn list_commandes(
    state: &AppState,
    user: &AuthUser,
    query: CommandeListQuery,
) -> AppResult<ApiResponse<CommandeList>> {
    let (page, limit, offset) = query.normalize();
    let mut condition = Condition::all().add(CommandeCol::ClientId.eq(user.user_id));
    if let Some(statut) = query.statut {
        condition = condition.add(CommandeCol::Statut.eq(statut));
    }

    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Commandes::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(CommandeCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(CommandeCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(commande_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        CommandeList { items },
        Some(meta),
    ))
}

/// Every commande in the system, admin only.
pub async fn list_all_commandes(
    state: &AppState,
    user: &AuthUser,
    query: CommandeListQuery,
) -> AppResult<ApiResponse<CommandeList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.normalize();

    let mut condition = Condition::all();
    if let Some(statut) = query.statut {
        condition = condition.add(CommandeCol::Statut.eq(statut));
    }

    let mut finder = Commandes::find().filter(condition);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(CommandeCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(CommandeCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(commande_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Commandes",
        CommandeList { items },
        Some(meta),
    ))
}

/// Commandes assigned to the requesting agent, so their worklist survives a
/// page refresh without scanning everything.
pub async fn list_assigned_commandes(
    state: &AppState,
    user: &AuthUser,
    query: CommandeListQuery,
) -> AppResult<ApiResponse<CommandeList>> {
    ensure_agent(user)?;
    let (page, limit, offset) = query.normalize();
    let mut condition = Condition::all().add(CommandeCol::AgentId.eq(user.user_id));
    if let Some(statut) = query.statut {
        condition = condition.add(CommandeCol::Statut.eq(statut));
    }

    let finder = Commandes::find()
        .filter(condition)
        .order_by_desc(CommandeCol::UpdatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(commande_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Commandes assignées",
        CommandeList { items },
        Some(meta),
    ))
}

/// Detail view with line-item produits. Clients only see their own; staff
/// roles see any commande.
pub async fn get_commande(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<CommandeDetail>> {
    let commande = find_visible(state, user, id).await?;

    let produits = CommandeProduits::find()
        .filter(ProduitCol::CommandeId.eq(commande.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(produit_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Ok",
        CommandeDetail {
            commande: commande_from_entity(commande),
            produits,
        },
        Some(Meta::empty()),
    ))
}

/// Whether a first facture may be issued against this commande.
pub async fn facturabilite(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Facturabilite>> {
    let commande = find_visible(state, user, id).await?;

    Ok(ApiResponse::success(
        "Ok",
        Facturabilite {
            commande_id: commande.id,
            statut: commande.statut,
            facturable: commande.statut.facturable(),
        },
        Some(Meta::empty()),
    ))
}

async fn find_visible(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<crate::entity::commandes::Model> {
    let mut finder = Commandes::find_by_id(id);
    if user.role == "client" {
        finder = finder.filter(CommandeCol::ClientId.eq(user.user_id));
    }
    match finder.one(&state.orm).await? {
        Some(c) => Ok(c),
        None => Err(AppError::NotFound),
    }
}

fn produit_from_entity(model: ProduitModel) -> CommandeProduit {
    CommandeProduit {
        id: model.id,
        commande_id: model.commande_id,
        nom: model.nom,
        quantite: model.quantite,
        poids_kg: model.poids_kg,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
