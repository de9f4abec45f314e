//! The only code allowed to mutate a commande's `statut`.
//!
//! Every operation re-reads the commande under a row lock inside a
//! transaction, validates the requested transition against the current
//! statut, writes, commits, and only then emits the client notification and
//! audit row. Two conflicting callers therefore serialize on the row lock and
//! the loser fails its precondition check with `InvalidTransition`.

use chrono::Utc;
use sea_orm::sea_query::LockType;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait};
use sea_orm::{ActiveModelTrait, DatabaseTransaction};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::commandes::{RejectRequest, UpdateAddressRequest, ValidateRequest},
    entity::commandes::{
        ActiveModel as CommandeActive, Entity as Commandes, Model as CommandeModel,
    },
    entity::users::{Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    middleware::auth::{ensure_admin, ensure_agent, ensure_assistant, AuthUser},
    models::{Categorie, Commande, Statut, Transition},
    response::{ApiResponse, Meta},
    services::notification_service,
    state::AppState,
};

pub async fn validate(
    state: &AppState,
    user: &AuthUser,
    commande_id: Uuid,
    payload: ValidateRequest,
) -> AppResult<ApiResponse<Commande>> {
    apply(
        state,
        user,
        commande_id,
        Transition::Validate {
            agent_id: payload.agent_id,
        },
    )
    .await
}

pub async fn reject(
    state: &AppState,
    user: &AuthUser,
    commande_id: Uuid,
    payload: RejectRequest,
) -> AppResult<ApiResponse<Commande>> {
    apply(
        state,
        user,
        commande_id,
        Transition::Reject {
            motif: payload.motif,
            commentaire: payload.commentaire,
        },
    )
    .await
}

pub async fn accept(
    state: &AppState,
    user: &AuthUser,
    commande_id: Uuid,
) -> AppResult<ApiResponse<Commande>> {
    apply(state, user, commande_id, Transition::Accept).await
}

pub async fn mark_shipped(
    state: &AppState,
    user: &AuthUser,
    commande_id: Uuid,
) -> AppResult<ApiResponse<Commande>> {
    apply(state, user, commande_id, Transition::MarkShipped).await
}

pub async fn mark_delivered(
    state: &AppState,
    user: &AuthUser,
    commande_id: Uuid,
) -> AppResult<ApiResponse<Commande>> {
    apply(state, user, commande_id, Transition::MarkDelivered).await
}

pub async fn cancel(
    state: &AppState,
    user: &AuthUser,
    commande_id: Uuid,
) -> AppResult<ApiResponse<Commande>> {
    apply(state, user, commande_id, Transition::Cancel).await
}

pub async fn update_current_address(
    state: &AppState,
    user: &AuthUser,
    commande_id: Uuid,
    payload: UpdateAddressRequest,
) -> AppResult<ApiResponse<Commande>> {
    apply(
        state,
        user,
        commande_id,
        Transition::UpdateAddress {
            adresse: payload.adresse,
        },
    )
    .await
}

/// Single entry point for every lifecycle mutation.
pub async fn apply(
    state: &AppState,
    user: &AuthUser,
    commande_id: Uuid,
    transition: Transition,
) -> AppResult<ApiResponse<Commande>> {
    validate_payload(&transition)?;

    let txn = state.orm.begin().await?;

    let commande = Commandes::find_by_id(commande_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let commande = match commande {
        Some(c) => c,
        None => return Err(AppError::NotFound),
    };

    let current = commande.statut;
    let client_id = commande.client_id;

    let mut active: CommandeActive = commande.clone().into();
    let message;
    let action;

    match &transition {
        Transition::Validate { agent_id } => {
            ensure_assistant(user)?;
            require_agent_exists(&txn, *agent_id).await?;
            require_edge(current, Statut::ValideeParAssistant)?;
            active.statut = Set(Statut::ValideeParAssistant);
            active.agent_id = Set(Some(*agent_id));
            active.assistant_id = Set(Some(user.user_id));
            message = "Votre commande a été validée par un assistant et confiée à un agent."
                .to_string();
            action = "commande_validee";
        }
        Transition::Reject { motif, commentaire } => {
            ensure_pre_acceptance_actor(user, &commande)?;
            require_edge(current, Statut::Rejetee)?;
            let motif_complet = match commentaire.as_deref().filter(|c| !c.trim().is_empty()) {
                Some(c) => format!("{motif} ({c})"),
                None => motif.clone(),
            };
            active.statut = Set(Statut::Rejetee);
            active.motif_rejet = Set(Some(motif_complet.clone()));
            message = format!("Votre commande a été rejetée : {motif_complet}");
            action = "commande_rejetee";
        }
        Transition::Accept => {
            ensure_assigned_agent(user, &commande)?;
            require_edge(current, Statut::Acceptee)?;
            active.statut = Set(Statut::Acceptee);
            message = "Votre commande a été acceptée par l'agent en charge.".to_string();
            action = "commande_acceptee";
        }
        Transition::MarkShipped => {
            ensure_assigned_agent(user, &commande)?;
            require_edge(current, Statut::Expediee)?;
            active.statut = Set(Statut::Expediee);
            message = "Votre commande a été expédiée.".to_string();
            action = "commande_expediee";
        }
        Transition::MarkDelivered => {
            ensure_assigned_agent(user, &commande)?;
            require_edge(current, Statut::Livree)?;
            active.statut = Set(Statut::Livree);
            message = "Votre commande a été livrée.".to_string();
            action = "commande_livree";
        }
        Transition::Cancel => {
            ensure_admin(user)?;
            require_edge(current, Statut::Annulee)?;
            active.statut = Set(Statut::Annulee);
            message = "Votre commande a été annulée par l'administration.".to_string();
            action = "commande_annulee";
        }
        Transition::UpdateAddress { adresse } => {
            ensure_assigned_agent(user, &commande)?;
            // Not a statut transition, but only legal while in transit.
            if !current.en_transit() {
                return Err(AppError::InvalidTransition(format!(
                    "position non modifiable depuis {current}"
                )));
            }
            active.adresse_actuelle = Set(Some(adresse.clone()));
            message = format!("Votre commande est en transit, position actuelle : {adresse}");
            action = "position_mise_a_jour";
        }
    }

    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    // The statut change is the source of truth; the notification and audit
    // row are advisory and must not undo it.
    if let Err(err) =
        notification_service::notifier(state, client_id, Categorie::Commande, &message).await
    {
        tracing::warn!(error = %err, commande_id = %updated.id, "notification non envoyée");
    }
    if let Err(err) = log_audit(
        state,
        Some(user.user_id),
        action,
        Some("commandes"),
        Some(serde_json::json!({
            "commande_id": updated.id,
            "statut": updated.statut.label(),
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Commande mise à jour",
        commande_from_entity(updated),
        Some(Meta::empty()),
    ))
}

fn validate_payload(transition: &Transition) -> Result<(), AppError> {
    match transition {
        Transition::Reject { motif, .. } if motif.trim().is_empty() => {
            Err(AppError::BadRequest("Le motif de rejet est requis".into()))
        }
        Transition::UpdateAddress { adresse } if adresse.trim().is_empty() => {
            Err(AppError::BadRequest("L'adresse ne peut pas être vide".into()))
        }
        _ => Ok(()),
    }
}

fn require_edge(from: Statut, to: Statut) -> Result<(), AppError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(AppError::InvalidTransition(format!("{from} -> {to}")))
    }
}

/// Accept, ship, deliver and position updates belong to the assigned agent
/// alone.
fn ensure_assigned_agent(user: &AuthUser, commande: &CommandeModel) -> Result<(), AppError> {
    ensure_agent(user)?;
    if commande.agent_id != Some(user.user_id) {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Rejection is open to any assistant, and to the assigned agent once one
/// exists.
fn ensure_pre_acceptance_actor(user: &AuthUser, commande: &CommandeModel) -> Result<(), AppError> {
    match user.role.as_str() {
        "assistant" => Ok(()),
        "agent" => ensure_assigned_agent(user, commande),
        _ => Err(AppError::Forbidden),
    }
}

async fn require_agent_exists(txn: &DatabaseTransaction, agent_id: Uuid) -> Result<(), AppError> {
    let agent = Users::find_by_id(agent_id)
        .filter(UserCol::Role.eq("agent"))
        .one(txn)
        .await?;
    if agent.is_none() {
        return Err(AppError::NotFound);
    }
    Ok(())
}

pub fn commande_from_entity(model: CommandeModel) -> Commande {
    Commande {
        id: model.id,
        client_id: model.client_id,
        agent_id: model.agent_id,
        assistant_id: model.assistant_id,
        statut: model.statut,
        adresse_depart: model.adresse_depart,
        adresse_arrivee: model.adresse_arrivee,
        adresse_actuelle: model.adresse_actuelle,
        valeur_marchandise: model.valeur_marchandise,
        type_transport: model.type_transport,
        modalite_paiement: model.modalite_paiement,
        motif_rejet: model.motif_rejet,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
