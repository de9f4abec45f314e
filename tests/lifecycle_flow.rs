use fret_backoffice_api::{
    db::{create_orm_conn, run_migrations},
    dto::commandes::{RejectRequest, UpdateAddressRequest, ValidateRequest},
    dto::factures::CreateFactureRequest,
    entity::{
        commandes::{ActiveModel as CommandeActive, Entity as Commandes},
        notifications::{Column as NotifCol, Entity as Notifications},
        users::ActiveModel as UserActive,
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::Statut,
    services::{commande_service, facture_service, lifecycle_service},
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

// Integration tests against a real Postgres. Each test seeds its own users
// and commandes with fresh ids, so they can run in parallel on a shared
// database without stepping on each other.

fn test_db_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}

macro_rules! require_db {
    () => {
        match test_db_url() {
            Some(url) => url,
            None => {
                eprintln!(
                    "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
                );
                return Ok(());
            }
        }
    };
}

#[tokio::test]
async fn full_lifecycle_happy_path() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;

    let client = create_user(&state, "client").await?;
    let assistant = create_user(&state, "assistant").await?;
    let agent = create_user(&state, "agent").await?;
    let commande_id = create_commande(&state, client.user_id).await?;

    // En attente: not yet facturable.
    let elig = commande_service::facturabilite(&state, &client, commande_id).await?;
    assert!(!elig.data.unwrap().facturable);

    // Assistant validates and assigns the agent.
    let resp = lifecycle_service::validate(
        &state,
        &assistant,
        commande_id,
        ValidateRequest {
            agent_id: agent.user_id,
        },
    )
    .await?;
    let commande = resp.data.unwrap();
    assert_eq!(commande.statut, Statut::ValideeParAssistant);
    assert_eq!(commande.agent_id, Some(agent.user_id));
    assert_eq!(commande.assistant_id, Some(assistant.user_id));
    assert_eq!(notif_count(&state, client.user_id).await?, 1);

    // Agent accepts; the commande becomes facturable.
    let resp = lifecycle_service::accept(&state, &agent, commande_id).await?;
    assert_eq!(resp.data.unwrap().statut, Statut::Acceptee);
    let elig = commande_service::facturabilite(&state, &agent, commande_id).await?;
    assert!(elig.data.unwrap().facturable);

    // Position update while in transit does not touch the statut.
    let resp = lifecycle_service::update_current_address(
        &state,
        &agent,
        commande_id,
        UpdateAddressRequest {
            adresse: "123 Rue de Paris".into(),
        },
    )
    .await?;
    let commande = resp.data.unwrap();
    assert_eq!(commande.statut, Statut::Acceptee);
    assert_eq!(commande.adresse_actuelle.as_deref(), Some("123 Rue de Paris"));

    let resp = lifecycle_service::mark_shipped(&state, &agent, commande_id).await?;
    assert_eq!(resp.data.unwrap().statut, Statut::Expediee);

    let resp = lifecycle_service::mark_delivered(&state, &agent, commande_id).await?;
    assert_eq!(resp.data.unwrap().statut, Statut::Livree);

    // One notification per successful mutation.
    assert_eq!(notif_count(&state, client.user_id).await?, 5);

    // Livrée is terminal: a repeat delivery fails and emits nothing.
    let err = lifecycle_service::mark_delivered(&state, &agent, commande_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)), "{err:?}");
    assert_eq!(notif_count(&state, client.user_id).await?, 5);

    Ok(())
}

#[tokio::test]
async fn rejected_commande_cannot_be_accepted() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;

    let client = create_user(&state, "client").await?;
    let assistant = create_user(&state, "assistant").await?;
    let agent = create_user(&state, "agent").await?;
    let commande_id = create_commande(&state, client.user_id).await?;

    lifecycle_service::validate(
        &state,
        &assistant,
        commande_id,
        ValidateRequest {
            agent_id: agent.user_id,
        },
    )
    .await?;

    let resp = lifecycle_service::reject(
        &state,
        &agent,
        commande_id,
        RejectRequest {
            motif: "documents_incomplets".into(),
            commentaire: None,
        },
    )
    .await?;
    let commande = resp.data.unwrap();
    assert_eq!(commande.statut, Statut::Rejetee);
    assert_eq!(commande.motif_rejet.as_deref(), Some("documents_incomplets"));

    let err = lifecycle_service::accept(&state, &agent, commande_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)), "{err:?}");

    let stored = fetch_statut(&state, commande_id).await?;
    assert_eq!(stored, Statut::Rejetee);

    Ok(())
}

#[tokio::test]
async fn assistant_rejects_pending_commande() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;

    let client = create_user(&state, "client").await?;
    let assistant = create_user(&state, "assistant").await?;
    let commande_id = create_commande(&state, client.user_id).await?;

    // Rejection straight from En attente, before any agent is assigned.
    let resp = lifecycle_service::reject(
        &state,
        &assistant,
        commande_id,
        RejectRequest {
            motif: "documents_incomplets".into(),
            commentaire: Some("connaissement manquant".into()),
        },
    )
    .await?;
    let commande = resp.data.unwrap();
    assert_eq!(commande.statut, Statut::Rejetee);
    assert_eq!(
        commande.motif_rejet.as_deref(),
        Some("documents_incomplets (connaissement manquant)")
    );
    assert_eq!(notif_count(&state, client.user_id).await?, 1);

    Ok(())
}

#[tokio::test]
async fn address_update_requires_transit() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;

    let client = create_user(&state, "client").await?;
    let assistant = create_user(&state, "assistant").await?;
    let agent = create_user(&state, "agent").await?;
    let commande_id = create_commande(&state, client.user_id).await?;

    lifecycle_service::validate(
        &state,
        &assistant,
        commande_id,
        ValidateRequest {
            agent_id: agent.user_id,
        },
    )
    .await?;

    // Validée Par Assistant is not in transit yet.
    let err = lifecycle_service::update_current_address(
        &state,
        &agent,
        commande_id,
        UpdateAddressRequest {
            adresse: "Entrepôt du Havre".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)), "{err:?}");

    let commande = Commandes::find_by_id(commande_id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert_eq!(commande.adresse_actuelle, None);

    Ok(())
}

#[tokio::test]
async fn malformed_payloads_are_rejected() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;

    let client = create_user(&state, "client").await?;
    let assistant = create_user(&state, "assistant").await?;
    let commande_id = create_commande(&state, client.user_id).await?;

    let err = lifecycle_service::reject(
        &state,
        &assistant,
        commande_id,
        RejectRequest {
            motif: "  ".into(),
            commentaire: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)), "{err:?}");

    // Nothing happened: still awaiting validation, zero notifications.
    assert_eq!(fetch_statut(&state, commande_id).await?, Statut::EnAttente);
    assert_eq!(notif_count(&state, client.user_id).await?, 0);

    Ok(())
}

#[tokio::test]
async fn only_the_assigned_agent_may_act() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;

    let client = create_user(&state, "client").await?;
    let assistant = create_user(&state, "assistant").await?;
    let agent = create_user(&state, "agent").await?;
    let other_agent = create_user(&state, "agent").await?;
    let commande_id = create_commande(&state, client.user_id).await?;

    lifecycle_service::validate(
        &state,
        &assistant,
        commande_id,
        ValidateRequest {
            agent_id: agent.user_id,
        },
    )
    .await?;

    let err = lifecycle_service::accept(&state, &other_agent, commande_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden), "{err:?}");
    assert_eq!(
        fetch_statut(&state, commande_id).await?,
        Statut::ValideeParAssistant
    );

    Ok(())
}

#[tokio::test]
async fn validate_with_unknown_agent_is_not_found() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;

    let client = create_user(&state, "client").await?;
    let assistant = create_user(&state, "assistant").await?;
    let commande_id = create_commande(&state, client.user_id).await?;

    let err = lifecycle_service::validate(
        &state,
        &assistant,
        commande_id,
        ValidateRequest {
            agent_id: Uuid::new_v4(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound), "{err:?}");
    assert_eq!(fetch_statut(&state, commande_id).await?, Statut::EnAttente);

    Ok(())
}

#[tokio::test]
async fn admin_cancellation_is_terminal() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;

    let client = create_user(&state, "client").await?;
    let assistant = create_user(&state, "assistant").await?;
    let agent = create_user(&state, "agent").await?;
    let admin = create_user(&state, "admin").await?;
    let commande_id = create_commande(&state, client.user_id).await?;

    // Only admins may cancel.
    let err = lifecycle_service::cancel(&state, &assistant, commande_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden), "{err:?}");

    lifecycle_service::validate(
        &state,
        &assistant,
        commande_id,
        ValidateRequest {
            agent_id: agent.user_id,
        },
    )
    .await?;

    let resp = lifecycle_service::cancel(&state, &admin, commande_id).await?;
    assert_eq!(resp.data.unwrap().statut, Statut::Annulee);

    let err = lifecycle_service::cancel(&state, &admin, commande_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)), "{err:?}");

    Ok(())
}

#[tokio::test]
async fn facture_creation_is_gated_on_statut() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;

    let client = create_user(&state, "client").await?;
    let assistant = create_user(&state, "assistant").await?;
    let agent = create_user(&state, "agent").await?;
    let commande_id = create_commande(&state, client.user_id).await?;

    let err = facture_service::create_facture(
        &state,
        &assistant,
        CreateFactureRequest {
            commande_id,
            montant: 50_000,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition(_)), "{err:?}");

    lifecycle_service::validate(
        &state,
        &assistant,
        commande_id,
        ValidateRequest {
            agent_id: agent.user_id,
        },
    )
    .await?;
    lifecycle_service::accept(&state, &agent, commande_id).await?;

    let resp = facture_service::create_facture(
        &state,
        &assistant,
        CreateFactureRequest {
            commande_id,
            montant: 50_000,
        },
    )
    .await?;
    let facture = resp.data.unwrap();
    assert_eq!(facture.commande_id, commande_id);
    assert!(facture.numero.starts_with("FAC-"));

    let factures = facture_service::list_factures(&state, &client, commande_id).await?;
    assert_eq!(factures.data.unwrap().items.len(), 1);

    Ok(())
}

#[tokio::test]
async fn concurrent_accept_and_reject_has_single_winner() -> anyhow::Result<()> {
    let url = require_db!();
    let state = setup_state(&url).await?;

    let client = create_user(&state, "client").await?;
    let assistant = create_user(&state, "assistant").await?;
    let agent = create_user(&state, "agent").await?;
    let commande_id = create_commande(&state, client.user_id).await?;

    lifecycle_service::validate(
        &state,
        &assistant,
        commande_id,
        ValidateRequest {
            agent_id: agent.user_id,
        },
    )
    .await?;
    let before = notif_count(&state, client.user_id).await?;

    let (accepted, rejected) = tokio::join!(
        lifecycle_service::accept(&state, &agent, commande_id),
        lifecycle_service::reject(
            &state,
            &assistant,
            commande_id,
            RejectRequest {
                motif: "annulation de dernière minute".into(),
                commentaire: None,
            },
        ),
    );

    // The row lock serializes the two read-modify-writes: exactly one commits.
    assert_ne!(
        accepted.is_ok(),
        rejected.is_ok(),
        "expected exactly one winner, got accept={:?} reject={:?}",
        accepted.as_ref().map(|_| ()),
        rejected.as_ref().map(|_| ()),
    );
    let accept_won = accepted.is_ok();
    let loser_err = if accept_won {
        rejected.unwrap_err()
    } else {
        accepted.unwrap_err()
    };
    assert!(matches!(loser_err, AppError::InvalidTransition(_)), "{loser_err:?}");

    let expected = if accept_won {
        Statut::Acceptee
    } else {
        Statut::Rejetee
    };
    assert_eq!(fetch_statut(&state, commande_id).await?, expected);

    // One notification for the winner, none for the loser.
    assert_eq!(notif_count(&state, client.user_id).await?, before + 1);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;
    Ok(AppState {
        orm,
        jwt_secret: "secret-test".into(),
    })
}

async fn create_user(state: &AppState, role: &str) -> anyhow::Result<AuthUser> {
    let id = Uuid::new_v4();
    UserActive {
        id: Set(id),
        nom: Set(format!("Test {role}")),
        email: Set(format!("{role}-{id}@example.com")),
        role: Set(role.to_string()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: id,
        role: role.to_string(),
    })
}

async fn create_commande(state: &AppState, client_id: Uuid) -> anyhow::Result<Uuid> {
    let commande = CommandeActive {
        id: Set(Uuid::new_v4()),
        client_id: Set(client_id),
        agent_id: Set(None),
        assistant_id: Set(None),
        statut: Set(Statut::EnAttente),
        adresse_depart: Set("12 Quai des Docks, Marseille".into()),
        adresse_arrivee: Set("45 Avenue du Port, Dakar".into()),
        adresse_actuelle: Set(None),
        valeur_marchandise: Set(100_000),
        type_transport: Set("maritime".into()),
        modalite_paiement: Set("comptant".into()),
        motif_rejet: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(commande.id)
}

async fn fetch_statut(state: &AppState, commande_id: Uuid) -> anyhow::Result<Statut> {
    let commande = Commandes::find_by_id(commande_id)
        .one(&state.orm)
        .await?
        .expect("commande should exist");
    Ok(commande.statut)
}

async fn notif_count(state: &AppState, client_id: Uuid) -> anyhow::Result<u64> {
    let count = Notifications::find()
        .filter(NotifCol::ClientId.eq(client_id))
        .count(&state.orm)
        .await?;
    Ok(count)
}
