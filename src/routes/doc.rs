use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        commandes::{CommandeDetail, CommandeList, Facturabilite, RejectRequest, UpdateAddressRequest, ValidateRequest},
        factures::{CreateFactureRequest, FactureList},
        notifications::{NotificationList, UnreadCount},
    },
    models::{Categorie, Commande, CommandeProduit, Facture, Notification, Statut, User},
    response::{ApiResponse, Meta},
    routes::{admin, agent, assistant, commandes, factures, health, notifications, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        commandes::list_commandes,
        commandes::get_commande,
        commandes::facturabilite,
        commandes::list_factures,
        assistant::validate_commande,
        assistant::reject_commande,
        agent::list_assigned,
        agent::accept_commande,
        agent::reject_commande,
        agent::ship_commande,
        agent::deliver_commande,
        agent::update_position,
        admin::list_all_commandes,
        admin::cancel_commande,
        factures::create_facture,
        notifications::list_notifications,
        notifications::unread_count,
        notifications::mark_read
    ),
    components(
        schemas(
            User,
            Commande,
            CommandeProduit,
            Facture,
            Notification,
            Statut,
            Categorie,
            ValidateRequest,
            RejectRequest,
            UpdateAddressRequest,
            CommandeList,
            CommandeDetail,
            Facturabilite,
            CreateFactureRequest,
            FactureList,
            NotificationList,
            UnreadCount,
            params::SortOrder,
            params::CommandeListQuery,
            Meta,
            ApiResponse<Commande>,
            ApiResponse<CommandeList>,
            ApiResponse<CommandeDetail>,
            ApiResponse<Facturabilite>,
            ApiResponse<Facture>,
            ApiResponse<NotificationList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Commandes", description = "Client-facing commande reads"),
        (name = "Assistant", description = "Assistant validation actions"),
        (name = "Agent", description = "Agent fulfilment actions"),
        (name = "Admin", description = "Administrative actions"),
        (name = "Factures", description = "Facture endpoints"),
        (name = "Notifications", description = "Client notification inbox"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
