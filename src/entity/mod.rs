pub mod audit_logs;
pub mod commande_produits;
pub mod commandes;
pub mod factures;
pub mod notifications;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use commande_produits::Entity as CommandeProduits;
pub use commandes::Entity as Commandes;
pub use factures::Entity as Factures;
pub use notifications::Entity as Notifications;
pub use users::Entity as Users;
