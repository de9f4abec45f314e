pub mod commandes;
pub mod factures;
pub mod notifications;
