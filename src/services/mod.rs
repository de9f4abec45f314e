pub mod commande_service;
pub mod facture_service;
pub mod lifecycle_service;
pub mod notification_service;
