pub mod configuration;
pub mod crm_client;
pub mod domain;
pub mod photo_client;
pub mod routes;
pub mod startup;
pub mod telemetry;
