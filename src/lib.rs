pub mod config;
pub mod domain;
pub mod forms;
pub mod geo;
pub mod models;
pub mod pricing;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod sequencer;
pub mod services;

/// Role required to work with estimates and customers.
pub const SERVICE_ACCESS_ROLE: &str = "crm";
/// Role required to edit rate tables, hub settings and the sizing catalog.
pub const SETTINGS_ACCESS_ROLE: &str = "admin";
