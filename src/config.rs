//! Environment-driven server configuration.

use std::env;

use pushkind_common::models::config::CommonServerConfig;
use thiserror::Error;

use crate::geo::google::DEFAULT_BASE_URL;

const DEFAULT_DATABASE_URL: &str = "app.db";
const DEFAULT_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DOMAIN: &str = "localhost";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    pub domain: String,
    /// Cookie signing secret; a random key is generated when absent.
    pub secret_key: Option<String>,
    pub auth_service_url: String,
    /// Without a key no geo resolver is built and travel falls back to the
    /// fixed average speed.
    pub google_maps_api_key: Option<String>,
    pub google_maps_base_url: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let auth_service_url =
            non_empty("AUTH_SERVICE_URL").ok_or(ConfigError::Missing("AUTH_SERVICE_URL"))?;
        let port = non_empty("PORT")
            .and_then(|port| port.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            database_url: non_empty("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            address: non_empty("ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            port,
            domain: non_empty("DOMAIN").unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            secret_key: non_empty("SECRET_KEY"),
            auth_service_url,
            google_maps_api_key: non_empty("GOOGLE_MAPS_API_KEY"),
            google_maps_base_url: non_empty("GOOGLE_MAPS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    /// Settings consumed by the shared auth middleware and routes.
    pub fn common(&self) -> CommonServerConfig {
        CommonServerConfig {
            secret: self.secret_key.clone().unwrap_or_default(),
            auth_service_url: self.auth_service_url.clone(),
        }
    }
}
