//! JSON handlers over the services.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use serde::Serialize;
use serde_json::json;

use crate::geo::GeoResolver;
use crate::services::{ServiceError, ServiceResult};

pub mod customers;
pub mod estimates;
pub mod intake;
pub mod line_items;
pub mod settings;
pub mod stops;

/// Resolver shared by all workers; `None` when geo lookups are not configured.
pub type SharedGeo = Option<Arc<dyn GeoResolver>>;

/// Map a service failure to its HTTP status with a JSON `error` body.
pub fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    let body = json!({ "error": err.to_string() });
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => HttpResponse::NotFound().json(body),
        ServiceError::Validation(_) => HttpResponse::BadRequest().json(body),
        ServiceError::InsufficientData(_) => HttpResponse::UnprocessableEntity().json(body),
        ServiceError::Conflict(_) => HttpResponse::Conflict().json(body),
        ServiceError::ExternalLookup(_) => {
            log::warn!("Failed to {action}: {err}");
            HttpResponse::BadGateway().json(body)
        }
        ServiceError::Internal(_) => {
            log::error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub(crate) fn json_or_error<T: Serialize>(result: ServiceResult<T>, action: &str) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(err) => error_response(err, action),
    }
}

pub(crate) fn created_or_error<T: Serialize>(result: ServiceResult<T>, action: &str) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Created().json(value),
        Err(err) => error_response(err, action),
    }
}

pub(crate) fn empty_or_error(result: ServiceResult<()>, action: &str) -> HttpResponse {
    match result {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(err, action),
    }
}

/// Run a service call that may wait on geo lookups off the async workers.
pub(crate) async fn run_blocking<T, F>(call: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(call)
        .await
        .map_err(|err| ServiceError::Internal(err.to_string()))?
}
