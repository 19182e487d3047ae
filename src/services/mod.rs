use pushkind_common::repository::errors::RepositoryError;
use thiserror::Error;

use crate::pricing::PricingError;
use crate::sequencer::SequenceError;

pub mod calculation;
pub mod customers;
pub mod estimates;
pub mod intake;
pub mod line_items;
pub mod locks;
pub mod settings;
pub mod stops;

#[cfg(test)]
mod test_support;

/// Errors returned by business operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("insufficient data: {0}")]
    InsufficientData(String),
    #[error("external lookup failed: {0}")]
    ExternalLookup(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<PricingError> for ServiceError {
    fn from(value: PricingError) -> Self {
        match value {
            PricingError::InsufficientData(message) => ServiceError::InsufficientData(message),
        }
    }
}

impl From<SequenceError> for ServiceError {
    fn from(value: SequenceError) -> Self {
        match value {
            SequenceError::UnknownStop(_) => ServiceError::NotFound,
            SequenceError::IncompleteOrder => ServiceError::Validation(value.to_string()),
        }
    }
}
