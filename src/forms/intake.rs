use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::UnknownVariant;
use crate::domain::customer::NewCustomer;
use crate::domain::estimate::{
    EstimateMethod, EstimateStatus, MoveService, MoveType, NewEstimate,
};
use crate::forms::stops::{AddStopForm, StopFormError};
use crate::forms::{optional_inline, optional_multiline, sanitize_inline_text};

pub type LeadFormResult<T> = Result<T, LeadFormError>;

#[derive(Debug, Error)]
pub enum LeadFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    UnknownChoice(#[from] UnknownVariant),
    #[error(transparent)]
    Stop(#[from] StopFormError),
    #[error("name cannot be empty")]
    EmptyName,
    #[error("source cannot be empty")]
    EmptySource,
}

/// Public quote request submitted from the website.
#[derive(Debug, Deserialize, Validate)]
pub struct LeadForm {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 32))]
    #[serde(default)]
    pub phone: Option<String>,
    /// Where the customer heard about the hub, one of the public source names.
    #[validate(length(min = 1, max = 64))]
    pub source: String,
    pub move_type: String,
    #[serde(default)]
    pub move_service: Option<String>,
    #[serde(default)]
    pub move_date: Option<NaiveDate>,
    /// Residence preset picked on the form, matched by description.
    #[validate(length(max = 128))]
    #[serde(default)]
    pub residence_size: Option<String>,
    #[validate(length(max = 4096))]
    #[serde(default)]
    pub notes: Option<String>,
    #[validate(nested)]
    pub origin: AddStopForm,
    #[validate(nested)]
    pub destination: AddStopForm,
}

/// Query of the public residence size dropdown.
#[derive(Debug, Deserialize)]
pub struct ResidenceSizeParams {
    pub move_type: String,
}

/// Normalized lead ready for the intake service.
#[derive(Debug, Clone)]
pub struct LeadSubmission {
    pub customer: NewCustomer,
    /// `new lead` estimate priced by residence size, without a customer yet.
    pub estimate: NewEstimate,
    /// Source name still to be matched against the hub's sources.
    pub source: String,
    pub residence_size: Option<String>,
}

impl LeadForm {
    pub fn into_submission(self, hub_id: i32) -> LeadFormResult<LeadSubmission> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(LeadFormError::EmptyName);
        }
        let source = sanitize_inline_text(&self.source);
        if source.is_empty() {
            return Err(LeadFormError::EmptySource);
        }
        let mut customer = NewCustomer::new(hub_id, name, self.email);
        if let Some(phone) = self.phone {
            customer = customer.with_phone(phone);
        }

        let move_type = self.move_type.trim().to_lowercase().parse::<MoveType>()?;
        let move_service = match self.move_service.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => value.to_lowercase().parse::<MoveService>()?,
            _ => MoveService::default(),
        };

        let mut estimate = NewEstimate::new(hub_id, move_type, move_service)
            .with_method(EstimateMethod::Size)
            .with_status(EstimateStatus::NewLead)
            .with_stop(self.origin.into_new_stop()?)
            .with_stop(self.destination.into_new_stop()?);
        if let Some(move_date) = self.move_date {
            estimate = estimate.with_move_date(move_date);
        }
        if let Some(notes) = optional_multiline(self.notes) {
            estimate = estimate.with_notes(notes);
        }

        Ok(LeadSubmission {
            customer,
            estimate,
            source,
            residence_size: optional_inline(self.residence_size),
        })
    }
}
