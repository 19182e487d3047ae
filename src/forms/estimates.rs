use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use pushkind_common::pagination::DEFAULT_ITEMS_PER_PAGE;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::UnknownVariant;
use crate::domain::catalog::Assignment;
use crate::domain::estimate::{
    EstimateField, EstimateListQuery, EstimateMethod, EstimateStatus, MoveService, MoveType,
    NewEstimate, UpdateEstimate,
};
use crate::forms::optional_multiline;
use crate::forms::stops::{AddStopForm, StopFormError};

const NOTES_MAX_LEN: u64 = 4096;
const SEARCH_MAX_LEN: u64 = 128;

pub type EstimateFormResult<T> = Result<T, EstimateFormError>;

#[derive(Debug, Error)]
pub enum EstimateFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    UnknownChoice(#[from] UnknownVariant),
    #[error(transparent)]
    Stop(#[from] StopFormError),
    #[error("{field} must be a non-negative number")]
    InvalidFigure { field: &'static str },
    #[error("{0} is both pinned and released")]
    ConflictingEdit(&'static str),
}

fn parse_choice<T>(value: Option<String>) -> EstimateFormResult<Option<T>>
where
    T: FromStr<Err = UnknownVariant>,
{
    value
        .map(|raw| raw.trim().to_lowercase())
        .filter(|raw| !raw.is_empty())
        .map(|raw| raw.parse::<T>())
        .transpose()
        .map_err(EstimateFormError::from)
}

/// Payload for creating an estimate from the operator UI.
#[derive(Debug, Deserialize, Validate)]
pub struct AddEstimateForm {
    #[validate(range(min = 1))]
    #[serde(default)]
    pub customer_id: Option<i32>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub move_type: Option<String>,
    #[serde(default)]
    pub move_service: Option<String>,
    #[serde(default)]
    pub move_date: Option<NaiveDate>,
    #[validate(length(max = NOTES_MAX_LEN))]
    #[serde(default)]
    pub notes: Option<String>,
    /// Stops in route order.
    #[validate(nested)]
    #[serde(default)]
    pub stops: Vec<AddStopForm>,
}

impl AddEstimateForm {
    pub fn into_new_estimate(self, hub_id: i32) -> EstimateFormResult<NewEstimate> {
        self.validate()?;

        let move_type = parse_choice::<MoveType>(self.move_type)?.unwrap_or_default();
        let move_service = parse_choice::<MoveService>(self.move_service)?.unwrap_or_default();
        let method = parse_choice::<EstimateMethod>(self.method)?.unwrap_or_default();

        let mut estimate = NewEstimate::new(hub_id, move_type, move_service).with_method(method);
        if let Some(customer_id) = self.customer_id {
            estimate = estimate.with_customer_id(customer_id);
        }
        if let Some(move_date) = self.move_date {
            estimate = estimate.with_move_date(move_date);
        }
        if let Some(notes) = optional_multiline(self.notes) {
            estimate = estimate.with_notes(notes);
        }
        for stop in self.stops {
            estimate = estimate.with_stop(stop.into_new_stop()?);
        }

        Ok(estimate)
    }
}

/// Partial estimate edit.
///
/// `pin` maps field names to operator values; `release` lists fields handed
/// back to the calculator. An empty `notes` string clears the notes.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditEstimateForm {
    #[validate(range(min = 1))]
    #[serde(default)]
    pub customer_id: Option<i32>,
    #[serde(default)]
    pub clear_customer: bool,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub move_type: Option<String>,
    #[serde(default)]
    pub move_service: Option<String>,
    #[serde(default)]
    pub move_date: Option<NaiveDate>,
    #[validate(length(max = NOTES_MAX_LEN))]
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub pin: BTreeMap<String, f64>,
    #[serde(default)]
    pub release: Vec<String>,
}

impl EditEstimateForm {
    pub fn into_update_estimate(self) -> EstimateFormResult<UpdateEstimate> {
        self.validate()?;

        let mut update = UpdateEstimate::new();

        if self.clear_customer {
            update = update.customer_id(None);
        } else if let Some(customer_id) = self.customer_id {
            update = update.customer_id(Some(customer_id));
        }
        if let Some(method) = parse_choice::<EstimateMethod>(self.method)? {
            update = update.method(method);
        }
        if let Some(status) = parse_choice::<EstimateStatus>(self.status)? {
            update = update.status(status);
        }
        if let Some(move_type) = parse_choice::<MoveType>(self.move_type)? {
            update = update.move_type(move_type);
        }
        if let Some(move_service) = parse_choice::<MoveService>(self.move_service)? {
            update = update.move_service(move_service);
        }
        if let Some(move_date) = self.move_date {
            update = update.move_date(Some(move_date));
        }
        if let Some(notes) = self.notes {
            update = update.notes(optional_multiline(Some(notes)));
        }

        let released = self
            .release
            .iter()
            .map(|name| name.trim().parse::<EstimateField>())
            .collect::<Result<Vec<_>, _>>()?;

        for (name, value) in self.pin {
            let field = name.trim().parse::<EstimateField>()?;
            if !value.is_finite() || value < 0.0 {
                return Err(EstimateFormError::InvalidFigure {
                    field: field.as_str(),
                });
            }
            if released.contains(&field) {
                return Err(EstimateFormError::ConflictingEdit(field.as_str()));
            }
            update = update.pin(field, value);
        }
        for field in released {
            update = update.release(field);
        }

        Ok(update)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct AssignmentForm {
    #[validate(range(min = 1))]
    pub id: i32,
    #[validate(range(min = 1, max = 10000))]
    pub quantity: i32,
}

/// Full replacement of one kind of catalog selection on an estimate.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AssignmentsForm {
    #[validate(nested)]
    #[serde(default)]
    pub items: Vec<AssignmentForm>,
}

impl AssignmentsForm {
    /// Validate the selections and merge repeated ids by adding quantities.
    pub fn into_assignments(self) -> EstimateFormResult<Vec<Assignment>> {
        self.validate()?;

        let mut merged: Vec<Assignment> = Vec::with_capacity(self.items.len());
        for item in self.items {
            match merged.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => existing.quantity += item.quantity,
                None => merged.push(Assignment {
                    id: item.id,
                    quantity: item.quantity,
                }),
            }
        }
        Ok(merged)
    }
}

/// Query string of the estimate list.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EstimateListParams {
    #[serde(default)]
    pub status: Option<String>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub customer_id: Option<i32>,
    #[validate(length(max = SEARCH_MAX_LEN))]
    #[serde(default)]
    pub search: Option<String>,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub page: Option<usize>,
}

impl EstimateListParams {
    pub fn into_query(self, hub_id: i32) -> EstimateFormResult<EstimateListQuery> {
        self.validate()?;

        let mut query = EstimateListQuery::new(hub_id)
            .paginate(self.page.unwrap_or(1), DEFAULT_ITEMS_PER_PAGE);
        if let Some(status) = parse_choice::<EstimateStatus>(self.status)? {
            query = query.status(status);
        }
        if let Some(customer_id) = self.customer_id {
            query = query.customer_id(customer_id);
        }
        if let Some(search) = crate::forms::optional_inline(self.search) {
            query = query.search(search);
        }
        Ok(query)
    }
}
