use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::stop::{NewStop, UpdateStop};
use crate::forms::{optional_inline, sanitize_inline_text};

const ADDRESS_MAX_LEN: u64 = 256;
const CITY_MAX_LEN: u64 = 128;
const STATE_MAX_LEN: u64 = 64;
const ZIP_MAX_LEN: u64 = 16;

pub type StopFormResult<T> = Result<T, StopFormError>;

#[derive(Debug, Error)]
pub enum StopFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("zip code cannot be empty")]
    EmptyZip,
    #[error("stop {0} is listed more than once")]
    DuplicateStop(i32),
}

/// Address and access details of a new stop.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddStopForm {
    #[validate(length(max = ADDRESS_MAX_LEN))]
    #[serde(default)]
    pub address: Option<String>,
    #[validate(length(max = CITY_MAX_LEN))]
    #[serde(default)]
    pub city: Option<String>,
    #[validate(length(max = STATE_MAX_LEN))]
    #[serde(default)]
    pub state: Option<String>,
    #[validate(length(min = 1, max = ZIP_MAX_LEN))]
    pub zip: String,
    #[validate(range(min = -5, max = 200))]
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub elevator: bool,
    #[serde(default)]
    pub stairs: bool,
    #[serde(default)]
    pub long_walk: bool,
}

impl AddStopForm {
    pub fn into_new_stop(self) -> StopFormResult<NewStop> {
        self.validate()?;

        let zip = sanitize_inline_text(&self.zip);
        if zip.is_empty() {
            return Err(StopFormError::EmptyZip);
        }

        let mut stop = NewStop::new(zip).with_access(self.elevator, self.stairs, self.long_walk);
        if let Some(address) = optional_inline(self.address) {
            stop = stop.with_address(address);
        }
        if let Some(city) = optional_inline(self.city) {
            stop = stop.with_city(city);
        }
        if let Some(state) = optional_inline(self.state) {
            stop = stop.with_state(state);
        }
        if let Some(floor) = self.floor {
            stop = stop.with_floor(floor);
        }

        Ok(stop)
    }
}

/// Partial stop edit. Omitted fields stay as they are; an empty string clears
/// an optional address part.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct EditStopForm {
    #[validate(length(max = ADDRESS_MAX_LEN))]
    #[serde(default)]
    pub address: Option<String>,
    #[validate(length(max = CITY_MAX_LEN))]
    #[serde(default)]
    pub city: Option<String>,
    #[validate(length(max = STATE_MAX_LEN))]
    #[serde(default)]
    pub state: Option<String>,
    #[validate(length(max = ZIP_MAX_LEN))]
    #[serde(default)]
    pub zip: Option<String>,
    #[validate(range(min = -5, max = 200))]
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub elevator: Option<bool>,
    #[serde(default)]
    pub stairs: Option<bool>,
    #[serde(default)]
    pub long_walk: Option<bool>,
}

impl EditStopForm {
    pub fn into_update_stop(self) -> StopFormResult<UpdateStop> {
        self.validate()?;

        let mut update = UpdateStop::new();
        if let Some(address) = self.address {
            update = update.address(optional_inline(Some(address)));
        }
        if let Some(city) = self.city {
            update = update.city(optional_inline(Some(city)));
        }
        if let Some(state) = self.state {
            update = update.state(optional_inline(Some(state)));
        }
        if let Some(zip) = self.zip {
            let zip = sanitize_inline_text(&zip);
            if zip.is_empty() {
                return Err(StopFormError::EmptyZip);
            }
            update = update.zip(zip);
        }
        if let Some(floor) = self.floor {
            update = update.floor(Some(floor));
        }
        update.elevator = self.elevator;
        update.stairs = self.stairs;
        update.long_walk = self.long_walk;

        Ok(update)
    }
}

/// New order of the stops, first to last.
#[derive(Debug, Deserialize)]
pub struct ReorderStopsForm {
    pub stop_ids: Vec<i32>,
}

impl ReorderStopsForm {
    pub fn into_stop_ids(self) -> StopFormResult<Vec<i32>> {
        let mut seen = HashSet::with_capacity(self.stop_ids.len());
        for stop_id in &self.stop_ids {
            if !seen.insert(*stop_id) {
                return Err(StopFormError::DuplicateStop(*stop_id));
            }
        }
        Ok(self.stop_ids)
    }
}
