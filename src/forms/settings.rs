use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::catalog::{NewInventoryItem, NewResidenceSize};
use crate::domain::customer::NewLeadSource;
use crate::domain::hub::UpdateHubSettings;
use crate::domain::rates::{
    NewAdditionalService, NewFuelPriceTier, NewMoverAssignmentRule, NewMoverTeam, NewTruck,
};
use crate::forms::{optional_inline, sanitize_inline_text};

const NAME_MAX_LEN: u64 = 128;
const ADDRESS_MAX_LEN: u64 = 512;
const API_KEY_MAX_LEN: u64 = 256;
const MAX_MOVERS: i32 = 50;

pub type SettingsFormResult<T> = Result<T, SettingsFormError>;

#[derive(Debug, Error)]
pub enum SettingsFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    #[error("upper bound must be greater than the lower bound")]
    InvertedRange,
}

fn required_text(value: &str, field: &'static str) -> SettingsFormResult<String> {
    let sanitized = sanitize_inline_text(value);
    if sanitized.is_empty() {
        return Err(SettingsFormError::Empty(field));
    }
    Ok(sanitized)
}

fn check_range(min: f64, max: Option<f64>) -> SettingsFormResult<()> {
    match max {
        Some(max) if max <= min => Err(SettingsFormError::InvertedRange),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct MoverTeamForm {
    #[validate(range(min = 1, max = MAX_MOVERS))]
    pub number_of_movers: i32,
    #[validate(range(exclusive_min = 0.0))]
    pub lbs_per_hour: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub price_per_hour: f64,
}

impl MoverTeamForm {
    pub fn into_new_mover_team(self, hub_id: i32) -> SettingsFormResult<NewMoverTeam> {
        self.validate()?;
        Ok(NewMoverTeam {
            hub_id,
            number_of_movers: self.number_of_movers,
            lbs_per_hour: self.lbs_per_hour,
            price_per_hour: self.price_per_hour,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssignmentRuleForm {
    #[validate(range(min = 0.0))]
    pub hours_min: f64,
    #[serde(default)]
    pub hours_max: Option<f64>,
    #[validate(range(min = 1, max = MAX_MOVERS))]
    pub number_of_movers: i32,
}

impl AssignmentRuleForm {
    pub fn into_new_assignment_rule(
        self,
        hub_id: i32,
    ) -> SettingsFormResult<NewMoverAssignmentRule> {
        self.validate()?;
        check_range(self.hours_min, self.hours_max)?;
        Ok(NewMoverAssignmentRule {
            hub_id,
            hours_min: self.hours_min,
            hours_max: self.hours_max,
            number_of_movers: self.number_of_movers,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct TruckForm {
    #[validate(length(min = 1, max = 32))]
    pub unit_number: String,
    #[validate(range(min = 1, max = 100))]
    pub length_ft: i32,
    #[validate(range(exclusive_min = 0.0))]
    pub volume_cf: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub mpg: f64,
    #[serde(default)]
    pub has_lift_gate: bool,
    #[serde(default)]
    pub has_ramp: bool,
}

impl TruckForm {
    pub fn into_new_truck(self, hub_id: i32) -> SettingsFormResult<NewTruck> {
        self.validate()?;
        Ok(NewTruck {
            hub_id,
            unit_number: required_text(&self.unit_number, "unit number")?,
            length_ft: self.length_ft,
            volume_cf: self.volume_cf,
            mpg: self.mpg,
            has_lift_gate: self.has_lift_gate,
            has_ramp: self.has_ramp,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct FuelTierForm {
    #[validate(range(min = 0.0))]
    pub miles_min: f64,
    #[serde(default)]
    pub miles_max: Option<f64>,
    #[validate(range(exclusive_min = 0.0))]
    pub price_per_gallon: f64,
}

impl FuelTierForm {
    pub fn into_new_fuel_tier(self, hub_id: i32) -> SettingsFormResult<NewFuelPriceTier> {
        self.validate()?;
        check_range(self.miles_min, self.miles_max)?;
        Ok(NewFuelPriceTier {
            hub_id,
            miles_min: self.miles_min,
            miles_max: self.miles_max,
            price_per_gallon: self.price_per_gallon,
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct AdditionalServiceForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0, max = MAX_MOVERS))]
    #[serde(default)]
    pub movers_required: i32,
}

impl AdditionalServiceForm {
    pub fn into_new_additional_service(
        self,
        hub_id: i32,
    ) -> SettingsFormResult<NewAdditionalService> {
        self.validate()?;
        let name = required_text(&self.name, "service name")?;
        Ok(NewAdditionalService::new(hub_id, name, self.price)
            .with_movers_required(self.movers_required))
    }
}

/// Depot and truck fee of a hub. An empty address clears the depot.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct HubSettingsForm {
    #[validate(length(max = ADDRESS_MAX_LEN))]
    #[serde(default)]
    pub depot_address: Option<String>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub truck_rate: Option<f64>,
    /// An empty value drops the hub's own key.
    #[validate(length(max = API_KEY_MAX_LEN))]
    #[serde(default)]
    pub google_maps_api_key: Option<String>,
}

impl HubSettingsForm {
    pub fn into_update_hub_settings(self) -> SettingsFormResult<UpdateHubSettings> {
        self.validate()?;
        let mut update = UpdateHubSettings::new();
        if let Some(address) = self.depot_address {
            update = update.depot_address(optional_inline(Some(address)));
        }
        if let Some(truck_rate) = self.truck_rate {
            update = update.truck_rate(truck_rate);
        }
        if let Some(api_key) = self.google_maps_api_key {
            let api_key = api_key.trim();
            update = update.google_maps_api_key((!api_key.is_empty()).then_some(api_key));
        }
        Ok(update)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct InventoryItemForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(range(exclusive_min = 0.0))]
    pub weight_lbs: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub volume_cf: f64,
}

impl InventoryItemForm {
    pub fn into_new_inventory_item(self, hub_id: i32) -> SettingsFormResult<NewInventoryItem> {
        self.validate()?;
        let name = required_text(&self.name, "item name")?;
        Ok(NewInventoryItem::new(
            hub_id,
            name,
            self.weight_lbs,
            self.volume_cf,
        ))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResidenceSizeForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub size_description: String,
    #[validate(length(min = 1, max = 64))]
    pub size_type: String,
    #[validate(range(exclusive_min = 0.0))]
    pub weight_lbs: f64,
    #[validate(range(exclusive_min = 0.0))]
    #[serde(default)]
    pub volume_cf: Option<f64>,
}

impl ResidenceSizeForm {
    pub fn into_new_residence_size(self, hub_id: i32) -> SettingsFormResult<NewResidenceSize> {
        self.validate()?;
        let description = required_text(&self.size_description, "size description")?;
        let size_type = required_text(&self.size_type, "size type")?;
        let mut size = NewResidenceSize::new(hub_id, description, size_type, self.weight_lbs);
        if let Some(volume_cf) = self.volume_cf {
            size = size.with_volume(volume_cf);
        }
        Ok(size)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LeadSourceForm {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    /// Hidden sources can still be set on customers by operators.
    #[serde(default = "default_public")]
    pub is_public: bool,
}

fn default_public() -> bool {
    true
}

impl LeadSourceForm {
    pub fn into_new_lead_source(self, hub_id: i32) -> SettingsFormResult<NewLeadSource> {
        self.validate()?;
        let source = NewLeadSource::new(hub_id, required_text(&self.name, "source name")?);
        Ok(if self.is_public { source } else { source.hidden() })
    }
}
