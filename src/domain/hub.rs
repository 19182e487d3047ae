use serde::{Deserialize, Serialize};

use crate::domain::stop::Coordinates;

/// Flat per-truck fee used until a hub configures its own.
pub const DEFAULT_TRUCK_RATE: f64 = 150.0;

/// Per-hub pricing settings that are not part of a rate table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HubSettings {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Address trucks leave from and return to.
    pub depot_address: Option<String>,
    /// Geocoded depot position.
    pub depot: Option<Coordinates>,
    /// Flat fee billed per truck.
    pub truck_rate: f64,
    /// Hub's own Google Maps key; lookups fall back to the server key.
    #[serde(default, skip_serializing)]
    pub google_maps_api_key: Option<String>,
}

impl HubSettings {
    /// Settings of a hub that never saved any.
    pub fn defaults(hub_id: i32) -> Self {
        Self {
            hub_id,
            depot_address: None,
            depot: None,
            truck_rate: DEFAULT_TRUCK_RATE,
            google_maps_api_key: None,
        }
    }
}

/// Patch data applied when editing hub settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateHubSettings {
    pub depot_address: Option<Option<String>>,
    pub truck_rate: Option<f64>,
    pub google_maps_api_key: Option<Option<String>>,
}

impl UpdateHubSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depot_address(mut self, depot_address: Option<impl Into<String>>) -> Self {
        self.depot_address = Some(depot_address.map(|value| value.into().trim().to_string()));
        self
    }

    pub fn truck_rate(mut self, truck_rate: f64) -> Self {
        self.truck_rate = Some(truck_rate);
        self
    }

    pub fn google_maps_api_key(mut self, api_key: Option<impl Into<String>>) -> Self {
        self.google_maps_api_key = Some(api_key.map(|value| value.into().trim().to_string()));
        self
    }
}
