use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::hub::HubSettings as DomainHubSettings;
use crate::domain::stop::Coordinates;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::hub_settings)]
pub struct HubSettings {
    pub id: i32,
    pub hub_id: i32,
    pub depot_address: Option<String>,
    pub depot_lat: Option<f64>,
    pub depot_lng: Option<f64>,
    pub truck_rate: f64,
    pub google_maps_api_key: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Upsert payload keyed by `hub_id`.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::hub_settings, treat_none_as_null = true)]
pub struct SaveHubSettings<'a> {
    pub hub_id: i32,
    pub depot_address: Option<&'a str>,
    pub depot_lat: Option<f64>,
    pub depot_lng: Option<f64>,
    pub truck_rate: f64,
    pub google_maps_api_key: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<HubSettings> for DomainHubSettings {
    fn from(value: HubSettings) -> Self {
        let depot = match (value.depot_lat, value.depot_lng) {
            (Some(lat), Some(lng)) => Some(Coordinates { lat, lng }),
            _ => None,
        };
        Self {
            hub_id: value.hub_id,
            depot_address: value.depot_address,
            depot,
            truck_rate: value.truck_rate,
            google_maps_api_key: value.google_maps_api_key,
        }
    }
}

impl<'a> From<&'a DomainHubSettings> for SaveHubSettings<'a> {
    fn from(value: &'a DomainHubSettings) -> Self {
        Self {
            hub_id: value.hub_id,
            depot_address: value.depot_address.as_deref(),
            depot_lat: value.depot.map(|c| c.lat),
            depot_lng: value.depot.map(|c| c.lng),
            truck_rate: value.truck_rate,
            google_maps_api_key: value.google_maps_api_key.as_deref(),
            updated_at: chrono::Local::now().naive_utc(),
        }
    }
}
