use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::stop::{Stop as DomainStop, StopKind};
use crate::models::estimate::Estimate;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable, Associations)]
#[diesel(table_name = crate::schema::estimate_stops)]
#[diesel(belongs_to(Estimate, foreign_key = estimate_id))]
pub struct EstimateStop {
    pub id: i32,
    pub estimate_id: i32,
    pub sequence: i32,
    pub stop_type: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub floor: Option<i32>,
    pub elevator: bool,
    pub stairs: bool,
    pub long_walk: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::estimate_stops)]
pub struct NewEstimateStop<'a> {
    pub estimate_id: i32,
    pub sequence: i32,
    pub stop_type: &'a str,
    pub address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub zip: &'a str,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub floor: Option<i32>,
    pub elevator: bool,
    pub stairs: bool,
    pub long_walk: bool,
}

/// Full rewrite of the editable columns of a stop.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::estimate_stops, treat_none_as_null = true)]
pub struct StopDetails<'a> {
    pub address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub zip: &'a str,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub floor: Option<i32>,
    pub elevator: bool,
    pub stairs: bool,
    pub long_walk: bool,
    pub updated_at: NaiveDateTime,
}

/// Position and role of a stop.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::estimate_stops)]
pub struct StopPosition<'a> {
    pub sequence: i32,
    pub stop_type: &'a str,
    pub updated_at: NaiveDateTime,
}

impl From<EstimateStop> for DomainStop {
    fn from(value: EstimateStop) -> Self {
        Self {
            id: value.id,
            estimate_id: value.estimate_id,
            sequence: value.sequence,
            kind: value.stop_type.parse().unwrap_or(StopKind::Stop),
            address: value.address,
            city: value.city,
            state: value.state,
            zip: value.zip,
            lat: value.lat,
            lng: value.lng,
            floor: value.floor,
            elevator: value.elevator,
            stairs: value.stairs,
            long_walk: value.long_walk,
        }
    }
}

impl<'a> From<&'a DomainStop> for NewEstimateStop<'a> {
    fn from(value: &'a DomainStop) -> Self {
        Self {
            estimate_id: value.estimate_id,
            sequence: value.sequence,
            stop_type: value.kind.as_str(),
            address: value.address.as_deref(),
            city: value.city.as_deref(),
            state: value.state.as_deref(),
            zip: value.zip.as_str(),
            lat: value.lat,
            lng: value.lng,
            floor: value.floor,
            elevator: value.elevator,
            stairs: value.stairs,
            long_walk: value.long_walk,
        }
    }
}

impl<'a> StopDetails<'a> {
    pub fn from_domain(value: &'a DomainStop, updated_at: NaiveDateTime) -> Self {
        Self {
            address: value.address.as_deref(),
            city: value.city.as_deref(),
            state: value.state.as_deref(),
            zip: value.zip.as_str(),
            lat: value.lat,
            lng: value.lng,
            floor: value.floor,
            elevator: value.elevator,
            stairs: value.stairs,
            long_walk: value.long_walk,
            updated_at,
        }
    }
}

impl<'a> StopPosition<'a> {
    pub fn from_domain(value: &'a DomainStop, updated_at: NaiveDateTime) -> Self {
        Self {
            sequence: value.sequence,
            stop_type: value.kind.as_str(),
            updated_at,
        }
    }
}
