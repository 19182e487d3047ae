//! Fixtures shared by the service unit tests.

use std::sync::Mutex;

use chrono::{NaiveDate, NaiveDateTime};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::domain::estimate::{
    Estimate, EstimateFigures, EstimateMethod, EstimateStatus, MoveService, MoveType,
};
use crate::domain::line_item::{LineItem, LineItemKind};
use crate::domain::rates::{FuelPriceTier, MoverAssignmentRule, MoverTeam, RateContext, Truck};
use crate::domain::stop::{Coordinates, NewStop, Stop};
use crate::geo::{GeoError, GeoResolver, RouteMetrics};
use crate::sequencer;

pub const HUB_ID: i32 = 9;

pub fn fixed_datetime() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

pub fn user_with_roles(roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "user-1".to_string(),
        email: "user@example.com".to_string(),
        hub_id: HUB_ID,
        name: "Tester".to_string(),
        roles: roles.iter().map(|role| role.to_string()).collect(),
        exp: 0,
    }
}

/// Stored stop with the given zip; coordinates only when `located`.
pub fn stored_stop(id: i32, estimate_id: i32, zip: &str, located: Option<Coordinates>) -> Stop {
    let mut payload = NewStop::new(zip);
    if let Some(coordinates) = located {
        payload = payload.with_coordinates(coordinates);
    }
    let mut stop = Stop::pending(estimate_id, &payload);
    stop.id = id;
    stop
}

pub fn sample_estimate(id: i32, stops: Vec<Stop>) -> Estimate {
    let mut stops = stops;
    sequencer::resequence(&mut stops);
    Estimate {
        id,
        hub_id: HUB_ID,
        customer_id: None,
        method: EstimateMethod::Inventory,
        status: EstimateStatus::NewLead,
        move_type: MoveType::House,
        move_service: MoveService::Moving,
        move_date: None,
        notes: None,
        figures: EstimateFigures::default(),
        stops,
        line_items: Vec::new(),
        created_at: fixed_datetime(),
        updated_at: fixed_datetime(),
    }
}

pub fn line_item(id: i32, estimate_id: i32, kind: LineItemKind, total_cost: f64) -> LineItem {
    LineItem {
        id,
        estimate_id,
        kind,
        description: None,
        quantity: 1.0,
        unit_price: total_cost,
        total_cost,
        created_at: fixed_datetime(),
        updated_at: fixed_datetime(),
    }
}

pub fn sample_rates() -> RateContext {
    RateContext {
        mover_teams: vec![
            MoverTeam {
                id: 1,
                hub_id: HUB_ID,
                number_of_movers: 2,
                lbs_per_hour: 100.0,
                price_per_hour: 80.0,
            },
            MoverTeam {
                id: 2,
                hub_id: HUB_ID,
                number_of_movers: 3,
                lbs_per_hour: 150.0,
                price_per_hour: 110.0,
            },
        ],
        assignment_rules: vec![MoverAssignmentRule {
            id: 1,
            hub_id: HUB_ID,
            hours_min: 6.0,
            hours_max: None,
            number_of_movers: 3,
        }],
        trucks: vec![Truck {
            id: 1,
            hub_id: HUB_ID,
            unit_number: "26".to_string(),
            length_ft: 26,
            volume_cf: 1600.0,
            mpg: 8.0,
            has_lift_gate: true,
            has_ramp: true,
        }],
        fuel_tiers: vec![FuelPriceTier {
            id: 1,
            hub_id: HUB_ID,
            miles_min: 0.0,
            miles_max: None,
            price_per_gallon: 3.5,
        }],
        additional_services: Vec::new(),
        truck_rate: 150.0,
    }
}

/// In-memory resolver: addresses resolve by zip suffix, routes by their
/// first waypoint.
#[derive(Default)]
pub struct StubGeo {
    pub places: Vec<(String, Coordinates)>,
    pub routes: Vec<(Coordinates, RouteMetrics)>,
    pub geocoded: Mutex<Vec<String>>,
    /// Only copies made through `with_api_key` answer.
    pub requires_key: bool,
    pub api_key: Option<String>,
}

impl StubGeo {
    pub fn unkeyed() -> Self {
        Self {
            requires_key: true,
            ..Self::default()
        }
    }

    pub fn with_place(mut self, zip: &str, coordinates: Coordinates) -> Self {
        self.places.push((zip.to_string(), coordinates));
        self
    }

    pub fn with_route(mut self, from: Coordinates, distance_miles: f64, duration_hours: f64) -> Self {
        self.routes.push((
            from,
            RouteMetrics {
                distance_miles,
                duration_hours,
            },
        ));
        self
    }
}

impl GeoResolver for StubGeo {
    fn geocode(&self, address: &str) -> Result<Coordinates, GeoError> {
        self.geocoded.lock().unwrap().push(address.to_string());
        self.places
            .iter()
            .find(|(zip, _)| address.ends_with(zip.as_str()))
            .map(|(_, coordinates)| *coordinates)
            .ok_or_else(|| GeoError::NoResults(address.to_string()))
    }

    fn route(&self, waypoints: &[Coordinates]) -> Result<RouteMetrics, GeoError> {
        self.routes
            .iter()
            .find(|(from, _)| waypoints.first() == Some(from))
            .map(|(_, metrics)| *metrics)
            .ok_or_else(|| GeoError::NoResults(format!("{} waypoints", waypoints.len())))
    }

    fn with_api_key(&self, api_key: &str) -> Option<Box<dyn GeoResolver>> {
        Some(Box::new(StubGeo {
            places: self.places.clone(),
            routes: self.routes.clone(),
            geocoded: Mutex::new(Vec::new()),
            requires_key: self.requires_key,
            api_key: Some(api_key.to_string()),
        }))
    }

    fn is_configured(&self) -> bool {
        !self.requires_key || self.api_key.is_some()
    }
}
