use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use log::warn;

use crate::domain::estimate::{
    Computed, Estimate as DomainEstimate, EstimateFigures as DomainEstimateFigures,
    NewEstimate as DomainNewEstimate,
};
use crate::domain::line_item::LineItem as DomainLineItem;
use crate::domain::stop::Stop as DomainStop;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::estimates)]
pub struct Estimate {
    pub id: i32,
    pub hub_id: i32,
    pub customer_id: Option<i32>,
    pub method: String,
    pub status: String,
    pub move_type: String,
    pub move_service: String,
    pub move_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub total_weight: f64,
    pub is_total_weight_overridden: bool,
    pub total_volume: f64,
    pub is_total_volume_overridden: bool,
    pub estimated_hours: f64,
    pub is_estimated_hours_overridden: bool,
    pub number_of_movers: i32,
    pub is_number_of_movers_overridden: bool,
    pub number_of_trucks: i32,
    pub is_number_of_trucks_overridden: bool,
    pub distance_miles: f64,
    pub is_distance_miles_overridden: bool,
    pub depot_travel_time: f64,
    pub is_depot_travel_time_overridden: bool,
    pub move_travel_time: f64,
    pub is_move_travel_time_overridden: bool,
    pub total_move_time: f64,
    pub is_total_move_time_overridden: bool,
    pub labor_cost: f64,
    pub is_labor_cost_overridden: bool,
    pub truck_cost: f64,
    pub is_truck_cost_overridden: bool,
    pub fuel_cost: f64,
    pub is_fuel_cost_overridden: bool,
    pub additional_services_cost: f64,
    pub total_cost: f64,
    pub is_total_cost_overridden: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::estimates)]
pub struct NewEstimate<'a> {
    pub hub_id: i32,
    pub customer_id: Option<i32>,
    pub method: &'a str,
    pub status: &'a str,
    pub move_type: &'a str,
    pub move_service: &'a str,
    pub move_date: Option<NaiveDate>,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

/// Descriptive columns written when an estimate is edited.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::estimates, treat_none_as_null = true)]
pub struct EstimateDetails<'a> {
    pub customer_id: Option<i32>,
    pub method: &'a str,
    pub status: &'a str,
    pub move_type: &'a str,
    pub move_service: &'a str,
    pub move_date: Option<NaiveDate>,
    pub notes: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

/// Computed columns and their override flags.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::estimates)]
pub struct EstimateFigures {
    pub total_weight: f64,
    pub is_total_weight_overridden: bool,
    pub total_volume: f64,
    pub is_total_volume_overridden: bool,
    pub estimated_hours: f64,
    pub is_estimated_hours_overridden: bool,
    pub number_of_movers: i32,
    pub is_number_of_movers_overridden: bool,
    pub number_of_trucks: i32,
    pub is_number_of_trucks_overridden: bool,
    pub distance_miles: f64,
    pub is_distance_miles_overridden: bool,
    pub depot_travel_time: f64,
    pub is_depot_travel_time_overridden: bool,
    pub move_travel_time: f64,
    pub is_move_travel_time_overridden: bool,
    pub total_move_time: f64,
    pub is_total_move_time_overridden: bool,
    pub labor_cost: f64,
    pub is_labor_cost_overridden: bool,
    pub truck_cost: f64,
    pub is_truck_cost_overridden: bool,
    pub fuel_cost: f64,
    pub is_fuel_cost_overridden: bool,
    pub additional_services_cost: f64,
    pub total_cost: f64,
    pub is_total_cost_overridden: bool,
    pub updated_at: NaiveDateTime,
}

impl Estimate {
    fn figures(&self) -> DomainEstimateFigures {
        DomainEstimateFigures {
            total_weight: Computed::from_parts(self.total_weight, self.is_total_weight_overridden),
            total_volume: Computed::from_parts(self.total_volume, self.is_total_volume_overridden),
            estimated_hours: Computed::from_parts(
                self.estimated_hours,
                self.is_estimated_hours_overridden,
            ),
            number_of_movers: Computed::from_parts(
                self.number_of_movers,
                self.is_number_of_movers_overridden,
            ),
            number_of_trucks: Computed::from_parts(
                self.number_of_trucks,
                self.is_number_of_trucks_overridden,
            ),
            distance_miles: Computed::from_parts(
                self.distance_miles,
                self.is_distance_miles_overridden,
            ),
            depot_travel_time: Computed::from_parts(
                self.depot_travel_time,
                self.is_depot_travel_time_overridden,
            ),
            move_travel_time: Computed::from_parts(
                self.move_travel_time,
                self.is_move_travel_time_overridden,
            ),
            total_move_time: Computed::from_parts(
                self.total_move_time,
                self.is_total_move_time_overridden,
            ),
            labor_cost: Computed::from_parts(self.labor_cost, self.is_labor_cost_overridden),
            truck_cost: Computed::from_parts(self.truck_cost, self.is_truck_cost_overridden),
            fuel_cost: Computed::from_parts(self.fuel_cost, self.is_fuel_cost_overridden),
            additional_services_cost: self.additional_services_cost,
            total_cost: Computed::from_parts(self.total_cost, self.is_total_cost_overridden),
        }
    }

    pub fn into_domain(
        self,
        stops: Vec<DomainStop>,
        line_items: Vec<DomainLineItem>,
    ) -> DomainEstimate {
        let figures = self.figures();
        DomainEstimate {
            id: self.id,
            hub_id: self.hub_id,
            customer_id: self.customer_id,
            method: parse_or_default(&self.method, self.id),
            status: parse_or_default(&self.status, self.id),
            move_type: parse_or_default(&self.move_type, self.id),
            move_service: parse_or_default(&self.move_service, self.id),
            move_date: self.move_date,
            notes: self.notes,
            figures,
            stops,
            line_items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Stored strings are written by this crate; a foreign value falls back to the default.
fn parse_or_default<T>(value: &str, estimate_id: i32) -> T
where
    T: std::str::FromStr<Err = crate::domain::UnknownVariant> + Default,
{
    value.parse().unwrap_or_else(|err| {
        warn!("estimate {estimate_id}: {err}, using default");
        T::default()
    })
}

impl<'a> From<&'a DomainNewEstimate> for NewEstimate<'a> {
    fn from(value: &'a DomainNewEstimate) -> Self {
        Self {
            hub_id: value.hub_id,
            customer_id: value.customer_id,
            method: value.method.as_str(),
            status: value.status.as_str(),
            move_type: value.move_type.as_str(),
            move_service: value.move_service.as_str(),
            move_date: value.move_date,
            notes: value.notes.as_deref(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainEstimate> for EstimateDetails<'a> {
    fn from(value: &'a DomainEstimate) -> Self {
        Self {
            customer_id: value.customer_id,
            method: value.method.as_str(),
            status: value.status.as_str(),
            move_type: value.move_type.as_str(),
            move_service: value.move_service.as_str(),
            move_date: value.move_date,
            notes: value.notes.as_deref(),
            updated_at: value.updated_at,
        }
    }
}

impl EstimateFigures {
    pub fn from_domain(value: &DomainEstimateFigures, updated_at: NaiveDateTime) -> Self {
        Self {
            total_weight: value.total_weight.value(),
            is_total_weight_overridden: value.total_weight.is_manual(),
            total_volume: value.total_volume.value(),
            is_total_volume_overridden: value.total_volume.is_manual(),
            estimated_hours: value.estimated_hours.value(),
            is_estimated_hours_overridden: value.estimated_hours.is_manual(),
            number_of_movers: value.number_of_movers.value(),
            is_number_of_movers_overridden: value.number_of_movers.is_manual(),
            number_of_trucks: value.number_of_trucks.value(),
            is_number_of_trucks_overridden: value.number_of_trucks.is_manual(),
            distance_miles: value.distance_miles.value(),
            is_distance_miles_overridden: value.distance_miles.is_manual(),
            depot_travel_time: value.depot_travel_time.value(),
            is_depot_travel_time_overridden: value.depot_travel_time.is_manual(),
            move_travel_time: value.move_travel_time.value(),
            is_move_travel_time_overridden: value.move_travel_time.is_manual(),
            total_move_time: value.total_move_time.value(),
            is_total_move_time_overridden: value.total_move_time.is_manual(),
            labor_cost: value.labor_cost.value(),
            is_labor_cost_overridden: value.labor_cost.is_manual(),
            truck_cost: value.truck_cost.value(),
            is_truck_cost_overridden: value.truck_cost.is_manual(),
            fuel_cost: value.fuel_cost.value(),
            is_fuel_cost_overridden: value.fuel_cost.is_manual(),
            additional_services_cost: value.additional_services_cost,
            total_cost: value.total_cost.value(),
            is_total_cost_overridden: value.total_cost.is_manual(),
            updated_at,
        }
    }
}
