use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::rates::{
    AdditionalService as DomainAdditionalService, FuelPriceTier as DomainFuelPriceTier,
    MoverAssignmentRule as DomainMoverAssignmentRule, MoverTeam as DomainMoverTeam,
    NewAdditionalService as DomainNewAdditionalService,
    NewFuelPriceTier as DomainNewFuelPriceTier,
    NewMoverAssignmentRule as DomainNewMoverAssignmentRule,
    NewMoverTeam as DomainNewMoverTeam, NewTruck as DomainNewTruck, Truck as DomainTruck,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::mover_teams)]
pub struct MoverTeam {
    pub id: i32,
    pub hub_id: i32,
    pub number_of_movers: i32,
    pub lbs_per_hour: f64,
    pub price_per_hour: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Used both to insert a tier and to rewrite its columns.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::mover_teams)]
pub struct NewMoverTeam {
    pub hub_id: i32,
    pub number_of_movers: i32,
    pub lbs_per_hour: f64,
    pub price_per_hour: f64,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::mover_assignment_rules)]
pub struct MoverAssignmentRule {
    pub id: i32,
    pub hub_id: i32,
    pub hours_min: f64,
    pub hours_max: Option<f64>,
    pub number_of_movers: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::mover_assignment_rules, treat_none_as_null = true)]
pub struct NewMoverAssignmentRule {
    pub hub_id: i32,
    pub hours_min: f64,
    pub hours_max: Option<f64>,
    pub number_of_movers: i32,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::trucks)]
pub struct Truck {
    pub id: i32,
    pub hub_id: i32,
    pub unit_number: String,
    pub length_ft: i32,
    pub volume_cf: f64,
    pub mpg: f64,
    pub has_lift_gate: bool,
    pub has_ramp: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::trucks)]
pub struct NewTruck<'a> {
    pub hub_id: i32,
    pub unit_number: &'a str,
    pub length_ft: i32,
    pub volume_cf: f64,
    pub mpg: f64,
    pub has_lift_gate: bool,
    pub has_ramp: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::fuel_price_tiers)]
pub struct FuelPriceTier {
    pub id: i32,
    pub hub_id: i32,
    pub miles_min: f64,
    pub miles_max: Option<f64>,
    pub price_per_gallon: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::fuel_price_tiers, treat_none_as_null = true)]
pub struct NewFuelPriceTier {
    pub hub_id: i32,
    pub miles_min: f64,
    pub miles_max: Option<f64>,
    pub price_per_gallon: f64,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::additional_services)]
pub struct AdditionalService {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub price: f64,
    pub movers_required: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::additional_services)]
pub struct NewAdditionalService<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub price: f64,
    pub movers_required: i32,
    pub updated_at: NaiveDateTime,
}

fn now() -> NaiveDateTime {
    chrono::Local::now().naive_utc()
}

impl From<MoverTeam> for DomainMoverTeam {
    fn from(value: MoverTeam) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            number_of_movers: value.number_of_movers,
            lbs_per_hour: value.lbs_per_hour,
            price_per_hour: value.price_per_hour,
        }
    }
}

impl From<&DomainNewMoverTeam> for NewMoverTeam {
    fn from(value: &DomainNewMoverTeam) -> Self {
        Self {
            hub_id: value.hub_id,
            number_of_movers: value.number_of_movers,
            lbs_per_hour: value.lbs_per_hour,
            price_per_hour: value.price_per_hour,
            updated_at: now(),
        }
    }
}

impl From<MoverAssignmentRule> for DomainMoverAssignmentRule {
    fn from(value: MoverAssignmentRule) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            hours_min: value.hours_min,
            hours_max: value.hours_max,
            number_of_movers: value.number_of_movers,
        }
    }
}

impl From<&DomainNewMoverAssignmentRule> for NewMoverAssignmentRule {
    fn from(value: &DomainNewMoverAssignmentRule) -> Self {
        Self {
            hub_id: value.hub_id,
            hours_min: value.hours_min,
            hours_max: value.hours_max,
            number_of_movers: value.number_of_movers,
            updated_at: now(),
        }
    }
}

impl From<Truck> for DomainTruck {
    fn from(value: Truck) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            unit_number: value.unit_number,
            length_ft: value.length_ft,
            volume_cf: value.volume_cf,
            mpg: value.mpg,
            has_lift_gate: value.has_lift_gate,
            has_ramp: value.has_ramp,
        }
    }
}

impl<'a> From<&'a DomainNewTruck> for NewTruck<'a> {
    fn from(value: &'a DomainNewTruck) -> Self {
        Self {
            hub_id: value.hub_id,
            unit_number: value.unit_number.as_str(),
            length_ft: value.length_ft,
            volume_cf: value.volume_cf,
            mpg: value.mpg,
            has_lift_gate: value.has_lift_gate,
            has_ramp: value.has_ramp,
            updated_at: now(),
        }
    }
}

impl From<FuelPriceTier> for DomainFuelPriceTier {
    fn from(value: FuelPriceTier) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            miles_min: value.miles_min,
            miles_max: value.miles_max,
            price_per_gallon: value.price_per_gallon,
        }
    }
}

impl From<&DomainNewFuelPriceTier> for NewFuelPriceTier {
    fn from(value: &DomainNewFuelPriceTier) -> Self {
        Self {
            hub_id: value.hub_id,
            miles_min: value.miles_min,
            miles_max: value.miles_max,
            price_per_gallon: value.price_per_gallon,
            updated_at: now(),
        }
    }
}

impl From<AdditionalService> for DomainAdditionalService {
    fn from(value: AdditionalService) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            name: value.name,
            price: value.price,
            movers_required: value.movers_required,
        }
    }
}

impl<'a> From<&'a DomainNewAdditionalService> for NewAdditionalService<'a> {
    fn from(value: &'a DomainNewAdditionalService) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.as_str(),
            price: value.price,
            movers_required: value.movers_required,
            updated_at: now(),
        }
    }
}
