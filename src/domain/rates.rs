use serde::{Deserialize, Serialize};

/// Crew tier: how fast a crew of a given size moves weight and what it costs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoverTeam {
    /// Unique identifier of the tier.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Crew size.
    pub number_of_movers: i32,
    /// Pounds the crew moves per hour.
    pub lbs_per_hour: f64,
    /// Hourly rate billed for the whole crew.
    pub price_per_hour: f64,
}

/// Payload used to create or replace a crew tier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMoverTeam {
    pub hub_id: i32,
    pub number_of_movers: i32,
    pub lbs_per_hour: f64,
    pub price_per_hour: f64,
}

/// Recommends a crew size for a range of labor hours.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoverAssignmentRule {
    /// Unique identifier of the rule.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Exclusive lower bound in hours.
    pub hours_min: f64,
    /// Inclusive upper bound in hours; `None` means unbounded.
    pub hours_max: Option<f64>,
    /// Recommended crew size.
    pub number_of_movers: i32,
}

impl MoverAssignmentRule {
    /// Whether `hours` falls inside `(hours_min, hours_max]`.
    pub fn contains(&self, hours: f64) -> bool {
        hours > self.hours_min && self.hours_max.is_none_or(|max| hours <= max)
    }

    /// Whether two half-open ranges share at least one point.
    pub fn overlaps(&self, hours_min: f64, hours_max: Option<f64>) -> bool {
        ranges_overlap(self.hours_min, self.hours_max, hours_min, hours_max)
    }
}

/// Payload used to create or replace an assignment rule.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMoverAssignmentRule {
    pub hub_id: i32,
    pub hours_min: f64,
    pub hours_max: Option<f64>,
    pub number_of_movers: i32,
}

/// A truck of the fleet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Truck {
    /// Unique identifier of the truck.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Fleet number painted on the truck.
    pub unit_number: String,
    pub length_ft: i32,
    /// Cargo capacity in cubic feet.
    pub volume_cf: f64,
    /// Fuel economy in miles per gallon.
    pub mpg: f64,
    pub has_lift_gate: bool,
    pub has_ramp: bool,
}

/// Payload used to create or replace a truck.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTruck {
    pub hub_id: i32,
    pub unit_number: String,
    pub length_ft: i32,
    pub volume_cf: f64,
    pub mpg: f64,
    pub has_lift_gate: bool,
    pub has_ramp: bool,
}

/// Fuel price for a band of trip distances.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuelPriceTier {
    /// Unique identifier of the tier.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Inclusive lower bound in miles.
    pub miles_min: f64,
    /// Exclusive upper bound in miles; `None` means unbounded.
    pub miles_max: Option<f64>,
    pub price_per_gallon: f64,
}

impl FuelPriceTier {
    /// Whether `miles` falls inside `[miles_min, miles_max)`.
    pub fn contains(&self, miles: f64) -> bool {
        miles >= self.miles_min && self.miles_max.is_none_or(|max| miles < max)
    }

    pub fn overlaps(&self, miles_min: f64, miles_max: Option<f64>) -> bool {
        ranges_overlap(self.miles_min, self.miles_max, miles_min, miles_max)
    }
}

/// Payload used to create or replace a fuel tier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFuelPriceTier {
    pub hub_id: i32,
    pub miles_min: f64,
    pub miles_max: Option<f64>,
    pub price_per_gallon: f64,
}

/// Optional service such as piano handling or packing materials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdditionalService {
    /// Unique identifier of the service.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    pub name: String,
    /// Price per unit.
    pub price: f64,
    /// Minimum crew size the service needs; zero when it needs none.
    pub movers_required: i32,
}

/// Payload used to create or replace an additional service.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAdditionalService {
    pub hub_id: i32,
    pub name: String,
    pub price: f64,
    pub movers_required: i32,
}

impl NewAdditionalService {
    pub fn new(hub_id: i32, name: impl Into<String>, price: f64) -> Self {
        Self {
            hub_id,
            name: name.into().trim().to_string(),
            price,
            movers_required: 0,
        }
    }

    pub fn with_movers_required(mut self, movers_required: i32) -> Self {
        self.movers_required = movers_required;
        self
    }
}

/// Every rate table of a hub, loaded once per calculation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateContext {
    pub mover_teams: Vec<MoverTeam>,
    /// Rules ordered by `hours_min`.
    pub assignment_rules: Vec<MoverAssignmentRule>,
    pub trucks: Vec<Truck>,
    /// Tiers ordered by `miles_min`.
    pub fuel_tiers: Vec<FuelPriceTier>,
    pub additional_services: Vec<AdditionalService>,
    /// Flat fee billed per truck.
    pub truck_rate: f64,
}

/// Two intervals with an optional upper bound share at least one point.
///
/// Touching bounds do not count, so `(0, 6]` and `(6, 10]` are disjoint and
/// so are `[0, 100)` and `[100, ∞)`.
fn ranges_overlap(a_min: f64, a_max: Option<f64>, b_min: f64, b_max: Option<f64>) -> bool {
    let a_below_b = a_max.is_some_and(|max| max <= b_min);
    let b_below_a = b_max.is_some_and(|max| max <= a_min);
    !(a_below_b || b_below_a)
}
