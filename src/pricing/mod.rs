//! Estimate pricing: weight to hours to crew to cost.
//!
//! Everything here is pure. Rate tables arrive as a [`RateContext`], travel
//! figures as a [`Travel`] value; the result is the new set of figures and the
//! generated line items. Pinned figures are never changed.

use thiserror::Error;

use crate::domain::catalog::{EstimateSizing, LoadLine};
use crate::domain::estimate::{EstimateFigures, EstimateMethod};
use crate::domain::line_item::{LineItemKind, NewLineItem};
use crate::domain::rates::RateContext;
use crate::domain::round_cents;

pub mod crew;
pub mod fuel;
pub mod travel;
pub mod trucks;

use crew::{CrewPlan, CrewRequest, plan_crew};
use fuel::{FuelQuote, quote_fuel};
pub use travel::{Travel, TravelSummary};

/// Density used when only the weight of a load is known.
pub const LBS_PER_CUBIC_FOOT: f64 = 7.0;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PricingError {
    #[error("insufficient data: {0}")]
    InsufficientData(String),
}

/// Everything a calculation reads besides the rate tables.
#[derive(Debug, Clone)]
pub struct PricingInput<'a> {
    pub method: EstimateMethod,
    /// Figures currently stored on the estimate.
    pub figures: EstimateFigures,
    pub sizing: &'a EstimateSizing,
    /// Sum of the manual `additional` line items.
    pub manual_additional: f64,
    pub travel: Travel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub figures: EstimateFigures,
    /// Replacement for every generated line item.
    pub line_items: Vec<NewLineItem>,
    pub crew: CrewPlan,
    pub fuel: FuelQuote,
}

/// Total weight and volume of a set of load lines.
pub fn load_totals(lines: &[LoadLine]) -> (f64, f64) {
    lines.iter().fold((0.0, 0.0), |(weight, volume), line| {
        let quantity = f64::from(line.quantity);
        let line_volume = line
            .volume_cf
            .unwrap_or(line.weight_lbs / LBS_PER_CUBIC_FOOT);
        (
            weight + quantity * line.weight_lbs,
            volume + quantity * line_volume,
        )
    })
}

/// Run the pricing pipeline over `input`.
pub fn calculate(input: PricingInput<'_>, rates: &RateContext) -> Result<Calculation, PricingError> {
    let current = input.figures;
    let method = input.method;

    let (weight, volume) = match method {
        EstimateMethod::Inventory => load_totals(&input.sizing.inventory),
        EstimateMethod::Size => load_totals(&input.sizing.residence_sizes),
        EstimateMethod::Hourly => (current.total_weight.value(), current.total_volume.value()),
    };
    let total_weight = current.total_weight.recompute(|| weight);
    let total_volume = current.total_volume.recompute(|| {
        if volume > 0.0 {
            volume
        } else {
            total_weight.value() / LBS_PER_CUBIC_FOOT
        }
    });

    let required_movers = input
        .sizing
        .services
        .iter()
        .map(|service| service.movers_required)
        .max()
        .unwrap_or(0);
    let crew = plan_crew(
        &CrewRequest {
            method,
            weight: total_weight.value(),
            hours: current.estimated_hours,
            movers: current.number_of_movers,
            required_movers,
        },
        rates,
    )?;

    let estimated_hours = current.estimated_hours.recompute(|| crew.estimated_hours);
    let number_of_movers = current.number_of_movers.recompute(|| crew.number_of_movers);
    let labor_cost = current
        .labor_cost
        .recompute(|| round_cents(estimated_hours.value() * crew.team.price_per_hour));

    let number_of_trucks = current
        .number_of_trucks
        .recompute(|| trucks::truck_count(method, total_volume.value(), rates));
    let truck_cost = current
        .truck_cost
        .recompute(|| trucks::truck_cost(number_of_trucks.value(), rates.truck_rate));

    let (distance_miles, depot_travel_time, move_travel_time) = match input.travel {
        Travel::Stored => (
            current.distance_miles,
            current.depot_travel_time,
            current.move_travel_time,
        ),
        Travel::Routed(summary) => (
            current.distance_miles.recompute(|| summary.distance_miles),
            current.depot_travel_time.recompute(|| summary.depot_hours),
            current.move_travel_time.recompute(|| summary.move_hours),
        ),
        Travel::Unrouted => {
            let distance = current.distance_miles;
            (
                distance,
                current.depot_travel_time.recompute(|| 0.0),
                current
                    .move_travel_time
                    .recompute(|| travel::fallback_move_hours(distance.value())),
            )
        }
    };
    let total_move_time = current.total_move_time.recompute(|| {
        estimated_hours.value() + depot_travel_time.value() + move_travel_time.value()
    });

    let fuel = quote_fuel(distance_miles.value(), rates);
    let fuel_cost = current.fuel_cost.recompute(|| fuel.cost);

    let service_items: Vec<NewLineItem> = input
        .sizing
        .services
        .iter()
        .map(|service| {
            NewLineItem::new(LineItemKind::Service, f64::from(service.quantity), service.price)
                .with_description(service.name.as_str())
        })
        .collect();
    let services_total: f64 = service_items.iter().map(|item| item.total_cost).sum();
    let additional_services_cost = round_cents(services_total + input.manual_additional);

    let total_cost = current.total_cost.recompute(|| {
        round_cents(
            labor_cost.value() + truck_cost.value() + fuel_cost.value() + additional_services_cost,
        )
    });

    let figures = EstimateFigures {
        total_weight,
        total_volume,
        estimated_hours,
        number_of_movers,
        number_of_trucks,
        distance_miles,
        depot_travel_time,
        move_travel_time,
        total_move_time,
        labor_cost,
        truck_cost,
        fuel_cost,
        additional_services_cost,
        total_cost,
    };

    let mut line_items = generated_line_items(&figures, &crew, &fuel, rates.truck_rate);
    line_items.extend(service_items);

    Ok(Calculation {
        figures,
        line_items,
        crew,
        fuel,
    })
}

/// Price per unit of a row whose total may have been pinned.
fn unit_price(total: f64, quantity: f64, rate: f64, pinned: bool) -> f64 {
    if pinned && quantity > 0.0 {
        round_cents(total / quantity)
    } else {
        rate
    }
}

/// Labor, truck and fuel rows matching the final figures.
fn generated_line_items(
    figures: &EstimateFigures,
    crew: &CrewPlan,
    fuel: &FuelQuote,
    truck_rate: f64,
) -> Vec<NewLineItem> {
    let mut items = Vec::with_capacity(3);

    let hours = figures.estimated_hours.value();
    let movers = figures.number_of_movers.value();
    let labor = figures.labor_cost;
    items.push(
        NewLineItem::new(
            LineItemKind::Labor,
            hours,
            unit_price(labor.value(), hours, crew.team.price_per_hour, labor.is_manual()),
        )
        .with_description(format!("{movers} movers, {hours} hours"))
        .with_total(labor.value()),
    );

    let trucks = f64::from(figures.number_of_trucks.value());
    let truck_cost = figures.truck_cost;
    items.push(
        NewLineItem::new(
            LineItemKind::Truck,
            trucks,
            unit_price(truck_cost.value(), trucks, truck_rate, truck_cost.is_manual()),
        )
        .with_description(format!("{trucks} truck(s)"))
        .with_total(truck_cost.value()),
    );

    let fuel_cost = figures.fuel_cost;
    if fuel_cost.value() > 0.0 {
        let gallons = if fuel.gallons > 0.0 {
            round_cents(fuel.gallons)
        } else {
            1.0
        };
        let rate = fuel.price_per_gallon.unwrap_or(fuel_cost.value() / gallons);
        items.push(
            NewLineItem::new(
                LineItemKind::Fuel,
                gallons,
                unit_price(fuel_cost.value(), gallons, rate, fuel_cost.is_manual()),
            )
            .with_description(format!(
                "Fuel for {:.1} miles",
                figures.distance_miles.value()
            ))
            .with_total(fuel_cost.value()),
        );
    }

    items
}
