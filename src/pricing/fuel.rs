use crate::domain::rates::{FuelPriceTier, RateContext};
use crate::domain::round_cents;
use crate::pricing::trucks::truck_mpg;

/// Fuel needed for a trip and its price.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FuelQuote {
    pub gallons: f64,
    /// Price of the matching tier; `None` when no tier covers the distance.
    pub price_per_gallon: Option<f64>,
    pub cost: f64,
}

/// Tier whose `[miles_min, miles_max)` range covers `miles`.
pub fn tier_for(miles: f64, tiers: &[FuelPriceTier]) -> Option<&FuelPriceTier> {
    tiers.iter().find(|tier| tier.contains(miles))
}

pub fn quote_fuel(distance_miles: f64, rates: &RateContext) -> FuelQuote {
    let gallons = distance_miles / truck_mpg(rates);
    let price_per_gallon = tier_for(distance_miles, &rates.fuel_tiers).map(|tier| tier.price_per_gallon);
    let cost = price_per_gallon
        .map(|price| round_cents(gallons * price))
        .unwrap_or(0.0);
    FuelQuote {
        gallons,
        price_per_gallon,
        cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rates::Truck;

    fn tier(miles_min: f64, miles_max: Option<f64>, price_per_gallon: f64) -> FuelPriceTier {
        FuelPriceTier {
            id: 1,
            hub_id: 1,
            miles_min,
            miles_max,
            price_per_gallon,
        }
    }

    fn rates(tiers: Vec<FuelPriceTier>) -> RateContext {
        RateContext {
            mover_teams: Vec::new(),
            assignment_rules: Vec::new(),
            trucks: vec![Truck {
                id: 1,
                hub_id: 1,
                unit_number: "26".to_string(),
                length_ft: 26,
                volume_cf: 1600.0,
                mpg: 8.0,
                has_lift_gate: true,
                has_ramp: false,
            }],
            fuel_tiers: tiers,
            additional_services: Vec::new(),
            truck_rate: 150.0,
        }
    }

    #[test]
    fn long_trip_uses_unbounded_tier() {
        let rates = rates(vec![tier(0.0, Some(100.0), 3.0), tier(100.0, None, 3.5)]);
        let quote = quote_fuel(120.0, &rates);
        assert_eq!(quote.gallons, 15.0);
        assert_eq!(quote.price_per_gallon, Some(3.5));
        assert_eq!(quote.cost, 52.5);
    }

    #[test]
    fn upper_bound_is_exclusive() {
        let rates = rates(vec![tier(0.0, Some(100.0), 3.0), tier(100.0, None, 3.5)]);
        assert_eq!(quote_fuel(100.0, &rates).price_per_gallon, Some(3.5));
        assert_eq!(quote_fuel(99.0, &rates).price_per_gallon, Some(3.0));
    }

    #[test]
    fn uncovered_distance_costs_nothing() {
        let rates = rates(vec![tier(10.0, Some(100.0), 3.0)]);
        let quote = quote_fuel(5.0, &rates);
        assert_eq!(quote.price_per_gallon, None);
        assert_eq!(quote.cost, 0.0);
    }
}
