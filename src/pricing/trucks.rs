use crate::domain::estimate::EstimateMethod;
use crate::domain::rates::{RateContext, Truck};
use crate::domain::round_cents;

/// Capacity assumed when the hub has no trucks configured.
pub const DEFAULT_TRUCK_CAPACITY_CF: f64 = 1250.0;
/// Fuel economy assumed when the hub has no trucks configured.
pub const DEFAULT_TRUCK_MPG: f64 = 8.0;

/// Truck with the largest cargo capacity.
pub fn largest_truck(rates: &RateContext) -> Option<&Truck> {
    rates
        .trucks
        .iter()
        .filter(|truck| truck.volume_cf > 0.0)
        .max_by(|a, b| a.volume_cf.total_cmp(&b.volume_cf))
}

pub fn truck_capacity(rates: &RateContext) -> f64 {
    largest_truck(rates)
        .map(|truck| truck.volume_cf)
        .unwrap_or(DEFAULT_TRUCK_CAPACITY_CF)
}

pub fn truck_mpg(rates: &RateContext) -> f64 {
    largest_truck(rates)
        .map(|truck| truck.mpg)
        .filter(|mpg| *mpg > 0.0)
        .unwrap_or(DEFAULT_TRUCK_MPG)
}

/// Trucks needed for `volume` cubic feet; at least one.
pub fn truck_count(method: EstimateMethod, volume: f64, rates: &RateContext) -> i32 {
    if !method.is_weight_driven() {
        return 1;
    }
    let trucks = (volume / truck_capacity(rates)).ceil() as i32;
    trucks.max(1)
}

/// Every truck is billed at the flat hub rate.
pub fn truck_cost(count: i32, truck_rate: f64) -> f64 {
    round_cents(f64::from(count) * truck_rate)
}
