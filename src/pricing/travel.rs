//! Route legs of a move and the travel figures derived from them.

use crate::domain::stop::{Coordinates, Stop};
use crate::geo::RouteMetrics;

/// Average speed assumed when routes cannot be looked up.
pub const FALLBACK_SPEED_MPH: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegKind {
    /// Depot to the first stop.
    Outbound,
    /// First stop through every intermediate stop to the last one.
    Move,
    /// Last stop back to the depot.
    Return,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedLeg {
    pub kind: LegKind,
    pub waypoints: Vec<Coordinates>,
}

/// Legs of the journey over the stops that have coordinates, in sequence order.
///
/// Depot legs are planned only when the depot is known; the move leg only when
/// at least two stops are located.
pub fn plan_legs(depot: Option<Coordinates>, stops: &[Stop]) -> Vec<PlannedLeg> {
    let mut ordered: Vec<&Stop> = stops.iter().collect();
    ordered.sort_by_key(|stop| stop.sequence);
    let located: Vec<Coordinates> = ordered.iter().filter_map(|stop| stop.coordinates()).collect();

    let (Some(first), Some(last)) = (located.first().copied(), located.last().copied()) else {
        return Vec::new();
    };

    let mut legs = Vec::with_capacity(3);
    if let Some(depot) = depot {
        legs.push(PlannedLeg {
            kind: LegKind::Outbound,
            waypoints: vec![depot, first],
        });
    }
    if located.len() >= 2 {
        legs.push(PlannedLeg {
            kind: LegKind::Move,
            waypoints: located,
        });
    }
    if let Some(depot) = depot {
        legs.push(PlannedLeg {
            kind: LegKind::Return,
            waypoints: vec![last, depot],
        });
    }
    legs
}

/// Travel figures from looked-up legs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TravelSummary {
    pub distance_miles: f64,
    /// Hours of the outbound and return legs.
    pub depot_hours: f64,
    /// Hours of the move leg.
    pub move_hours: f64,
}

impl TravelSummary {
    /// Add the metrics of every successfully resolved leg.
    pub fn from_legs<'a>(legs: impl IntoIterator<Item = (LegKind, &'a RouteMetrics)>) -> Self {
        let mut summary = Self::default();
        for (kind, metrics) in legs {
            summary.distance_miles += metrics.distance_miles;
            match kind {
                LegKind::Move => summary.move_hours += metrics.duration_hours,
                LegKind::Outbound | LegKind::Return => {
                    summary.depot_hours += metrics.duration_hours
                }
            }
        }
        summary
    }
}

/// Where travel figures come from in a calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Travel {
    /// Keep the distance and travel times already stored on the estimate.
    Stored,
    /// Use looked-up routes.
    Routed(TravelSummary),
    /// No route lookups available: keep the distance, derive move time from
    /// the fallback speed and drop the depot time.
    Unrouted,
}

pub fn fallback_move_hours(distance_miles: f64) -> f64 {
    distance_miles / FALLBACK_SPEED_MPH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stop::NewStop;

    fn stop(sequence: i32, coordinates: Option<(f64, f64)>) -> Stop {
        let mut stop = Stop::pending(1, &NewStop::new("78701"));
        stop.id = sequence;
        stop.sequence = sequence;
        stop.set_coordinates(coordinates.map(|(lat, lng)| Coordinates::new(lat, lng)));
        stop
    }

    #[test]
    fn full_route_has_three_legs() {
        let depot = Coordinates::new(0.0, 0.0);
        let stops = vec![
            stop(3, Some((3.0, 3.0))),
            stop(1, Some((1.0, 1.0))),
            stop(2, Some((2.0, 2.0))),
        ];
        let legs = plan_legs(Some(depot), &stops);
        assert_eq!(legs.len(), 3);
        assert_eq!(legs[0].waypoints, vec![depot, Coordinates::new(1.0, 1.0)]);
        assert_eq!(legs[1].kind, LegKind::Move);
        assert_eq!(legs[1].waypoints.len(), 3);
        assert_eq!(legs[2].waypoints, vec![Coordinates::new(3.0, 3.0), depot]);
    }

    #[test]
    fn unlocated_stops_are_skipped() {
        let stops = vec![stop(1, Some((1.0, 1.0))), stop(2, None)];
        let legs = plan_legs(None, &stops);
        assert!(legs.is_empty());

        let legs = plan_legs(Some(Coordinates::new(0.0, 0.0)), &stops);
        let kinds: Vec<LegKind> = legs.iter().map(|leg| leg.kind).collect();
        assert_eq!(kinds, vec![LegKind::Outbound, LegKind::Return]);
    }

    #[test]
    fn summary_splits_depot_and_move_time() {
        let outbound = RouteMetrics {
            distance_miles: 10.0,
            duration_hours: 0.5,
        };
        let moving = RouteMetrics {
            distance_miles: 30.0,
            duration_hours: 1.0,
        };
        let summary = TravelSummary::from_legs([
            (LegKind::Outbound, &outbound),
            (LegKind::Move, &moving),
            (LegKind::Return, &outbound),
        ]);
        assert_eq!(summary.distance_miles, 50.0);
        assert_eq!(summary.depot_hours, 1.0);
        assert_eq!(summary.move_hours, 1.0);
    }
}
