//! Recalculation of an estimate: geo lookups, pricing and one atomic commit.

use log::{info, warn};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::estimate::{Estimate, EstimateCommit};
use crate::domain::stop::{Coordinates, Stop, StopChange, StopCoordinates};
use crate::geo::{GeoResolver, HubGeo, RouteMetrics};
use crate::pricing::travel::{LegKind, plan_legs};
use crate::pricing::{self, PricingError, PricingInput, Travel, TravelSummary};
use crate::repository::{EstimateReader, EstimateWriter, HubReader, RateReader, SizingReader};
use crate::sequencer;
use crate::services::locks::lock_estimate;
use crate::services::{ServiceError, ServiceResult};

/// Recalculate an estimate on behalf of an operator.
///
/// `full` geocodes stops that have no coordinates and looks the route up
/// again; otherwise the stored distance and travel times are kept.
pub fn calculate_estimate<R>(
    repo: &R,
    geo: Option<&dyn GeoResolver>,
    user: &AuthenticatedUser,
    estimate_id: i32,
    full: bool,
) -> ServiceResult<Estimate>
where
    R: EstimateReader + EstimateWriter + SizingReader + RateReader + HubReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let _lock = lock_estimate(user.hub_id, estimate_id);
    recalculate(repo, geo, user.hub_id, estimate_id, full, None)
}

/// Apply `change` to the stops, price the result and store everything at once.
///
/// Callers must hold the estimate lock. Geo failures only degrade the travel
/// figures; the stop change itself is validated before anything is written.
pub(crate) fn recalculate<R>(
    repo: &R,
    geo: Option<&dyn GeoResolver>,
    hub_id: i32,
    estimate_id: i32,
    full: bool,
    change: Option<StopChange>,
) -> ServiceResult<Estimate>
where
    R: EstimateReader + EstimateWriter + SizingReader + RateReader + HubReader + ?Sized,
{
    let estimate = repo
        .get_estimate_by_id(estimate_id, hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let settings = match (full, geo) {
        (true, Some(_)) => repo.get_hub_settings(hub_id).map_err(ServiceError::from)?,
        _ => None,
    };
    let hub_geo = if full {
        HubGeo::resolve(
            geo,
            settings
                .as_ref()
                .and_then(|settings| settings.google_maps_api_key.as_deref()),
        )
    } else {
        None
    };
    let resolver = hub_geo.as_ref().map(HubGeo::get);
    let change = match (change, resolver) {
        (Some(change), Some(geo)) => Some(locate_change(geo, &estimate.stops, change)),
        (change, _) => change,
    };

    let mut stops = estimate.stops.clone();
    if let Some(change) = &change {
        sequencer::apply_change(&mut stops, estimate_id, change)?;
    }

    let located = match resolver {
        Some(geo) => locate_stops(geo, &mut stops, edited_stop(change.as_ref())),
        None => Vec::new(),
    };

    let travel = match resolver {
        Some(geo) => route_travel(
            geo,
            hub_id,
            settings.as_ref().and_then(|settings| settings.depot),
            &stops,
        ),
        None if full => Travel::Unrouted,
        None => Travel::Stored,
    };

    let rates = repo.load_rate_context(hub_id).map_err(ServiceError::from)?;
    let sizing = repo
        .load_estimate_sizing(estimate_id, hub_id)
        .map_err(ServiceError::from)?;

    let priced = pricing::calculate(
        PricingInput {
            method: estimate.method,
            figures: estimate.figures,
            sizing: &sizing,
            manual_additional: estimate.manual_additional_total(),
            travel,
        },
        &rates,
    );

    // A stop edit is stored even when the estimate cannot be priced yet.
    let mut commit = match priced {
        Ok(calculation) => EstimateCommit::new(calculation.figures, calculation.line_items),
        Err(PricingError::InsufficientData(reason)) if change.is_some() => {
            info!("Estimate {estimate_id} of hub {hub_id} left unpriced after a stop edit: {reason}");
            EstimateCommit::unpriced(estimate.figures)
        }
        Err(err) => return Err(err.into()),
    }
    .with_located(located);
    if let Some(change) = change {
        commit = commit.with_stop_change(change);
    }

    let updated = repo
        .commit_estimate(estimate_id, hub_id, &commit)
        .map_err(ServiceError::from)?;

    info!(
        "Recalculated estimate {} of hub {} (full: {}, total: {:.2})",
        estimate_id,
        hub_id,
        full,
        updated.figures.total_cost.value()
    );

    Ok(updated)
}

fn geocode(geo: &dyn GeoResolver, address: &str) -> Option<Coordinates> {
    match geo.geocode(address) {
        Ok(coordinates) => Some(coordinates),
        Err(err) => {
            warn!("Failed to geocode `{address}`: {err}");
            None
        }
    }
}

/// Resolve the coordinates carried by an added or readdressed stop.
fn locate_change(geo: &dyn GeoResolver, stops: &[Stop], change: StopChange) -> StopChange {
    match change {
        StopChange::Add(mut new_stop) if new_stop.coordinates.is_none() => {
            new_stop.coordinates = geocode(geo, &new_stop.full_address());
            StopChange::Add(new_stop)
        }
        StopChange::Update {
            stop_id,
            mut updates,
        } if updates.changes_address() && updates.coordinates.is_none() => {
            if let Some(stored) = stops.iter().find(|stop| stop.id == stop_id) {
                let mut edited = stored.clone();
                updates.apply_to(&mut edited);
                if let Some(coordinates) = geocode(geo, &edited.full_address()) {
                    updates.coordinates = Some(Some(coordinates));
                }
            }
            StopChange::Update { stop_id, updates }
        }
        other => other,
    }
}

fn edited_stop(change: Option<&StopChange>) -> Option<i32> {
    match change {
        Some(StopChange::Update { stop_id, .. }) => Some(*stop_id),
        _ => None,
    }
}

/// Geocode stored stops that still lack coordinates.
fn locate_stops(
    geo: &dyn GeoResolver,
    stops: &mut [Stop],
    skip: Option<i32>,
) -> Vec<StopCoordinates> {
    let mut located = Vec::new();
    for stop in stops.iter_mut() {
        if stop.id == 0 || Some(stop.id) == skip || stop.coordinates().is_some() {
            continue;
        }
        if let Some(coordinates) = geocode(geo, &stop.full_address()) {
            stop.set_coordinates(Some(coordinates));
            located.push(StopCoordinates {
                stop_id: stop.id,
                coordinates,
            });
        }
    }
    located
}

fn route_travel(
    geo: &dyn GeoResolver,
    hub_id: i32,
    depot: Option<Coordinates>,
    stops: &[Stop],
) -> Travel {
    if depot.is_none() {
        warn!("Hub {hub_id} has no depot location, depot legs are skipped");
    }

    let resolved: Vec<(LegKind, RouteMetrics)> = plan_legs(depot, stops)
        .into_iter()
        .filter_map(|leg| match geo.route(&leg.waypoints) {
            Ok(metrics) => Some((leg.kind, metrics)),
            Err(err) => {
                warn!("Failed to route {:?} leg of hub {}: {}", leg.kind, hub_id, err);
                None
            }
        })
        .collect();

    if resolved.is_empty() {
        return Travel::Unrouted;
    }

    Travel::Routed(TravelSummary::from_legs(
        resolved.iter().map(|(kind, metrics)| (*kind, metrics)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{EstimateSizing, LoadLine};
    use crate::domain::estimate::{Computed, EstimateField, FigureEdit};
    use crate::domain::hub::HubSettings;
    use crate::domain::line_item::LineItemKind;
    use crate::domain::stop::{NewStop, StopKind, UpdateStop};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{
        HUB_ID, StubGeo, line_item, sample_estimate, sample_rates, stored_stop, user_with_roles,
    };

    fn inventory_sizing() -> EstimateSizing {
        EstimateSizing {
            inventory: vec![LoadLine {
                quantity: 1,
                weight_lbs: 4000.0,
                volume_cf: Some(600.0),
            }],
            ..EstimateSizing::default()
        }
    }

    /// Mock that serves `estimate` and echoes the committed figures back.
    fn repo_for(estimate: Estimate) -> MockRepository {
        let mut repo = MockRepository::new();
        let stored = estimate.clone();
        repo.expect_get_estimate_by_id()
            .returning(move |_, _| Ok(Some(stored.clone())));
        repo.expect_load_rate_context()
            .returning(|_| Ok(sample_rates()));
        repo.expect_load_estimate_sizing()
            .returning(|_, _| Ok(inventory_sizing()));
        repo.expect_commit_estimate()
            .returning(move |_, _, commit| {
                let mut updated = estimate.clone();
                updated.figures = commit.figures;
                Ok(updated)
            });
        repo
    }

    #[test]
    fn calculate_requires_service_role() {
        let repo = MockRepository::new();
        let user = user_with_roles(&[]);

        let result = calculate_estimate(&repo, None, &user, 1, false);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn missing_estimate_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_estimate_by_id()
            .returning(|_, _| Ok(None));
        repo.expect_commit_estimate().never();
        let user = user_with_roles(&["crm"]);

        let result = calculate_estimate(&repo, None, &user, 404, true);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn quick_recalculation_keeps_stored_travel() {
        let mut estimate = sample_estimate(10, Vec::new());
        estimate.figures.distance_miles = Computed::Auto(120.0);
        estimate.figures.move_travel_time = Computed::Auto(2.5);
        estimate.line_items = vec![line_item(1, 10, LineItemKind::Additional, 50.0)];

        let mut repo = repo_for(estimate);
        repo.expect_get_hub_settings().never();
        let user = user_with_roles(&["crm"]);

        let updated = calculate_estimate(&repo, None, &user, 10, false).unwrap();
        let figures = updated.figures;
        assert_eq!(figures.move_travel_time.value(), 2.5);
        assert_eq!(figures.fuel_cost.value(), 52.5);
        assert_eq!(figures.additional_services_cost, 50.0);
        assert_eq!(figures.total_cost.value(), 3195.0);
    }

    #[test]
    fn full_recalculation_without_resolver_uses_fallback_speed() {
        let mut estimate = sample_estimate(11, Vec::new());
        estimate.figures.distance_miles = Computed::Auto(90.0);
        estimate.figures.depot_travel_time = Computed::Auto(1.0);

        let repo = repo_for(estimate);
        let user = user_with_roles(&["crm"]);

        let figures = calculate_estimate(&repo, None, &user, 11, true)
            .unwrap()
            .figures;
        assert_eq!(figures.move_travel_time.value(), 3.0);
        assert_eq!(figures.depot_travel_time.value(), 0.0);
        assert_eq!(figures.total_move_time.value(), 26.75 + 3.0);
    }

    #[test]
    fn full_recalculation_geocodes_and_routes() {
        let origin = Coordinates::new(30.2, -97.7);
        let destination = Coordinates::new(29.7, -95.3);
        let estimate = sample_estimate(
            12,
            vec![
                stored_stop(1, 12, "78701", Some(origin)),
                stored_stop(2, 12, "77002", None),
            ],
        );

        let mut repo = MockRepository::new();
        let stored = estimate.clone();
        repo.expect_get_estimate_by_id()
            .returning(move |_, _| Ok(Some(stored.clone())));
        repo.expect_get_hub_settings().returning(|hub_id| {
            Ok(Some(HubSettings {
                depot: Some(Coordinates::new(30.0, -97.0)),
                ..HubSettings::defaults(hub_id)
            }))
        });
        repo.expect_load_rate_context()
            .returning(|_| Ok(sample_rates()));
        repo.expect_load_estimate_sizing()
            .returning(|_, _| Ok(inventory_sizing()));
        repo.expect_commit_estimate()
            .withf(move |id, hub_id, commit| {
                *id == 12
                    && *hub_id == HUB_ID
                    && commit.stop_change.is_none()
                    && commit.located
                        == vec![StopCoordinates {
                            stop_id: 2,
                            coordinates: destination,
                        }]
                    && commit.figures.distance_miles.value() == 180.0
                    && commit.figures.depot_travel_time.value() == 1.0
                    && commit.figures.move_travel_time.value() == 2.5
            })
            .returning(move |_, _, commit| {
                let mut updated = estimate.clone();
                updated.figures = commit.figures;
                Ok(updated)
            });

        let depot = Coordinates::new(30.0, -97.0);
        let geo = StubGeo::default()
            .with_place("77002", destination)
            .with_route(depot, 60.0, 0.5)
            .with_route(origin, 60.0, 2.5)
            .with_route(destination, 60.0, 0.5);
        let user = user_with_roles(&["crm"]);

        calculate_estimate(&repo, Some(&geo), &user, 12, true).unwrap();
    }

    #[test]
    fn failed_route_lookups_fall_back_to_unrouted() {
        let mut estimate = sample_estimate(
            13,
            vec![
                stored_stop(1, 13, "78701", Some(Coordinates::new(30.2, -97.7))),
                stored_stop(2, 13, "77002", Some(Coordinates::new(29.7, -95.3))),
            ],
        );
        estimate.figures.distance_miles = Computed::Auto(60.0);

        let mut repo = repo_for(estimate);
        repo.expect_get_hub_settings().returning(|_| Ok(None));
        let geo = StubGeo::default();
        let user = user_with_roles(&["crm"]);

        let figures = calculate_estimate(&repo, Some(&geo), &user, 13, true)
            .unwrap()
            .figures;
        assert_eq!(figures.distance_miles.value(), 60.0);
        assert_eq!(figures.move_travel_time.value(), 2.0);
        assert!(geo.geocoded.lock().unwrap().is_empty());
    }

    #[test]
    fn hub_key_serves_lookups_without_a_server_key() {
        let origin = Coordinates::new(30.2, -97.7);
        let estimate = sample_estimate(
            20,
            vec![
                stored_stop(1, 20, "78701", None),
                stored_stop(2, 20, "77002", Some(Coordinates::new(29.7, -95.3))),
            ],
        );

        let mut repo = repo_for(estimate);
        repo.expect_get_hub_settings().returning(|hub_id| {
            Ok(Some(HubSettings {
                google_maps_api_key: Some("hub-key".to_string()),
                ..HubSettings::defaults(hub_id)
            }))
        });
        let geo = StubGeo::unkeyed()
            .with_place("78701", origin)
            .with_route(origin, 160.0, 3.0);
        let user = user_with_roles(&["crm"]);

        let figures = calculate_estimate(&repo, Some(&geo), &user, 20, true)
            .unwrap()
            .figures;
        assert_eq!(figures.distance_miles.value(), 160.0);
        assert_eq!(figures.move_travel_time.value(), 3.0);
    }

    #[test]
    fn unkeyed_resolver_without_hub_key_stays_unrouted() {
        let mut estimate = sample_estimate(
            21,
            vec![
                stored_stop(1, 21, "78701", None),
                stored_stop(2, 21, "77002", None),
            ],
        );
        estimate.figures.distance_miles = Computed::Auto(90.0);

        let mut repo = repo_for(estimate);
        repo.expect_get_hub_settings().returning(|_| Ok(None));
        let geo = StubGeo::unkeyed().with_place("78701", Coordinates::new(30.2, -97.7));
        let user = user_with_roles(&["crm"]);

        let figures = calculate_estimate(&repo, Some(&geo), &user, 21, true)
            .unwrap()
            .figures;
        assert_eq!(figures.distance_miles.value(), 90.0);
        assert_eq!(figures.move_travel_time.value(), 3.0);
        assert!(geo.geocoded.lock().unwrap().is_empty());
    }

    #[test]
    fn added_stop_is_geocoded_before_commit() {
        let estimate = sample_estimate(
            14,
            vec![
                stored_stop(1, 14, "78701", None),
                stored_stop(2, 14, "77002", None),
            ],
        );
        let placed = Coordinates::new(30.5, -97.5);

        let mut repo = MockRepository::new();
        let stored = estimate.clone();
        repo.expect_get_estimate_by_id()
            .returning(move |_, _| Ok(Some(stored.clone())));
        repo.expect_load_rate_context()
            .returning(|_| Ok(sample_rates()));
        repo.expect_load_estimate_sizing()
            .returning(|_, _| Ok(inventory_sizing()));
        repo.expect_commit_estimate()
            .withf(move |_, _, commit| {
                matches!(
                    &commit.stop_change,
                    Some(StopChange::Add(stop)) if stop.coordinates == Some(placed)
                )
            })
            .returning(move |_, _, _| Ok(estimate.clone()));

        repo.expect_get_hub_settings().returning(|_| Ok(None));

        let geo = StubGeo::default().with_place("78660", placed);
        let change = StopChange::Add(NewStop::new("78660"));

        recalculate(&repo, Some(&geo), HUB_ID, 14, true, Some(change)).unwrap();
    }

    #[test]
    fn address_update_is_geocoded_once() {
        let estimate = sample_estimate(
            15,
            vec![
                stored_stop(1, 15, "78701", None),
                stored_stop(2, 15, "77002", None),
            ],
        );
        let moved = Coordinates::new(32.7, -96.8);

        let mut repo = repo_for(estimate);
        repo.expect_get_hub_settings().returning(|_| Ok(None));
        let geo = StubGeo::default().with_place("75201", moved);
        let change = StopChange::Update {
            stop_id: 2,
            updates: UpdateStop::new().zip("75201"),
        };

        recalculate(&repo, Some(&geo), HUB_ID, 15, true, Some(change)).unwrap();

        let geocoded = geo.geocoded.lock().unwrap();
        assert_eq!(geocoded.iter().filter(|a| a.ends_with("75201")).count(), 1);
        assert_eq!(geocoded.iter().filter(|a| a.ends_with("78701")).count(), 1);
    }

    #[test]
    fn unknown_stop_aborts_before_commit() {
        let estimate = sample_estimate(16, vec![stored_stop(1, 16, "78701", None)]);

        let mut repo = MockRepository::new();
        repo.expect_get_estimate_by_id()
            .returning(move |_, _| Ok(Some(estimate.clone())));
        repo.expect_commit_estimate().never();

        let result = recalculate(
            &repo,
            None,
            HUB_ID,
            16,
            false,
            Some(StopChange::Delete { stop_id: 99 }),
        );
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn hourly_without_hours_reports_insufficient_data() {
        let mut estimate = sample_estimate(17, Vec::new());
        estimate.method = crate::domain::estimate::EstimateMethod::Hourly;

        let mut repo = MockRepository::new();
        repo.expect_get_estimate_by_id()
            .returning(move |_, _| Ok(Some(estimate.clone())));
        repo.expect_load_rate_context()
            .returning(|_| Ok(sample_rates()));
        repo.expect_load_estimate_sizing()
            .returning(|_, _| Ok(EstimateSizing::default()));
        repo.expect_commit_estimate().never();

        let result = recalculate(&repo, None, HUB_ID, 17, false, None);
        assert!(matches!(result, Err(ServiceError::InsufficientData(_))));
    }

    #[test]
    fn pinned_total_reaches_the_commit() {
        let mut estimate = sample_estimate(18, Vec::new());
        estimate
            .figures
            .apply(EstimateField::TotalCost, FigureEdit::Pin(999.0));

        let repo = repo_for(estimate);
        let figures = recalculate(&repo, None, HUB_ID, 18, false, None)
            .unwrap()
            .figures;
        assert_eq!(figures.total_cost, Computed::Manual(999.0));
        assert_eq!(figures.labor_cost.value(), 2942.5);
    }

    #[test]
    fn stop_roles_follow_the_sequence() {
        let estimate = sample_estimate(
            19,
            vec![
                stored_stop(1, 19, "78701", None),
                stored_stop(2, 19, "77002", None),
            ],
        );
        assert_eq!(estimate.stops[0].kind, StopKind::Origin);
        assert_eq!(estimate.stops[1].kind, StopKind::Destination);
    }
}
