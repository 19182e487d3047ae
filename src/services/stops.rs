//! Stop edits. Every edit reprices the estimate with fresh route lookups and
//! is stored together with the new figures. An estimate that cannot be priced
//! yet keeps its figures and still takes the edit.

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::estimate::Estimate;
use crate::domain::stop::StopChange;
use crate::forms::stops::{AddStopForm, EditStopForm, ReorderStopsForm};
use crate::geo::GeoResolver;
use crate::repository::{EstimateReader, EstimateWriter, HubReader, RateReader, SizingReader};
use crate::services::calculation::recalculate;
use crate::services::locks::lock_estimate;
use crate::services::{ServiceError, ServiceResult};

fn apply_stop_change<R>(
    repo: &R,
    geo: Option<&dyn GeoResolver>,
    user: &AuthenticatedUser,
    estimate_id: i32,
    change: StopChange,
) -> ServiceResult<Estimate>
where
    R: EstimateReader + EstimateWriter + SizingReader + RateReader + HubReader + ?Sized,
{
    let _lock = lock_estimate(user.hub_id, estimate_id);
    recalculate(repo, geo, user.hub_id, estimate_id, true, Some(change))
}

/// Replaces the order of the stops with the submitted permutation.
pub fn reorder_stops<R>(
    repo: &R,
    geo: Option<&dyn GeoResolver>,
    user: &AuthenticatedUser,
    estimate_id: i32,
    form: ReorderStopsForm,
) -> ServiceResult<Estimate>
where
    R: EstimateReader + EstimateWriter + SizingReader + RateReader + HubReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let stop_ids = form
        .into_stop_ids()
        .map_err(|err| ServiceError::Validation(err.to_string()))?;

    apply_stop_change(repo, geo, user, estimate_id, StopChange::Reorder { stop_ids })
}

/// Inserts a stop before the destination.
pub fn add_stop<R>(
    repo: &R,
    geo: Option<&dyn GeoResolver>,
    user: &AuthenticatedUser,
    estimate_id: i32,
    form: AddStopForm,
) -> ServiceResult<Estimate>
where
    R: EstimateReader + EstimateWriter + SizingReader + RateReader + HubReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let new_stop = form
        .into_new_stop()
        .map_err(|err| ServiceError::Validation(err.to_string()))?;

    apply_stop_change(repo, geo, user, estimate_id, StopChange::Add(new_stop))
}

/// Edits the address or access details of a stop.
pub fn update_stop<R>(
    repo: &R,
    geo: Option<&dyn GeoResolver>,
    user: &AuthenticatedUser,
    estimate_id: i32,
    stop_id: i32,
    form: EditStopForm,
) -> ServiceResult<Estimate>
where
    R: EstimateReader + EstimateWriter + SizingReader + RateReader + HubReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let updates = form
        .into_update_stop()
        .map_err(|err| ServiceError::Validation(err.to_string()))?;

    apply_stop_change(
        repo,
        geo,
        user,
        estimate_id,
        StopChange::Update { stop_id, updates },
    )
}

/// Removes a stop; the stops behind it move up and take over its role.
pub fn delete_stop<R>(
    repo: &R,
    geo: Option<&dyn GeoResolver>,
    user: &AuthenticatedUser,
    estimate_id: i32,
    stop_id: i32,
) -> ServiceResult<Estimate>
where
    R: EstimateReader + EstimateWriter + SizingReader + RateReader + HubReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    apply_stop_change(repo, geo, user, estimate_id, StopChange::Delete { stop_id })
}
