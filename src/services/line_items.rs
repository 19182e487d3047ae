use log::info;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::estimate::Estimate;
use crate::domain::line_item::LineItem;
use crate::forms::line_items::{AddLineItemForm, EditLineItemForm};
use crate::repository::{EstimateReader, LineItemWriter};
use crate::services::locks::lock_estimate;
use crate::services::{ServiceError, ServiceResult};

/// Returns the cost rows of an estimate.
pub fn load_line_items<R>(
    repo: &R,
    user: &AuthenticatedUser,
    estimate_id: i32,
) -> ServiceResult<Vec<LineItem>>
where
    R: EstimateReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let estimate = repo
        .get_estimate_by_id(estimate_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    Ok(estimate.line_items)
}

/// Adds a manual `additional` row and refreshes the totals.
pub fn add_line_item<R>(
    repo: &R,
    user: &AuthenticatedUser,
    estimate_id: i32,
    form: AddLineItemForm,
) -> ServiceResult<Estimate>
where
    R: LineItemWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let new_item = form
        .into_new_line_item()
        .map_err(|err| ServiceError::Validation(err.to_string()))?;

    let _lock = lock_estimate(user.hub_id, estimate_id);
    let estimate = repo
        .create_line_item(estimate_id, user.hub_id, &new_item)
        .map_err(ServiceError::from)?;
    info!(
        "Added line item to estimate {} in hub {}",
        estimate_id, user.hub_id
    );
    Ok(estimate)
}

/// Generated rows are rewritten by every recalculation and cannot be edited.
fn ensure_manual<R>(
    repo: &R,
    user: &AuthenticatedUser,
    estimate_id: i32,
    line_item_id: i32,
) -> ServiceResult<()>
where
    R: EstimateReader + ?Sized,
{
    let estimate = repo
        .get_estimate_by_id(estimate_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let item = estimate
        .line_items
        .iter()
        .find(|item| item.id == line_item_id)
        .ok_or(ServiceError::NotFound)?;

    if item.kind.is_generated() {
        return Err(ServiceError::Validation(format!(
            "{} line items are generated by the calculator",
            item.kind.as_str()
        )));
    }
    Ok(())
}

/// Edits a manual row and refreshes the totals.
pub fn update_line_item<R>(
    repo: &R,
    user: &AuthenticatedUser,
    estimate_id: i32,
    line_item_id: i32,
    form: EditLineItemForm,
) -> ServiceResult<Estimate>
where
    R: EstimateReader + LineItemWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let update = form
        .into_update_line_item()
        .map_err(|err| ServiceError::Validation(err.to_string()))?;

    let _lock = lock_estimate(user.hub_id, estimate_id);
    ensure_manual(repo, user, estimate_id, line_item_id)?;

    let estimate = repo
        .update_line_item(line_item_id, estimate_id, user.hub_id, &update)
        .map_err(ServiceError::from)?;
    info!(
        "Updated line item {} of estimate {} in hub {}",
        line_item_id, estimate_id, user.hub_id
    );
    Ok(estimate)
}

/// Removes a manual row and refreshes the totals.
pub fn delete_line_item<R>(
    repo: &R,
    user: &AuthenticatedUser,
    estimate_id: i32,
    line_item_id: i32,
) -> ServiceResult<Estimate>
where
    R: EstimateReader + LineItemWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let _lock = lock_estimate(user.hub_id, estimate_id);
    ensure_manual(repo, user, estimate_id, line_item_id)?;

    let estimate = repo
        .delete_line_item(line_item_id, estimate_id, user.hub_id)
        .map_err(ServiceError::from)?;
    info!(
        "Deleted line item {} of estimate {} in hub {}",
        line_item_id, estimate_id, user.hub_id
    );
    Ok(estimate)
}

/// Resets the estimate total to the sum of its line items.
pub fn recompute_total<R>(
    repo: &R,
    user: &AuthenticatedUser,
    estimate_id: i32,
) -> ServiceResult<Estimate>
where
    R: LineItemWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let _lock = lock_estimate(user.hub_id, estimate_id);
    repo.recompute_total_from_line_items(estimate_id, user.hub_id)
        .map_err(ServiceError::from)
}
