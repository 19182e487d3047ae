use log::info;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::check_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::catalog::EstimateSizing;
use crate::domain::estimate::Estimate;
use crate::forms::estimates::{
    AddEstimateForm, AssignmentsForm, EditEstimateForm, EstimateListParams,
};
use crate::geo::GeoResolver;
use crate::repository::{
    CustomerReader, EstimateReader, EstimateWriter, HubReader, RateReader, SizingReader,
    SizingWriter,
};
use crate::services::calculation::recalculate;
use crate::services::locks::lock_estimate;
use crate::services::{ServiceError, ServiceResult};

/// Catalog selection replaced by [`replace_sizing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingKind {
    Inventory,
    ResidenceSizes,
    AdditionalServices,
}

/// Lists estimates of the user's hub, newest first.
pub fn load_estimates<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: EstimateListParams,
) -> ServiceResult<Paginated<Estimate>>
where
    R: EstimateReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let query = params
        .into_query(user.hub_id)
        .map_err(|err| ServiceError::Validation(err.to_string()))?;
    let page = query
        .pagination
        .as_ref()
        .map(|pagination| pagination.page)
        .unwrap_or(1);

    let (total, estimates) = repo.list_estimates(query).map_err(ServiceError::from)?;
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(Paginated::new(estimates, page, total_pages))
}

/// Loads one estimate with its stops and line items.
pub fn load_estimate<R>(
    repo: &R,
    user: &AuthenticatedUser,
    estimate_id: i32,
) -> ServiceResult<Estimate>
where
    R: EstimateReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.get_estimate_by_id(estimate_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Loads the catalog selections of an estimate.
pub fn load_estimate_sizing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    estimate_id: i32,
) -> ServiceResult<EstimateSizing>
where
    R: EstimateReader + SizingReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.get_estimate_by_id(estimate_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    repo.load_estimate_sizing(estimate_id, user.hub_id)
        .map_err(ServiceError::from)
}

/// Creates an estimate and prices it right away.
///
/// A pricing failure (for instance an hourly estimate without hours) keeps
/// the stored estimate and returns it unpriced.
pub fn create_estimate<R>(
    repo: &R,
    geo: Option<&dyn GeoResolver>,
    user: &AuthenticatedUser,
    form: AddEstimateForm,
) -> ServiceResult<Estimate>
where
    R: EstimateReader
        + EstimateWriter
        + SizingReader
        + RateReader
        + HubReader
        + CustomerReader
        + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let new_estimate = form
        .into_new_estimate(user.hub_id)
        .map_err(|err| ServiceError::Validation(err.to_string()))?;
    ensure_hub_customer(repo, new_estimate.customer_id, user.hub_id)?;

    let created = repo
        .create_estimate(&new_estimate)
        .map_err(ServiceError::from)?;
    info!("Created estimate {} in hub {}", created.id, user.hub_id);

    let _lock = lock_estimate(user.hub_id, created.id);
    let priced = recalculate(repo, geo, user.hub_id, created.id, true, None);
    priced_or_stored(priced, created)
}

/// Customers of other hubs are reported as missing.
fn ensure_hub_customer<R>(repo: &R, customer_id: Option<i32>, hub_id: i32) -> ServiceResult<()>
where
    R: CustomerReader + ?Sized,
{
    let Some(customer_id) = customer_id else {
        return Ok(());
    };
    repo.get_customer_by_id(customer_id, hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;
    Ok(())
}

/// Keep `stored` when the estimate lacks the data needed to price it.
fn priced_or_stored(priced: ServiceResult<Estimate>, stored: Estimate) -> ServiceResult<Estimate> {
    match priced {
        Err(ServiceError::InsufficientData(reason)) => {
            info!("Estimate {} left unpriced: {}", stored.id, reason);
            Ok(stored)
        }
        other => other,
    }
}

/// Updates estimate details, pins and releases.
///
/// Figure edits and method changes trigger a quick recalculation that keeps
/// the stored travel figures. Switching to hourly before entering the hours
/// stores the edit and leaves the old figures in place.
pub fn update_estimate<R>(
    repo: &R,
    user: &AuthenticatedUser,
    estimate_id: i32,
    form: EditEstimateForm,
) -> ServiceResult<Estimate>
where
    R: EstimateReader
        + EstimateWriter
        + SizingReader
        + RateReader
        + HubReader
        + CustomerReader
        + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let update = form
        .into_update_estimate()
        .map_err(|err| ServiceError::Validation(err.to_string()))?;
    ensure_hub_customer(repo, update.customer_id.flatten(), user.hub_id)?;

    let _lock = lock_estimate(user.hub_id, estimate_id);

    let current = repo
        .get_estimate_by_id(estimate_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    if let Some(next) = update.status {
        if !current.status.can_transition_to(next) {
            return Err(ServiceError::Validation(format!(
                "estimate cannot move from {} to {}",
                current.status, next
            )));
        }
    }

    let updated = repo
        .update_estimate(estimate_id, user.hub_id, &update)
        .map_err(ServiceError::from)?;
    info!("Updated estimate {} in hub {}", estimate_id, user.hub_id);

    if !update.changes_figures() {
        return Ok(updated);
    }

    let priced = recalculate(repo, None, user.hub_id, estimate_id, false, None);
    priced_or_stored(priced, updated)
}

/// Deletes an estimate together with its stops, line items and selections.
pub fn delete_estimate<R>(repo: &R, user: &AuthenticatedUser, estimate_id: i32) -> ServiceResult<()>
where
    R: EstimateWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let _lock = lock_estimate(user.hub_id, estimate_id);
    repo.delete_estimate(estimate_id, user.hub_id)
        .map_err(ServiceError::from)?;
    info!("Deleted estimate {} in hub {}", estimate_id, user.hub_id);
    Ok(())
}

/// Replaces one kind of catalog selection and reprices the estimate.
pub fn replace_sizing<R>(
    repo: &R,
    user: &AuthenticatedUser,
    estimate_id: i32,
    kind: SizingKind,
    form: AssignmentsForm,
) -> ServiceResult<Estimate>
where
    R: EstimateReader
        + EstimateWriter
        + SizingReader
        + SizingWriter
        + RateReader
        + HubReader
        + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let assignments = form
        .into_assignments()
        .map_err(|err| ServiceError::Validation(err.to_string()))?;

    let _lock = lock_estimate(user.hub_id, estimate_id);

    repo.get_estimate_by_id(estimate_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    match kind {
        SizingKind::Inventory => {
            repo.replace_inventory_items(estimate_id, user.hub_id, &assignments)
        }
        SizingKind::ResidenceSizes => {
            repo.replace_residence_sizes(estimate_id, user.hub_id, &assignments)
        }
        SizingKind::AdditionalServices => {
            repo.replace_additional_services(estimate_id, user.hub_id, &assignments)
        }
    }
    .map_err(ServiceError::from)?;

    recalculate(repo, None, user.hub_id, estimate_id, false, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use pushkind_common::repository::errors::RepositoryError;

    use crate::domain::catalog::Assignment;
    use crate::domain::customer::Customer;
    use crate::domain::estimate::{EstimateStatus, NewEstimate};
    use crate::forms::estimates::AssignmentForm;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{
        HUB_ID, sample_estimate, sample_rates, user_with_roles,
    };

    fn priced_repo(estimate: Estimate) -> MockRepository {
        let mut repo = MockRepository::new();
        let stored = estimate.clone();
        repo.expect_get_estimate_by_id()
            .returning(move |_, _| Ok(Some(stored.clone())));
        repo.expect_load_rate_context()
            .returning(|_| Ok(sample_rates()));
        repo.expect_load_estimate_sizing()
            .returning(|_, _| Ok(EstimateSizing::default()));
        repo.expect_commit_estimate()
            .returning(move |_, _, commit| {
                let mut updated = estimate.clone();
                updated.figures = commit.figures;
                Ok(updated)
            });
        repo
    }

    #[test]
    fn load_estimates_requires_role() {
        let repo = MockRepository::new();
        let user = user_with_roles(&["admin"]);
        let result = load_estimates(&repo, &user, EstimateListParams::default());
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn load_estimates_scopes_query_to_hub() {
        let mut repo = MockRepository::new();
        repo.expect_list_estimates()
            .withf(|query| query.hub_id == HUB_ID && query.status == Some(EstimateStatus::Booked))
            .returning(|_| Ok((1, vec![sample_estimate(1, Vec::new())])));
        let user = user_with_roles(&["crm"]);
        let params = EstimateListParams {
            status: Some("booked".to_string()),
            ..EstimateListParams::default()
        };

        load_estimates(&repo, &user, params).unwrap();
    }

    #[test]
    fn load_estimate_maps_missing_to_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_estimate_by_id()
            .with(eq(5), eq(HUB_ID))
            .returning(|_, _| Ok(None));
        let user = user_with_roles(&["crm"]);
        assert!(matches!(
            load_estimate(&repo, &user, 5),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn create_estimate_prices_new_estimate() {
        let estimate = sample_estimate(20, Vec::new());
        let mut repo = priced_repo(estimate.clone());
        repo.expect_create_estimate()
            .withf(|new_estimate: &NewEstimate| new_estimate.hub_id == HUB_ID)
            .returning(move |_| Ok(estimate.clone()));
        let user = user_with_roles(&["crm"]);
        let form = AddEstimateForm {
            customer_id: None,
            method: Some("inventory".to_string()),
            move_type: None,
            move_service: None,
            move_date: None,
            notes: None,
            stops: Vec::new(),
        };

        let created = create_estimate(&repo, None, &user, form).unwrap();
        assert_eq!(created.id, 20);
        assert_eq!(created.figures.truck_cost.value(), 150.0);
    }

    #[test]
    fn create_hourly_estimate_without_hours_stays_unpriced() {
        let mut estimate = sample_estimate(21, Vec::new());
        estimate.method = crate::domain::estimate::EstimateMethod::Hourly;
        let mut repo = MockRepository::new();
        let stored = estimate.clone();
        repo.expect_create_estimate()
            .returning(move |_| Ok(stored.clone()));
        let stored = estimate.clone();
        repo.expect_get_estimate_by_id()
            .returning(move |_, _| Ok(Some(stored.clone())));
        repo.expect_load_rate_context()
            .returning(|_| Ok(sample_rates()));
        repo.expect_load_estimate_sizing()
            .returning(|_, _| Ok(EstimateSizing::default()));
        repo.expect_commit_estimate().never();
        let user = user_with_roles(&["crm"]);
        let form = AddEstimateForm {
            customer_id: None,
            method: Some("hourly".to_string()),
            move_type: None,
            move_service: None,
            move_date: None,
            notes: None,
            stops: Vec::new(),
        };

        let created = create_estimate(&repo, None, &user, form).unwrap();
        assert_eq!(created.id, 21);
    }

    #[test]
    fn create_rejects_customer_of_another_hub() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .with(eq(77), eq(HUB_ID))
            .returning(|_, _| Ok(None));
        repo.expect_create_estimate().never();
        let user = user_with_roles(&["crm"]);
        let form = AddEstimateForm {
            customer_id: Some(77),
            method: None,
            move_type: None,
            move_service: None,
            move_date: None,
            notes: None,
            stops: Vec::new(),
        };

        let result = create_estimate(&repo, None, &user, form);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn update_rejects_customer_of_another_hub() {
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .with(eq(78), eq(HUB_ID))
            .returning(|_, _| Ok(None));
        repo.expect_update_estimate().never();
        let user = user_with_roles(&["crm"]);
        let form = EditEstimateForm {
            customer_id: Some(78),
            ..EditEstimateForm::default()
        };

        let result = update_estimate(&repo, &user, 25, form);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn update_links_customer_of_the_same_hub() {
        let estimate = sample_estimate(26, Vec::new());
        let mut repo = MockRepository::new();
        repo.expect_get_customer_by_id()
            .with(eq(5), eq(HUB_ID))
            .returning(|id, hub_id| {
                Ok(Some(Customer {
                    id,
                    hub_id,
                    name: "Jane Doe".to_string(),
                    email: "jane@example.com".to_string(),
                    phone: None,
                    source_id: None,
                }))
            });
        let stored = estimate.clone();
        repo.expect_get_estimate_by_id()
            .returning(move |_, _| Ok(Some(stored.clone())));
        repo.expect_update_estimate()
            .withf(|_, _, update| update.customer_id == Some(Some(5)))
            .returning(move |_, _, _| Ok(estimate.clone()));
        let user = user_with_roles(&["crm"]);
        let form = EditEstimateForm {
            customer_id: Some(5),
            ..EditEstimateForm::default()
        };

        update_estimate(&repo, &user, 26, form).unwrap();
    }

    #[test]
    fn update_rejects_invalid_status_transition() {
        let mut estimate = sample_estimate(22, Vec::new());
        estimate.status = EstimateStatus::Cancelled;
        let mut repo = MockRepository::new();
        repo.expect_get_estimate_by_id()
            .returning(move |_, _| Ok(Some(estimate.clone())));
        repo.expect_update_estimate().never();
        let user = user_with_roles(&["crm"]);
        let form = EditEstimateForm {
            status: Some("booked".to_string()),
            ..EditEstimateForm::default()
        };

        let result = update_estimate(&repo, &user, 22, form);
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn update_without_figures_skips_recalculation() {
        let estimate = sample_estimate(23, Vec::new());
        let mut repo = MockRepository::new();
        let stored = estimate.clone();
        repo.expect_get_estimate_by_id()
            .returning(move |_, _| Ok(Some(stored.clone())));
        repo.expect_update_estimate()
            .withf(|id, hub_id, update| {
                *id == 23 && *hub_id == HUB_ID && update.notes == Some(Some("Call first".into()))
            })
            .returning(move |_, _, _| Ok(estimate.clone()));
        repo.expect_commit_estimate().never();
        let user = user_with_roles(&["crm"]);
        let form = EditEstimateForm {
            notes: Some("Call first".to_string()),
            ..EditEstimateForm::default()
        };

        update_estimate(&repo, &user, 23, form).unwrap();
    }

    #[test]
    fn pinning_a_figure_recalculates() {
        let estimate = sample_estimate(24, Vec::new());
        let mut repo = priced_repo(estimate.clone());
        repo.expect_update_estimate()
            .returning(move |_, _, _| Ok(estimate.clone()));
        let user = user_with_roles(&["crm"]);
        let mut form = EditEstimateForm::default();
        form.pin.insert("truck_cost".to_string(), 300.0);

        let updated = update_estimate(&repo, &user, 24, form).unwrap();
        assert_eq!(updated.id, 24);
    }

    #[test]
    fn replace_sizing_validates_catalog_ownership() {
        let estimate = sample_estimate(25, Vec::new());
        let mut repo = MockRepository::new();
        repo.expect_get_estimate_by_id()
            .returning(move |_, _| Ok(Some(estimate.clone())));
        repo.expect_replace_inventory_items()
            .withf(|id, hub_id, items| {
                *id == 25 && *hub_id == HUB_ID && items == [Assignment { id: 8, quantity: 2 }]
            })
            .returning(|_, _, _| Err(RepositoryError::NotFound));
        repo.expect_commit_estimate().never();
        let user = user_with_roles(&["crm"]);
        let form = AssignmentsForm {
            items: vec![AssignmentForm { id: 8, quantity: 2 }],
        };

        let result = replace_sizing(&repo, &user, 25, SizingKind::Inventory, form);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn replace_sizing_reprices() {
        let estimate = sample_estimate(26, Vec::new());
        let mut repo = priced_repo(estimate);
        repo.expect_replace_additional_services()
            .returning(|_, _, _| Ok(()));
        let user = user_with_roles(&["crm"]);
        let form = AssignmentsForm {
            items: vec![AssignmentForm { id: 1, quantity: 1 }],
        };

        let updated =
            replace_sizing(&repo, &user, 26, SizingKind::AdditionalServices, form).unwrap();
        assert_eq!(updated.id, 26);
    }

    #[test]
    fn delete_estimate_passes_hub() {
        let mut repo = MockRepository::new();
        repo.expect_delete_estimate()
            .with(eq(27), eq(HUB_ID))
            .returning(|_, _| Ok(()));
        let user = user_with_roles(&["crm"]);
        delete_estimate(&repo, &user, 27).unwrap();
    }
}
