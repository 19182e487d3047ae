use log::info;
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::check_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::customer::{Customer, LeadSource, NewCustomer};
use crate::forms::customers::{AddCustomerForm, CustomerListParams};
use crate::repository::{CustomerReader, CustomerWriter, SourceReader};
use crate::services::{ServiceError, ServiceResult};

pub fn load_customers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: CustomerListParams,
) -> ServiceResult<Paginated<Customer>>
where
    R: CustomerReader + ?Sized,
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

    let (total, customers) = repo.list_customers(query).map_err(ServiceError::from)?;
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(Paginated::new(customers, page, total_pages))
}

pub fn load_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    customer_id: i32,
) -> ServiceResult<Customer>
where
    R: CustomerReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.get_customer_by_id(customer_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Lead source of the hub with the given name, or a validation error.
pub(crate) fn resolve_lead_source<R>(repo: &R, hub_id: i32, name: &str) -> ServiceResult<LeadSource>
where
    R: SourceReader + ?Sized,
{
    repo.find_lead_source(hub_id, name)
        .map_err(ServiceError::from)?
        .ok_or_else(|| ServiceError::Validation(format!("unknown source `{name}`")))
}

/// Creates a customer; an email already on file in the hub is a conflict.
pub fn create_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddCustomerForm,
) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter + SourceReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let source = form.source_name();
    let mut new_customer = form
        .into_new_customer(user.hub_id)
        .map_err(|err| ServiceError::Validation(err.to_string()))?;
    if let Some(name) = source {
        let source = resolve_lead_source(repo, user.hub_id, &name)?;
        new_customer = new_customer.with_source_id(source.id);
    }

    if repo
        .get_customer_by_email(&new_customer.email, user.hub_id)
        .map_err(ServiceError::from)?
        .is_some()
    {
        return Err(ServiceError::Conflict(format!(
            "customer with email {} already exists",
            new_customer.email
        )));
    }

    let customer = repo
        .create_customer(&new_customer)
        .map_err(ServiceError::from)?;
    info!("Created customer {} in hub {}", customer.id, user.hub_id);
    Ok(customer)
}

/// Existing customer matched by email, then by phone, or a newly created one.
pub(crate) fn find_or_create_customer<R>(
    repo: &R,
    new_customer: &NewCustomer,
) -> ServiceResult<Customer>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    let hub_id = new_customer.hub_id;
    if let Some(customer) = repo
        .get_customer_by_email(&new_customer.email, hub_id)
        .map_err(ServiceError::from)?
    {
        return Ok(customer);
    }
    if let Some(phone) = new_customer.phone.as_deref() {
        if let Some(customer) = repo
            .get_customer_by_phone(phone, hub_id)
            .map_err(ServiceError::from)?
        {
            return Ok(customer);
        }
    }

    let customer = repo
        .create_customer(new_customer)
        .map_err(ServiceError::from)?;
    info!("Created customer {} in hub {}", customer.id, hub_id);
    Ok(customer)
}
