use actix_web::{Responder, get, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::customers::{AddCustomerForm, CustomerListParams};
use crate::repository::DieselRepository;
use crate::routes::{created_or_error, json_or_error};
use crate::services::customers as customers_service;

#[get("/v1/customers")]
pub async fn list_customers(
    params: web::Query<CustomerListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        customers_service::load_customers(repo.get_ref(), &user, params.into_inner()),
        "list customers",
    )
}

#[post("/v1/customers")]
pub async fn add_customer(
    form: web::Json<AddCustomerForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    created_or_error(
        customers_service::create_customer(repo.get_ref(), &user, form.into_inner()),
        "create customer",
    )
}

#[get("/v1/customers/{customer_id}")]
pub async fn show_customer(
    customer_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        customers_service::load_customer(repo.get_ref(), &user, customer_id.into_inner()),
        "load customer",
    )
}
