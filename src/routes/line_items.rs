use actix_web::{Responder, delete, get, patch, post, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::line_items::{AddLineItemForm, EditLineItemForm};
use crate::repository::DieselRepository;
use crate::routes::{created_or_error, json_or_error};
use crate::services::line_items as line_items_service;

#[get("/v1/estimates/{estimate_id}/line-items")]
pub async fn list_line_items(
    estimate_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        line_items_service::load_line_items(repo.get_ref(), &user, estimate_id.into_inner()),
        "list line items",
    )
}

#[post("/v1/estimates/{estimate_id}/line-items")]
/// Adds a manual charge or discount and returns the refreshed estimate.
pub async fn add_line_item(
    estimate_id: web::Path<i32>,
    form: web::Json<AddLineItemForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    created_or_error(
        line_items_service::add_line_item(
            repo.get_ref(),
            &user,
            estimate_id.into_inner(),
            form.into_inner(),
        ),
        "add line item",
    )
}

#[patch("/v1/estimates/{estimate_id}/line-items/{line_item_id}")]
pub async fn edit_line_item(
    path: web::Path<(i32, i32)>,
    form: web::Json<EditLineItemForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (estimate_id, line_item_id) = path.into_inner();
    json_or_error(
        line_items_service::update_line_item(
            repo.get_ref(),
            &user,
            estimate_id,
            line_item_id,
            form.into_inner(),
        ),
        "update line item",
    )
}

#[delete("/v1/estimates/{estimate_id}/line-items/{line_item_id}")]
pub async fn delete_line_item(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let (estimate_id, line_item_id) = path.into_inner();
    json_or_error(
        line_items_service::delete_line_item(repo.get_ref(), &user, estimate_id, line_item_id),
        "delete line item",
    )
}

#[post("/v1/estimates/{estimate_id}/recompute-total")]
/// Resets an unpinned total to the sum of the line items.
pub async fn recompute_total(
    estimate_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        line_items_service::recompute_total(repo.get_ref(), &user, estimate_id.into_inner()),
        "recompute estimate total",
    )
}
