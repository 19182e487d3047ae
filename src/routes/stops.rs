//! Stop edits reprice the estimate with fresh route lookups, so every
//! handler runs on the blocking pool.

use actix_web::{Responder, delete, patch, post, put, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::stops::{AddStopForm, EditStopForm, ReorderStopsForm};
use crate::repository::DieselRepository;
use crate::routes::{SharedGeo, json_or_error, run_blocking};
use crate::services::stops as stops_service;

#[post("/v1/estimates/{estimate_id}/stops")]
/// Inserts a stop before the destination.
pub async fn add_stop(
    estimate_id: web::Path<i32>,
    form: web::Json<AddStopForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    geo: web::Data<SharedGeo>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let geo = geo.get_ref().clone();
    let estimate_id = estimate_id.into_inner();
    let form = form.into_inner();
    let result = run_blocking(move || {
        stops_service::add_stop(&repo, geo.as_deref(), &user, estimate_id, form)
    })
    .await;
    json_or_error(result, "add stop")
}

#[patch("/v1/estimates/{estimate_id}/stops/{stop_id}")]
pub async fn edit_stop(
    path: web::Path<(i32, i32)>,
    form: web::Json<EditStopForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    geo: web::Data<SharedGeo>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let geo = geo.get_ref().clone();
    let (estimate_id, stop_id) = path.into_inner();
    let form = form.into_inner();
    let result = run_blocking(move || {
        stops_service::update_stop(&repo, geo.as_deref(), &user, estimate_id, stop_id, form)
    })
    .await;
    json_or_error(result, "update stop")
}

#[delete("/v1/estimates/{estimate_id}/stops/{stop_id}")]
pub async fn delete_stop(
    path: web::Path<(i32, i32)>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    geo: web::Data<SharedGeo>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let geo = geo.get_ref().clone();
    let (estimate_id, stop_id) = path.into_inner();
    let result = run_blocking(move || {
        stops_service::delete_stop(&repo, geo.as_deref(), &user, estimate_id, stop_id)
    })
    .await;
    json_or_error(result, "delete stop")
}

#[put("/v1/estimates/{estimate_id}/stops/order")]
/// Replaces the stop order with the submitted permutation of stop ids.
pub async fn reorder_stops(
    estimate_id: web::Path<i32>,
    form: web::Json<ReorderStopsForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    geo: web::Data<SharedGeo>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let geo = geo.get_ref().clone();
    let estimate_id = estimate_id.into_inner();
    let form = form.into_inner();
    let result = run_blocking(move || {
        stops_service::reorder_stops(&repo, geo.as_deref(), &user, estimate_id, form)
    })
    .await;
    json_or_error(result, "reorder stops")
}
