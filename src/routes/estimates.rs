use actix_web::{HttpResponse, Responder, delete, get, patch, post, put, web};
use pushkind_common::domain::auth::AuthenticatedUser;
use serde::Deserialize;

use crate::forms::estimates::{
    AddEstimateForm, AssignmentsForm, EditEstimateForm, EstimateListParams,
};
use crate::repository::DieselRepository;
use crate::routes::{
    SharedGeo, created_or_error, empty_or_error, json_or_error, run_blocking,
};
use crate::services::estimates::SizingKind;
use crate::services::{calculation as calculation_service, estimates as estimates_service};

#[derive(Debug, Default, Deserialize)]
pub struct CalculateParams {
    /// Re-resolve coordinates and routes; `false` keeps the stored travel.
    #[serde(default)]
    pub full: Option<bool>,
}

#[get("/v1/estimates")]
/// Paginated estimates of the hub filtered by status, customer or search text.
pub async fn list_estimates(
    params: web::Query<EstimateListParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        estimates_service::load_estimates(repo.get_ref(), &user, params.into_inner()),
        "list estimates",
    )
}

#[post("/v1/estimates")]
pub async fn add_estimate(
    form: web::Json<AddEstimateForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    geo: web::Data<SharedGeo>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let geo = geo.get_ref().clone();
    let form = form.into_inner();
    let result = run_blocking(move || {
        estimates_service::create_estimate(&repo, geo.as_deref(), &user, form)
    })
    .await;
    created_or_error(result, "create estimate")
}

#[get("/v1/estimates/{estimate_id}")]
pub async fn show_estimate(
    estimate_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        estimates_service::load_estimate(repo.get_ref(), &user, estimate_id.into_inner()),
        "load estimate",
    )
}

#[patch("/v1/estimates/{estimate_id}")]
/// Edits details, pins figures or releases them back to the calculator.
pub async fn edit_estimate(
    estimate_id: web::Path<i32>,
    form: web::Json<EditEstimateForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        estimates_service::update_estimate(
            repo.get_ref(),
            &user,
            estimate_id.into_inner(),
            form.into_inner(),
        ),
        "update estimate",
    )
}

#[delete("/v1/estimates/{estimate_id}")]
pub async fn delete_estimate(
    estimate_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    empty_or_error(
        estimates_service::delete_estimate(repo.get_ref(), &user, estimate_id.into_inner()),
        "delete estimate",
    )
}

#[post("/v1/estimates/{estimate_id}/calculate")]
/// Reprices the estimate. A full run is the default.
pub async fn calculate_estimate(
    estimate_id: web::Path<i32>,
    params: web::Query<CalculateParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    geo: web::Data<SharedGeo>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let geo = geo.get_ref().clone();
    let estimate_id = estimate_id.into_inner();
    let full = params.full.unwrap_or(true);
    let result = run_blocking(move || {
        calculation_service::calculate_estimate(&repo, geo.as_deref(), &user, estimate_id, full)
    })
    .await;
    json_or_error(result, "calculate estimate")
}

#[get("/v1/estimates/{estimate_id}/sizing")]
pub async fn show_sizing(
    estimate_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        estimates_service::load_estimate_sizing(repo.get_ref(), &user, estimate_id.into_inner()),
        "load estimate sizing",
    )
}

fn replace_sizing(
    repo: &DieselRepository,
    user: &AuthenticatedUser,
    estimate_id: i32,
    kind: SizingKind,
    form: AssignmentsForm,
) -> HttpResponse {
    json_or_error(
        estimates_service::replace_sizing(repo, user, estimate_id, kind, form),
        "replace estimate sizing",
    )
}

#[put("/v1/estimates/{estimate_id}/inventory")]
pub async fn replace_inventory(
    estimate_id: web::Path<i32>,
    form: web::Json<AssignmentsForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    replace_sizing(
        repo.get_ref(),
        &user,
        estimate_id.into_inner(),
        SizingKind::Inventory,
        form.into_inner(),
    )
}

#[put("/v1/estimates/{estimate_id}/residence-sizes")]
pub async fn replace_residence_sizes(
    estimate_id: web::Path<i32>,
    form: web::Json<AssignmentsForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    replace_sizing(
        repo.get_ref(),
        &user,
        estimate_id.into_inner(),
        SizingKind::ResidenceSizes,
        form.into_inner(),
    )
}

#[put("/v1/estimates/{estimate_id}/services")]
pub async fn replace_services(
    estimate_id: web::Path<i32>,
    form: web::Json<AssignmentsForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    replace_sizing(
        repo.get_ref(),
        &user,
        estimate_id.into_inner(),
        SizingKind::AdditionalServices,
        form.into_inner(),
    )
}
