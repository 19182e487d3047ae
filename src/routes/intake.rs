use actix_web::{Responder, get, post, web};

use crate::forms::intake::{LeadForm, ResidenceSizeParams};
use crate::repository::DieselRepository;
use crate::routes::{SharedGeo, created_or_error, json_or_error, run_blocking};
use crate::services::intake as intake_service;

#[post("/v1/hubs/{hub_id}/leads")]
/// Public quote request. Mounted outside the authenticated scope.
pub async fn submit_lead(
    hub_id: web::Path<i32>,
    form: web::Json<LeadForm>,
    repo: web::Data<DieselRepository>,
    geo: web::Data<SharedGeo>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let geo = geo.get_ref().clone();
    let hub_id = hub_id.into_inner();
    let form = form.into_inner();
    let result =
        run_blocking(move || intake_service::submit_lead(&repo, geo.as_deref(), hub_id, form))
            .await;
    created_or_error(result, "submit lead")
}

#[get("/v1/hubs/{hub_id}/sources")]
/// Public source dropdown of the quote form.
pub async fn list_intake_sources(
    hub_id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        intake_service::list_public_sources(repo.get_ref(), hub_id.into_inner()),
        "list lead sources",
    )
}

#[get("/v1/hubs/{hub_id}/residence-sizes")]
pub async fn list_intake_residence_sizes(
    hub_id: web::Path<i32>,
    params: web::Query<ResidenceSizeParams>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        intake_service::list_intake_residence_sizes(
            repo.get_ref(),
            hub_id.into_inner(),
            &params.move_type,
        ),
        "list residence sizes",
    )
}
