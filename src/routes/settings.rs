//! Hub administration endpoints.

use actix_web::{Responder, delete, get, post, put, web};
use pushkind_common::domain::auth::AuthenticatedUser;

use crate::forms::settings::{
    AdditionalServiceForm, AssignmentRuleForm, FuelTierForm, HubSettingsForm, InventoryItemForm,
    LeadSourceForm, MoverTeamForm, ResidenceSizeForm, TruckForm,
};
use crate::repository::DieselRepository;
use crate::routes::{SharedGeo, created_or_error, empty_or_error, json_or_error, run_blocking};
use crate::services::settings as settings_service;

#[get("/v1/settings/rates")]
/// Every rate table of the hub.
pub async fn show_rates(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        settings_service::load_rates(repo.get_ref(), &user),
        "load rate tables",
    )
}

#[post("/v1/settings/mover-teams")]
pub async fn add_mover_team(
    form: web::Json<MoverTeamForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    created_or_error(
        settings_service::create_mover_team(repo.get_ref(), &user, form.into_inner()),
        "create mover team",
    )
}

#[put("/v1/settings/mover-teams/{team_id}")]
pub async fn edit_mover_team(
    team_id: web::Path<i32>,
    form: web::Json<MoverTeamForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        settings_service::update_mover_team(
            repo.get_ref(),
            &user,
            team_id.into_inner(),
            form.into_inner(),
        ),
        "update mover team",
    )
}

#[delete("/v1/settings/mover-teams/{team_id}")]
pub async fn delete_mover_team(
    team_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    empty_or_error(
        settings_service::delete_mover_team(repo.get_ref(), &user, team_id.into_inner()),
        "delete mover team",
    )
}

#[post("/v1/settings/assignment-rules")]
pub async fn add_assignment_rule(
    form: web::Json<AssignmentRuleForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    created_or_error(
        settings_service::create_assignment_rule(repo.get_ref(), &user, form.into_inner()),
        "create assignment rule",
    )
}

#[put("/v1/settings/assignment-rules/{rule_id}")]
pub async fn edit_assignment_rule(
    rule_id: web::Path<i32>,
    form: web::Json<AssignmentRuleForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        settings_service::update_assignment_rule(
            repo.get_ref(),
            &user,
            rule_id.into_inner(),
            form.into_inner(),
        ),
        "update assignment rule",
    )
}

#[delete("/v1/settings/assignment-rules/{rule_id}")]
pub async fn delete_assignment_rule(
    rule_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    empty_or_error(
        settings_service::delete_assignment_rule(repo.get_ref(), &user, rule_id.into_inner()),
        "delete assignment rule",
    )
}

#[post("/v1/settings/trucks")]
pub async fn add_truck(
    form: web::Json<TruckForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    created_or_error(
        settings_service::create_truck(repo.get_ref(), &user, form.into_inner()),
        "create truck",
    )
}

#[put("/v1/settings/trucks/{truck_id}")]
pub async fn edit_truck(
    truck_id: web::Path<i32>,
    form: web::Json<TruckForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        settings_service::update_truck(
            repo.get_ref(),
            &user,
            truck_id.into_inner(),
            form.into_inner(),
        ),
        "update truck",
    )
}

#[delete("/v1/settings/trucks/{truck_id}")]
pub async fn delete_truck(
    truck_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    empty_or_error(
        settings_service::delete_truck(repo.get_ref(), &user, truck_id.into_inner()),
        "delete truck",
    )
}

#[post("/v1/settings/fuel-tiers")]
pub async fn add_fuel_tier(
    form: web::Json<FuelTierForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    created_or_error(
        settings_service::create_fuel_tier(repo.get_ref(), &user, form.into_inner()),
        "create fuel tier",
    )
}

#[put("/v1/settings/fuel-tiers/{tier_id}")]
pub async fn edit_fuel_tier(
    tier_id: web::Path<i32>,
    form: web::Json<FuelTierForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        settings_service::update_fuel_tier(
            repo.get_ref(),
            &user,
            tier_id.into_inner(),
            form.into_inner(),
        ),
        "update fuel tier",
    )
}

#[delete("/v1/settings/fuel-tiers/{tier_id}")]
pub async fn delete_fuel_tier(
    tier_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    empty_or_error(
        settings_service::delete_fuel_tier(repo.get_ref(), &user, tier_id.into_inner()),
        "delete fuel tier",
    )
}

#[post("/v1/settings/services")]
pub async fn add_additional_service(
    form: web::Json<AdditionalServiceForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    created_or_error(
        settings_service::create_additional_service(repo.get_ref(), &user, form.into_inner()),
        "create additional service",
    )
}

#[put("/v1/settings/services/{service_id}")]
pub async fn edit_additional_service(
    service_id: web::Path<i32>,
    form: web::Json<AdditionalServiceForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        settings_service::update_additional_service(
            repo.get_ref(),
            &user,
            service_id.into_inner(),
            form.into_inner(),
        ),
        "update additional service",
    )
}

#[delete("/v1/settings/services/{service_id}")]
pub async fn delete_additional_service(
    service_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    empty_or_error(
        settings_service::delete_additional_service(
            repo.get_ref(),
            &user,
            service_id.into_inner(),
        ),
        "delete additional service",
    )
}

#[get("/v1/settings/hub")]
pub async fn show_hub_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        settings_service::load_hub_settings(repo.get_ref(), &user),
        "load hub settings",
    )
}

#[put("/v1/settings/hub")]
/// Saves the depot and truck fee; a new depot address is geocoded.
pub async fn edit_hub_settings(
    form: web::Json<HubSettingsForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    geo: web::Data<SharedGeo>,
) -> impl Responder {
    let repo = repo.get_ref().clone();
    let geo = geo.get_ref().clone();
    let form = form.into_inner();
    let result = run_blocking(move || {
        settings_service::update_hub_settings(&repo, geo.as_deref(), &user, form)
    })
    .await;
    json_or_error(result, "update hub settings")
}

#[get("/v1/catalog")]
pub async fn show_catalog(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    json_or_error(
        settings_service::load_catalog(repo.get_ref(), &user),
        "load catalog",
    )
}

#[post("/v1/catalog/inventory-items")]
pub async fn add_inventory_item(
    form: web::Json<InventoryItemForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    created_or_error(
        settings_service::create_inventory_item(repo.get_ref(), &user, form.into_inner()),
        "create inventory item",
    )
}

#[delete("/v1/catalog/inventory-items/{item_id}")]
pub async fn delete_inventory_item(
    item_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    empty_or_error(
        settings_service::delete_inventory_item(repo.get_ref(), &user, item_id.into_inner()),
        "delete inventory item",
    )
}

#[post("/v1/catalog/residence-sizes")]
pub async fn add_residence_size(
    form: web::Json<ResidenceSizeForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    created_or_error(
        settings_service::create_residence_size(repo.get_ref(), &user, form.into_inner()),
        "create residence size",
    )
}

#[delete("/v1/catalog/residence-sizes/{size_id}")]
pub async fn delete_residence_size(
    size_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    empty_or_error(
        settings_service::delete_residence_size(repo.get_ref(), &user, size_id.into_inner()),
        "delete residence size",
    )
}

#[post("/v1/catalog/lead-sources")]
pub async fn add_lead_source(
    form: web::Json<LeadSourceForm>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    created_or_error(
        settings_service::create_lead_source(repo.get_ref(), &user, form.into_inner()),
        "create lead source",
    )
}

#[delete("/v1/catalog/lead-sources/{source_id}")]
pub async fn delete_lead_source(
    source_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    empty_or_error(
        settings_service::delete_lead_source(repo.get_ref(), &user, source_id.into_inner()),
        "delete lead source",
    )
}
