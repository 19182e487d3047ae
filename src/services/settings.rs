//! Hub administration: rate tables, depot settings and the sizing catalog.

use log::{info, warn};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;
use serde::Serialize;

use crate::domain::catalog::{InventoryItem, ResidenceSize};
use crate::domain::customer::LeadSource;
use crate::domain::hub::HubSettings;
use crate::domain::rates::{
    AdditionalService, FuelPriceTier, MoverAssignmentRule, MoverTeam, RateContext, Truck,
};
use crate::forms::settings::{
    AdditionalServiceForm, AssignmentRuleForm, FuelTierForm, HubSettingsForm, InventoryItemForm,
    LeadSourceForm, MoverTeamForm, ResidenceSizeForm, TruckForm,
};
use crate::geo::{GeoResolver, HubGeo};
use crate::repository::{
    CatalogReader, CatalogWriter, HubReader, HubWriter, RateReader, RateWriter, SourceReader,
    SourceWriter,
};
use crate::services::{ServiceError, ServiceResult};
use crate::{SERVICE_ACCESS_ROLE, SETTINGS_ACCESS_ROLE};

fn authorize(user: &AuthenticatedUser, role: &str) -> ServiceResult<()> {
    if check_role(role, &user.roles) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

fn form_error(err: impl ToString) -> ServiceError {
    ServiceError::Validation(err.to_string())
}

/// Every rate table of the user's hub.
pub fn load_rates<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<RateContext>
where
    R: RateReader + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    repo.load_rate_context(user.hub_id)
        .map_err(ServiceError::from)
}

pub fn create_mover_team<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: MoverTeamForm,
) -> ServiceResult<MoverTeam>
where
    R: RateReader + RateWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    let team = form.into_new_mover_team(user.hub_id).map_err(form_error)?;

    let rates = repo
        .load_rate_context(user.hub_id)
        .map_err(ServiceError::from)?;
    if rates
        .mover_teams
        .iter()
        .any(|existing| existing.number_of_movers == team.number_of_movers)
    {
        return Err(ServiceError::Conflict(format!(
            "a {}-mover team already exists",
            team.number_of_movers
        )));
    }

    let created = repo.create_mover_team(&team).map_err(ServiceError::from)?;
    info!("Created mover team {} in hub {}", created.id, user.hub_id);
    Ok(created)
}

pub fn update_mover_team<R>(
    repo: &R,
    user: &AuthenticatedUser,
    team_id: i32,
    form: MoverTeamForm,
) -> ServiceResult<MoverTeam>
where
    R: RateReader + RateWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    let team = form.into_new_mover_team(user.hub_id).map_err(form_error)?;

    let rates = repo
        .load_rate_context(user.hub_id)
        .map_err(ServiceError::from)?;
    if rates.mover_teams.iter().any(|existing| {
        existing.id != team_id && existing.number_of_movers == team.number_of_movers
    }) {
        return Err(ServiceError::Conflict(format!(
            "a {}-mover team already exists",
            team.number_of_movers
        )));
    }

    repo.update_mover_team(team_id, &team)
        .map_err(ServiceError::from)
}

pub fn delete_mover_team<R>(repo: &R, user: &AuthenticatedUser, team_id: i32) -> ServiceResult<()>
where
    R: RateWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    repo.delete_mover_team(team_id, user.hub_id)
        .map_err(ServiceError::from)
}

fn ensure_rule_fits(
    rules: &[MoverAssignmentRule],
    hours_min: f64,
    hours_max: Option<f64>,
    exclude: Option<i32>,
) -> ServiceResult<()> {
    match rules
        .iter()
        .filter(|rule| Some(rule.id) != exclude)
        .find(|rule| rule.overlaps(hours_min, hours_max))
    {
        Some(rule) => Err(ServiceError::Conflict(format!(
            "hours overlap assignment rule {}",
            rule.id
        ))),
        None => Ok(()),
    }
}

pub fn create_assignment_rule<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AssignmentRuleForm,
) -> ServiceResult<MoverAssignmentRule>
where
    R: RateReader + RateWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    let rule = form
        .into_new_assignment_rule(user.hub_id)
        .map_err(form_error)?;

    let rates = repo
        .load_rate_context(user.hub_id)
        .map_err(ServiceError::from)?;
    ensure_rule_fits(&rates.assignment_rules, rule.hours_min, rule.hours_max, None)?;

    let created = repo
        .create_assignment_rule(&rule)
        .map_err(ServiceError::from)?;
    info!("Created assignment rule {} in hub {}", created.id, user.hub_id);
    Ok(created)
}

pub fn update_assignment_rule<R>(
    repo: &R,
    user: &AuthenticatedUser,
    rule_id: i32,
    form: AssignmentRuleForm,
) -> ServiceResult<MoverAssignmentRule>
where
    R: RateReader + RateWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    let rule = form
        .into_new_assignment_rule(user.hub_id)
        .map_err(form_error)?;

    let rates = repo
        .load_rate_context(user.hub_id)
        .map_err(ServiceError::from)?;
    ensure_rule_fits(
        &rates.assignment_rules,
        rule.hours_min,
        rule.hours_max,
        Some(rule_id),
    )?;

    repo.update_assignment_rule(rule_id, &rule)
        .map_err(ServiceError::from)
}

pub fn delete_assignment_rule<R>(
    repo: &R,
    user: &AuthenticatedUser,
    rule_id: i32,
) -> ServiceResult<()>
where
    R: RateWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    repo.delete_assignment_rule(rule_id, user.hub_id)
        .map_err(ServiceError::from)
}

pub fn create_truck<R>(repo: &R, user: &AuthenticatedUser, form: TruckForm) -> ServiceResult<Truck>
where
    R: RateWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    let truck = form.into_new_truck(user.hub_id).map_err(form_error)?;
    let created = repo.create_truck(&truck).map_err(ServiceError::from)?;
    info!("Created truck {} in hub {}", created.unit_number, user.hub_id);
    Ok(created)
}

pub fn update_truck<R>(
    repo: &R,
    user: &AuthenticatedUser,
    truck_id: i32,
    form: TruckForm,
) -> ServiceResult<Truck>
where
    R: RateWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    let truck = form.into_new_truck(user.hub_id).map_err(form_error)?;
    repo.update_truck(truck_id, &truck)
        .map_err(ServiceError::from)
}

pub fn delete_truck<R>(repo: &R, user: &AuthenticatedUser, truck_id: i32) -> ServiceResult<()>
where
    R: RateWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    repo.delete_truck(truck_id, user.hub_id)
        .map_err(ServiceError::from)
}

fn ensure_tier_fits(
    tiers: &[FuelPriceTier],
    miles_min: f64,
    miles_max: Option<f64>,
    exclude: Option<i32>,
) -> ServiceResult<()> {
    match tiers
        .iter()
        .filter(|tier| Some(tier.id) != exclude)
        .find(|tier| tier.overlaps(miles_min, miles_max))
    {
        Some(tier) => Err(ServiceError::Conflict(format!(
            "miles overlap fuel tier {}",
            tier.id
        ))),
        None => Ok(()),
    }
}

pub fn create_fuel_tier<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: FuelTierForm,
) -> ServiceResult<FuelPriceTier>
where
    R: RateReader + RateWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    let tier = form.into_new_fuel_tier(user.hub_id).map_err(form_error)?;

    let rates = repo
        .load_rate_context(user.hub_id)
        .map_err(ServiceError::from)?;
    ensure_tier_fits(&rates.fuel_tiers, tier.miles_min, tier.miles_max, None)?;

    let created = repo.create_fuel_tier(&tier).map_err(ServiceError::from)?;
    info!("Created fuel tier {} in hub {}", created.id, user.hub_id);
    Ok(created)
}

pub fn update_fuel_tier<R>(
    repo: &R,
    user: &AuthenticatedUser,
    tier_id: i32,
    form: FuelTierForm,
) -> ServiceResult<FuelPriceTier>
where
    R: RateReader + RateWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    let tier = form.into_new_fuel_tier(user.hub_id).map_err(form_error)?;

    let rates = repo
        .load_rate_context(user.hub_id)
        .map_err(ServiceError::from)?;
    ensure_tier_fits(
        &rates.fuel_tiers,
        tier.miles_min,
        tier.miles_max,
        Some(tier_id),
    )?;

    repo.update_fuel_tier(tier_id, &tier)
        .map_err(ServiceError::from)
}

pub fn delete_fuel_tier<R>(repo: &R, user: &AuthenticatedUser, tier_id: i32) -> ServiceResult<()>
where
    R: RateWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    repo.delete_fuel_tier(tier_id, user.hub_id)
        .map_err(ServiceError::from)
}

pub fn create_additional_service<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AdditionalServiceForm,
) -> ServiceResult<AdditionalService>
where
    R: RateWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    let service = form
        .into_new_additional_service(user.hub_id)
        .map_err(form_error)?;
    let created = repo
        .create_additional_service(&service)
        .map_err(ServiceError::from)?;
    info!("Created additional service {} in hub {}", created.id, user.hub_id);
    Ok(created)
}

pub fn update_additional_service<R>(
    repo: &R,
    user: &AuthenticatedUser,
    service_id: i32,
    form: AdditionalServiceForm,
) -> ServiceResult<AdditionalService>
where
    R: RateWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    let service = form
        .into_new_additional_service(user.hub_id)
        .map_err(form_error)?;
    repo.update_additional_service(service_id, &service)
        .map_err(ServiceError::from)
}

/// Removes a service from the catalog and from every estimate that selected it.
pub fn delete_additional_service<R>(
    repo: &R,
    user: &AuthenticatedUser,
    service_id: i32,
) -> ServiceResult<()>
where
    R: RateWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    repo.delete_additional_service(service_id, user.hub_id)
        .map_err(ServiceError::from)
}

/// Settings of the user's hub, or the defaults when none were saved.
pub fn load_hub_settings<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<HubSettings>
where
    R: HubReader + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    let settings = repo
        .get_hub_settings(user.hub_id)
        .map_err(ServiceError::from)?;
    Ok(settings.unwrap_or_else(|| HubSettings::defaults(user.hub_id)))
}

/// Saves the depot, the truck fee and the hub's own Google Maps key.
///
/// A new depot address is geocoded when a resolver is available, with the
/// key submitted alongside it; a failed lookup rejects the change.
pub fn update_hub_settings<R>(
    repo: &R,
    geo: Option<&dyn GeoResolver>,
    user: &AuthenticatedUser,
    form: HubSettingsForm,
) -> ServiceResult<HubSettings>
where
    R: HubReader + HubWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    let update = form.into_update_hub_settings().map_err(form_error)?;

    let mut settings = repo
        .get_hub_settings(user.hub_id)
        .map_err(ServiceError::from)?
        .unwrap_or_else(|| HubSettings::defaults(user.hub_id));

    if let Some(api_key) = update.google_maps_api_key {
        settings.google_maps_api_key = api_key;
    }

    match update.depot_address {
        Some(Some(address)) => {
            let hub_geo = HubGeo::resolve(geo, settings.google_maps_api_key.as_deref());
            settings.depot = match hub_geo {
                Some(hub_geo) => Some(
                    hub_geo
                        .get()
                        .geocode(&address)
                        .map_err(|err| ServiceError::ExternalLookup(err.to_string()))?,
                ),
                None => {
                    warn!(
                        "Depot of hub {} saved without coordinates: geo lookups are not configured",
                        user.hub_id
                    );
                    None
                }
            };
            settings.depot_address = Some(address);
        }
        Some(None) => {
            settings.depot_address = None;
            settings.depot = None;
        }
        None => {}
    }
    if let Some(truck_rate) = update.truck_rate {
        settings.truck_rate = truck_rate;
    }

    let saved = repo
        .save_hub_settings(&settings)
        .map_err(ServiceError::from)?;
    info!("Saved settings of hub {}", user.hub_id);
    Ok(saved)
}

/// Sizing catalog of the user's hub.
#[derive(Debug, Serialize)]
pub struct CatalogData {
    pub inventory_items: Vec<InventoryItem>,
    pub residence_sizes: Vec<ResidenceSize>,
    pub lead_sources: Vec<LeadSource>,
}

/// Catalog entries operators pick from while sizing an estimate.
pub fn load_catalog<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<CatalogData>
where
    R: CatalogReader + SourceReader + ?Sized,
{
    authorize(user, SERVICE_ACCESS_ROLE)?;
    Ok(CatalogData {
        inventory_items: repo
            .list_inventory_items(user.hub_id)
            .map_err(ServiceError::from)?,
        residence_sizes: repo
            .list_residence_sizes(user.hub_id)
            .map_err(ServiceError::from)?,
        lead_sources: repo
            .list_lead_sources(user.hub_id, false)
            .map_err(ServiceError::from)?,
    })
}

pub fn create_inventory_item<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: InventoryItemForm,
) -> ServiceResult<InventoryItem>
where
    R: CatalogWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    let item = form
        .into_new_inventory_item(user.hub_id)
        .map_err(form_error)?;
    repo.create_inventory_item(&item)
        .map_err(ServiceError::from)
}

pub fn delete_inventory_item<R>(
    repo: &R,
    user: &AuthenticatedUser,
    item_id: i32,
) -> ServiceResult<()>
where
    R: CatalogWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    repo.delete_inventory_item(item_id, user.hub_id)
        .map_err(ServiceError::from)
}

pub fn create_residence_size<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ResidenceSizeForm,
) -> ServiceResult<ResidenceSize>
where
    R: CatalogReader + CatalogWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    let size = form
        .into_new_residence_size(user.hub_id)
        .map_err(form_error)?;

    if repo
        .find_residence_size(user.hub_id, &size.size_description)
        .map_err(ServiceError::from)?
        .is_some()
    {
        return Err(ServiceError::Conflict(format!(
            "residence size `{}` already exists",
            size.size_description
        )));
    }

    repo.create_residence_size(&size)
        .map_err(ServiceError::from)
}

pub fn delete_residence_size<R>(
    repo: &R,
    user: &AuthenticatedUser,
    size_id: i32,
) -> ServiceResult<()>
where
    R: CatalogWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    repo.delete_residence_size(size_id, user.hub_id)
        .map_err(ServiceError::from)
}

/// Adds a lead source; names are unique per hub regardless of case.
pub fn create_lead_source<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: LeadSourceForm,
) -> ServiceResult<LeadSource>
where
    R: SourceReader + SourceWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    let source = form.into_new_lead_source(user.hub_id).map_err(form_error)?;

    if repo
        .find_lead_source(user.hub_id, &source.name)
        .map_err(ServiceError::from)?
        .is_some()
    {
        return Err(ServiceError::Conflict(format!(
            "lead source `{}` already exists",
            source.name
        )));
    }

    let created = repo
        .create_lead_source(&source)
        .map_err(ServiceError::from)?;
    info!("Created lead source {} in hub {}", created.id, user.hub_id);
    Ok(created)
}

pub fn delete_lead_source<R>(
    repo: &R,
    user: &AuthenticatedUser,
    source_id: i32,
) -> ServiceResult<()>
where
    R: SourceWriter + ?Sized,
{
    authorize(user, SETTINGS_ACCESS_ROLE)?;
    repo.delete_lead_source(source_id, user.hub_id)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    use crate::domain::stop::Coordinates;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB_ID, StubGeo, sample_rates, user_with_roles};

    fn admin() -> AuthenticatedUser {
        user_with_roles(&["admin"])
    }

    #[test]
    fn rate_tables_require_settings_role() {
        let repo = MockRepository::new();
        let user = user_with_roles(&["crm"]);
        assert!(matches!(
            load_rates(&repo, &user),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn overlapping_rule_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_load_rate_context()
            .returning(|_| Ok(sample_rates()));
        repo.expect_create_assignment_rule().never();
        let form = AssignmentRuleForm {
            hours_min: 4.0,
            hours_max: Some(8.0),
            number_of_movers: 2,
        };

        let result = create_assignment_rule(&repo, &admin(), form);
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn adjacent_rule_is_accepted() {
        let mut repo = MockRepository::new();
        repo.expect_load_rate_context()
            .returning(|_| Ok(sample_rates()));
        repo.expect_create_assignment_rule()
            .withf(|rule| rule.hub_id == HUB_ID && rule.hours_max == Some(6.0))
            .returning(|rule| {
                Ok(MoverAssignmentRule {
                    id: 2,
                    hub_id: rule.hub_id,
                    hours_min: rule.hours_min,
                    hours_max: rule.hours_max,
                    number_of_movers: rule.number_of_movers,
                })
            });
        let form = AssignmentRuleForm {
            hours_min: 0.0,
            hours_max: Some(6.0),
            number_of_movers: 2,
        };

        let created = create_assignment_rule(&repo, &admin(), form).unwrap();
        assert_eq!(created.id, 2);
    }

    #[test]
    fn updating_a_rule_ignores_its_own_range() {
        let mut repo = MockRepository::new();
        repo.expect_load_rate_context()
            .returning(|_| Ok(sample_rates()));
        repo.expect_update_assignment_rule()
            .with(eq(1), mockall::predicate::always())
            .returning(|id, rule| {
                Ok(MoverAssignmentRule {
                    id,
                    hub_id: rule.hub_id,
                    hours_min: rule.hours_min,
                    hours_max: rule.hours_max,
                    number_of_movers: rule.number_of_movers,
                })
            });
        let form = AssignmentRuleForm {
            hours_min: 5.0,
            hours_max: None,
            number_of_movers: 3,
        };

        let updated = update_assignment_rule(&repo, &admin(), 1, form).unwrap();
        assert_eq!(updated.hours_min, 5.0);
    }

    #[test]
    fn overlapping_fuel_tier_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_load_rate_context()
            .returning(|_| Ok(sample_rates()));
        repo.expect_create_fuel_tier().never();
        let form = FuelTierForm {
            miles_min: 200.0,
            miles_max: None,
            price_per_gallon: 4.0,
        };

        let result = create_fuel_tier(&repo, &admin(), form);
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn duplicate_team_size_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_load_rate_context()
            .returning(|_| Ok(sample_rates()));
        repo.expect_create_mover_team().never();
        let form = MoverTeamForm {
            number_of_movers: 3,
            lbs_per_hour: 160.0,
            price_per_hour: 120.0,
        };

        let result = create_mover_team(&repo, &admin(), form);
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn depot_address_is_geocoded() {
        let depot = Coordinates::new(30.3, -97.8);
        let mut repo = MockRepository::new();
        repo.expect_get_hub_settings().returning(|_| Ok(None));
        repo.expect_save_hub_settings()
            .withf(move |settings| {
                settings.hub_id == HUB_ID
                    && settings.depot == Some(depot)
                    && settings.depot_address.as_deref() == Some("1 Depot Rd, Austin, TX 78745")
                    && settings.truck_rate == 150.0
            })
            .returning(|settings| Ok(settings.clone()));
        let geo = StubGeo::default().with_place("78745", depot);
        let form = HubSettingsForm {
            depot_address: Some("1 Depot Rd, Austin, TX 78745".to_string()),
            truck_rate: None,
            google_maps_api_key: None,
        };

        let saved = update_hub_settings(&repo, Some(&geo), &admin(), form).unwrap();
        assert_eq!(saved.depot, Some(depot));
    }

    #[test]
    fn depot_lookup_uses_the_submitted_hub_key() {
        let depot = Coordinates::new(30.3, -97.8);
        let mut repo = MockRepository::new();
        repo.expect_get_hub_settings().returning(|_| Ok(None));
        repo.expect_save_hub_settings()
            .withf(move |settings| {
                settings.depot == Some(depot)
                    && settings.google_maps_api_key.as_deref() == Some("hub-key")
            })
            .returning(|settings| Ok(settings.clone()));
        let geo = StubGeo::unkeyed().with_place("78745", depot);
        let form = HubSettingsForm {
            depot_address: Some("1 Depot Rd, Austin, TX 78745".to_string()),
            truck_rate: None,
            google_maps_api_key: Some("hub-key".to_string()),
        };

        let saved = update_hub_settings(&repo, Some(&geo), &admin(), form).unwrap();
        assert_eq!(saved.depot, Some(depot));
    }

    #[test]
    fn unkeyed_resolver_saves_depot_without_coordinates() {
        let mut repo = MockRepository::new();
        repo.expect_get_hub_settings().returning(|_| Ok(None));
        repo.expect_save_hub_settings()
            .withf(|settings| settings.depot.is_none() && settings.depot_address.is_some())
            .returning(|settings| Ok(settings.clone()));
        let geo = StubGeo::unkeyed().with_place("78745", Coordinates::new(30.3, -97.8));
        let form = HubSettingsForm {
            depot_address: Some("1 Depot Rd, Austin, TX 78745".to_string()),
            truck_rate: None,
            google_maps_api_key: None,
        };

        update_hub_settings(&repo, Some(&geo), &admin(), form).unwrap();
        assert!(geo.geocoded.lock().unwrap().is_empty());
    }

    #[test]
    fn failed_depot_lookup_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_hub_settings().returning(|_| Ok(None));
        repo.expect_save_hub_settings().never();
        let geo = StubGeo::default();
        let form = HubSettingsForm {
            depot_address: Some("Nowhere 00000".to_string()),
            truck_rate: None,
            google_maps_api_key: None,
        };

        let result = update_hub_settings(&repo, Some(&geo), &admin(), form);
        assert!(matches!(result, Err(ServiceError::ExternalLookup(_))));
    }

    #[test]
    fn missing_settings_fall_back_to_defaults() {
        let mut repo = MockRepository::new();
        repo.expect_get_hub_settings().returning(|_| Ok(None));

        let settings = load_hub_settings(&repo, &admin()).unwrap();
        assert_eq!(settings, HubSettings::defaults(HUB_ID));
    }

    #[test]
    fn duplicate_residence_size_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_find_residence_size()
            .returning(|hub_id, description| {
                Ok(Some(ResidenceSize {
                    id: 1,
                    hub_id,
                    size_description: description.to_string(),
                    size_type: "apartment".to_string(),
                    weight_lbs: 3000.0,
                    volume_cf: None,
                }))
            });
        repo.expect_create_residence_size().never();
        let form = ResidenceSizeForm {
            size_description: "Studio".to_string(),
            size_type: "apartment".to_string(),
            weight_lbs: 2000.0,
            volume_cf: None,
        };

        let result = create_residence_size(&repo, &admin(), form);
        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn catalog_is_readable_by_operators() {
        let mut repo = MockRepository::new();
        repo.expect_list_inventory_items()
            .with(eq(HUB_ID))
            .returning(|_| Ok(Vec::new()));
        repo.expect_list_residence_sizes()
            .with(eq(HUB_ID))
            .returning(|_| Ok(Vec::new()));
        repo.expect_list_lead_sources()
            .with(eq(HUB_ID), eq(false))
            .returning(|_, _| Ok(Vec::new()));
        let user = user_with_roles(&["crm"]);

        let catalog = load_catalog(&repo, &user).unwrap();
        assert!(catalog.inventory_items.is_empty());
        assert!(catalog.lead_sources.is_empty());
    }

    #[test]
    fn duplicate_lead_source_is_a_conflict() {
        let mut repo = MockRepository::new();
        repo.expect_find_lead_source()
            .withf(|hub_id, name| *hub_id == HUB_ID && name == "Google")
            .returning(|hub_id, _| {
                Ok(Some(LeadSource {
                    id: 1,
                    hub_id,
                    name: "google".to_string(),
                    is_public: true,
                }))
            });
        repo.expect_create_lead_source().never();
        let form = LeadSourceForm {
            name: "Google".to_string(),
            is_public: true,
        };

        assert!(matches!(
            create_lead_source(&repo, &admin(), form),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn new_lead_source_is_stored_for_the_hub() {
        let mut repo = MockRepository::new();
        repo.expect_find_lead_source().returning(|_, _| Ok(None));
        repo.expect_create_lead_source()
            .withf(|source| source.hub_id == HUB_ID && source.name == "Referral")
            .times(1)
            .returning(|source| {
                Ok(LeadSource {
                    id: 6,
                    hub_id: source.hub_id,
                    name: source.name.clone(),
                    is_public: source.is_public,
                })
            });
        let form = LeadSourceForm {
            name: " Referral ".to_string(),
            is_public: true,
        };

        let created = create_lead_source(&repo, &admin(), form).unwrap();
        assert_eq!(created.id, 6);
    }

    #[test]
    fn lead_sources_require_settings_role() {
        let repo = MockRepository::new();
        let user = user_with_roles(&["crm"]);
        assert!(matches!(
            delete_lead_source(&repo, &user, 6),
            Err(ServiceError::Unauthorized)
        ));
    }
}
