use mockall::mock;

use super::{
    CatalogReader, CatalogWriter, CustomerReader, CustomerWriter, EstimateReader, EstimateWriter, HubReader,
    HubWriter, LineItemWriter, RateReader, RateWriter, SizingReader, SizingWriter, SourceReader,
    SourceWriter,
};
use crate::domain::{
    catalog::{
        Assignment, EstimateSizing, InventoryItem, NewInventoryItem, NewResidenceSize, ResidenceSize,
    },
    customer::{Customer, CustomerListQuery, LeadSource, NewCustomer, NewLeadSource},
    estimate::{Estimate, EstimateCommit, EstimateListQuery, NewEstimate, UpdateEstimate},
    hub::HubSettings,
    line_item::{NewLineItem, UpdateLineItem},
    rates::{
        AdditionalService, FuelPriceTier, MoverAssignmentRule, MoverTeam, NewAdditionalService,
        NewFuelPriceTier, NewMoverAssignmentRule, NewMoverTeam, NewTruck, RateContext, Truck,
    },
};
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    /// Every repository trait on one mock, for flows that touch several tables.
    pub Repository {}

    impl EstimateReader for Repository {
        fn get_estimate_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Estimate>>;
        fn list_estimates(&self, query: EstimateListQuery) -> RepositoryResult<(usize, Vec<Estimate>)>;
    }

    impl EstimateWriter for Repository {
        fn create_estimate(&self, new_estimate: &NewEstimate) -> RepositoryResult<Estimate>;
        fn update_estimate(&self, estimate_id: i32, hub_id: i32, updates: &UpdateEstimate) -> RepositoryResult<Estimate>;
        fn delete_estimate(&self, estimate_id: i32, hub_id: i32) -> RepositoryResult<()>;
        fn commit_estimate(&self, estimate_id: i32, hub_id: i32, commit: &EstimateCommit) -> RepositoryResult<Estimate>;
    }

    impl LineItemWriter for Repository {
        fn create_line_item(&self, estimate_id: i32, hub_id: i32, new_item: &NewLineItem) -> RepositoryResult<Estimate>;
        fn update_line_item(&self, line_item_id: i32, estimate_id: i32, hub_id: i32, updates: &UpdateLineItem) -> RepositoryResult<Estimate>;
        fn delete_line_item(&self, line_item_id: i32, estimate_id: i32, hub_id: i32) -> RepositoryResult<Estimate>;
        fn recompute_total_from_line_items(&self, estimate_id: i32, hub_id: i32) -> RepositoryResult<Estimate>;
    }

    impl SizingReader for Repository {
        fn load_estimate_sizing(&self, estimate_id: i32, hub_id: i32) -> RepositoryResult<EstimateSizing>;
    }

    impl SizingWriter for Repository {
        fn replace_inventory_items(&self, estimate_id: i32, hub_id: i32, items: &[Assignment]) -> RepositoryResult<()>;
        fn replace_residence_sizes(&self, estimate_id: i32, hub_id: i32, sizes: &[Assignment]) -> RepositoryResult<()>;
        fn replace_additional_services(&self, estimate_id: i32, hub_id: i32, services: &[Assignment]) -> RepositoryResult<()>;
    }

    impl CatalogReader for Repository {
        fn list_inventory_items(&self, hub_id: i32) -> RepositoryResult<Vec<InventoryItem>>;
        fn list_residence_sizes(&self, hub_id: i32) -> RepositoryResult<Vec<ResidenceSize>>;
        fn find_residence_size(&self, hub_id: i32, description: &str) -> RepositoryResult<Option<ResidenceSize>>;
    }

    impl CatalogWriter for Repository {
        fn create_inventory_item(&self, new_item: &NewInventoryItem) -> RepositoryResult<InventoryItem>;
        fn delete_inventory_item(&self, item_id: i32, hub_id: i32) -> RepositoryResult<()>;
        fn create_residence_size(&self, new_size: &NewResidenceSize) -> RepositoryResult<ResidenceSize>;
        fn delete_residence_size(&self, size_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl RateReader for Repository {
        fn load_rate_context(&self, hub_id: i32) -> RepositoryResult<RateContext>;
    }

    impl RateWriter for Repository {
        fn create_mover_team(&self, new_team: &NewMoverTeam) -> RepositoryResult<MoverTeam>;
        fn update_mover_team(&self, team_id: i32, team: &NewMoverTeam) -> RepositoryResult<MoverTeam>;
        fn delete_mover_team(&self, team_id: i32, hub_id: i32) -> RepositoryResult<()>;
        fn create_assignment_rule(&self, new_rule: &NewMoverAssignmentRule) -> RepositoryResult<MoverAssignmentRule>;
        fn update_assignment_rule(&self, rule_id: i32, rule: &NewMoverAssignmentRule) -> RepositoryResult<MoverAssignmentRule>;
        fn delete_assignment_rule(&self, rule_id: i32, hub_id: i32) -> RepositoryResult<()>;
        fn create_truck(&self, new_truck: &NewTruck) -> RepositoryResult<Truck>;
        fn update_truck(&self, truck_id: i32, truck: &NewTruck) -> RepositoryResult<Truck>;
        fn delete_truck(&self, truck_id: i32, hub_id: i32) -> RepositoryResult<()>;
        fn create_fuel_tier(&self, new_tier: &NewFuelPriceTier) -> RepositoryResult<FuelPriceTier>;
        fn update_fuel_tier(&self, tier_id: i32, tier: &NewFuelPriceTier) -> RepositoryResult<FuelPriceTier>;
        fn delete_fuel_tier(&self, tier_id: i32, hub_id: i32) -> RepositoryResult<()>;
        fn create_additional_service(&self, new_service: &NewAdditionalService) -> RepositoryResult<AdditionalService>;
        fn update_additional_service(&self, service_id: i32, service: &NewAdditionalService) -> RepositoryResult<AdditionalService>;
        fn delete_additional_service(&self, service_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }

    impl HubReader for Repository {
        fn get_hub_settings(&self, hub_id: i32) -> RepositoryResult<Option<HubSettings>>;
    }

    impl HubWriter for Repository {
        fn save_hub_settings(&self, settings: &HubSettings) -> RepositoryResult<HubSettings>;
    }

    impl CustomerReader for Repository {
        fn get_customer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Customer>>;
        fn get_customer_by_email(&self, email: &str, hub_id: i32) -> RepositoryResult<Option<Customer>>;
        fn get_customer_by_phone(&self, phone: &str, hub_id: i32) -> RepositoryResult<Option<Customer>>;
        fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
    }

    impl CustomerWriter for Repository {
        fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
    }

    impl SourceReader for Repository {
        fn list_lead_sources(&self, hub_id: i32, public_only: bool) -> RepositoryResult<Vec<LeadSource>>;
        fn find_lead_source(&self, hub_id: i32, name: &str) -> RepositoryResult<Option<LeadSource>>;
    }

    impl SourceWriter for Repository {
        fn create_lead_source(&self, new_source: &NewLeadSource) -> RepositoryResult<LeadSource>;
        fn delete_lead_source(&self, source_id: i32, hub_id: i32) -> RepositoryResult<()>;
    }
}
