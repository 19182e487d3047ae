use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::catalog::{
    Assignment, EstimateSizing, InventoryItem, NewInventoryItem, NewResidenceSize, ResidenceSize,
};
use crate::domain::customer::{
    Customer, CustomerListQuery, LeadSource, NewCustomer, NewLeadSource,
};
use crate::domain::estimate::{
    Estimate, EstimateCommit, EstimateListQuery, NewEstimate, UpdateEstimate,
};
use crate::domain::hub::HubSettings;
use crate::domain::line_item::{NewLineItem, UpdateLineItem};
use crate::domain::rates::{
    AdditionalService, FuelPriceTier, MoverAssignmentRule, MoverTeam, NewAdditionalService,
    NewFuelPriceTier, NewMoverAssignmentRule, NewMoverTeam, NewTruck, RateContext, Truck,
};

pub mod catalog;
pub mod customer;
pub mod estimate;
pub mod hub;
pub mod line_item;
pub mod rates;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over estimates and their children.
pub trait EstimateReader {
    fn get_estimate_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Estimate>>;
    fn list_estimates(&self, query: EstimateListQuery) -> RepositoryResult<(usize, Vec<Estimate>)>;
}

/// Write operations over estimates.
pub trait EstimateWriter {
    fn create_estimate(&self, new_estimate: &NewEstimate) -> RepositoryResult<Estimate>;
    fn update_estimate(
        &self,
        estimate_id: i32,
        hub_id: i32,
        updates: &UpdateEstimate,
    ) -> RepositoryResult<Estimate>;
    fn delete_estimate(&self, estimate_id: i32, hub_id: i32) -> RepositoryResult<()>;
    /// Store the stop change, the resolved coordinates, the figures and the
    /// generated line items of a recalculation in one transaction.
    fn commit_estimate(
        &self,
        estimate_id: i32,
        hub_id: i32,
        commit: &EstimateCommit,
    ) -> RepositoryResult<Estimate>;
}

/// Manual line items. Every method refreshes the estimate totals before
/// returning the estimate.
pub trait LineItemWriter {
    fn create_line_item(
        &self,
        estimate_id: i32,
        hub_id: i32,
        new_item: &NewLineItem,
    ) -> RepositoryResult<Estimate>;
    fn update_line_item(
        &self,
        line_item_id: i32,
        estimate_id: i32,
        hub_id: i32,
        updates: &UpdateLineItem,
    ) -> RepositoryResult<Estimate>;
    fn delete_line_item(
        &self,
        line_item_id: i32,
        estimate_id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Estimate>;
    fn recompute_total_from_line_items(
        &self,
        estimate_id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Estimate>;
}

/// Catalog selections attached to an estimate.
pub trait SizingReader {
    fn load_estimate_sizing(&self, estimate_id: i32, hub_id: i32)
    -> RepositoryResult<EstimateSizing>;
}

/// Replace the catalog selections of an estimate. Catalog ids must belong to
/// the same hub.
pub trait SizingWriter {
    fn replace_inventory_items(
        &self,
        estimate_id: i32,
        hub_id: i32,
        items: &[Assignment],
    ) -> RepositoryResult<()>;
    fn replace_residence_sizes(
        &self,
        estimate_id: i32,
        hub_id: i32,
        sizes: &[Assignment],
    ) -> RepositoryResult<()>;
    fn replace_additional_services(
        &self,
        estimate_id: i32,
        hub_id: i32,
        services: &[Assignment],
    ) -> RepositoryResult<()>;
}

pub trait CatalogReader {
    fn list_inventory_items(&self, hub_id: i32) -> RepositoryResult<Vec<InventoryItem>>;
    fn list_residence_sizes(&self, hub_id: i32) -> RepositoryResult<Vec<ResidenceSize>>;
    /// Case-insensitive lookup by description.
    fn find_residence_size(
        &self,
        hub_id: i32,
        description: &str,
    ) -> RepositoryResult<Option<ResidenceSize>>;
}

pub trait CatalogWriter {
    fn create_inventory_item(&self, new_item: &NewInventoryItem)
    -> RepositoryResult<InventoryItem>;
    fn delete_inventory_item(&self, item_id: i32, hub_id: i32) -> RepositoryResult<()>;
    fn create_residence_size(&self, new_size: &NewResidenceSize)
    -> RepositoryResult<ResidenceSize>;
    fn delete_residence_size(&self, size_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

/// Rate tables of a hub, loaded together for one calculation.
pub trait RateReader {
    fn load_rate_context(&self, hub_id: i32) -> RepositoryResult<RateContext>;
}

/// Rate-table administration. Updates take the hub from the payload.
pub trait RateWriter {
    fn create_mover_team(&self, new_team: &NewMoverTeam) -> RepositoryResult<MoverTeam>;
    fn update_mover_team(&self, team_id: i32, team: &NewMoverTeam)
    -> RepositoryResult<MoverTeam>;
    fn delete_mover_team(&self, team_id: i32, hub_id: i32) -> RepositoryResult<()>;

    fn create_assignment_rule(
        &self,
        new_rule: &NewMoverAssignmentRule,
    ) -> RepositoryResult<MoverAssignmentRule>;
    fn update_assignment_rule(
        &self,
        rule_id: i32,
        rule: &NewMoverAssignmentRule,
    ) -> RepositoryResult<MoverAssignmentRule>;
    fn delete_assignment_rule(&self, rule_id: i32, hub_id: i32) -> RepositoryResult<()>;

    fn create_truck(&self, new_truck: &NewTruck) -> RepositoryResult<Truck>;
    fn update_truck(&self, truck_id: i32, truck: &NewTruck) -> RepositoryResult<Truck>;
    fn delete_truck(&self, truck_id: i32, hub_id: i32) -> RepositoryResult<()>;

    fn create_fuel_tier(&self, new_tier: &NewFuelPriceTier) -> RepositoryResult<FuelPriceTier>;
    fn update_fuel_tier(
        &self,
        tier_id: i32,
        tier: &NewFuelPriceTier,
    ) -> RepositoryResult<FuelPriceTier>;
    fn delete_fuel_tier(&self, tier_id: i32, hub_id: i32) -> RepositoryResult<()>;

    fn create_additional_service(
        &self,
        new_service: &NewAdditionalService,
    ) -> RepositoryResult<AdditionalService>;
    fn update_additional_service(
        &self,
        service_id: i32,
        service: &NewAdditionalService,
    ) -> RepositoryResult<AdditionalService>;
    fn delete_additional_service(&self, service_id: i32, hub_id: i32) -> RepositoryResult<()>;
}

pub trait HubReader {
    fn get_hub_settings(&self, hub_id: i32) -> RepositoryResult<Option<HubSettings>>;
}

pub trait HubWriter {
    /// Insert or overwrite the settings row of the hub.
    fn save_hub_settings(&self, settings: &HubSettings) -> RepositoryResult<HubSettings>;
}

/// Read-only operations over customer records.
pub trait CustomerReader {
    fn get_customer_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Customer>>;
    fn get_customer_by_email(&self, email: &str, hub_id: i32)
    -> RepositoryResult<Option<Customer>>;
    fn get_customer_by_phone(&self, phone: &str, hub_id: i32)
    -> RepositoryResult<Option<Customer>>;
    fn list_customers(&self, query: CustomerListQuery) -> RepositoryResult<(usize, Vec<Customer>)>;
}

/// Write operations over customer records.
pub trait CustomerWriter {
    fn create_customer(&self, new_customer: &NewCustomer) -> RepositoryResult<Customer>;
}

/// Lead sources recorded on customers and offered on the quote form.
pub trait SourceReader {
    fn list_lead_sources(&self, hub_id: i32, public_only: bool)
    -> RepositoryResult<Vec<LeadSource>>;
    /// Case-insensitive lookup by name.
    fn find_lead_source(&self, hub_id: i32, name: &str) -> RepositoryResult<Option<LeadSource>>;
}

pub trait SourceWriter {
    fn create_lead_source(&self, new_source: &NewLeadSource) -> RepositoryResult<LeadSource>;
    /// Customers that named the source keep their record without it.
    fn delete_lead_source(&self, source_id: i32, hub_id: i32) -> RepositoryResult<()>;
}
