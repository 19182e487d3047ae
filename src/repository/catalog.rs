use std::collections::HashSet;

use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::catalog::{
        Assignment, EstimateSizing, InventoryItem as DomainInventoryItem, LoadLine,
        NewInventoryItem as DomainNewInventoryItem, NewResidenceSize as DomainNewResidenceSize,
        ResidenceSize as DomainResidenceSize, ServiceLine,
    },
    models::catalog::{
        InventoryItem as DbInventoryItem, NewEstimateAdditionalService,
        NewEstimateInventoryItem, NewEstimateResidenceSize, NewInventoryItem as DbNewInventoryItem,
        NewResidenceSize as DbNewResidenceSize, ResidenceSize as DbResidenceSize,
    },
    repository::{
        CatalogReader, CatalogWriter, DieselRepository, SizingReader, SizingWriter,
        estimate::find_estimate,
    },
};

/// Distinct catalog ids referenced by `assignments`.
fn distinct_ids(assignments: &[Assignment]) -> Vec<i32> {
    let ids: HashSet<i32> = assignments.iter().map(|assignment| assignment.id).collect();
    ids.into_iter().collect()
}

fn ensure_all_found(found: i64, expected: usize) -> RepositoryResult<()> {
    if found as usize == expected {
        Ok(())
    } else {
        Err(RepositoryError::NotFound)
    }
}

impl SizingReader for DieselRepository {
    fn load_estimate_sizing(&self, estimate_id: i32, hub_id: i32) -> RepositoryResult<EstimateSizing> {
        use crate::schema::{
            additional_services, estimate_additional_services, estimate_inventory_items,
            estimate_residence_sizes, inventory_items, residence_sizes,
        };

        let mut conn = self.conn()?;
        find_estimate(&mut conn, estimate_id, hub_id)?;

        let inventory = estimate_inventory_items::table
            .inner_join(inventory_items::table)
            .filter(estimate_inventory_items::estimate_id.eq(estimate_id))
            .filter(inventory_items::hub_id.eq(hub_id))
            .order(estimate_inventory_items::id.asc())
            .select((
                estimate_inventory_items::quantity,
                inventory_items::weight_lbs,
                inventory_items::volume_cf,
            ))
            .load::<(i32, f64, f64)>(&mut conn)?
            .into_iter()
            .map(|(quantity, weight_lbs, volume_cf)| LoadLine {
                quantity,
                weight_lbs,
                volume_cf: Some(volume_cf),
            })
            .collect();

        let residence_sizes = estimate_residence_sizes::table
            .inner_join(residence_sizes::table)
            .filter(estimate_residence_sizes::estimate_id.eq(estimate_id))
            .filter(residence_sizes::hub_id.eq(hub_id))
            .order(estimate_residence_sizes::id.asc())
            .select((
                estimate_residence_sizes::quantity,
                residence_sizes::weight_lbs,
                residence_sizes::volume_cf,
            ))
            .load::<(i32, f64, Option<f64>)>(&mut conn)?
            .into_iter()
            .map(|(quantity, weight_lbs, volume_cf)| LoadLine {
                quantity,
                weight_lbs,
                volume_cf,
            })
            .collect();

        let services = estimate_additional_services::table
            .inner_join(additional_services::table)
            .filter(estimate_additional_services::estimate_id.eq(estimate_id))
            .filter(additional_services::hub_id.eq(hub_id))
            .order(estimate_additional_services::id.asc())
            .select((
                additional_services::id,
                additional_services::name,
                estimate_additional_services::quantity,
                additional_services::price,
                additional_services::movers_required,
            ))
            .load::<(i32, String, i32, f64, i32)>(&mut conn)?
            .into_iter()
            .map(
                |(additional_service_id, name, quantity, price, movers_required)| ServiceLine {
                    additional_service_id,
                    name,
                    quantity,
                    price,
                    movers_required,
                },
            )
            .collect();

        Ok(EstimateSizing {
            inventory,
            residence_sizes,
            services,
        })
    }
}

impl SizingWriter for DieselRepository {
    fn replace_inventory_items(
        &self,
        estimate_id: i32,
        hub_id: i32,
        items: &[Assignment],
    ) -> RepositoryResult<()> {
        use crate::schema::{estimate_inventory_items, inventory_items};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            find_estimate(conn, estimate_id, hub_id)?;

            let ids = distinct_ids(items);
            let found = inventory_items::table
                .filter(inventory_items::hub_id.eq(hub_id))
                .filter(inventory_items::id.eq_any(&ids))
                .count()
                .get_result::<i64>(conn)?;
            ensure_all_found(found, ids.len())?;

            diesel::delete(
                estimate_inventory_items::table
                    .filter(estimate_inventory_items::estimate_id.eq(estimate_id)),
            )
            .execute(conn)?;

            if !items.is_empty() {
                let payload: Vec<NewEstimateInventoryItem> = items
                    .iter()
                    .map(|item| NewEstimateInventoryItem {
                        estimate_id,
                        inventory_item_id: item.id,
                        quantity: item.quantity,
                    })
                    .collect();

                diesel::insert_into(estimate_inventory_items::table)
                    .values(&payload)
                    .execute(conn)?;
            }

            Ok(())
        })
    }

    fn replace_residence_sizes(
        &self,
        estimate_id: i32,
        hub_id: i32,
        sizes: &[Assignment],
    ) -> RepositoryResult<()> {
        use crate::schema::{estimate_residence_sizes, residence_sizes};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            find_estimate(conn, estimate_id, hub_id)?;

            let ids = distinct_ids(sizes);
            let found = residence_sizes::table
                .filter(residence_sizes::hub_id.eq(hub_id))
                .filter(residence_sizes::id.eq_any(&ids))
                .count()
                .get_result::<i64>(conn)?;
            ensure_all_found(found, ids.len())?;

            diesel::delete(
                estimate_residence_sizes::table
                    .filter(estimate_residence_sizes::estimate_id.eq(estimate_id)),
            )
            .execute(conn)?;

            if !sizes.is_empty() {
                let payload: Vec<NewEstimateResidenceSize> = sizes
                    .iter()
                    .map(|size| NewEstimateResidenceSize {
                        estimate_id,
                        residence_size_id: size.id,
                        quantity: size.quantity,
                    })
                    .collect();

                diesel::insert_into(estimate_residence_sizes::table)
                    .values(&payload)
                    .execute(conn)?;
            }

            Ok(())
        })
    }

    fn replace_additional_services(
        &self,
        estimate_id: i32,
        hub_id: i32,
        services: &[Assignment],
    ) -> RepositoryResult<()> {
        use crate::schema::{additional_services, estimate_additional_services};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            find_estimate(conn, estimate_id, hub_id)?;

            let ids = distinct_ids(services);
            let found = additional_services::table
                .filter(additional_services::hub_id.eq(hub_id))
                .filter(additional_services::id.eq_any(&ids))
                .count()
                .get_result::<i64>(conn)?;
            ensure_all_found(found, ids.len())?;

            diesel::delete(
                estimate_additional_services::table
                    .filter(estimate_additional_services::estimate_id.eq(estimate_id)),
            )
            .execute(conn)?;

            if !services.is_empty() {
                let payload: Vec<NewEstimateAdditionalService> = services
                    .iter()
                    .map(|service| NewEstimateAdditionalService {
                        estimate_id,
                        additional_service_id: service.id,
                        quantity: service.quantity,
                    })
                    .collect();

                diesel::insert_into(estimate_additional_services::table)
                    .values(&payload)
                    .execute(conn)?;
            }

            Ok(())
        })
    }
}

impl CatalogReader for DieselRepository {
    fn list_inventory_items(&self, hub_id: i32) -> RepositoryResult<Vec<DomainInventoryItem>> {
        use crate::schema::inventory_items;

        let mut conn = self.conn()?;
        let items = inventory_items::table
            .filter(inventory_items::hub_id.eq(hub_id))
            .order(inventory_items::name.asc())
            .load::<DbInventoryItem>(&mut conn)?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    fn list_residence_sizes(&self, hub_id: i32) -> RepositoryResult<Vec<DomainResidenceSize>> {
        use crate::schema::residence_sizes;

        let mut conn = self.conn()?;
        let sizes = residence_sizes::table
            .filter(residence_sizes::hub_id.eq(hub_id))
            .order((residence_sizes::weight_lbs.asc(), residence_sizes::id.asc()))
            .load::<DbResidenceSize>(&mut conn)?;

        Ok(sizes.into_iter().map(Into::into).collect())
    }

    fn find_residence_size(
        &self,
        hub_id: i32,
        description: &str,
    ) -> RepositoryResult<Option<DomainResidenceSize>> {
        let description = description.trim();
        let sizes = self.list_residence_sizes(hub_id)?;

        Ok(sizes
            .into_iter()
            .find(|size| size.size_description.trim().eq_ignore_ascii_case(description)))
    }
}

impl CatalogWriter for DieselRepository {
    fn create_inventory_item(
        &self,
        new_item: &DomainNewInventoryItem,
    ) -> RepositoryResult<DomainInventoryItem> {
        use crate::schema::inventory_items;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(inventory_items::table)
            .values(&DbNewInventoryItem::from(new_item))
            .get_result::<DbInventoryItem>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_inventory_item(&self, item_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::{estimate_inventory_items, inventory_items};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let target = inventory_items::table
                .filter(inventory_items::id.eq(item_id))
                .filter(inventory_items::hub_id.eq(hub_id));

            let deleted = diesel::delete(target).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            diesel::delete(
                estimate_inventory_items::table
                    .filter(estimate_inventory_items::inventory_item_id.eq(item_id)),
            )
            .execute(conn)?;

            Ok(())
        })
    }

    fn create_residence_size(
        &self,
        new_size: &DomainNewResidenceSize,
    ) -> RepositoryResult<DomainResidenceSize> {
        use crate::schema::residence_sizes;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(residence_sizes::table)
            .values(&DbNewResidenceSize::from(new_size))
            .get_result::<DbResidenceSize>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_residence_size(&self, size_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::{estimate_residence_sizes, residence_sizes};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let target = residence_sizes::table
                .filter(residence_sizes::id.eq(size_id))
                .filter(residence_sizes::hub_id.eq(hub_id));

            let deleted = diesel::delete(target).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            diesel::delete(
                estimate_residence_sizes::table
                    .filter(estimate_residence_sizes::residence_size_id.eq(size_id)),
            )
            .execute(conn)?;

            Ok(())
        })
    }
}
