use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::{
        estimate::Estimate as DomainEstimate,
        line_item::{
            LineItem as DomainLineItem, LineItemKind, LineItemTotals,
            NewLineItem as DomainNewLineItem, UpdateLineItem as DomainUpdateLineItem,
        },
    },
    models::line_item::{
        EstimateLineItem as DbLineItem, LineItemDetails as DbLineItemDetails,
        NewEstimateLineItem as DbNewLineItem,
    },
    repository::{
        DieselRepository, LineItemWriter,
        estimate::{find_estimate, load_estimate, write_figures},
    },
};

/// Derive `additional_services_cost` and the unpinned `total_cost` from the
/// stored line items.
fn refresh_totals(
    conn: &mut SqliteConnection,
    estimate_id: i32,
    hub_id: i32,
) -> RepositoryResult<DomainEstimate> {
    let mut estimate = load_estimate(conn, estimate_id, hub_id)?;
    let totals = LineItemTotals::from_items(&estimate.line_items);

    estimate.figures.additional_services_cost = totals.additional_services;
    estimate.figures.total_cost = estimate.figures.total_cost.recompute(|| totals.total);
    estimate.updated_at = chrono::Local::now().naive_utc();

    write_figures(conn, &estimate)?;
    Ok(estimate)
}

/// Manual row of the estimate, or `NotFound`.
fn find_manual_item(
    conn: &mut SqliteConnection,
    line_item_id: i32,
    estimate_id: i32,
) -> RepositoryResult<DomainLineItem> {
    use crate::schema::estimate_line_items;

    estimate_line_items::table
        .filter(estimate_line_items::id.eq(line_item_id))
        .filter(estimate_line_items::estimate_id.eq(estimate_id))
        .filter(estimate_line_items::item_type.eq(LineItemKind::Additional.as_str()))
        .first::<DbLineItem>(conn)
        .optional()?
        .map(Into::into)
        .ok_or(RepositoryError::NotFound)
}

impl LineItemWriter for DieselRepository {
    fn create_line_item(
        &self,
        estimate_id: i32,
        hub_id: i32,
        new_item: &DomainNewLineItem,
    ) -> RepositoryResult<DomainEstimate> {
        use crate::schema::estimate_line_items;

        let mut conn = self.conn()?;

        conn.transaction::<DomainEstimate, RepositoryError, _>(|conn| {
            find_estimate(conn, estimate_id, hub_id)?;

            diesel::insert_into(estimate_line_items::table)
                .values(&DbNewLineItem::from_domain(estimate_id, new_item))
                .execute(conn)?;

            refresh_totals(conn, estimate_id, hub_id)
        })
    }

    fn update_line_item(
        &self,
        line_item_id: i32,
        estimate_id: i32,
        hub_id: i32,
        updates: &DomainUpdateLineItem,
    ) -> RepositoryResult<DomainEstimate> {
        use crate::schema::estimate_line_items;

        let mut conn = self.conn()?;

        conn.transaction::<DomainEstimate, RepositoryError, _>(|conn| {
            find_estimate(conn, estimate_id, hub_id)?;

            let mut item = find_manual_item(conn, line_item_id, estimate_id)?;
            updates.apply_to(&mut item);

            diesel::update(estimate_line_items::table.filter(estimate_line_items::id.eq(item.id)))
                .set(&DbLineItemDetails::from(&item))
                .execute(conn)?;

            refresh_totals(conn, estimate_id, hub_id)
        })
    }

    fn delete_line_item(
        &self,
        line_item_id: i32,
        estimate_id: i32,
        hub_id: i32,
    ) -> RepositoryResult<DomainEstimate> {
        use crate::schema::estimate_line_items;

        let mut conn = self.conn()?;

        conn.transaction::<DomainEstimate, RepositoryError, _>(|conn| {
            find_estimate(conn, estimate_id, hub_id)?;

            let target = estimate_line_items::table
                .filter(estimate_line_items::id.eq(line_item_id))
                .filter(estimate_line_items::estimate_id.eq(estimate_id))
                .filter(estimate_line_items::item_type.eq(LineItemKind::Additional.as_str()));

            let deleted = diesel::delete(target).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            refresh_totals(conn, estimate_id, hub_id)
        })
    }

    fn recompute_total_from_line_items(
        &self,
        estimate_id: i32,
        hub_id: i32,
    ) -> RepositoryResult<DomainEstimate> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainEstimate, RepositoryError, _>(|conn| {
            refresh_totals(conn, estimate_id, hub_id)
        })
    }
}
