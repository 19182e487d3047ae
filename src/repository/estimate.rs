use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::{
        estimate::{
            Estimate as DomainEstimate, EstimateCommit, EstimateListQuery,
            NewEstimate as DomainNewEstimate, UpdateEstimate as DomainUpdateEstimate,
        },
        line_item::LineItem as DomainLineItem,
        stop::{Stop as DomainStop, StopChange, StopCoordinates},
    },
    models::{
        estimate::{
            Estimate as DbEstimate, EstimateDetails as DbEstimateDetails,
            EstimateFigures as DbEstimateFigures, NewEstimate as DbNewEstimate,
        },
        line_item::{EstimateLineItem as DbLineItem, NewEstimateLineItem as DbNewLineItem},
        stop::{
            EstimateStop as DbStop, NewEstimateStop as DbNewStop, StopDetails as DbStopDetails,
            StopPosition as DbStopPosition,
        },
    },
    repository::{DieselRepository, EstimateReader, EstimateWriter},
    sequencer,
};

/// Estimate row of `hub_id`, or `NotFound`.
pub(crate) fn find_estimate(
    conn: &mut SqliteConnection,
    estimate_id: i32,
    hub_id: i32,
) -> RepositoryResult<DbEstimate> {
    use crate::schema::estimates;

    estimates::table
        .filter(estimates::id.eq(estimate_id))
        .filter(estimates::hub_id.eq(hub_id))
        .first::<DbEstimate>(conn)
        .optional()?
        .ok_or(RepositoryError::NotFound)
}

pub(crate) fn load_stops(
    conn: &mut SqliteConnection,
    estimate_id: i32,
) -> RepositoryResult<Vec<DomainStop>> {
    use crate::schema::estimate_stops;

    let rows = estimate_stops::table
        .filter(estimate_stops::estimate_id.eq(estimate_id))
        .order((estimate_stops::sequence.asc(), estimate_stops::id.asc()))
        .load::<DbStop>(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub(crate) fn load_line_items(
    conn: &mut SqliteConnection,
    estimate_id: i32,
) -> RepositoryResult<Vec<DomainLineItem>> {
    use crate::schema::estimate_line_items;

    let rows = estimate_line_items::table
        .filter(estimate_line_items::estimate_id.eq(estimate_id))
        .order(estimate_line_items::id.asc())
        .load::<DbLineItem>(conn)?;

    Ok(rows.into_iter().map(Into::into).collect())
}

/// Estimate of `hub_id` with its stops and line items, or `NotFound`.
pub(crate) fn load_estimate(
    conn: &mut SqliteConnection,
    estimate_id: i32,
    hub_id: i32,
) -> RepositoryResult<DomainEstimate> {
    let estimate = find_estimate(conn, estimate_id, hub_id)?;
    let stops = load_stops(conn, estimate_id)?;
    let line_items = load_line_items(conn, estimate_id)?;
    Ok(estimate.into_domain(stops, line_items))
}

pub(crate) fn write_figures(
    conn: &mut SqliteConnection,
    estimate: &DomainEstimate,
) -> RepositoryResult<()> {
    use crate::schema::estimates;

    let figures = DbEstimateFigures::from_domain(&estimate.figures, estimate.updated_at);
    diesel::update(
        estimates::table
            .filter(estimates::id.eq(estimate.id))
            .filter(estimates::hub_id.eq(estimate.hub_id)),
    )
    .set(&figures)
    .execute(conn)?;
    Ok(())
}

impl EstimateReader for DieselRepository {
    fn get_estimate_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainEstimate>> {
        let mut conn = self.conn()?;
        match load_estimate(&mut conn, id, hub_id) {
            Ok(estimate) => Ok(Some(estimate)),
            Err(RepositoryError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn list_estimates(
        &self,
        query: EstimateListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainEstimate>)> {
        use crate::schema::{estimate_line_items, estimate_stops, estimates};

        let mut conn = self.conn()?;

        let EstimateListQuery {
            hub_id,
            status,
            customer_id,
            search,
            pagination,
        } = query;

        let search_pattern = search.as_ref().map(|term| format!("%{}%", term));

        let mut count_query = estimates::table
            .filter(estimates::hub_id.eq(hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(status) = status {
            count_query = count_query.filter(estimates::status.eq(status.as_str()));
        }

        if let Some(customer) = customer_id {
            count_query = count_query.filter(estimates::customer_id.eq(Some(customer)));
        }

        if let Some(ref pattern) = search_pattern {
            count_query = count_query.filter(estimates::notes.like(pattern.clone()));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = estimates::table
            .filter(estimates::hub_id.eq(hub_id))
            .into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(status) = status {
            items = items.filter(estimates::status.eq(status.as_str()));
        }

        if let Some(customer) = customer_id {
            items = items.filter(estimates::customer_id.eq(Some(customer)));
        }

        if let Some(ref pattern) = search_pattern {
            items = items.filter(estimates::notes.like(pattern.clone()));
        }

        items = items.order((estimates::created_at.desc(), estimates::id.desc()));

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_estimates = items.load::<DbEstimate>(&mut conn)?;
        if db_estimates.is_empty() {
            return Ok((total, Vec::new()));
        }

        let estimate_ids: Vec<i32> = db_estimates.iter().map(|estimate| estimate.id).collect();

        let mut stops_by_estimate: HashMap<i32, Vec<DomainStop>> = HashMap::new();
        let stop_rows = estimate_stops::table
            .filter(estimate_stops::estimate_id.eq_any(&estimate_ids))
            .order((estimate_stops::sequence.asc(), estimate_stops::id.asc()))
            .load::<DbStop>(&mut conn)?;
        for stop in stop_rows {
            stops_by_estimate
                .entry(stop.estimate_id)
                .or_default()
                .push(stop.into());
        }

        let mut items_by_estimate: HashMap<i32, Vec<DomainLineItem>> = HashMap::new();
        let item_rows = estimate_line_items::table
            .filter(estimate_line_items::estimate_id.eq_any(&estimate_ids))
            .order(estimate_line_items::id.asc())
            .load::<DbLineItem>(&mut conn)?;
        for item in item_rows {
            items_by_estimate
                .entry(item.estimate_id)
                .or_default()
                .push(item.into());
        }

        let estimates = db_estimates
            .into_iter()
            .map(|estimate| {
                let estimate_id = estimate.id;
                let stops = stops_by_estimate.remove(&estimate_id).unwrap_or_default();
                let line_items = items_by_estimate.remove(&estimate_id).unwrap_or_default();
                estimate.into_domain(stops, line_items)
            })
            .collect();

        Ok((total, estimates))
    }
}

impl EstimateWriter for DieselRepository {
    fn create_estimate(&self, new_estimate: &DomainNewEstimate) -> RepositoryResult<DomainEstimate> {
        use crate::schema::{estimate_stops, estimates};

        let mut conn = self.conn()?;

        conn.transaction::<DomainEstimate, RepositoryError, _>(|conn| {
            let db_new = DbNewEstimate::from(new_estimate);

            let created = diesel::insert_into(estimates::table)
                .values(&db_new)
                .get_result::<DbEstimate>(conn)?;

            let estimate_id = created.id;

            let figures = DbEstimateFigures::from_domain(&new_estimate.figures, new_estimate.updated_at);
            diesel::update(estimates::table.filter(estimates::id.eq(estimate_id)))
                .set(&figures)
                .execute(conn)?;

            if !new_estimate.stops.is_empty() {
                let mut stops: Vec<DomainStop> = new_estimate
                    .stops
                    .iter()
                    .enumerate()
                    .map(|(position, stop)| {
                        let mut stop = DomainStop::pending(estimate_id, stop);
                        stop.sequence = position as i32 + 1;
                        stop
                    })
                    .collect();
                sequencer::resequence(&mut stops);

                let payload: Vec<DbNewStop> = stops.iter().map(DbNewStop::from).collect();
                diesel::insert_into(estimate_stops::table)
                    .values(&payload)
                    .execute(conn)?;
            }

            load_estimate(conn, estimate_id, new_estimate.hub_id)
        })
    }

    fn update_estimate(
        &self,
        estimate_id: i32,
        hub_id: i32,
        updates: &DomainUpdateEstimate,
    ) -> RepositoryResult<DomainEstimate> {
        use crate::schema::estimates;

        let mut conn = self.conn()?;

        conn.transaction::<DomainEstimate, RepositoryError, _>(|conn| {
            let mut estimate = load_estimate(conn, estimate_id, hub_id)?;
            updates.apply_to(&mut estimate);

            let details = DbEstimateDetails::from(&estimate);
            diesel::update(
                estimates::table
                    .filter(estimates::id.eq(estimate_id))
                    .filter(estimates::hub_id.eq(hub_id)),
            )
            .set(&details)
            .execute(conn)?;

            if !updates.figures.is_empty() {
                write_figures(conn, &estimate)?;
            }

            load_estimate(conn, estimate_id, hub_id)
        })
    }

    fn delete_estimate(&self, estimate_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::{
            estimate_additional_services, estimate_inventory_items, estimate_line_items,
            estimate_residence_sizes, estimate_stops, estimates,
        };

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            find_estimate(conn, estimate_id, hub_id)?;

            diesel::delete(
                estimate_stops::table.filter(estimate_stops::estimate_id.eq(estimate_id)),
            )
            .execute(conn)?;
            diesel::delete(
                estimate_line_items::table
                    .filter(estimate_line_items::estimate_id.eq(estimate_id)),
            )
            .execute(conn)?;
            diesel::delete(
                estimate_inventory_items::table
                    .filter(estimate_inventory_items::estimate_id.eq(estimate_id)),
            )
            .execute(conn)?;
            diesel::delete(
                estimate_residence_sizes::table
                    .filter(estimate_residence_sizes::estimate_id.eq(estimate_id)),
            )
            .execute(conn)?;
            diesel::delete(
                estimate_additional_services::table
                    .filter(estimate_additional_services::estimate_id.eq(estimate_id)),
            )
            .execute(conn)?;

            let target = estimates::table
                .filter(estimates::id.eq(estimate_id))
                .filter(estimates::hub_id.eq(hub_id));

            let deleted = diesel::delete(target).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }

    fn commit_estimate(
        &self,
        estimate_id: i32,
        hub_id: i32,
        commit: &EstimateCommit,
    ) -> RepositoryResult<DomainEstimate> {
        use crate::schema::{estimate_line_items, estimates};

        let mut conn = self.conn()?;

        conn.transaction::<DomainEstimate, RepositoryError, _>(|conn| {
            find_estimate(conn, estimate_id, hub_id)?;

            if let Some(change) = &commit.stop_change {
                store_stop_change(conn, estimate_id, change, commit.updated_at)?;
            }
            store_coordinates(conn, estimate_id, &commit.located, commit.updated_at)?;

            if !commit.reprice {
                return load_estimate(conn, estimate_id, hub_id);
            }

            let figures = DbEstimateFigures::from_domain(&commit.figures, commit.updated_at);
            diesel::update(
                estimates::table
                    .filter(estimates::id.eq(estimate_id))
                    .filter(estimates::hub_id.eq(hub_id)),
            )
            .set(&figures)
            .execute(conn)?;

            diesel::delete(
                estimate_line_items::table
                    .filter(estimate_line_items::estimate_id.eq(estimate_id))
                    .filter(estimate_line_items::item_type.ne("additional")),
            )
            .execute(conn)?;

            if !commit.line_items.is_empty() {
                let payload: Vec<DbNewLineItem> = commit
                    .line_items
                    .iter()
                    .map(|item| DbNewLineItem::from_domain(estimate_id, item))
                    .collect();

                diesel::insert_into(estimate_line_items::table)
                    .values(&payload)
                    .execute(conn)?;
            }

            load_estimate(conn, estimate_id, hub_id)
        })
    }
}

/// Replay a stop change against the stored stops and write the rows that moved.
fn store_stop_change(
    conn: &mut SqliteConnection,
    estimate_id: i32,
    change: &StopChange,
    updated_at: NaiveDateTime,
) -> RepositoryResult<()> {
    use crate::schema::estimate_stops;

    let mut stops = load_stops(conn, estimate_id)?;
    let before: HashMap<i32, DomainStop> =
        stops.iter().map(|stop| (stop.id, stop.clone())).collect();

    sequencer::apply_change(&mut stops, estimate_id, change)
        .map_err(|_| RepositoryError::NotFound)?;

    if let StopChange::Delete { stop_id } = change {
        diesel::delete(
            estimate_stops::table
                .filter(estimate_stops::id.eq(*stop_id))
                .filter(estimate_stops::estimate_id.eq(estimate_id)),
        )
        .execute(conn)?;
    }

    for stop in &stops {
        let Some(previous) = before.get(&stop.id) else {
            diesel::insert_into(estimate_stops::table)
                .values(&DbNewStop::from(stop))
                .execute(conn)?;
            continue;
        };

        let target = estimate_stops::table
            .filter(estimate_stops::id.eq(stop.id))
            .filter(estimate_stops::estimate_id.eq(estimate_id));

        if matches!(change, StopChange::Update { stop_id, .. } if *stop_id == stop.id) {
            diesel::update(target)
                .set(&DbStopDetails::from_domain(stop, updated_at))
                .execute(conn)?;
        } else if previous.sequence != stop.sequence || previous.kind != stop.kind {
            diesel::update(target)
                .set(&DbStopPosition::from_domain(stop, updated_at))
                .execute(conn)?;
        }
    }

    Ok(())
}

fn store_coordinates(
    conn: &mut SqliteConnection,
    estimate_id: i32,
    located: &[StopCoordinates],
    updated_at: NaiveDateTime,
) -> RepositoryResult<()> {
    use crate::schema::estimate_stops;

    for entry in located {
        diesel::update(
            estimate_stops::table
                .filter(estimate_stops::id.eq(entry.stop_id))
                .filter(estimate_stops::estimate_id.eq(estimate_id)),
        )
        .set((
            estimate_stops::lat.eq(Some(entry.coordinates.lat)),
            estimate_stops::lng.eq(Some(entry.coordinates.lng)),
            estimate_stops::updated_at.eq(updated_at),
        ))
        .execute(conn)?;
    }

    Ok(())
}
