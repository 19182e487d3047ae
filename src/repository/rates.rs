use diesel::prelude::*;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::{
        hub::DEFAULT_TRUCK_RATE,
        rates::{
            AdditionalService as DomainAdditionalService, FuelPriceTier as DomainFuelPriceTier,
            MoverAssignmentRule as DomainMoverAssignmentRule, MoverTeam as DomainMoverTeam,
            NewAdditionalService as DomainNewAdditionalService,
            NewFuelPriceTier as DomainNewFuelPriceTier,
            NewMoverAssignmentRule as DomainNewMoverAssignmentRule,
            NewMoverTeam as DomainNewMoverTeam, NewTruck as DomainNewTruck, RateContext,
            Truck as DomainTruck,
        },
    },
    models::rates::{
        AdditionalService as DbAdditionalService, FuelPriceTier as DbFuelPriceTier,
        MoverAssignmentRule as DbMoverAssignmentRule, MoverTeam as DbMoverTeam,
        NewAdditionalService as DbNewAdditionalService, NewFuelPriceTier as DbNewFuelPriceTier,
        NewMoverAssignmentRule as DbNewMoverAssignmentRule, NewMoverTeam as DbNewMoverTeam,
        NewTruck as DbNewTruck, Truck as DbTruck,
    },
    repository::{DieselRepository, RateReader, RateWriter},
};

impl RateReader for DieselRepository {
    fn load_rate_context(&self, hub_id: i32) -> RepositoryResult<RateContext> {
        use crate::schema::{
            additional_services, fuel_price_tiers, hub_settings, mover_assignment_rules,
            mover_teams, trucks,
        };

        let mut conn = self.conn()?;

        let mover_teams = mover_teams::table
            .filter(mover_teams::hub_id.eq(hub_id))
            .order((mover_teams::number_of_movers.asc(), mover_teams::id.asc()))
            .load::<DbMoverTeam>(&mut conn)?;

        let assignment_rules = mover_assignment_rules::table
            .filter(mover_assignment_rules::hub_id.eq(hub_id))
            .order((
                mover_assignment_rules::hours_min.asc(),
                mover_assignment_rules::id.asc(),
            ))
            .load::<DbMoverAssignmentRule>(&mut conn)?;

        let fleet = trucks::table
            .filter(trucks::hub_id.eq(hub_id))
            .order(trucks::id.asc())
            .load::<DbTruck>(&mut conn)?;

        let fuel_tiers = fuel_price_tiers::table
            .filter(fuel_price_tiers::hub_id.eq(hub_id))
            .order((fuel_price_tiers::miles_min.asc(), fuel_price_tiers::id.asc()))
            .load::<DbFuelPriceTier>(&mut conn)?;

        let services = additional_services::table
            .filter(additional_services::hub_id.eq(hub_id))
            .order((additional_services::name.asc(), additional_services::id.asc()))
            .load::<DbAdditionalService>(&mut conn)?;

        let truck_rate = hub_settings::table
            .filter(hub_settings::hub_id.eq(hub_id))
            .select(hub_settings::truck_rate)
            .first::<f64>(&mut conn)
            .optional()?
            .unwrap_or(DEFAULT_TRUCK_RATE);

        Ok(RateContext {
            mover_teams: mover_teams.into_iter().map(Into::into).collect(),
            assignment_rules: assignment_rules.into_iter().map(Into::into).collect(),
            trucks: fleet.into_iter().map(Into::into).collect(),
            fuel_tiers: fuel_tiers.into_iter().map(Into::into).collect(),
            additional_services: services.into_iter().map(Into::into).collect(),
            truck_rate,
        })
    }
}

impl RateWriter for DieselRepository {
    fn create_mover_team(&self, new_team: &DomainNewMoverTeam) -> RepositoryResult<DomainMoverTeam> {
        use crate::schema::mover_teams;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(mover_teams::table)
            .values(&DbNewMoverTeam::from(new_team))
            .get_result::<DbMoverTeam>(&mut conn)?;

        Ok(created.into())
    }

    fn update_mover_team(
        &self,
        team_id: i32,
        team: &DomainNewMoverTeam,
    ) -> RepositoryResult<DomainMoverTeam> {
        use crate::schema::mover_teams;

        let mut conn = self.conn()?;
        let target = mover_teams::table
            .filter(mover_teams::id.eq(team_id))
            .filter(mover_teams::hub_id.eq(team.hub_id));

        let updated = diesel::update(target)
            .set(&DbNewMoverTeam::from(team))
            .get_result::<DbMoverTeam>(&mut conn)
            .optional()?
            .ok_or(RepositoryError::NotFound)?;

        Ok(updated.into())
    }

    fn delete_mover_team(&self, team_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::mover_teams;

        let mut conn = self.conn()?;
        let target = mover_teams::table
            .filter(mover_teams::id.eq(team_id))
            .filter(mover_teams::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn create_assignment_rule(
        &self,
        new_rule: &DomainNewMoverAssignmentRule,
    ) -> RepositoryResult<DomainMoverAssignmentRule> {
        use crate::schema::mover_assignment_rules;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(mover_assignment_rules::table)
            .values(&DbNewMoverAssignmentRule::from(new_rule))
            .get_result::<DbMoverAssignmentRule>(&mut conn)?;

        Ok(created.into())
    }

    fn update_assignment_rule(
        &self,
        rule_id: i32,
        rule: &DomainNewMoverAssignmentRule,
    ) -> RepositoryResult<DomainMoverAssignmentRule> {
        use crate::schema::mover_assignment_rules;

        let mut conn = self.conn()?;
        let target = mover_assignment_rules::table
            .filter(mover_assignment_rules::id.eq(rule_id))
            .filter(mover_assignment_rules::hub_id.eq(rule.hub_id));

        let updated = diesel::update(target)
            .set(&DbNewMoverAssignmentRule::from(rule))
            .get_result::<DbMoverAssignmentRule>(&mut conn)
            .optional()?
            .ok_or(RepositoryError::NotFound)?;

        Ok(updated.into())
    }

    fn delete_assignment_rule(&self, rule_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::mover_assignment_rules;

        let mut conn = self.conn()?;
        let target = mover_assignment_rules::table
            .filter(mover_assignment_rules::id.eq(rule_id))
            .filter(mover_assignment_rules::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn create_truck(&self, new_truck: &DomainNewTruck) -> RepositoryResult<DomainTruck> {
        use crate::schema::trucks;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(trucks::table)
            .values(&DbNewTruck::from(new_truck))
            .get_result::<DbTruck>(&mut conn)?;

        Ok(created.into())
    }

    fn update_truck(&self, truck_id: i32, truck: &DomainNewTruck) -> RepositoryResult<DomainTruck> {
        use crate::schema::trucks;

        let mut conn = self.conn()?;
        let target = trucks::table
            .filter(trucks::id.eq(truck_id))
            .filter(trucks::hub_id.eq(truck.hub_id));

        let updated = diesel::update(target)
            .set(&DbNewTruck::from(truck))
            .get_result::<DbTruck>(&mut conn)
            .optional()?
            .ok_or(RepositoryError::NotFound)?;

        Ok(updated.into())
    }

    fn delete_truck(&self, truck_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::trucks;

        let mut conn = self.conn()?;
        let target = trucks::table
            .filter(trucks::id.eq(truck_id))
            .filter(trucks::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn create_fuel_tier(
        &self,
        new_tier: &DomainNewFuelPriceTier,
    ) -> RepositoryResult<DomainFuelPriceTier> {
        use crate::schema::fuel_price_tiers;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(fuel_price_tiers::table)
            .values(&DbNewFuelPriceTier::from(new_tier))
            .get_result::<DbFuelPriceTier>(&mut conn)?;

        Ok(created.into())
    }

    fn update_fuel_tier(
        &self,
        tier_id: i32,
        tier: &DomainNewFuelPriceTier,
    ) -> RepositoryResult<DomainFuelPriceTier> {
        use crate::schema::fuel_price_tiers;

        let mut conn = self.conn()?;
        let target = fuel_price_tiers::table
            .filter(fuel_price_tiers::id.eq(tier_id))
            .filter(fuel_price_tiers::hub_id.eq(tier.hub_id));

        let updated = diesel::update(target)
            .set(&DbNewFuelPriceTier::from(tier))
            .get_result::<DbFuelPriceTier>(&mut conn)
            .optional()?
            .ok_or(RepositoryError::NotFound)?;

        Ok(updated.into())
    }

    fn delete_fuel_tier(&self, tier_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::fuel_price_tiers;

        let mut conn = self.conn()?;
        let target = fuel_price_tiers::table
            .filter(fuel_price_tiers::id.eq(tier_id))
            .filter(fuel_price_tiers::hub_id.eq(hub_id));

        let deleted = diesel::delete(target).execute(&mut conn)?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    fn create_additional_service(
        &self,
        new_service: &DomainNewAdditionalService,
    ) -> RepositoryResult<DomainAdditionalService> {
        use crate::schema::additional_services;

        let mut conn = self.conn()?;
        let created = diesel::insert_into(additional_services::table)
            .values(&DbNewAdditionalService::from(new_service))
            .get_result::<DbAdditionalService>(&mut conn)?;

        Ok(created.into())
    }

    fn update_additional_service(
        &self,
        service_id: i32,
        service: &DomainNewAdditionalService,
    ) -> RepositoryResult<DomainAdditionalService> {
        use crate::schema::additional_services;

        let mut conn = self.conn()?;
        let target = additional_services::table
            .filter(additional_services::id.eq(service_id))
            .filter(additional_services::hub_id.eq(service.hub_id));

        let updated = diesel::update(target)
            .set(&DbNewAdditionalService::from(service))
            .get_result::<DbAdditionalService>(&mut conn)
            .optional()?
            .ok_or(RepositoryError::NotFound)?;

        Ok(updated.into())
    }

    fn delete_additional_service(&self, service_id: i32, hub_id: i32) -> RepositoryResult<()> {
        use crate::schema::{additional_services, estimate_additional_services};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let target = additional_services::table
                .filter(additional_services::id.eq(service_id))
                .filter(additional_services::hub_id.eq(hub_id));

            let deleted = diesel::delete(target).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            diesel::delete(
                estimate_additional_services::table
                    .filter(estimate_additional_services::additional_service_id.eq(service_id)),
            )
            .execute(conn)?;

            Ok(())
        })
    }
}
