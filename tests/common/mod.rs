//! Helpers for integration tests.

#![allow(dead_code)]

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_common::db::{DbPool, establish_connection_pool};
use pushkind_moving::domain::rates::{
    NewFuelPriceTier, NewMoverAssignmentRule, NewMoverTeam, NewTruck,
};
use pushkind_moving::repository::{DieselRepository, RateWriter};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Migrated SQLite file inside a temporary directory removed on drop.
pub struct TestDb {
    pool: DbPool,
    // Dropped after the pool so open connections close first.
    dir: TempDir,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temporary directory.");
        let path = dir.path().join(filename);
        let url = path.to_str().expect("Temporary path is not UTF-8.");

        let pool = establish_connection_pool(url).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");

        TestDb { pool, dir }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }

    pub fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }
}

/// Two crews, a long-job rule, one truck and a flat fuel price.
pub fn seed_rates(repo: &DieselRepository, hub_id: i32) {
    repo.create_mover_team(&NewMoverTeam {
        hub_id,
        number_of_movers: 2,
        lbs_per_hour: 100.0,
        price_per_hour: 80.0,
    })
    .expect("create 2-mover team");
    repo.create_mover_team(&NewMoverTeam {
        hub_id,
        number_of_movers: 3,
        lbs_per_hour: 150.0,
        price_per_hour: 110.0,
    })
    .expect("create 3-mover team");
    repo.create_assignment_rule(&NewMoverAssignmentRule {
        hub_id,
        hours_min: 6.0,
        hours_max: None,
        number_of_movers: 3,
    })
    .expect("create assignment rule");
    repo.create_truck(&NewTruck {
        hub_id,
        unit_number: "26".to_string(),
        length_ft: 26,
        volume_cf: 1600.0,
        mpg: 8.0,
        has_lift_gate: true,
        has_ramp: true,
    })
    .expect("create truck");
    repo.create_fuel_tier(&NewFuelPriceTier {
        hub_id,
        miles_min: 0.0,
        miles_max: None,
        price_per_gallon: 3.5,
    })
    .expect("create fuel tier");
}
