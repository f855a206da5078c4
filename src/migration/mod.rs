//! SeaORM database migrations.
//!
//! Written with the schema builder so the same migrations run on PostgreSQL
//! and SQLite.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_products;
mod m20260301_000002_create_relationships;
mod m20260301_000003_create_results_rules;
mod m20260301_000004_create_results;
mod m20260301_000005_create_test_suites;
mod m20260301_000006_create_test_cases;
mod m20260301_000007_create_properties;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_products::Migration),
            Box::new(m20260301_000002_create_relationships::Migration),
            Box::new(m20260301_000003_create_results_rules::Migration),
            Box::new(m20260301_000004_create_results::Migration),
            Box::new(m20260301_000005_create_test_suites::Migration),
            Box::new(m20260301_000006_create_test_cases::Migration),
            Box::new(m20260301_000007_create_properties::Migration),
        ]
    }
}
