//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_geography_tables;
mod m20250601_000002_create_users_tables;
mod m20250601_000003_create_boats_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_geography_tables::Migration),
            Box::new(m20250601_000002_create_users_tables::Migration),
            Box::new(m20250601_000003_create_boats_tables::Migration),
        ]
    }
}
