use sea_orm_migration::prelude::*;

mod m20261001_000001_create_accounts;
mod m20261001_000002_create_profiles;
mod m20261001_000003_create_makeup_classes;
mod m20261001_000004_create_remedial_codes;
mod m20261001_000005_create_makeup_attendance;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_accounts::Migration),
            Box::new(m20261001_000002_create_profiles::Migration),
            Box::new(m20261001_000003_create_makeup_classes::Migration),
            Box::new(m20261001_000004_create_remedial_codes::Migration),
            Box::new(m20261001_000005_create_makeup_attendance::Migration),
        ]
    }
}
