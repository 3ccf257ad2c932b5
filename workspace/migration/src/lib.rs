pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_and_profiles;
mod m20240101_000002_create_profile_follows;
pub mod entity_iden;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_and_profiles::Migration),
            Box::new(m20240101_000002_create_profile_follows::Migration),
        ]
    }
}
