use sea_orm_migration::prelude::*;

mod m20261001_000001_create_alarm_tables;
mod m20261001_000002_create_profile_and_contacts;
mod m20261001_000003_create_alarm_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_alarm_tables::Migration),
            Box::new(m20261001_000002_create_profile_and_contacts::Migration),
            Box::new(m20261001_000003_create_alarm_events::Migration),
        ]
    }
}
