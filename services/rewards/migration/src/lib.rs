use sea_orm_migration::prelude::*;

mod m20261019_000001_create_prizes;
mod m20261019_000002_create_prize_awards;
mod m20261019_000003_create_prize_redemptions;
mod m20261019_000004_create_one_time_passwords;
mod m20261019_000005_create_sms_messages;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261019_000001_create_prizes::Migration),
            Box::new(m20261019_000002_create_prize_awards::Migration),
            Box::new(m20261019_000003_create_prize_redemptions::Migration),
            Box::new(m20261019_000004_create_one_time_passwords::Migration),
            Box::new(m20261019_000005_create_sms_messages::Migration),
        ]
    }
}
