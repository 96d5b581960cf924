use sea_orm_migration::prelude::*;

use prizeflow_rewards_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
