use std::time::Duration;

use sea_orm::Database;
use tracing::{error, info};

use prizeflow_core::config::Config;
use prizeflow_core::tracing::init_tracing;
use prizeflow_rewards::config::RewardsConfig;
use prizeflow_rewards::infra::grpc::GrpcDirectoryPort;
use prizeflow_rewards::infra::sms::HttpSmsTransport;
use prizeflow_rewards::router::build_router;
use prizeflow_rewards::state::AppState;
use prizeflow_rewards::usecase::expiry::ExpireAwardsUseCase;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = RewardsConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .expect("failed to create Redis pool");

    let directory_channel =
        tonic::transport::Channel::from_shared(config.directory_grpc_url.clone())
            .expect("invalid DIRECTORY_GRPC_URL")
            .connect_lazy();

    let sms = HttpSmsTransport::new(
        config.sms_provider_url.clone(),
        config.sms_provider_api_key.clone(),
        config.sms_sender_id.clone(),
        config.sms_timeout(),
    )
    .expect("failed to build message provider client");

    let state = AppState {
        db,
        redis,
        directory: GrpcDirectoryPort::new(directory_channel),
        sms,
        settings: config.engine_settings(),
    };

    if config.award_expiry_sweep_secs > 0 {
        spawn_expiry_sweep(
            state.clone(),
            Duration::from_secs(config.award_expiry_sweep_secs),
        );
    }

    let router = build_router(state, config.request_timeout());
    let addr = format!("0.0.0.0:{}", config.rewards_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("rewards service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}

fn spawn_expiry_sweep(state: AppState, every: Duration) {
    tokio::spawn(async move {
        let usecase = ExpireAwardsUseCase {
            awards: state.award_repo(),
        };
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(e) = usecase.execute().await {
                error!(error = ?e, "award expiry sweep failed");
            }
        }
    });
}
