use std::time::Duration;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use prizeflow_core::health::healthz;
use prizeflow_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    awards::{bulk_award, cancel_award, create_award, get_award, resend_notification},
    health::readyz,
    otp::{send_otp, verify_otp},
    redemptions::{complete_redemption, initiate_redemption},
};
use crate::state::AppState;

pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Awards (back office)
        .route("/awards", post(create_award))
        .route("/awards/bulk", post(bulk_award))
        .route("/awards/{award_id}", get(get_award))
        .route("/awards/{award_id}/cancel", post(cancel_award))
        .route(
            "/awards/{award_id}/resend-notification",
            post(resend_notification),
        )
        // Redemption (winners)
        .route("/redemptions/initiate", post(initiate_redemption))
        .route("/redemptions/complete", post(complete_redemption))
        // Standalone one-time passwords
        .route("/otp/send", post(send_otp))
        .route("/otp/verify", post(verify_otp))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
}
