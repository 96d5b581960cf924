use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use prizeflow_domain::otp::OtpPurpose;
use prizeflow_domain::phone::Phone;

use crate::domain::repository::OneTimePasswords;
use crate::error::RewardsServiceError;
use crate::state::AppState;

/// Redemption codes are only issued and checked by the redemption flow.
fn require_standalone_purpose(purpose: OtpPurpose) -> Result<(), RewardsServiceError> {
    match purpose {
        OtpPurpose::Redemption => Err(RewardsServiceError::invalid_input(
            "redemption codes are issued through /redemptions/initiate",
        )),
        OtpPurpose::Registration | OtpPurpose::Login => Ok(()),
    }
}

// ── POST /otp/send ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendOtpRequest {
    pub phone: String,
    pub purpose: OtpPurpose,
}

#[derive(Serialize)]
pub struct SendOtpResponse {
    pub success: bool,
    pub expires_in_seconds: i64,
    pub message: String,
}

pub async fn send_otp(
    State(state): State<AppState>,
    Json(body): Json<SendOtpRequest>,
) -> Result<Json<SendOtpResponse>, RewardsServiceError> {
    require_standalone_purpose(body.purpose)?;
    let phone = Phone::parse(&body.phone)?;
    let result = state.otp_engine().send(&phone, body.purpose, None).await?;
    Ok(Json(SendOtpResponse {
        success: result.success,
        expires_in_seconds: result.expires_in_seconds,
        message: result.message,
    }))
}

// ── POST /otp/verify ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub phone: String,
    pub code: String,
    pub purpose: OtpPurpose,
    pub related_entity_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct VerifyOtpResponse {
    pub is_valid: bool,
    pub message: String,
    pub remaining_attempts: Option<i32>,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<VerifyOtpResponse>, RewardsServiceError> {
    require_standalone_purpose(body.purpose)?;
    let phone = Phone::parse(&body.phone)?;
    let verification = state
        .otp_engine()
        .verify(&phone, &body.code, body.purpose, body.related_entity_id)
        .await?;
    Ok(Json(VerifyOtpResponse {
        is_valid: verification.is_valid,
        message: verification.message,
        remaining_attempts: verification.remaining_attempts,
    }))
}
