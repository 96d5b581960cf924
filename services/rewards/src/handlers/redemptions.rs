use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use prizeflow_domain::phone::Phone;

use crate::error::RewardsServiceError;
use crate::state::AppState;
use crate::usecase::redemption::{
    CompleteRedemptionInput, CompleteRedemptionUseCase, InitiateRedemptionInput,
    InitiateRedemptionUseCase, RedeemablePrize, RedemptionCompletion, RedemptionInitiation,
};

/// Client address as reported by the edge proxy: first `x-forwarded-for` hop, else `x-real-ip`.
fn client_ip(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };
    forwarded.or_else(real_ip).map(str::to_owned)
}

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RedeemablePrizeResponse {
    pub award_id: Uuid,
    pub prize_id: Uuid,
    pub prize_name: String,
    pub monetary_value_cents: Option<i64>,
    #[serde(serialize_with = "prizeflow_core::serde::to_rfc3339_ms")]
    pub awarded_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "prizeflow_core::serde::to_rfc3339_ms_opt")]
    pub expiry_date: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<RedeemablePrize> for RedeemablePrizeResponse {
    fn from(p: RedeemablePrize) -> Self {
        Self {
            award_id: p.award_id,
            prize_id: p.prize_id,
            prize_name: p.prize_name,
            monetary_value_cents: p.monetary_value_cents,
            awarded_at: p.awarded_at,
            expiry_date: p.expiry_date,
        }
    }
}

#[derive(Serialize)]
pub struct InitiateRedemptionResponse {
    pub requires_otp: bool,
    pub message: String,
    pub otp_expires_in_seconds: Option<i64>,
    pub redeemable_prizes: Vec<RedeemablePrizeResponse>,
}

impl From<RedemptionInitiation> for InitiateRedemptionResponse {
    fn from(r: RedemptionInitiation) -> Self {
        Self {
            requires_otp: r.requires_otp,
            message: r.message,
            otp_expires_in_seconds: r.otp_expires_in_seconds,
            redeemable_prizes: r.redeemable_prizes.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct CompleteRedemptionResponse {
    pub success: bool,
    pub redemption_id: Uuid,
    pub redemption_code: String,
    #[serde(serialize_with = "prizeflow_core::serde::to_rfc3339_ms")]
    pub redeemed_at: chrono::DateTime<chrono::Utc>,
    pub message: String,
}

impl From<RedemptionCompletion> for CompleteRedemptionResponse {
    fn from(c: RedemptionCompletion) -> Self {
        Self {
            success: true,
            redemption_id: c.redemption_id,
            redemption_code: c.redemption_code,
            redeemed_at: c.redeemed_at,
            message: c.message,
        }
    }
}

// ── POST /redemptions/initiate ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct InitiateRedemptionRequest {
    pub phone: String,
    pub award_id: Option<Uuid>,
}

pub async fn initiate_redemption(
    State(state): State<AppState>,
    Json(body): Json<InitiateRedemptionRequest>,
) -> Result<Json<InitiateRedemptionResponse>, RewardsServiceError> {
    let phone = Phone::parse(&body.phone)?;
    let usecase = InitiateRedemptionUseCase {
        awards: state.award_repo(),
        prizes: state.prize_repo(),
        otp: state.otp_engine(),
    };
    let initiation = usecase
        .execute(InitiateRedemptionInput {
            phone,
            award_id: body.award_id,
        })
        .await?;
    Ok(Json(initiation.into()))
}

// ── POST /redemptions/complete ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CompleteRedemptionRequest {
    pub phone: String,
    pub otp: String,
    pub award_id: Uuid,
    pub channel: String,
    pub notes: Option<String>,
}

pub async fn complete_redemption(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CompleteRedemptionRequest>,
) -> Result<(StatusCode, Json<CompleteRedemptionResponse>), RewardsServiceError> {
    let phone = Phone::parse(&body.phone)?;
    let usecase = CompleteRedemptionUseCase {
        awards: state.award_repo(),
        prizes: state.prize_repo(),
        otp: state.otp_engine(),
        notifier: state.notifier(),
    };
    let completion = usecase
        .execute(CompleteRedemptionInput {
            phone,
            otp: body.otp,
            award_id: body.award_id,
            channel: body.channel,
            notes: body.notes,
            from_ip: client_ip(&headers),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(completion.into())))
}
