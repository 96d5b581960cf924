use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use prizeflow_core::actor::ActorHeaders;
use prizeflow_domain::award::{AwardMethod, AwardStatus};
use prizeflow_domain::notification::{NotificationChannel, NotificationStatus};
use prizeflow_domain::phone::Phone;

use crate::domain::types::{PrizeAward, PrizeRedemption};
use crate::error::RewardsServiceError;
use crate::state::AppState;
use crate::usecase::award::{
    AwardDetails, AwardPrizeInput, AwardPrizeUseCase, BulkAwardInput, BulkAwardItem,
    BulkAwardResult, BulkAwardUseCase, CancelAwardInput, CancelAwardUseCase, GetAwardUseCase,
    ResendNotificationUseCase,
};

fn require_admin(actor: &ActorHeaders) -> Result<(), RewardsServiceError> {
    if actor.role.can_manage_awards() {
        Ok(())
    } else {
        Err(RewardsServiceError::Forbidden)
    }
}

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct AwardResponse {
    pub id: Uuid,
    pub prize_id: Uuid,
    pub external_user_id: Option<Uuid>,
    pub phone: String,
    pub competition_id: Option<Uuid>,
    #[serde(serialize_with = "prizeflow_core::serde::to_rfc3339_ms")]
    pub awarded_at: chrono::DateTime<chrono::Utc>,
    pub awarded_by: Option<Uuid>,
    pub method: AwardMethod,
    pub notification_channel: Option<NotificationChannel>,
    pub notification_status: NotificationStatus,
    pub status: AwardStatus,
    #[serde(serialize_with = "prizeflow_core::serde::to_rfc3339_ms_opt")]
    pub expiry_date: Option<chrono::DateTime<chrono::Utc>>,
    pub external_reference: Option<String>,
    #[serde(serialize_with = "prizeflow_core::serde::to_rfc3339_ms_opt")]
    pub cancelled_at: Option<chrono::DateTime<chrono::Utc>>,
    pub cancelled_by: Option<Uuid>,
    pub cancellation_reason: Option<String>,
}

impl From<PrizeAward> for AwardResponse {
    fn from(a: PrizeAward) -> Self {
        Self {
            id: a.id,
            prize_id: a.prize_id,
            external_user_id: a.external_user_id,
            phone: a.phone,
            competition_id: a.competition_id,
            awarded_at: a.awarded_at,
            awarded_by: a.awarded_by,
            method: a.method,
            notification_channel: a.notification_channel,
            notification_status: a.notification_status,
            status: a.status,
            expiry_date: a.expiry_date,
            external_reference: a.external_reference,
            cancelled_at: a.cancelled_at,
            cancelled_by: a.cancelled_by,
            cancellation_reason: a.cancellation_reason,
        }
    }
}

#[derive(Serialize)]
pub struct RedemptionResponse {
    pub id: Uuid,
    pub redemption_code: String,
    #[serde(serialize_with = "prizeflow_core::serde::to_rfc3339_ms")]
    pub redeemed_at: chrono::DateTime<chrono::Utc>,
    pub channel: String,
    pub status: &'static str,
}

impl From<PrizeRedemption> for RedemptionResponse {
    fn from(r: PrizeRedemption) -> Self {
        Self {
            id: r.id,
            redemption_code: r.redemption_code,
            redeemed_at: r.redeemed_at,
            channel: r.channel,
            status: r.status.as_str(),
        }
    }
}

#[derive(Serialize)]
pub struct AwardDetailsResponse {
    #[serde(flatten)]
    pub award: AwardResponse,
    pub redemption: Option<RedemptionResponse>,
}

impl From<AwardDetails> for AwardDetailsResponse {
    fn from(d: AwardDetails) -> Self {
        Self {
            award: d.award.into(),
            redemption: d.redemption.map(Into::into),
        }
    }
}

#[derive(Serialize)]
pub struct BulkAwardItemResponse {
    pub phone: String,
    pub success: bool,
    pub award_id: Option<Uuid>,
    pub prize_id: Option<Uuid>,
    pub error: Option<String>,
}

impl From<BulkAwardItem> for BulkAwardItemResponse {
    fn from(i: BulkAwardItem) -> Self {
        Self {
            phone: i.phone,
            success: i.success,
            award_id: i.award_id,
            prize_id: i.prize_id,
            error: i.error,
        }
    }
}

#[derive(Serialize)]
pub struct BulkAwardResponse {
    pub total: usize,
    pub success_count: usize,
    pub fail_count: usize,
    pub items: Vec<BulkAwardItemResponse>,
}

impl From<BulkAwardResult> for BulkAwardResponse {
    fn from(r: BulkAwardResult) -> Self {
        Self {
            total: r.total,
            success_count: r.success_count,
            fail_count: r.fail_count,
            items: r.items.into_iter().map(Into::into).collect(),
        }
    }
}

// ── POST /awards ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateAwardRequest {
    pub prize_id: Uuid,
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub competition_id: Option<Uuid>,
    pub notification_channel: Option<NotificationChannel>,
    pub expiry_days: Option<u32>,
    pub external_reference: Option<String>,
}

pub async fn create_award(
    actor: ActorHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateAwardRequest>,
) -> Result<(StatusCode, Json<AwardResponse>), RewardsServiceError> {
    require_admin(&actor)?;
    let phone = Phone::parse(&body.phone)?;
    let usecase = AwardPrizeUseCase {
        awards: state.award_repo(),
        allocator: state.allocator(),
        directory: state.directory.clone(),
        notifier: state.notifier(),
    };
    let award = usecase
        .execute(AwardPrizeInput {
            prize_id: body.prize_id,
            phone,
            name: body.name,
            email: body.email,
            competition_id: body.competition_id,
            awarded_by: Some(actor.actor_id),
            method: AwardMethod::Manual,
            notification_channel: body.notification_channel,
            expiry_days: body.expiry_days,
            external_reference: body.external_reference,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(award.into())))
}

// ── POST /awards/bulk ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct BulkAwardRequest {
    pub pool_id: Uuid,
    pub type_id: Option<Uuid>,
    pub phones: Vec<String>,
    pub competition_id: Option<Uuid>,
    pub notification_channel: Option<NotificationChannel>,
    pub expiry_days: Option<u32>,
}

pub async fn bulk_award(
    actor: ActorHeaders,
    State(state): State<AppState>,
    Json(body): Json<BulkAwardRequest>,
) -> Result<Json<BulkAwardResponse>, RewardsServiceError> {
    require_admin(&actor)?;
    let usecase = BulkAwardUseCase {
        award: AwardPrizeUseCase {
            awards: state.award_repo(),
            allocator: state.allocator(),
            directory: state.directory.clone(),
            notifier: state.notifier(),
        },
        max_batch: state.settings.bulk_max_batch,
    };
    let result = usecase
        .execute(BulkAwardInput {
            pool_id: body.pool_id,
            type_id: body.type_id,
            phones: body.phones,
            competition_id: body.competition_id,
            awarded_by: Some(actor.actor_id),
            notification_channel: body.notification_channel,
            expiry_days: body.expiry_days,
        })
        .await?;
    Ok(Json(result.into()))
}

// ── GET /awards/{award_id} ───────────────────────────────────────────────────

// Viewers may read awards; only admins change them.
pub async fn get_award(
    _actor: ActorHeaders,
    State(state): State<AppState>,
    Path(award_id): Path<Uuid>,
) -> Result<Json<AwardDetailsResponse>, RewardsServiceError> {
    let usecase = GetAwardUseCase {
        awards: state.award_repo(),
    };
    let details = usecase.execute(award_id).await?;
    Ok(Json(details.into()))
}

// ── POST /awards/{award_id}/cancel ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct CancelAwardRequest {
    pub reason: String,
}

pub async fn cancel_award(
    actor: ActorHeaders,
    State(state): State<AppState>,
    Path(award_id): Path<Uuid>,
    Json(body): Json<CancelAwardRequest>,
) -> Result<StatusCode, RewardsServiceError> {
    require_admin(&actor)?;
    let usecase = CancelAwardUseCase {
        awards: state.award_repo(),
    };
    let cancelled = usecase
        .execute(CancelAwardInput {
            award_id,
            cancelled_by: Some(actor.actor_id),
            reason: body.reason,
        })
        .await?;
    if !cancelled {
        return Err(RewardsServiceError::AwardNotCancellable);
    }
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /awards/{award_id}/resend-notification ──────────────────────────────

#[derive(Deserialize)]
pub struct ResendNotificationRequest {
    pub channel: Option<NotificationChannel>,
}

#[derive(Serialize)]
pub struct ResendNotificationResponse {
    pub sent: bool,
}

pub async fn resend_notification(
    actor: ActorHeaders,
    State(state): State<AppState>,
    Path(award_id): Path<Uuid>,
    Json(body): Json<ResendNotificationRequest>,
) -> Result<Json<ResendNotificationResponse>, RewardsServiceError> {
    require_admin(&actor)?;
    let usecase = ResendNotificationUseCase {
        awards: state.award_repo(),
        prizes: state.prize_repo(),
        notifier: state.notifier(),
    };
    let sent = usecase.execute(award_id, body.channel).await?;
    Ok(Json(ResendNotificationResponse { sent }))
}
