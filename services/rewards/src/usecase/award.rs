use chrono::{Duration, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use prizeflow_domain::award::{AwardMethod, AwardStatus};
use prizeflow_domain::notification::{NotificationChannel, NotificationStatus, SmsKind};
use prizeflow_domain::phone::Phone;

use crate::domain::repository::{AwardRepository, DirectoryPort, Notifier, PrizeRepository};
use crate::domain::templates;
use crate::domain::types::{
    DispatchRequest, MAX_ALLOCATION_ATTEMPTS, MAX_CANCELLATION_REASON_LEN, MAX_EXPIRY_DAYS,
    MAX_EXTERNAL_REFERENCE_LEN, Prize, PrizeAward, PrizeRedemption,
};
use crate::error::RewardsServiceError;
use crate::usecase::allocator::PrizeAllocator;

/// Send the award notification on `channel` and record the outcome on the award.
async fn notify_award<A, N>(
    awards: &A,
    notifier: &N,
    award: &PrizeAward,
    prize: &Prize,
    channel: NotificationChannel,
) -> Result<NotificationStatus, RewardsServiceError>
where
    A: AwardRepository,
    N: Notifier,
{
    let outcome = notifier
        .dispatch(DispatchRequest {
            phone: award.phone.clone(),
            body: templates::award_message(&prize.name, award.expiry_date),
            kind: SmsKind::AwardNotification,
            channel,
            related_entity_type: Some("prize_award"),
            related_entity_id: Some(award.id),
        })
        .await?;
    let status = if outcome.is_sent() {
        NotificationStatus::Sent
    } else {
        NotificationStatus::Failed
    };
    awards.update_notification_status(award.id, status).await?;
    Ok(status)
}

fn validate_expiry_days(expiry_days: Option<u32>) -> Result<(), RewardsServiceError> {
    match expiry_days {
        Some(days) if days == 0 || days > MAX_EXPIRY_DAYS => Err(
            RewardsServiceError::invalid_input(format!(
                "expiry_days must be between 1 and {MAX_EXPIRY_DAYS}"
            )),
        ),
        _ => Ok(()),
    }
}

fn validate_external_reference(reference: Option<&str>) -> Result<(), RewardsServiceError> {
    match reference {
        Some(r) if r.len() > MAX_EXTERNAL_REFERENCE_LEN => {
            Err(RewardsServiceError::invalid_input(format!(
                "external_reference must be at most {MAX_EXTERNAL_REFERENCE_LEN} characters"
            )))
        }
        _ => Ok(()),
    }
}

// ── Award a prize ─────────────────────────────────────────────────────────────

pub struct AwardPrizeInput {
    pub prize_id: Uuid,
    pub phone: Phone,
    pub name: Option<String>,
    pub email: Option<String>,
    pub competition_id: Option<Uuid>,
    pub awarded_by: Option<Uuid>,
    pub method: AwardMethod,
    pub notification_channel: Option<NotificationChannel>,
    pub expiry_days: Option<u32>,
    pub external_reference: Option<String>,
}

pub struct AwardPrizeUseCase<A, P, D, N>
where
    A: AwardRepository,
    P: PrizeRepository,
    D: DirectoryPort,
    N: Notifier,
{
    pub awards: A,
    pub allocator: PrizeAllocator<P>,
    pub directory: D,
    pub notifier: N,
}

impl<A, P, D, N> AwardPrizeUseCase<A, P, D, N>
where
    A: AwardRepository,
    P: PrizeRepository,
    D: DirectoryPort,
    N: Notifier,
{
    pub async fn execute(&self, input: AwardPrizeInput) -> Result<PrizeAward, RewardsServiceError> {
        validate_expiry_days(input.expiry_days)?;
        validate_external_reference(input.external_reference.as_deref())?;

        let now = Utc::now();
        let prize = self
            .allocator
            .prizes
            .find_by_id(input.prize_id)
            .await?
            .ok_or(RewardsServiceError::PrizeNotFound)?;
        if !prize.is_active || prize.is_expired_at(now) {
            return Err(RewardsServiceError::PrizeUnavailable);
        }
        if prize.remaining_quantity <= 0 {
            return Err(RewardsServiceError::NoStock);
        }

        if let Some(competition_id) = input.competition_id {
            self.directory
                .get_competition(competition_id)
                .await?
                .ok_or(RewardsServiceError::CompetitionNotFound)?;
        }

        let user = self
            .directory
            .get_or_create_user(
                input.phone.as_str(),
                input.name.as_deref(),
                input.email.as_deref(),
            )
            .await?;

        // Stock is taken before the award row exists; losing this race is the
        // normal "sold out" path.
        if !self.allocator.decrement(prize.id).await? {
            return Err(RewardsServiceError::NoStock);
        }

        let mut award = PrizeAward {
            id: Uuid::now_v7(),
            prize_id: prize.id,
            external_user_id: Some(user.id),
            phone: input.phone.as_str().to_owned(),
            competition_id: input.competition_id,
            awarded_at: now,
            awarded_by: input.awarded_by,
            method: input.method,
            notification_channel: input.notification_channel,
            notification_status: if input.notification_channel.is_some() {
                NotificationStatus::Pending
            } else {
                NotificationStatus::NotRequired
            },
            status: AwardStatus::Awarded,
            expiry_date: input
                .expiry_days
                .map(|days| now + Duration::days(i64::from(days)))
                .or(prize.expiry_date),
            external_reference: input.external_reference,
            cancelled_at: None,
            cancelled_by: None,
            cancellation_reason: None,
        };

        if let Err(e) = self.awards.create(&award).await {
            error!(
                prize_id = %prize.id,
                phone = %input.phone.masked(),
                "award insert failed after stock was decremented; stock needs reconciliation"
            );
            return Err(e);
        }

        info!(
            award_id = %award.id,
            prize_id = %prize.id,
            phone = %input.phone.masked(),
            method = award.method.as_str(),
            "prize awarded"
        );

        // The award stands from here on; notification bookkeeping cannot undo it.
        if let Some(channel) = award.notification_channel {
            award.notification_status =
                match notify_award(&self.awards, &self.notifier, &award, &prize, channel).await {
                    Ok(status) => status,
                    Err(e) => {
                        warn!(
                            award_id = %award.id,
                            error = ?e,
                            "award notification could not be recorded"
                        );
                        NotificationStatus::Failed
                    }
                };
        }

        Ok(award)
    }
}

// ── Bulk award ────────────────────────────────────────────────────────────────

pub struct BulkAwardInput {
    pub pool_id: Uuid,
    pub type_id: Option<Uuid>,
    pub phones: Vec<String>,
    pub competition_id: Option<Uuid>,
    pub awarded_by: Option<Uuid>,
    pub notification_channel: Option<NotificationChannel>,
    pub expiry_days: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct BulkAwardItem {
    /// Phone as submitted.
    pub phone: String,
    pub success: bool,
    pub award_id: Option<Uuid>,
    pub prize_id: Option<Uuid>,
    pub error: Option<String>,
}

impl BulkAwardItem {
    fn awarded(phone: String, award: &PrizeAward) -> Self {
        Self {
            phone,
            success: true,
            award_id: Some(award.id),
            prize_id: Some(award.prize_id),
            error: None,
        }
    }

    fn failed(phone: String, error: impl Into<String>) -> Self {
        Self {
            phone,
            success: false,
            award_id: None,
            prize_id: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BulkAwardResult {
    pub total: usize,
    pub success_count: usize,
    pub fail_count: usize,
    pub items: Vec<BulkAwardItem>,
}

/// Awards one prize from a pool to each phone in turn.
///
/// Items are independent: a failed item never rolls back earlier ones and
/// never stops later ones.
pub struct BulkAwardUseCase<A, P, D, N>
where
    A: AwardRepository,
    P: PrizeRepository,
    D: DirectoryPort,
    N: Notifier,
{
    pub award: AwardPrizeUseCase<A, P, D, N>,
    pub max_batch: usize,
}

impl<A, P, D, N> BulkAwardUseCase<A, P, D, N>
where
    A: AwardRepository,
    P: PrizeRepository,
    D: DirectoryPort,
    N: Notifier,
{
    pub async fn execute(&self, input: BulkAwardInput) -> Result<BulkAwardResult, RewardsServiceError> {
        if input.phones.is_empty() {
            return Err(RewardsServiceError::invalid_input(
                "at least one phone number is required",
            ));
        }
        if input.phones.len() > self.max_batch {
            return Err(RewardsServiceError::BatchTooLarge {
                max: self.max_batch,
            });
        }
        validate_expiry_days(input.expiry_days)?;
        if let Some(competition_id) = input.competition_id {
            self.award
                .directory
                .get_competition(competition_id)
                .await?
                .ok_or(RewardsServiceError::CompetitionNotFound)?;
        }

        let mut items = Vec::with_capacity(input.phones.len());
        for raw in &input.phones {
            let item = match Phone::parse(raw) {
                Ok(phone) => self.award_one(&input, raw, phone).await,
                Err(e) => BulkAwardItem::failed(raw.clone(), e.to_string()),
            };
            items.push(item);
        }

        let success_count = items.iter().filter(|i| i.success).count();
        let result = BulkAwardResult {
            total: items.len(),
            success_count,
            fail_count: items.len() - success_count,
            items,
        };
        info!(
            pool_id = %input.pool_id,
            total = result.total,
            success = result.success_count,
            failed = result.fail_count,
            "bulk award finished"
        );
        Ok(result)
    }

    async fn award_one(&self, input: &BulkAwardInput, raw: &str, phone: Phone) -> BulkAwardItem {
        for _ in 0..MAX_ALLOCATION_ATTEMPTS {
            let prize = match self
                .award
                .allocator
                .pick_next(input.pool_id, input.type_id)
                .await
            {
                Ok(Some(prize)) => prize,
                Ok(None) => break,
                Err(e) => return internal_failure(raw, &phone, e),
            };

            let result = self
                .award
                .execute(AwardPrizeInput {
                    prize_id: prize.id,
                    phone: phone.clone(),
                    name: None,
                    email: None,
                    competition_id: input.competition_id,
                    awarded_by: input.awarded_by,
                    method: AwardMethod::Bulk,
                    notification_channel: input.notification_channel,
                    expiry_days: input.expiry_days,
                    external_reference: None,
                })
                .await;

            match result {
                Ok(award) => return BulkAwardItem::awarded(raw.to_owned(), &award),
                // Another caller took the last unit of the picked prize; pick again.
                Err(RewardsServiceError::NoStock) => continue,
                Err(e @ RewardsServiceError::Internal(_)) => {
                    return internal_failure(raw, &phone, e);
                }
                Err(e) => return BulkAwardItem::failed(raw.to_owned(), e.to_string()),
            }
        }
        BulkAwardItem::failed(raw.to_owned(), RewardsServiceError::NoStock.to_string())
    }
}

fn internal_failure(raw: &str, phone: &Phone, e: RewardsServiceError) -> BulkAwardItem {
    if let RewardsServiceError::Internal(ref cause) = e {
        error!(phone = %phone.masked(), error = %format!("{cause:#}"), "bulk award item failed");
    }
    BulkAwardItem::failed(raw.to_owned(), e.to_string())
}

// ── Cancel ────────────────────────────────────────────────────────────────────

pub struct CancelAwardInput {
    pub award_id: Uuid,
    pub cancelled_by: Option<Uuid>,
    pub reason: String,
}

pub struct CancelAwardUseCase<A>
where
    A: AwardRepository,
{
    pub awards: A,
}

impl<A> CancelAwardUseCase<A>
where
    A: AwardRepository,
{
    /// Returns `false` when the award does not exist or is no longer `awarded`.
    pub async fn execute(&self, input: CancelAwardInput) -> Result<bool, RewardsServiceError> {
        let reason = input.reason.trim();
        if reason.is_empty() {
            return Err(RewardsServiceError::invalid_input(
                "a cancellation reason is required",
            ));
        }
        if reason.len() > MAX_CANCELLATION_REASON_LEN {
            return Err(RewardsServiceError::invalid_input(format!(
                "cancellation reason must be at most {MAX_CANCELLATION_REASON_LEN} characters"
            )));
        }

        let cancelled = self
            .awards
            .cancel(input.award_id, input.cancelled_by, reason, Utc::now())
            .await?;
        if cancelled {
            info!(award_id = %input.award_id, "award cancelled");
        } else {
            warn!(award_id = %input.award_id, "award not cancellable");
        }
        Ok(cancelled)
    }
}

// ── Resend notification ───────────────────────────────────────────────────────

pub struct ResendNotificationUseCase<A, P, N>
where
    A: AwardRepository,
    P: PrizeRepository,
    N: Notifier,
{
    pub awards: A,
    pub prizes: P,
    pub notifier: N,
}

impl<A, P, N> ResendNotificationUseCase<A, P, N>
where
    A: AwardRepository,
    P: PrizeRepository,
    N: Notifier,
{
    /// Re-sends the award notification whatever its current delivery status.
    /// Returns whether this delivery succeeded.
    pub async fn execute(
        &self,
        award_id: Uuid,
        channel: Option<NotificationChannel>,
    ) -> Result<bool, RewardsServiceError> {
        let award = self
            .awards
            .find_by_id(award_id)
            .await?
            .ok_or(RewardsServiceError::AwardNotFound)?;
        let prize = self
            .prizes
            .find_by_id(award.prize_id)
            .await?
            .ok_or(RewardsServiceError::PrizeNotFound)?;
        let channel = channel
            .or(award.notification_channel)
            .unwrap_or(NotificationChannel::Sms);

        let status = notify_award(&self.awards, &self.notifier, &award, &prize, channel).await?;
        Ok(status == NotificationStatus::Sent)
    }
}

// ── Get ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AwardDetails {
    pub award: PrizeAward,
    pub redemption: Option<PrizeRedemption>,
}

pub struct GetAwardUseCase<A>
where
    A: AwardRepository,
{
    pub awards: A,
}

impl<A> GetAwardUseCase<A>
where
    A: AwardRepository,
{
    pub async fn execute(&self, award_id: Uuid) -> Result<AwardDetails, RewardsServiceError> {
        let award = self
            .awards
            .find_by_id(award_id)
            .await?
            .ok_or(RewardsServiceError::AwardNotFound)?;
        let redemption = match award.status {
            AwardStatus::Redeemed => self.awards.find_redemption(award.id).await?,
            _ => None,
        };
        Ok(AwardDetails { award, redemption })
    }
}
