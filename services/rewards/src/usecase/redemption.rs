use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::RngExt;
use tracing::{info, warn};
use uuid::Uuid;

use prizeflow_domain::award::AwardStatus;
use prizeflow_domain::notification::{NotificationChannel, SmsKind};
use prizeflow_domain::otp::OtpPurpose;
use prizeflow_domain::phone::Phone;

use crate::domain::repository::{AwardRepository, Notifier, OneTimePasswords, PrizeRepository};
use crate::domain::templates;
use crate::domain::types::{
    DispatchRequest, MAX_REDEMPTION_CHANNEL_LEN, MAX_REDEMPTION_NOTES_LEN, PrizeAward,
    PrizeRedemption, REDEMPTION_CODE_LEN, REDEMPTION_CODE_PREFIX, RedemptionStatus,
};
use crate::error::RewardsServiceError;

/// Charset for redemption codes (uppercase alphanumeric).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub fn generate_redemption_code() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..REDEMPTION_CODE_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect();
    format!("{REDEMPTION_CODE_PREFIX}{suffix}")
}

// ── Initiate ──────────────────────────────────────────────────────────────────

pub struct InitiateRedemptionInput {
    pub phone: Phone,
    pub award_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct RedeemablePrize {
    pub award_id: Uuid,
    pub prize_id: Uuid,
    pub prize_name: String,
    pub monetary_value_cents: Option<i64>,
    pub awarded_at: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct RedemptionInitiation {
    pub requires_otp: bool,
    pub message: String,
    pub otp_expires_in_seconds: Option<i64>,
    pub redeemable_prizes: Vec<RedeemablePrize>,
}

pub struct InitiateRedemptionUseCase<A, P, O>
where
    A: AwardRepository,
    P: PrizeRepository,
    O: OneTimePasswords,
{
    pub awards: A,
    pub prizes: P,
    pub otp: O,
}

impl<A, P, O> InitiateRedemptionUseCase<A, P, O>
where
    A: AwardRepository,
    P: PrizeRepository,
    O: OneTimePasswords,
{
    pub async fn execute(
        &self,
        input: InitiateRedemptionInput,
    ) -> Result<RedemptionInitiation, RewardsServiceError> {
        let now = Utc::now();
        let mut awards = self
            .awards
            .list_redeemable(input.phone.as_str(), now)
            .await?;
        awards.retain(|a| a.is_redeemable_at(now));

        if let Some(award_id) = input.award_id {
            awards.retain(|a| a.id == award_id);
            if awards.is_empty() {
                return Err(RewardsServiceError::AwardNotAvailable);
            }
        }

        if awards.is_empty() {
            return Ok(RedemptionInitiation {
                requires_otp: false,
                message: "There are no prizes available for redemption on this phone number"
                    .to_owned(),
                otp_expires_in_seconds: None,
                redeemable_prizes: vec![],
            });
        }

        let redeemable_prizes = self.describe(&awards).await?;

        let sent = self
            .otp
            .send(&input.phone, OtpPurpose::Redemption, input.award_id)
            .await?;
        if sent.throttled {
            return Err(RewardsServiceError::OtpThrottled);
        }
        if !sent.success {
            return Err(RewardsServiceError::OtpDeliveryFailed);
        }

        info!(
            phone = %input.phone.masked(),
            redeemable = redeemable_prizes.len(),
            "redemption initiated"
        );
        Ok(RedemptionInitiation {
            requires_otp: true,
            message: format!(
                "A verification code has been sent to {}",
                input.phone.masked()
            ),
            otp_expires_in_seconds: Some(sent.expires_in_seconds),
            redeemable_prizes,
        })
    }

    async fn describe(
        &self,
        awards: &[PrizeAward],
    ) -> Result<Vec<RedeemablePrize>, RewardsServiceError> {
        let mut prize_ids: Vec<Uuid> = awards.iter().map(|a| a.prize_id).collect();
        prize_ids.sort_unstable();
        prize_ids.dedup();
        let prizes: HashMap<Uuid, _> = self
            .prizes
            .find_by_ids(&prize_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(awards
            .iter()
            .map(|a| {
                let prize = prizes.get(&a.prize_id);
                RedeemablePrize {
                    award_id: a.id,
                    prize_id: a.prize_id,
                    prize_name: prize.map(|p| p.name.clone()).unwrap_or_default(),
                    monetary_value_cents: prize.and_then(|p| p.monetary_value_cents),
                    awarded_at: a.awarded_at,
                    expiry_date: a.expiry_date,
                }
            })
            .collect())
    }
}

// ── Complete ──────────────────────────────────────────────────────────────────

pub struct CompleteRedemptionInput {
    pub phone: Phone,
    pub otp: String,
    pub award_id: Uuid,
    pub channel: String,
    pub notes: Option<String>,
    pub from_ip: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RedemptionCompletion {
    pub redemption_id: Uuid,
    pub redemption_code: String,
    pub redeemed_at: DateTime<Utc>,
    pub message: String,
}

pub struct CompleteRedemptionUseCase<A, P, O, N>
where
    A: AwardRepository,
    P: PrizeRepository,
    O: OneTimePasswords,
    N: Notifier,
{
    pub awards: A,
    pub prizes: P,
    pub otp: O,
    pub notifier: N,
}

impl<A, P, O, N> CompleteRedemptionUseCase<A, P, O, N>
where
    A: AwardRepository,
    P: PrizeRepository,
    O: OneTimePasswords,
    N: Notifier,
{
    pub async fn execute(
        &self,
        input: CompleteRedemptionInput,
    ) -> Result<RedemptionCompletion, RewardsServiceError> {
        let code = input.otp.trim();
        if code.is_empty() {
            return Err(RewardsServiceError::invalid_input(
                "a verification code is required",
            ));
        }
        let channel = input.channel.trim();
        if channel.is_empty() || channel.len() > MAX_REDEMPTION_CHANNEL_LEN {
            return Err(RewardsServiceError::invalid_input(format!(
                "channel must be between 1 and {MAX_REDEMPTION_CHANNEL_LEN} characters"
            )));
        }
        if input
            .notes
            .as_deref()
            .is_some_and(|n| n.len() > MAX_REDEMPTION_NOTES_LEN)
        {
            return Err(RewardsServiceError::invalid_input(format!(
                "notes must be at most {MAX_REDEMPTION_NOTES_LEN} characters"
            )));
        }

        let verification = self
            .otp
            .verify(
                &input.phone,
                code,
                OtpPurpose::Redemption,
                Some(input.award_id),
            )
            .await?;
        if !verification.is_valid {
            return Err(RewardsServiceError::InvalidOtp {
                message: verification.message,
                remaining_attempts: verification.remaining_attempts,
            });
        }

        let award = self
            .awards
            .find_by_id(input.award_id)
            .await?
            .ok_or(RewardsServiceError::AwardNotFound)?;
        if award.phone != input.phone.as_str() {
            return Err(RewardsServiceError::AwardNotOwned);
        }
        if award.status != AwardStatus::Awarded {
            return Err(RewardsServiceError::AwardNotRedeemable(award.status));
        }
        let now = Utc::now();
        if award.is_expired_at(now) {
            return Err(RewardsServiceError::AwardExpired);
        }

        let redemption = PrizeRedemption {
            id: Uuid::now_v7(),
            prize_award_id: award.id,
            redemption_code: generate_redemption_code(),
            redeemed_at: now,
            channel: channel.to_owned(),
            from_ip: input.from_ip,
            status: RedemptionStatus::Completed,
            notes: input.notes,
        };

        if !self.awards.redeem(&redemption).await? {
            // Someone else moved the award out of `awarded` since it was loaded.
            let status = match self.awards.find_by_id(award.id).await? {
                Some(current) if current.status.is_terminal() => current.status,
                _ => AwardStatus::Redeemed,
            };
            return Err(RewardsServiceError::AwardNotRedeemable(status));
        }

        info!(
            award_id = %award.id,
            redemption_id = %redemption.id,
            phone = %input.phone.masked(),
            "prize redeemed"
        );

        if let Err(e) = self.confirm(&award, &redemption).await {
            warn!(
                award_id = %award.id,
                error = ?e,
                "redemption confirmation could not be sent"
            );
        }

        Ok(RedemptionCompletion {
            redemption_id: redemption.id,
            redemption_code: redemption.redemption_code,
            redeemed_at: redemption.redeemed_at,
            message: "Prize redeemed successfully".to_owned(),
        })
    }

    /// Best effort: the redemption stands whatever happens here.
    async fn confirm(
        &self,
        award: &PrizeAward,
        redemption: &PrizeRedemption,
    ) -> Result<(), RewardsServiceError> {
        let prize_name = self
            .prizes
            .find_by_id(award.prize_id)
            .await?
            .map(|p| p.name)
            .unwrap_or_else(|| "prize".to_owned());
        self.notifier
            .dispatch(DispatchRequest {
                phone: award.phone.clone(),
                body: templates::redemption_confirmation_message(
                    &prize_name,
                    &redemption.redemption_code,
                ),
                kind: SmsKind::RedemptionConfirmation,
                channel: award
                    .notification_channel
                    .unwrap_or(NotificationChannel::Sms),
                related_entity_type: Some("prize_redemption"),
                related_entity_id: Some(redemption.id),
            })
            .await?;
        Ok(())
    }
}
