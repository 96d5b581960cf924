#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use prizeflow_domain::notification::{NotificationChannel, NotificationStatus};
use prizeflow_domain::otp::OtpPurpose;
use prizeflow_domain::phone::Phone;

use crate::domain::types::{
    Competition, DirectoryUser, DispatchOutcome, DispatchRequest, OneTimePassword, OtpSendResult,
    OtpVerification, Prize, PrizeAward, PrizeRedemption, SmsMessage,
};
use crate::error::RewardsServiceError;

/// Repository for one-time passwords.
pub trait OtpRepository: Send + Sync {
    async fn create(&self, otp: &OneTimePassword) -> Result<(), RewardsServiceError>;

    /// Mark every unused code for `(phone, purpose)` as used. Returns how many were retired.
    async fn invalidate_active(
        &self,
        phone: &str,
        purpose: OtpPurpose,
    ) -> Result<u64, RewardsServiceError>;

    /// Most recently created unused code for `(phone, purpose)`.
    async fn find_latest_unused(
        &self,
        phone: &str,
        purpose: OtpPurpose,
    ) -> Result<Option<OneTimePassword>, RewardsServiceError>;

    /// Take one attempt from the code's budget in a single conditional update.
    /// Returns the new count, or `None` once the code is used or out of attempts.
    async fn reserve_attempt(&self, id: Uuid) -> Result<Option<i32>, RewardsServiceError>;

    /// Set `used_at` if it is still unset. Returns `false` if another caller got there first.
    async fn mark_used(&self, id: Uuid) -> Result<bool, RewardsServiceError>;
}

/// Resend cooldown for one-time passwords.
pub trait OtpThrottle: Send + Sync {
    /// Returns `false` while a previous send to `(phone, purpose)` is still cooling down.
    async fn try_acquire(
        &self,
        phone: &str,
        purpose: OtpPurpose,
    ) -> Result<bool, RewardsServiceError>;
}

/// Repository for prize stock.
pub trait PrizeRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Prize>, RewardsServiceError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Prize>, RewardsServiceError>;

    /// Allocatable prize with the lowest id in the pool (optionally narrowed to a type).
    async fn pick_next(
        &self,
        pool_id: Uuid,
        type_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<Option<Prize>, RewardsServiceError>;

    /// Take one unit of stock. Returns `false` when none was left.
    /// Must be a single conditional write: concurrent callers never drive stock below zero.
    async fn decrement(&self, id: Uuid) -> Result<bool, RewardsServiceError>;
}

/// Repository for prize awards and their redemptions.
pub trait AwardRepository: Send + Sync {
    async fn create(&self, award: &PrizeAward) -> Result<(), RewardsServiceError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PrizeAward>, RewardsServiceError>;

    /// Awards for `phone` in `awarded` status whose expiry is unset or after `now`.
    async fn list_redeemable(
        &self,
        phone: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<PrizeAward>, RewardsServiceError>;

    async fn update_notification_status(
        &self,
        id: Uuid,
        status: NotificationStatus,
    ) -> Result<(), RewardsServiceError>;

    /// `awarded -> cancelled`. Returns `false` if the award is missing or already terminal.
    async fn cancel(
        &self,
        id: Uuid,
        actor_id: Option<Uuid>,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<bool, RewardsServiceError>;

    /// `awarded -> redeemed` and insert the redemption record, atomically.
    /// Returns `false` (and writes nothing) if the award is no longer `awarded`.
    async fn redeem(&self, redemption: &PrizeRedemption) -> Result<bool, RewardsServiceError>;

    async fn find_redemption(
        &self,
        award_id: Uuid,
    ) -> Result<Option<PrizeRedemption>, RewardsServiceError>;

    /// `awarded -> expired` for every award whose expiry has passed. Returns the count.
    async fn expire_overdue(&self, now: DateTime<Utc>) -> Result<u64, RewardsServiceError>;
}

/// Append-mostly log of outbound messages.
pub trait SmsMessageRepository: Send + Sync {
    async fn create(&self, message: &SmsMessage) -> Result<(), RewardsServiceError>;

    /// Persist delivery outcome fields (status, sent_at, provider reference, failure, retries).
    async fn update(&self, message: &SmsMessage) -> Result<(), RewardsServiceError>;
}

/// Port to the directory service that owns users and competitions.
pub trait DirectoryPort: Send + Sync {
    async fn get_or_create_user(
        &self,
        phone: &str,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<DirectoryUser, RewardsServiceError>;

    async fn get_competition(&self, id: Uuid) -> Result<Option<Competition>, RewardsServiceError>;
}

/// Outbound message provider. Returns the provider's message reference.
pub trait SmsTransport: Send + Sync {
    async fn send(
        &self,
        channel: NotificationChannel,
        phone: &str,
        body: &str,
    ) -> anyhow::Result<String>;
}

/// Logged, retried message delivery.
pub trait Notifier: Send + Sync {
    async fn dispatch(
        &self,
        request: DispatchRequest,
    ) -> Result<DispatchOutcome, RewardsServiceError>;
}

/// Issue and check one-time passwords.
pub trait OneTimePasswords: Send + Sync {
    async fn send(
        &self,
        phone: &Phone,
        purpose: OtpPurpose,
        related_entity_id: Option<Uuid>,
    ) -> Result<OtpSendResult, RewardsServiceError>;

    async fn verify(
        &self,
        phone: &Phone,
        code: &str,
        purpose: OtpPurpose,
        related_entity_id: Option<Uuid>,
    ) -> Result<OtpVerification, RewardsServiceError>;
}
