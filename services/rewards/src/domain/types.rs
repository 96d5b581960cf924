use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use prizeflow_domain::award::{AwardMethod, AwardStatus};
use prizeflow_domain::notification::{
    NotificationChannel, NotificationStatus, SmsKind, SmsStatus,
};
use prizeflow_domain::otp::OtpPurpose;

/// A stocked prize in a pool.
#[derive(Debug, Clone)]
pub struct Prize {
    pub id: Uuid,
    pub pool_id: Uuid,
    pub type_id: Option<Uuid>,
    pub name: String,
    pub monetary_value_cents: Option<i64>,
    pub total_quantity: i32,
    pub remaining_quantity: i32,
    pub expiry_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Prize {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|d| d <= now)
    }

    /// Active, in stock, and not past its own expiry.
    pub fn is_allocatable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.remaining_quantity > 0 && !self.is_expired_at(now)
    }
}

/// The binding of one unit of a prize to one phone.
#[derive(Debug, Clone)]
pub struct PrizeAward {
    pub id: Uuid,
    pub prize_id: Uuid,
    pub external_user_id: Option<Uuid>,
    /// Normalized phone (see `Phone::parse`).
    pub phone: String,
    pub competition_id: Option<Uuid>,
    pub awarded_at: DateTime<Utc>,
    pub awarded_by: Option<Uuid>,
    pub method: AwardMethod,
    pub notification_channel: Option<NotificationChannel>,
    pub notification_status: NotificationStatus,
    pub status: AwardStatus,
    pub expiry_date: Option<DateTime<Utc>>,
    pub external_reference: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<Uuid>,
    pub cancellation_reason: Option<String>,
}

impl PrizeAward {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|d| d <= now)
    }

    pub fn is_redeemable_at(&self, now: DateTime<Utc>) -> bool {
        self.status == AwardStatus::Awarded && !self.is_expired_at(now)
    }
}

/// Redemption record status. Only completed redemptions are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedemptionStatus {
    Completed,
}

impl RedemptionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// Proof that an award was redeemed. At most one per award.
#[derive(Debug, Clone)]
pub struct PrizeRedemption {
    pub id: Uuid,
    pub prize_award_id: Uuid,
    pub redemption_code: String,
    pub redeemed_at: DateTime<Utc>,
    pub channel: String,
    pub from_ip: Option<String>,
    pub status: RedemptionStatus,
    pub notes: Option<String>,
}

/// A stored one-time password.
#[derive(Debug, Clone)]
pub struct OneTimePassword {
    pub id: Uuid,
    pub phone: String,
    pub code: String,
    pub purpose: OtpPurpose,
    pub related_entity_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub attempt_count: i32,
    pub max_attempts: i32,
}

impl OneTimePassword {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn attempts_exhausted(&self) -> bool {
        self.attempt_count >= self.max_attempts
    }
}

/// One logged outbound message.
#[derive(Debug, Clone)]
pub struct SmsMessage {
    pub id: Uuid,
    pub phone: String,
    pub body: String,
    pub kind: SmsKind,
    pub related_entity_type: Option<String>,
    pub related_entity_id: Option<Uuid>,
    pub status: SmsStatus,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub provider_reference: Option<String>,
    pub failure_reason: Option<String>,
    pub retry_count: i32,
}

/// User record owned by the directory service.
#[derive(Debug, Clone)]
pub struct DirectoryUser {
    pub id: Uuid,
    pub phone: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Competition record owned by the directory service.
#[derive(Debug, Clone)]
pub struct Competition {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
}

/// What to send, to whom, and what it is about.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub phone: String,
    pub body: String,
    pub kind: SmsKind,
    pub channel: NotificationChannel,
    pub related_entity_type: Option<&'static str>,
    pub related_entity_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub message_id: Uuid,
    pub status: SmsStatus,
    pub provider_reference: Option<String>,
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self.status, SmsStatus::Sent | SmsStatus::Delivered)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpSendResult {
    pub success: bool,
    /// Set when the resend cooldown rejected the request; no code was issued.
    pub throttled: bool,
    pub expires_in_seconds: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpVerification {
    pub is_valid: bool,
    pub message: String,
    pub remaining_attempts: Option<i32>,
}

impl OtpVerification {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: "Verification successful".to_owned(),
            remaining_attempts: None,
        }
    }

    pub fn invalid(message: impl Into<String>, remaining_attempts: Option<i32>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
            remaining_attempts,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OtpSettings {
    pub code_len: usize,
    pub ttl_secs: i64,
    pub max_attempts: i32,
}

impl Default for OtpSettings {
    fn default() -> Self {
        Self {
            code_len: 6,
            ttl_secs: 300,
            max_attempts: 3,
        }
    }
}

/// Runtime knobs shared by the use cases.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub otp: OtpSettings,
    pub otp_resend_cooldown_secs: u64,
    pub sms_max_retries: u32,
    pub sms_retry_backoff: Duration,
    pub bulk_max_batch: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            otp: OtpSettings::default(),
            otp_resend_cooldown_secs: 30,
            sms_max_retries: 1,
            sms_retry_backoff: Duration::from_millis(250),
            bulk_max_batch: 5000,
        }
    }
}

/// Prefix of every redemption code handed to winners.
pub const REDEMPTION_CODE_PREFIX: &str = "RDM-";

/// Random characters after the prefix.
pub const REDEMPTION_CODE_LEN: usize = 10;

/// Pick-and-award attempts per bulk item before reporting the pool as exhausted.
pub const MAX_ALLOCATION_ATTEMPTS: usize = 3;

pub const MAX_CANCELLATION_REASON_LEN: usize = 500;

pub const MAX_EXTERNAL_REFERENCE_LEN: usize = 128;

pub const MAX_REDEMPTION_NOTES_LEN: usize = 1000;

pub const MAX_REDEMPTION_CHANNEL_LEN: usize = 32;

/// Upper bound on an award expiry override, in days.
pub const MAX_EXPIRY_DAYS: u32 = 3650;
