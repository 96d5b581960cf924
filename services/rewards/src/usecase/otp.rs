use chrono::{Duration, Utc};
use rand::RngExt;
use tracing::{info, warn};
use uuid::Uuid;

use prizeflow_domain::notification::{NotificationChannel, SmsKind};
use prizeflow_domain::otp::OtpPurpose;
use prizeflow_domain::phone::Phone;

use crate::domain::repository::{Notifier, OneTimePasswords, OtpRepository, OtpThrottle};
use crate::domain::templates;
use crate::domain::types::{
    DispatchRequest, OneTimePassword, OtpSendResult, OtpSettings, OtpVerification,
};
use crate::error::RewardsServiceError;

/// Numeric code of `len` digits.
pub fn generate_numeric_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Issues and verifies one-time passwords scoped by `(phone, purpose)`.
///
/// Sending retires every earlier unused code for the pair, so at most one code
/// can verify at any time.
pub struct OtpEngine<O, T, N>
where
    O: OtpRepository,
    T: OtpThrottle,
    N: Notifier,
{
    pub otps: O,
    pub throttle: T,
    pub notifier: N,
    pub settings: OtpSettings,
}

impl<O, T, N> OneTimePasswords for OtpEngine<O, T, N>
where
    O: OtpRepository,
    T: OtpThrottle,
    N: Notifier,
{
    async fn send(
        &self,
        phone: &Phone,
        purpose: OtpPurpose,
        related_entity_id: Option<Uuid>,
    ) -> Result<OtpSendResult, RewardsServiceError> {
        if !self.throttle.try_acquire(phone.as_str(), purpose).await? {
            return Ok(OtpSendResult {
                success: false,
                throttled: true,
                expires_in_seconds: 0,
                message: RewardsServiceError::OtpThrottled.to_string(),
            });
        }

        let retired = self.otps.invalidate_active(phone.as_str(), purpose).await?;

        let now = Utc::now();
        let otp = OneTimePassword {
            id: Uuid::now_v7(),
            phone: phone.as_str().to_owned(),
            code: generate_numeric_code(self.settings.code_len),
            purpose,
            related_entity_id,
            created_at: now,
            expires_at: now + Duration::seconds(self.settings.ttl_secs),
            used_at: None,
            attempt_count: 0,
            max_attempts: self.settings.max_attempts,
        };
        self.otps.create(&otp).await?;

        let outcome = self
            .notifier
            .dispatch(DispatchRequest {
                phone: otp.phone.clone(),
                body: templates::otp_message(&otp.code, self.settings.ttl_secs),
                kind: SmsKind::Otp,
                channel: NotificationChannel::Sms,
                related_entity_type: Some("one_time_password"),
                related_entity_id: Some(otp.id),
            })
            .await?;

        if !outcome.is_sent() {
            warn!(
                otp_id = %otp.id,
                phone = %phone.masked(),
                purpose = purpose.as_str(),
                "verification code delivery failed"
            );
            return Ok(OtpSendResult {
                success: false,
                throttled: false,
                expires_in_seconds: self.settings.ttl_secs,
                message: "Failed to send verification code".to_owned(),
            });
        }

        info!(
            otp_id = %otp.id,
            phone = %phone.masked(),
            purpose = purpose.as_str(),
            retired,
            "verification code sent"
        );
        Ok(OtpSendResult {
            success: true,
            throttled: false,
            expires_in_seconds: self.settings.ttl_secs,
            message: format!("Verification code sent to {}", phone.masked()),
        })
    }

    async fn verify(
        &self,
        phone: &Phone,
        code: &str,
        purpose: OtpPurpose,
        related_entity_id: Option<Uuid>,
    ) -> Result<OtpVerification, RewardsServiceError> {
        let Some(otp) = self
            .otps
            .find_latest_unused(phone.as_str(), purpose)
            .await?
        else {
            return Ok(OtpVerification::invalid(
                "No valid verification code found. Please request a new one.",
                None,
            ));
        };

        if otp.attempts_exhausted() {
            self.otps.mark_used(otp.id).await?;
            return Ok(OtpVerification::invalid(
                "Maximum verification attempts exceeded. Please request a new code.",
                Some(0),
            ));
        }

        if otp.is_expired_at(Utc::now()) {
            return Ok(OtpVerification::invalid(
                "Verification code has expired. Please request a new one.",
                None,
            ));
        }

        // A code issued for one entity never confirms another.
        if let (Some(issued_for), Some(requested)) = (otp.related_entity_id, related_entity_id) {
            if issued_for != requested {
                return Ok(OtpVerification::invalid(
                    "Verification code was not issued for this request. Please request a new one.",
                    None,
                ));
            }
        }

        // Every comparison spends an attempt first, so parallel guesses share one budget.
        let Some(attempts) = self.otps.reserve_attempt(otp.id).await? else {
            self.otps.mark_used(otp.id).await?;
            return Ok(OtpVerification::invalid(
                "Maximum verification attempts exceeded. Please request a new code.",
                Some(0),
            ));
        };

        if !otp.code.eq_ignore_ascii_case(code.trim()) {
            let remaining = (otp.max_attempts - attempts).max(0);
            return Ok(OtpVerification::invalid(
                format!("Invalid verification code. {remaining} attempt(s) remaining."),
                Some(remaining),
            ));
        }

        if !self.otps.mark_used(otp.id).await? {
            return Ok(OtpVerification::invalid(
                "Verification code has already been used.",
                None,
            ));
        }

        info!(otp_id = %otp.id, phone = %phone.masked(), purpose = purpose.as_str(), "verification code accepted");
        Ok(OtpVerification::valid())
    }
}
