use std::time::Duration;

use serde::Deserialize;

use prizeflow_core::config::Config;

use crate::domain::types::{EngineSettings, OtpSettings};

/// Rewards service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct RewardsConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Redis connection URL (OTP resend cooldown keys).
    pub redis_url: String,
    /// Directory service gRPC URL (e.g. "http://directory:50051").
    pub directory_grpc_url: String,
    /// Message provider endpoint that accepts SMS/WhatsApp send requests.
    pub sms_provider_url: String,
    /// Bearer token for the message provider.
    pub sms_provider_api_key: String,
    /// TCP port to listen on (default 3120). Env var: `REWARDS_PORT`.
    #[serde(default = "default_rewards_port")]
    pub rewards_port: u16,
    #[serde(default = "default_sms_sender_id")]
    pub sms_sender_id: String,
    #[serde(default = "default_sms_timeout_secs")]
    pub sms_timeout_secs: u64,
    /// Extra transport attempts after the first failure.
    #[serde(default = "default_sms_max_retries")]
    pub sms_max_retries: u32,
    #[serde(default = "default_sms_retry_backoff_ms")]
    pub sms_retry_backoff_ms: u64,
    #[serde(default = "default_otp_length")]
    pub otp_length: usize,
    #[serde(default = "default_otp_ttl_secs")]
    pub otp_ttl_secs: i64,
    #[serde(default = "default_otp_max_attempts")]
    pub otp_max_attempts: i32,
    /// Minimum gap between two sends to the same phone and purpose. 0 disables.
    #[serde(default = "default_otp_resend_cooldown_secs")]
    pub otp_resend_cooldown_secs: u64,
    #[serde(default = "default_bulk_award_max_batch")]
    pub bulk_award_max_batch: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Interval of the background award expiry sweep. 0 disables.
    #[serde(default = "default_award_expiry_sweep_secs")]
    pub award_expiry_sweep_secs: u64,
}

impl Config for RewardsConfig {}

fn default_rewards_port() -> u16 {
    3120
}

fn default_sms_sender_id() -> String {
    "PRIZES".to_owned()
}

fn default_sms_timeout_secs() -> u64 {
    10
}

fn default_sms_max_retries() -> u32 {
    1
}

fn default_sms_retry_backoff_ms() -> u64 {
    250
}

fn default_otp_length() -> usize {
    6
}

fn default_otp_ttl_secs() -> i64 {
    300
}

fn default_otp_max_attempts() -> i32 {
    3
}

fn default_otp_resend_cooldown_secs() -> u64 {
    30
}

fn default_bulk_award_max_batch() -> usize {
    5000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_award_expiry_sweep_secs() -> u64 {
    300
}

impl RewardsConfig {
    pub fn otp_settings(&self) -> OtpSettings {
        OtpSettings {
            code_len: self.otp_length,
            ttl_secs: self.otp_ttl_secs,
            max_attempts: self.otp_max_attempts,
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            otp: self.otp_settings(),
            otp_resend_cooldown_secs: self.otp_resend_cooldown_secs,
            sms_max_retries: self.sms_max_retries,
            sms_retry_backoff: Duration::from_millis(self.sms_retry_backoff_ms),
            bulk_max_batch: self.bulk_award_max_batch,
        }
    }

    pub fn sms_timeout(&self) -> Duration {
        Duration::from_secs(self.sms_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
