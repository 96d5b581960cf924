use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use prizeflow_domain::award::AwardStatus;
use prizeflow_domain::phone::PhoneError;

/// Rewards service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum RewardsServiceError {
    #[error("prize not found")]
    PrizeNotFound,
    #[error("award not found")]
    AwardNotFound,
    #[error("competition not found")]
    CompetitionNotFound,
    #[error("No available prizes in the pool")]
    NoStock,
    #[error("prize is not available for allocation")]
    PrizeUnavailable,
    #[error("{message}")]
    InvalidOtp {
        message: String,
        remaining_attempts: Option<i32>,
    },
    #[error("This prize does not belong to this phone number")]
    AwardNotOwned,
    #[error("{}", not_redeemable_message(.0))]
    AwardNotRedeemable(AwardStatus),
    #[error("This prize has expired")]
    AwardExpired,
    #[error("The selected prize is not available for redemption")]
    AwardNotAvailable,
    #[error("award cannot be cancelled")]
    AwardNotCancellable,
    #[error(transparent)]
    InvalidPhone(#[from] PhoneError),
    #[error("{0}")]
    InvalidInput(String),
    #[error("batch exceeds the maximum of {max} phone numbers")]
    BatchTooLarge { max: usize },
    #[error("forbidden")]
    Forbidden,
    #[error("Please wait before requesting another verification code")]
    OtpThrottled,
    #[error("verification code could not be delivered")]
    OtpDeliveryFailed,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

fn not_redeemable_message(status: &AwardStatus) -> &'static str {
    match *status {
        AwardStatus::Redeemed => "This prize has already been redeemed",
        AwardStatus::Cancelled => "This prize award has been cancelled",
        AwardStatus::Expired => "This prize award has expired",
        AwardStatus::Awarded => "This prize cannot be redeemed",
    }
}

impl RewardsServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PrizeNotFound => "PRIZE_NOT_FOUND",
            Self::AwardNotFound => "AWARD_NOT_FOUND",
            Self::CompetitionNotFound => "COMPETITION_NOT_FOUND",
            Self::NoStock => "NO_STOCK",
            Self::PrizeUnavailable => "PRIZE_UNAVAILABLE",
            Self::InvalidOtp { .. } => "INVALID_OTP",
            Self::AwardNotOwned => "AWARD_NOT_OWNED",
            Self::AwardNotRedeemable(_) => "AWARD_NOT_REDEEMABLE",
            Self::AwardExpired => "AWARD_EXPIRED",
            Self::AwardNotAvailable => "AWARD_NOT_AVAILABLE",
            Self::AwardNotCancellable => "AWARD_NOT_CANCELLABLE",
            Self::InvalidPhone(_) => "INVALID_PHONE",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
            Self::Forbidden => "FORBIDDEN",
            Self::OtpThrottled => "OTP_THROTTLED",
            Self::OtpDeliveryFailed => "OTP_DELIVERY_FAILED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl IntoResponse for RewardsServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::PrizeNotFound | Self::AwardNotFound | Self::CompetitionNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::NoStock
            | Self::PrizeUnavailable
            | Self::InvalidOtp { .. }
            | Self::AwardNotOwned
            | Self::AwardNotRedeemable(_)
            | Self::AwardExpired
            | Self::AwardNotAvailable
            | Self::AwardNotCancellable
            | Self::InvalidPhone(_)
            | Self::InvalidInput(_)
            | Self::BatchTooLarge { .. } => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::OtpThrottled => StatusCode::TOO_MANY_REQUESTS,
            Self::OtpDeliveryFailed => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // TraceLayer records every response; only 500s carry a cause worth logging.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::InvalidOtp {
            remaining_attempts: Some(remaining),
            ..
        } = self
        {
            body["remaining_attempts"] = remaining.into();
        }
        (status, axum::Json(body)).into_response()
    }
}
