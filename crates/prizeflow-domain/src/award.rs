//! Prize award vocabulary.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a prize award.
///
/// `Awarded` is the only non-terminal state. Every transition leaves it and none
/// returns to it: `Awarded -> Redeemed | Cancelled | Expired`.
///
/// Storage format: the snake_case name returned by [`AwardStatus::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardStatus {
    Awarded,
    Redeemed,
    Expired,
    Cancelled,
}

impl AwardStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Awarded => "awarded",
            Self::Redeemed => "redeemed",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a stored value. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "awarded" => Some(Self::Awarded),
            "redeemed" => Some(Self::Redeemed),
            "expired" => Some(Self::Expired),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Awarded)
    }

    pub fn can_transition_to(self, next: AwardStatus) -> bool {
        matches!(
            (self, next),
            (
                Self::Awarded,
                Self::Redeemed | Self::Cancelled | Self::Expired
            )
        )
    }
}

/// How an award was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AwardMethod {
    /// Single award by an administrator.
    Manual,
    /// One item of a bulk award batch.
    Bulk,
    /// Awarded by an automated rule (e.g. on registration).
    Auto,
}

impl AwardMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Bulk => "bulk",
            Self::Auto => "auto",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manual" => Some(Self::Manual),
            "bulk" => Some(Self::Bulk),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}
