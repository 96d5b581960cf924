//! One-time password purposes.

use serde::{Deserialize, Serialize};

/// What a one-time password proves possession of the phone for.
///
/// Codes are scoped by `(phone, purpose)`: a redemption code never verifies a
/// login, and issuing a login code leaves redemption codes alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    Redemption,
    Registration,
    Login,
}

impl OtpPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Redemption => "redemption",
            Self::Registration => "registration",
            Self::Login => "login",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "redemption" => Some(Self::Redemption),
            "registration" => Some(Self::Registration),
            "login" => Some(Self::Login),
            _ => None,
        }
    }
}
