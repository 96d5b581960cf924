//! Message bodies sent to winners.

use chrono::{DateTime, Utc};

pub fn otp_message(code: &str, ttl_secs: i64) -> String {
    let minutes = ((ttl_secs + 59) / 60).max(1);
    let unit = if minutes == 1 { "minute" } else { "minutes" };
    format!("Your verification code is {code}. It expires in {minutes} {unit}. Do not share this code.")
}

pub fn award_message(prize_name: &str, expiry: Option<DateTime<Utc>>) -> String {
    match expiry {
        Some(expiry) => format!(
            "Congratulations! You have won {prize_name}. Redeem it before {}.",
            expiry.format("%Y-%m-%d")
        ),
        None => format!(
            "Congratulations! You have won {prize_name}. Redeem it with this phone number."
        ),
    }
}

pub fn redemption_confirmation_message(prize_name: &str, redemption_code: &str) -> String {
    format!("Your {prize_name} has been redeemed. Redemption code: {redemption_code}.")
}
