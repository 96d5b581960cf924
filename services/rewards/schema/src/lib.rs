pub mod one_time_passwords;
pub mod prize_awards;
pub mod prize_redemptions;
pub mod prizes;
pub mod sms_messages;
