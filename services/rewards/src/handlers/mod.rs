pub mod awards;
pub mod health;
pub mod otp;
pub mod redemptions;
