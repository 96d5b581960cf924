pub mod allocator;
pub mod award;
pub mod expiry;
pub mod notification;
pub mod otp;
pub mod redemption;
