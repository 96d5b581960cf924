//! Domain vocabulary shared across Prizeflow services.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; storage and transport code converts
//! to and from the wire names exposed here.

pub mod actor;
pub mod award;
pub mod notification;
pub mod otp;
pub mod phone;
