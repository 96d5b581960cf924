pub mod cache;
pub mod db;
pub mod grpc;
pub mod sms;
