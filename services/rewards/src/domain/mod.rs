pub mod repository;
pub mod templates;
pub mod types;
