pub mod clock;
pub mod config;
pub mod schedule_repository;
pub mod unit_repository;
pub mod yaml;
