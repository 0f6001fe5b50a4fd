/// Database configuration and connection management
pub mod database;

/// Planner settings loaded from planner.toml
pub mod planner;
