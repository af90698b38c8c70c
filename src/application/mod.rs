// Application layer - Use cases and collaborator traits
pub mod aggregation_service;
pub mod dashboard_source;
pub mod data_shaper;
pub mod display;
pub mod fetch_trigger;
pub mod performance_repository;
pub mod renderer;

#[cfg(test)]
pub mod testing;
