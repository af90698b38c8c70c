// Domain layer - Dashboard entities and value objects
pub mod chart;
pub mod errors;
pub mod payload;
pub mod query;
