// Presentation layer - HTTP surface of the aggregator
pub mod app_state;
pub mod handlers;
