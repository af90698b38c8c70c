// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod fixture_repository;
pub mod http_source;
pub mod terminal_charts;
pub mod terminal_surface;
