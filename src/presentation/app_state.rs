// Application state for HTTP handlers
use crate::application::aggregation_service::AggregationService;

#[derive(Clone)]
pub struct AppState {
    pub aggregation_service: AggregationService,
}
