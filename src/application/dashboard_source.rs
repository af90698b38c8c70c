// Remote collaborators of the dashboard client
use crate::domain::payload::DashboardPayload;
use crate::domain::query::DashboardQuery;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// One fetch of the aggregated payload. The cache token differs on every
/// request so no intermediate cache can answer it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRequest {
    pub query: DashboardQuery,
    pub cache_token: String,
}

impl DashboardRequest {
    pub fn new(query: DashboardQuery) -> Self {
        let sequence = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let cache_token = format!("{}-{}", Utc::now().timestamp_millis(), sequence);
        Self { query, cache_token }
    }
}

#[async_trait]
pub trait DashboardSource: Send + Sync {
    /// Fetch a fresh aggregated payload for the query
    async fn fetch_dashboard(&self, request: &DashboardRequest) -> anyhow::Result<DashboardPayload>;
}

#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Find the employee whose linked user account equals the session user
    async fn employee_for_user(&self, user_id: &str) -> anyhow::Result<Option<String>>;
}
