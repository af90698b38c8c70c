// HTTP client for the remote dashboard aggregator
use crate::application::dashboard_source::{DashboardRequest, DashboardSource, EmployeeDirectory};
use crate::domain::payload::DashboardPayload;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpDashboardSource {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct EmployeeLookup {
    employee: Option<String>,
}

impl HttpDashboardSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn dashboard_url(&self, request: &DashboardRequest) -> String {
        format!(
            "{}/api/employees/{}/dashboard?from_date={}&to_date={}&_ts={}",
            self.base_url,
            urlencoding::encode(&request.query.employee_id),
            request.query.from_date(),
            request.query.to_date(),
            urlencoding::encode(&request.cache_token)
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .context("Failed to send request to dashboard aggregator")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Dashboard aggregator returned {}: {}", status, body);
        }

        response
            .json::<T>()
            .await
            .context("Failed to parse dashboard aggregator response")
    }
}

#[async_trait]
impl DashboardSource for HttpDashboardSource {
    async fn fetch_dashboard(&self, request: &DashboardRequest) -> Result<DashboardPayload> {
        let url = self.dashboard_url(request);
        tracing::debug!("GET {}", url);
        self.get_json(&url).await
    }
}

#[async_trait]
impl EmployeeDirectory for HttpDashboardSource {
    async fn employee_for_user(&self, user_id: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/api/employees?user_id={}",
            self.base_url,
            urlencoding::encode(user_id)
        );
        let lookup: EmployeeLookup = self.get_json(&url).await?;
        Ok(lookup.employee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::{DashboardQuery, DateRange};
    use chrono::NaiveDate;

    #[test]
    fn test_dashboard_url_encodes_employee_and_token() {
        let source = HttpDashboardSource::new("http://localhost:8080/", Duration::from_secs(5)).unwrap();
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
        )
        .unwrap();
        let request = DashboardRequest {
            query: DashboardQuery::new("HR EMP/1", range).unwrap(),
            cache_token: "1700000000000-3".to_string(),
        };

        assert_eq!(
            source.dashboard_url(&request),
            "http://localhost:8080/api/employees/HR%20EMP%2F1/dashboard?from_date=2024-02-01&to_date=2024-02-10&_ts=1700000000000-3"
        );
    }
}
