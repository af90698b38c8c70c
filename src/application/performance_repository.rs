// Repository trait for employee performance records
use crate::domain::payload::CheckinEvent;
use crate::domain::query::DateRange;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Every date range is inclusive on both ends.
#[async_trait]
pub trait PerformanceRepository: Send + Sync {
    /// User account linked to an employee record
    async fn user_for_employee(&self, employee_id: &str) -> anyhow::Result<Option<String>>;

    /// Employee record linked to a user account
    async fn employee_for_user(&self, user_id: &str) -> anyhow::Result<Option<String>>;

    async fn count_leads(&self, user_id: &str, range: DateRange) -> anyhow::Result<u64>;

    /// Lead counts grouped by creation day, days without leads omitted
    async fn lead_counts_by_day(&self, user_id: &str, range: DateRange) -> anyhow::Result<Vec<(NaiveDate, u64)>>;

    async fn count_opportunities(&self, user_id: &str, range: DateRange) -> anyhow::Result<u64>;

    async fn count_sales_invoices(&self, user_id: &str, range: DateRange) -> anyhow::Result<u64>;

    /// Distinct enabled customers converted from the user's leads
    async fn count_converted_customers(&self, user_id: &str, range: DateRange) -> anyhow::Result<u64>;

    /// Attendance counts grouped by raw status
    async fn attendance_status_counts(&self, employee_id: &str, range: DateRange) -> anyhow::Result<Vec<(String, u64)>>;

    async fn count_daily_reports(&self, employee_id: &str, range: DateRange) -> anyhow::Result<u64>;

    /// Newest first
    async fn recent_checkins(
        &self,
        employee_id: &str,
        range: DateRange,
        limit: usize,
    ) -> anyhow::Result<Vec<CheckinEvent>>;

    async fn count_appointments(&self, user_id: &str, range: DateRange) -> anyhow::Result<u64>;

    /// Event counts grouped by raw event type
    async fn event_type_counts(
        &self,
        employee_id: &str,
        user_id: &str,
        range: DateRange,
    ) -> anyhow::Result<Vec<(Option<String>, u64)>>;

    async fn count_tasks(&self, user_id: &str, range: DateRange) -> anyhow::Result<u64>;
}
