// Display surface supplied by the host UI
use crate::application::data_shaper::TimelineRow;

/// Stable field names of the KPI cards, the metrics table and the header.
pub mod fields {
    pub const TOTAL_LEADS: &str = "total_leads";
    pub const TOTAL_OPPORTUNITIES: &str = "total_opportunities";
    pub const ACTIVE_CUSTOMERS: &str = "active_customers";
    pub const CONVERSION_RATE: &str = "conversion_rate";
    pub const ATTENDANCE_TOTAL: &str = "attendance_total";
    pub const DAILY_REPORT: &str = "daily_report";
    pub const APPOINTMENTS: &str = "appointments";
    pub const TOTAL_TASK: &str = "total_task";
    pub const DATE_RANGE_LABEL: &str = "date_range_label";
}

pub const NO_CHECKINS_MESSAGE: &str = "No recent check-ins found";

pub trait DisplaySurface: Send + Sync {
    /// Write plain text into a fixed mount point
    fn set_field(&self, field: &str, text: &str);

    /// Replace the timeline rows; an empty slice shows the placeholder row
    fn render_timeline(&self, rows: &[TimelineRow]) -> anyhow::Result<()>;

    /// Blocking user-visible notice
    fn notify(&self, message: &str);

    fn set_trigger_busy(&self);

    fn set_trigger_ready(&self);

    fn select_employee(&self, employee_id: &str);
}
