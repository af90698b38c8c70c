// Terminal display surface for dashboard previews
use crate::application::data_shaper::TimelineRow;
use crate::application::display::{DisplaySurface, NO_CHECKINS_MESSAGE, fields};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

const APPLY_LABEL: &str = "Apply";
const LOADING_LABEL: &str = "Loading...";

const KPI_FIELDS: [(&str, &str); 4] = [
    (fields::TOTAL_LEADS, "Total Leads"),
    (fields::TOTAL_OPPORTUNITIES, "Opportunities"),
    (fields::ACTIVE_CUSTOMERS, "Customers"),
    (fields::CONVERSION_RATE, "Conversion Rate"),
];

const TABLE_FIELDS: [(&str, &str); 4] = [
    (fields::ATTENDANCE_TOTAL, "Total Attendance"),
    (fields::DAILY_REPORT, "Daily Report Count"),
    (fields::APPOINTMENTS, "Appointments"),
    (fields::TOTAL_TASK, "Total Task"),
];

#[derive(Debug)]
struct SurfaceState {
    fields: HashMap<String, String>,
    timeline: Vec<String>,
    notices: Vec<String>,
    trigger_label: &'static str,
    trigger_enabled: bool,
    employee: Option<String>,
}

#[derive(Debug)]
pub struct TerminalSurface {
    greeting: String,
    state: Mutex<SurfaceState>,
}

impl TerminalSurface {
    pub fn new(greeting: &str) -> Self {
        Self {
            greeting: greeting.to_string(),
            state: Mutex::new(SurfaceState {
                fields: HashMap::new(),
                timeline: vec![NO_CHECKINS_MESSAGE.to_string()],
                notices: Vec::new(),
                trigger_label: APPLY_LABEL,
                trigger_enabled: true,
                employee: None,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, SurfaceState> {
        // A poisoned surface still holds displayable text
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Plain-text rendering of everything except the charts
    pub fn report(&self) -> String {
        let state = self.state();
        let value = |name: &str| state.fields.get(name).cloned().unwrap_or_else(|| "0".to_string());

        let mut lines = vec![self.greeting.clone()];
        if let Some(label) = state.fields.get(fields::DATE_RANGE_LABEL) {
            lines.push(label.clone());
        }
        if let Some(employee) = &state.employee {
            lines.push(format!("Employee: {}", employee));
        }
        for notice in &state.notices {
            lines.push(format!("! {}", notice));
        }

        lines.push(String::new());
        for (name, title) in KPI_FIELDS {
            lines.push(format!("{:<20} {}", title, value(name)));
        }

        lines.push(String::new());
        lines.push("Comprehensive Performance Metrics".to_string());
        for (name, title) in TABLE_FIELDS {
            lines.push(format!("{:<20} {}", title, value(name)));
        }

        lines.push(String::new());
        lines.push("Recent Activity Log".to_string());
        lines.extend(state.timeline.iter().map(|row| format!("  {}", row)));

        lines.join("\n")
    }
}

impl DisplaySurface for TerminalSurface {
    fn set_field(&self, field: &str, text: &str) {
        self.state().fields.insert(field.to_string(), text.to_string());
    }

    fn render_timeline(&self, rows: &[TimelineRow]) -> anyhow::Result<()> {
        let lines = if rows.is_empty() {
            vec![NO_CHECKINS_MESSAGE.to_string()]
        } else {
            rows.iter()
                .map(|row| format!("{:<18} {} ({})", row.timestamp, row.label, row.class.css_class()))
                .collect()
        };
        self.state().timeline = lines;
        Ok(())
    }

    fn notify(&self, message: &str) {
        tracing::warn!("{}", message);
        self.state().notices.push(message.to_string());
    }

    fn set_trigger_busy(&self) {
        let mut state = self.state();
        state.trigger_enabled = false;
        state.trigger_label = LOADING_LABEL;
    }

    fn set_trigger_ready(&self) {
        let mut state = self.state();
        state.trigger_enabled = true;
        state.trigger_label = APPLY_LABEL;
    }

    fn select_employee(&self, employee_id: &str) {
        self.state().employee = Some(employee_id.to_string());
    }
}
