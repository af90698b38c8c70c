// Data shaper - Projects an aggregated payload into display-ready values
use crate::application::display::fields;
use crate::domain::chart::{ChartSlot, ShapedChart};
use crate::domain::payload::{CheckinEvent, DashboardPayload, LogType};

pub const TIMELINE_LIMIT: usize = 10;

const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M";
const RANGE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    pub total_leads: u64,
    pub total_opportunities: u64,
    pub active_customers: u64,
    pub conversion_rate: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRows {
    pub attendance_total: u64,
    pub daily_report: u64,
    pub appointments: u64,
    pub total_task: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapedCharts {
    pub main_distribution: ShapedChart,
    pub leads_pulse: ShapedChart,
    pub attendance_donut: ShapedChart,
}

impl ShapedCharts {
    pub fn get(&self, slot: ChartSlot) -> &ShapedChart {
        match slot {
            ChartSlot::MainDistribution => &self.main_distribution,
            ChartSlot::LeadsPulse => &self.leads_pulse,
            ChartSlot::AttendanceDonut => &self.attendance_donut,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineClass {
    LogIn,
    LogOut,
}

impl TimelineClass {
    pub fn css_class(&self) -> &'static str {
        match self {
            TimelineClass::LogIn => "log-in",
            TimelineClass::LogOut => "log-out",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineRow {
    pub timestamp: String,
    pub label: &'static str,
    pub class: TimelineClass,
}

impl TimelineRow {
    fn from_event(event: &CheckinEvent) -> Self {
        let (label, class) = match event.log_type {
            LogType::Out => ("Check OUT", TimelineClass::LogOut),
            LogType::In | LogType::Other => ("Check IN", TimelineClass::LogIn),
        };
        Self {
            timestamp: event.time.format(TIMESTAMP_FORMAT).to_string(),
            label,
            class,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapedDashboard {
    pub kpis: Kpis,
    pub table: TableRows,
    pub charts: ShapedCharts,
    pub timeline: Vec<TimelineRow>,
    pub range_label: Option<String>,
}

impl ShapedDashboard {
    /// Text for every fixed mount point, in display order.
    pub fn field_values(&self) -> Vec<(&'static str, String)> {
        let mut values = vec![
            (fields::TOTAL_LEADS, self.kpis.total_leads.to_string()),
            (fields::TOTAL_OPPORTUNITIES, self.kpis.total_opportunities.to_string()),
            (fields::ACTIVE_CUSTOMERS, self.kpis.active_customers.to_string()),
            (fields::CONVERSION_RATE, self.kpis.conversion_rate.clone()),
            (fields::ATTENDANCE_TOTAL, self.table.attendance_total.to_string()),
            (fields::DAILY_REPORT, self.table.daily_report.to_string()),
            (fields::APPOINTMENTS, self.table.appointments.to_string()),
            (fields::TOTAL_TASK, self.table.total_task.to_string()),
        ];
        if let Some(label) = &self.range_label {
            values.push((fields::DATE_RANGE_LABEL, label.clone()));
        }
        values
    }
}

pub fn shape(payload: &DashboardPayload) -> ShapedDashboard {
    let kpis = Kpis {
        total_leads: payload.crm.total_leads,
        total_opportunities: payload.crm.total_opportunities,
        active_customers: payload.crm.active_customers,
        conversion_rate: format!("{}%", payload.crm.conversion_rate),
    };

    let table = TableRows {
        attendance_total: payload.hr.present_days,
        daily_report: payload.daily_report,
        appointments: payload.appointments.total,
        total_task: payload.total_task,
    };

    let charts = ShapedCharts {
        main_distribution: ShapedChart::from_series(
            ChartSlot::MainDistribution,
            payload.events_chart.as_ref(),
        ),
        leads_pulse: ShapedChart::from_series(ChartSlot::LeadsPulse, payload.leads_pulse.as_ref()),
        attendance_donut: ShapedChart::from_series(
            ChartSlot::AttendanceDonut,
            payload.attendance_chart.as_ref(),
        ),
    };

    let timeline = payload
        .hr
        .recent_checkins
        .iter()
        .take(TIMELINE_LIMIT)
        .map(TimelineRow::from_event)
        .collect();

    let range_label = payload.date_range.map(|range| {
        format!(
            "Showing data from {} to {}",
            range.from_date.format(RANGE_FORMAT),
            range.to_date.format(RANGE_FORMAT)
        )
    });

    ShapedDashboard {
        kpis,
        table,
        charts,
        timeline,
        range_label,
    }
}

pub fn greeting(hour: u32) -> &'static str {
    match hour {
        0..=11 => "Good Morning",
        12..=16 => "Good Afternoon",
        _ => "Good Evening",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::{ChartSeries, DONUT_PLACEHOLDER_COLOR, NO_DATA_LABEL};
    use crate::domain::payload::{Appointments, CrmMetrics, HrMetrics};
    use crate::domain::query::DateRange;
    use chrono::{NaiveDate, NaiveDateTime};

    fn series(labels: &[&str], values: &[f64]) -> ChartSeries {
        ChartSeries::new(labels.iter().map(|l| l.to_string()).collect(), values.to_vec())
    }

    fn at(minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(9, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_end_to_end_scenario() {
        let payload = DashboardPayload {
            crm: CrmMetrics {
                total_leads: 12,
                conversion_rate: 40.0,
                ..Default::default()
            },
            hr: HrMetrics {
                present_days: 18,
                ..Default::default()
            },
            daily_report: 5,
            appointments: Appointments { total: 3 },
            total_task: 9,
            events_chart: Some(series(&["Call", "Email"], &[3.0, 5.0])),
            ..Default::default()
        };

        let shaped = shape(&payload);
        assert_eq!(shaped.kpis.total_leads, 12);
        assert_eq!(shaped.kpis.conversion_rate, "40%");
        assert_eq!(shaped.table.attendance_total, 18);
        assert_eq!(shaped.table.daily_report, 5);
        assert_eq!(shaped.table.appointments, 3);
        assert_eq!(shaped.table.total_task, 9);
        assert_eq!(
            shaped.charts.main_distribution.series,
            series(&["Call", "Email"], &[3.0, 5.0])
        );
        assert!(!shaped.charts.main_distribution.is_placeholder);
        assert!(shaped.timeline.is_empty());
    }

    #[test]
    fn test_missing_fields_project_to_zero() {
        let shaped = shape(&DashboardPayload::default());
        assert_eq!(shaped.kpis.total_leads, 0);
        assert_eq!(shaped.kpis.conversion_rate, "0%");
        assert_eq!(shaped.table.appointments, 0);
        assert!(shaped.range_label.is_none());
    }

    #[test]
    fn test_fractional_conversion_rate() {
        let payload = DashboardPayload {
            crm: CrmMetrics {
                conversion_rate: 33.33,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(shape(&payload).kpis.conversion_rate, "33.33%");
    }

    #[test]
    fn test_degenerate_series_become_placeholders() {
        let payload = DashboardPayload {
            events_chart: Some(series(&["Call", "Meeting"], &[0.0, 0.0])),
            leads_pulse: Some(series(&[], &[])),
            attendance_chart: None,
            ..Default::default()
        };
        let charts = shape(&payload).charts;

        assert_eq!(charts.main_distribution.series, series(&[NO_DATA_LABEL], &[0.0]));
        assert_eq!(charts.leads_pulse.series, series(&[NO_DATA_LABEL], &[0.0]));
        assert_eq!(charts.attendance_donut.series, series(&[NO_DATA_LABEL], &[1.0]));
        assert_eq!(
            charts.attendance_donut.colors(),
            vec![DONUT_PLACEHOLDER_COLOR.to_string()]
        );
        assert_eq!(charts.main_distribution.colors(), vec!["#3b82f6".to_string()]);
    }

    #[test]
    fn test_timeline_keeps_first_ten_in_received_order() {
        let checkins: Vec<CheckinEvent> = (0..15)
            .map(|i| {
                let log_type = if i % 2 == 0 { LogType::In } else { LogType::Out };
                CheckinEvent::new(at(59 - i), log_type, None)
            })
            .collect();
        let payload = DashboardPayload {
            hr: HrMetrics {
                recent_checkins: checkins,
                ..Default::default()
            },
            ..Default::default()
        };

        let timeline = shape(&payload).timeline;
        assert_eq!(timeline.len(), TIMELINE_LIMIT);
        assert_eq!(timeline[0].timestamp, "01-02-2024 09:59");
        assert_eq!(timeline[9].timestamp, "01-02-2024 09:50");
        assert_eq!(timeline[0].label, "Check IN");
        assert_eq!(timeline[1].label, "Check OUT");
        assert_eq!(timeline[1].class.css_class(), "log-out");
    }

    #[test]
    fn test_range_label_uses_echoed_range() {
        let from = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let payload = DashboardPayload {
            date_range: Some(DateRange::new(from, to).unwrap()),
            ..Default::default()
        };
        let shaped = shape(&payload);
        assert_eq!(
            shaped.range_label.as_deref(),
            Some("Showing data from 01-02-2024 to 29-02-2024")
        );
        assert_eq!(shaped.field_values().len(), 9);
    }

    #[test]
    fn test_greeting() {
        assert_eq!(greeting(8), "Good Morning");
        assert_eq!(greeting(12), "Good Afternoon");
        assert_eq!(greeting(17), "Good Evening");
    }
}
