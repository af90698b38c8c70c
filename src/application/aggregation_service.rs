// Aggregation service - Builds the dashboard payload from performance records
use crate::application::dashboard_source::EmployeeDirectory;
use crate::application::performance_repository::PerformanceRepository;
use crate::domain::chart::ChartSeries;
use crate::domain::errors::DashboardResult;
use crate::domain::payload::{Appointments, CrmMetrics, DashboardPayload, HrMetrics};
use crate::domain::query::{DashboardQuery, DateRange, DateRangeMode};
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use std::collections::HashMap;
use std::sync::Arc;

const RECENT_CHECKIN_LIMIT: usize = 20;
const EVENT_CATEGORIES: [&str; 4] = ["Call", "Meeting", "Event", "Other"];
const ATTENDANCE_LABELS: [&str; 3] = ["Present", "Absent", "Half Day"];

#[derive(Clone)]
pub struct AggregationService {
    repository: Arc<dyn PerformanceRepository>,
    mode: DateRangeMode,
}

impl AggregationService {
    pub fn new(repository: Arc<dyn PerformanceRepository>, mode: DateRangeMode) -> Self {
        Self { repository, mode }
    }

    pub async fn build_dashboard(
        &self,
        employee_id: &str,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> DashboardResult<DashboardPayload> {
        self.build_dashboard_on(Local::now().date_naive(), employee_id, from_date, to_date)
            .await
    }

    pub async fn build_dashboard_on(
        &self,
        today: NaiveDate,
        employee_id: &str,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> DashboardResult<DashboardPayload> {
        let range = DateRange::resolve(self.mode, today, from_date, to_date)?;
        let query = DashboardQuery::new(employee_id, range)?;

        let mut payload = empty_payload(range);

        let Some(user_id) = self.repository.user_for_employee(&query.employee_id).await? else {
            tracing::debug!("No user linked to employee {}", query.employee_id);
            return Ok(payload);
        };

        let employee = query.employee_id.as_str();
        let repo = &self.repository;

        let (total_leads, total_opportunities, sales_invoices, active_customers, lead_days) = tokio::try_join!(
            repo.count_leads(&user_id, range),
            repo.count_opportunities(&user_id, range),
            repo.count_sales_invoices(&user_id, range),
            repo.count_converted_customers(&user_id, range),
            repo.lead_counts_by_day(&user_id, range),
        )?;

        let (attendance, daily_report, recent_checkins) = tokio::try_join!(
            repo.attendance_status_counts(employee, range),
            repo.count_daily_reports(employee, range),
            repo.recent_checkins(employee, range, RECENT_CHECKIN_LIMIT),
        )?;

        let (appointments, event_types, total_task) = tokio::try_join!(
            repo.count_appointments(&user_id, range),
            repo.event_type_counts(employee, &user_id, range),
            repo.count_tasks(&user_id, range),
        )?;

        let attendance = AttendanceBreakdown::from_status_counts(&attendance);

        payload.crm = CrmMetrics {
            total_leads,
            total_opportunities,
            active_customers,
            conversion_rate: conversion_rate(active_customers, total_leads),
            sales_invoices,
        };
        payload.hr = HrMetrics {
            present_days: attendance.present,
            absent_days: attendance.absent,
            recent_checkins,
        };
        payload.daily_report = daily_report;
        payload.appointments = Appointments { total: appointments };
        payload.total_task = total_task;
        payload.leads_pulse = Some(leads_pulse(range, &lead_days));
        payload.attendance_chart = Some(attendance.to_series());
        payload.events_chart = Some(events_chart(&event_types));

        tracing::debug!(
            "Built dashboard for {} ({} to {}): {} leads, {} present days",
            employee,
            range.from_date,
            range.to_date,
            total_leads,
            attendance.present
        );

        Ok(payload)
    }
}

#[async_trait]
impl EmployeeDirectory for AggregationService {
    async fn employee_for_user(&self, user_id: &str) -> anyhow::Result<Option<String>> {
        self.repository.employee_for_user(user_id).await
    }
}

fn empty_payload(range: DateRange) -> DashboardPayload {
    DashboardPayload {
        events_chart: Some(ChartSeries::default()),
        leads_pulse: Some(ChartSeries::default()),
        attendance_chart: Some(AttendanceBreakdown::default().to_series()),
        date_range: Some(range),
        ..Default::default()
    }
}

/// Percentage of leads converted into customers, rounded to two decimals.
pub fn conversion_rate(active_customers: u64, total_leads: u64) -> f64 {
    if total_leads == 0 {
        return 0.0;
    }
    let rate = active_customers as f64 / total_leads as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

/// One point per day of the range, zero-filled.
fn leads_pulse(range: DateRange, lead_days: &[(NaiveDate, u64)]) -> ChartSeries {
    let by_day: HashMap<NaiveDate, u64> = lead_days.iter().copied().collect();
    let (labels, values) = range
        .days()
        .map(|day| {
            let count = by_day.get(&day).copied().unwrap_or(0);
            (day.format("%Y-%m-%d").to_string(), count as f64)
        })
        .unzip();
    ChartSeries::new(labels, values)
}

fn event_category(event_type: Option<&str>) -> &'static str {
    match event_type.map(str::trim) {
        Some("Call") => "Call",
        Some("Meeting") => "Meeting",
        Some("Public" | "Private" | "Event") => "Event",
        _ => "Other",
    }
}

fn events_chart(event_types: &[(Option<String>, u64)]) -> ChartSeries {
    let mut counts: HashMap<&'static str, u64> = HashMap::new();
    for (event_type, count) in event_types {
        *counts.entry(event_category(event_type.as_deref())).or_default() += count;
    }

    ChartSeries::new(
        EVENT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
        EVENT_CATEGORIES
            .iter()
            .map(|c| counts.get(c).copied().unwrap_or(0) as f64)
            .collect(),
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct AttendanceBreakdown {
    present: u64,
    absent: u64,
    half_day: u64,
}

impl AttendanceBreakdown {
    fn from_status_counts(status_counts: &[(String, u64)]) -> Self {
        let mut breakdown = Self::default();
        for (status, count) in status_counts {
            match status.as_str() {
                "Present" | "Work From Home" => breakdown.present += count,
                "Absent" => breakdown.absent += count,
                "Half Day" => breakdown.half_day += count,
                _ => {}
            }
        }
        breakdown
    }

    fn to_series(self) -> ChartSeries {
        ChartSeries::new(
            ATTENDANCE_LABELS.iter().map(|l| l.to_string()).collect(),
            vec![self.present as f64, self.absent as f64, self.half_day as f64],
        )
    }
}
