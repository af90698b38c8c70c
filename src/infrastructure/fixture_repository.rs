// File-backed performance records repository
use crate::application::performance_repository::PerformanceRepository;
use crate::domain::payload::{CheckinEvent, LogType};
use crate::domain::query::DateRange;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PerformanceRecords {
    employees: Vec<EmployeeRecord>,
    customers: Vec<CustomerRecord>,
    leads: Vec<LeadRecord>,
    opportunities: Vec<OwnedRecord>,
    sales_invoices: Vec<InvoiceRecord>,
    attendance: Vec<AttendanceRecord>,
    daily_reports: Vec<DailyReportRecord>,
    checkins: Vec<CheckinRecord>,
    appointments: Vec<AppointmentRecord>,
    events: Vec<EventRecord>,
    tasks: Vec<OwnedRecord>,
}

#[derive(Debug, Deserialize)]
struct EmployeeRecord {
    id: String,
    #[serde(default)]
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CustomerRecord {
    name: String,
    #[serde(default)]
    disabled: bool,
}

#[derive(Debug, Deserialize)]
struct LeadRecord {
    owner: String,
    created: NaiveDateTime,
    #[serde(default)]
    customer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwnedRecord {
    owner: String,
    created: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
struct InvoiceRecord {
    owner: String,
    posting_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct AttendanceRecord {
    employee: String,
    date: NaiveDate,
    status: String,
}

#[derive(Debug, Deserialize)]
struct DailyReportRecord {
    employee: String,
    date: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct CheckinRecord {
    employee: String,
    time: NaiveDateTime,
    log_type: LogType,
    #[serde(default)]
    device_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AppointmentRecord {
    owner: String,
    scheduled_time: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    owner: String,
    /// Set when the site links events to employees directly
    #[serde(default)]
    employee: Option<String>,
    starts_on: NaiveDateTime,
    #[serde(default)]
    event_type: Option<String>,
}

impl EventRecord {
    fn belongs_to(&self, employee_id: &str, user_id: &str) -> bool {
        match &self.employee {
            Some(employee) => employee == employee_id,
            None => self.owner == user_id,
        }
    }
}

/// Read-only repository over a JSON export of performance records.
#[derive(Debug)]
pub struct FixtureRepository {
    records: PerformanceRecords,
}

impl FixtureRepository {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read records from {}", path.display()))?;
        let repository = Self::from_json(&raw)
            .with_context(|| format!("Failed to parse records in {}", path.display()))?;

        tracing::info!(
            "Loaded {} employees, {} leads and {} check-ins from {}",
            repository.records.employees.len(),
            repository.records.leads.len(),
            repository.records.checkins.len(),
            path.display()
        );
        Ok(repository)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let records = serde_json::from_str(raw)?;
        Ok(Self { records })
    }

    fn leads_in<'a>(&'a self, user_id: &'a str, range: DateRange) -> impl Iterator<Item = &'a LeadRecord> + 'a {
        self.records
            .leads
            .iter()
            .filter(move |l| l.owner == user_id && range.contains(l.created.date()))
    }
}

fn count_owned(records: &[OwnedRecord], user_id: &str, range: DateRange) -> u64 {
    records
        .iter()
        .filter(|r| r.owner == user_id && range.contains(r.created.date()))
        .count() as u64
}

#[async_trait]
impl PerformanceRepository for FixtureRepository {
    async fn user_for_employee(&self, employee_id: &str) -> Result<Option<String>> {
        Ok(self
            .records
            .employees
            .iter()
            .find(|e| e.id == employee_id)
            .and_then(|e| e.user_id.clone()))
    }

    async fn employee_for_user(&self, user_id: &str) -> Result<Option<String>> {
        Ok(self
            .records
            .employees
            .iter()
            .find(|e| e.user_id.as_deref() == Some(user_id))
            .map(|e| e.id.clone()))
    }

    async fn count_leads(&self, user_id: &str, range: DateRange) -> Result<u64> {
        Ok(self.leads_in(user_id, range).count() as u64)
    }

    async fn lead_counts_by_day(&self, user_id: &str, range: DateRange) -> Result<Vec<(NaiveDate, u64)>> {
        let mut by_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for lead in self.leads_in(user_id, range) {
            *by_day.entry(lead.created.date()).or_default() += 1;
        }
        Ok(by_day.into_iter().collect())
    }

    async fn count_opportunities(&self, user_id: &str, range: DateRange) -> Result<u64> {
        Ok(count_owned(&self.records.opportunities, user_id, range))
    }

    async fn count_sales_invoices(&self, user_id: &str, range: DateRange) -> Result<u64> {
        Ok(self
            .records
            .sales_invoices
            .iter()
            .filter(|i| i.owner == user_id && range.contains(i.posting_date))
            .count() as u64)
    }

    async fn count_converted_customers(&self, user_id: &str, range: DateRange) -> Result<u64> {
        let enabled: HashSet<&str> = self
            .records
            .customers
            .iter()
            .filter(|c| !c.disabled)
            .map(|c| c.name.as_str())
            .collect();

        let converted: HashSet<&str> = self
            .leads_in(user_id, range)
            .filter_map(|l| l.customer.as_deref())
            .filter(|c| enabled.contains(c))
            .collect();

        Ok(converted.len() as u64)
    }

    async fn attendance_status_counts(&self, employee_id: &str, range: DateRange) -> Result<Vec<(String, u64)>> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for record in &self.records.attendance {
            if record.employee == employee_id && range.contains(record.date) {
                *counts.entry(record.status.clone()).or_default() += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }

    async fn count_daily_reports(&self, employee_id: &str, range: DateRange) -> Result<u64> {
        Ok(self
            .records
            .daily_reports
            .iter()
            .filter(|r| r.employee == employee_id && range.contains(r.date))
            .count() as u64)
    }

    async fn recent_checkins(&self, employee_id: &str, range: DateRange, limit: usize) -> Result<Vec<CheckinEvent>> {
        let mut checkins: Vec<&CheckinRecord> = self
            .records
            .checkins
            .iter()
            .filter(|c| c.employee == employee_id && range.contains(c.time.date()))
            .collect();
        checkins.sort_by(|a, b| b.time.cmp(&a.time));

        Ok(checkins
            .into_iter()
            .take(limit)
            .map(|c| CheckinEvent::new(c.time, c.log_type, c.device_id.clone()))
            .collect())
    }

    async fn count_appointments(&self, user_id: &str, range: DateRange) -> Result<u64> {
        Ok(self
            .records
            .appointments
            .iter()
            .filter(|a| a.owner == user_id && range.contains(a.scheduled_time.date()))
            .count() as u64)
    }

    async fn event_type_counts(
        &self,
        employee_id: &str,
        user_id: &str,
        range: DateRange,
    ) -> Result<Vec<(Option<String>, u64)>> {
        let mut counts: HashMap<Option<String>, u64> = HashMap::new();
        for event in &self.records.events {
            if event.belongs_to(employee_id, user_id) && range.contains(event.starts_on.date()) {
                *counts.entry(event.event_type.clone()).or_default() += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }

    async fn count_tasks(&self, user_id: &str, range: DateRange) -> Result<u64> {
        Ok(count_owned(&self.records.tasks, user_id, range))
    }
}
