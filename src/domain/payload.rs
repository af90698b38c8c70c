// Aggregated dashboard payload as returned by the remote aggregator
use super::chart::ChartSeries;
use super::query::DateRange;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

const CHECKIN_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardPayload {
    #[serde(deserialize_with = "default_if_null")]
    pub crm: CrmMetrics,
    #[serde(deserialize_with = "default_if_null")]
    pub hr: HrMetrics,
    #[serde(deserialize_with = "default_if_null")]
    pub daily_report: u64,
    #[serde(deserialize_with = "default_if_null")]
    pub appointments: Appointments,
    #[serde(deserialize_with = "default_if_null")]
    pub total_task: u64,
    pub events_chart: Option<ChartSeries>,
    pub leads_pulse: Option<ChartSeries>,
    pub attendance_chart: Option<ChartSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CrmMetrics {
    #[serde(deserialize_with = "default_if_null")]
    pub total_leads: u64,
    #[serde(deserialize_with = "default_if_null")]
    pub total_opportunities: u64,
    #[serde(deserialize_with = "default_if_null")]
    pub active_customers: u64,
    /// Percentage in 0..=100.
    #[serde(deserialize_with = "default_if_null")]
    pub conversion_rate: f64,
    #[serde(deserialize_with = "default_if_null")]
    pub sales_invoices: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HrMetrics {
    #[serde(deserialize_with = "default_if_null")]
    pub present_days: u64,
    #[serde(deserialize_with = "default_if_null")]
    pub absent_days: u64,
    /// Newest first, as delivered by the feed.
    #[serde(deserialize_with = "default_if_null")]
    pub recent_checkins: Vec<CheckinEvent>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Appointments {
    #[serde(deserialize_with = "default_if_null")]
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckinEvent {
    #[serde(deserialize_with = "lenient_datetime")]
    pub time: NaiveDateTime,
    #[serde(default, deserialize_with = "default_if_null")]
    pub log_type: LogType,
    #[serde(default)]
    pub device_id: Option<String>,
}

impl CheckinEvent {
    pub fn new(time: NaiveDateTime, log_type: LogType, device_id: Option<String>) -> Self {
        Self {
            time,
            log_type,
            device_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogType {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
    /// Any other marker from the feed; displayed like a check-in.
    #[default]
    #[serde(other)]
    Other,
}

/// Reads `null` the same as an absent field.
fn default_if_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts ISO and space separated timestamps, or a bare date read as midnight.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();

    CHECKIN_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised check-in time {:?}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_zero() {
        let payload: DashboardPayload =
            serde_json::from_str(r#"{"crm": {"total_leads": 12}, "hr": {}}"#).unwrap();
        assert_eq!(payload.crm.total_leads, 12);
        assert_eq!(payload.crm.conversion_rate, 0.0);
        assert_eq!(payload.appointments.total, 0);
        assert!(payload.hr.recent_checkins.is_empty());
        assert!(payload.events_chart.is_none());
    }

    #[test]
    fn test_unknown_log_type_is_accepted() {
        let event: CheckinEvent = serde_json::from_str(
            r#"{"time": "2024-02-01T09:00:00", "log_type": "REPORT", "device_id": null}"#,
        )
        .unwrap();
        assert_eq!(event.log_type, LogType::Other);
    }

    #[test]
    fn test_null_counts_read_as_zero() {
        let payload: DashboardPayload = serde_json::from_str(
            r#"{
                "crm": {"total_leads": null, "total_opportunities": 3, "conversion_rate": null},
                "hr": {"present_days": null, "recent_checkins": null},
                "daily_report": null,
                "appointments": null,
                "total_task": null,
                "events_chart": null
            }"#,
        )
        .unwrap();
        assert_eq!(payload.crm.total_leads, 0);
        assert_eq!(payload.crm.total_opportunities, 3);
        assert_eq!(payload.crm.conversion_rate, 0.0);
        assert_eq!(payload.hr.present_days, 0);
        assert!(payload.hr.recent_checkins.is_empty());
        assert_eq!(payload.daily_report, 0);
        assert_eq!(payload.appointments.total, 0);
        assert_eq!(payload.total_task, 0);
    }

    #[test]
    fn test_null_sections_read_as_empty() {
        let payload: DashboardPayload =
            serde_json::from_str(r#"{"crm": null, "hr": null, "daily_report": 4}"#).unwrap();
        assert_eq!(payload.crm, CrmMetrics::default());
        assert_eq!(payload.hr, HrMetrics::default());
        assert_eq!(payload.daily_report, 4);
    }

    #[test]
    fn test_checkin_time_formats() {
        let midnight = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let nine = NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let payload: DashboardPayload = serde_json::from_str(
            r#"{"hr": {"recent_checkins": [
                {"time": "2024-02-01", "log_type": "REPORT", "device_id": "Visited two customers"},
                {"time": "2024-02-01 09:00:00", "log_type": "IN"},
                {"time": "2024-02-01T09:00:00.250", "log_type": null}
            ]}}"#,
        )
        .unwrap();

        let checkins = &payload.hr.recent_checkins;
        assert_eq!(checkins[0].time, midnight);
        assert_eq!(checkins[0].log_type, LogType::Other);
        assert_eq!(checkins[1].time, nine);
        assert_eq!(checkins[1].log_type, LogType::In);
        assert_eq!(checkins[2].time.date(), nine.date());
        assert_eq!(checkins[2].log_type, LogType::Other);
    }

    #[test]
    fn test_unparseable_checkin_time_is_rejected() {
        let result = serde_json::from_str::<CheckinEvent>(r#"{"time": "yesterday", "log_type": "IN"}"#);
        assert!(result.is_err());
    }
}
