// Dashboard query and date-range policy
use super::errors::{DashboardError, DashboardResult};
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRangeMode {
    /// Always the previous calendar month, user dates are ignored.
    FixedLastMonth,
    #[default]
    UserSelected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

impl DateRange {
    pub fn new(from_date: NaiveDate, to_date: NaiveDate) -> DashboardResult<Self> {
        if from_date > to_date {
            return Err(DashboardError::validation("From Date cannot be after To Date."));
        }
        Ok(Self { from_date, to_date })
    }

    /// First day of the current month through today.
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self {
            from_date: first_day_of_month(today),
            to_date: today,
        }
    }

    pub fn last_month(today: NaiveDate) -> Self {
        let to_date = first_day_of_month(today) - Duration::days(1);
        Self {
            from_date: first_day_of_month(to_date),
            to_date,
        }
    }

    /// Resolve optional user dates against the configured mode.
    pub fn resolve(
        mode: DateRangeMode,
        today: NaiveDate,
        from_date: Option<NaiveDate>,
        to_date: Option<NaiveDate>,
    ) -> DashboardResult<Self> {
        match mode {
            DateRangeMode::FixedLastMonth => Ok(Self::last_month(today)),
            DateRangeMode::UserSelected => {
                let defaults = Self::month_to_date(today);
                match (from_date, to_date) {
                    (Some(from_date), Some(to_date)) => Self::new(from_date, to_date),
                    (Some(from_date), None) if from_date > today => Err(
                        DashboardError::validation("From Date cannot be after today."),
                    ),
                    (Some(from_date), None) => Self::new(from_date, today),
                    // An early To Date pulls the default start back to its own month
                    (None, Some(to_date)) => {
                        Self::new(defaults.from_date.min(first_day_of_month(to_date)), to_date)
                    }
                    (None, None) => Ok(defaults),
                }
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from_date <= date && date <= self.to_date
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.from_date.iter_days().take_while(|d| *d <= self.to_date)
    }
}

fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardQuery {
    pub employee_id: String,
    pub range: DateRange,
}

impl DashboardQuery {
    pub fn new(employee_id: &str, range: DateRange) -> DashboardResult<Self> {
        let employee_id = employee_id.trim();
        if employee_id.is_empty() {
            return Err(DashboardError::validation("Please select an employee first."));
        }
        Ok(Self {
            employee_id: employee_id.to_string(),
            range,
        })
    }

    pub fn from_date(&self) -> NaiveDate {
        self.range.from_date
    }

    pub fn to_date(&self) -> NaiveDate {
        self.range.to_date
    }
}
