//! Reporting periods.
//!
//! A period token plus a reference date resolves to an inclusive local range
//! used to scope trip, expense and maintenance queries. The reference date is
//! always supplied by the caller.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse calendar bucket for aggregate queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportingPeriod {
    Week,
    Month,
    Year,
}

impl ReportingPeriod {
    /// Spanish label shown in filters
    pub fn label(&self) -> &'static str {
        match self {
            ReportingPeriod::Week => "Semana",
            ReportingPeriod::Month => "Mes",
            ReportingPeriod::Year => "Año",
        }
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportingPeriod::Week => write!(f, "week"),
            ReportingPeriod::Month => write!(f, "month"),
            ReportingPeriod::Year => write!(f, "year"),
        }
    }
}

impl std::str::FromStr for ReportingPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(ReportingPeriod::Week),
            "month" => Ok(ReportingPeriod::Month),
            "year" => Ok(ReportingPeriod::Year),
            _ => Err(format!("Invalid period: {}", s)),
        }
    }
}

/// Inclusive local date-time range, millisecond precision at the end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// Whole-day range from `first` 00:00:00.000 to `last` 23:59:59.999
    pub fn from_days(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: first.and_time(NaiveTime::MIN),
            end: last.and_time(end_of_day()),
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date()
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant <= self.end
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.end_date()
    }
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("valid end-of-day time")
}

/// Resolve the calendar bucket containing `reference`.
///
/// Weeks start on Sunday. Month and year ends come from calendar arithmetic,
/// so leap years and month lengths need no special casing.
pub fn resolve_range(period: ReportingPeriod, reference: NaiveDate) -> DateRange {
    match period {
        ReportingPeriod::Week => {
            let back = i64::from(reference.weekday().num_days_from_sunday());
            let first = reference - Duration::days(back);
            DateRange::from_days(first, first + Duration::days(6))
        }
        ReportingPeriod::Month => {
            let first = reference.with_day(1).expect("day 1 exists in every month");
            DateRange::from_days(first, last_day_of_month(first))
        }
        ReportingPeriod::Year => {
            let year = reference.year();
            let first = NaiveDate::from_ymd_opt(year, 1, 1).expect("January 1 exists");
            let last = NaiveDate::from_ymd_opt(year, 12, 31).expect("December 31 exists");
            DateRange::from_days(first, last)
        }
    }
}

/// "Day 0 of next month": the first of the following month minus one day
fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .expect("valid month boundary")
}

/// Sunday-based week of the year, week 1 being the one containing January 1
pub fn week_number(date: NaiveDate) -> u32 {
    let jan1 = NaiveDate::from_ymd_opt(date.year(), 1, 1).expect("January 1 exists");
    let offset = jan1.weekday().num_days_from_sunday();
    (date.ordinal0() + offset + 1).div_ceil(7)
}
