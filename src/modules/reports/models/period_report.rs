use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::currency::format_currency;
use crate::core::dates::{format_date, month_name, serde_date};
use crate::core::period::week_number;
use crate::core::{DateRange, ReportingPeriod};
use crate::modules::expenses::models::ExpenseTypeTotal;
use crate::modules::trips::repositories::TripTotals;

/// Query string of GET /api/reports/summary
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub period: Option<ReportingPeriod>,
    /// Reference date; today in Colombia when absent
    #[serde(default, with = "serde_date::option")]
    pub date: Option<NaiveDate>,
}

impl ReportQuery {
    pub fn period_or_default(&self) -> ReportingPeriod {
        self.period.unwrap_or(ReportingPeriod::Month)
    }
}

/// Heading of a report, e.g. `Junio 2024`, `Semana 24 de 2024` or `2024`
pub fn report_title(period: ReportingPeriod, reference: NaiveDate) -> String {
    match period {
        ReportingPeriod::Week => format!(
            "Semana {} de {}",
            week_number(reference),
            reference.year()
        ),
        ReportingPeriod::Month => format!(
            "{} {}",
            month_name(reference.month0()).unwrap_or_default(),
            reference.year()
        ),
        ReportingPeriod::Year => reference.year().to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRange {
    #[serde(with = "serde_date")]
    pub start_date: NaiveDate,
    #[serde(with = "serde_date")]
    pub end_date: NaiveDate,
}

impl From<DateRange> for ReportRange {
    fn from(range: DateRange) -> Self {
        Self {
            start_date: range.start_date(),
            end_date: range.end_date(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseSummary {
    pub total: Decimal,
    pub by_type: Vec<ExpenseTypeTotal>,
}

/// Human-readable rendering of the report figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDisplay {
    pub title: String,
    pub period_label: String,
    pub start_date: String,
    pub end_date: String,
    pub total_value: String,
    pub deduction: String,
    pub paid_value: String,
    pub gross_profit: String,
    pub net_profit: String,
    pub expenses: String,
    pub maintenance_cost: String,
    pub operating_result: String,
}

/// Aggregated figures for one reporting period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodReport {
    pub period: ReportingPeriod,
    #[serde(with = "serde_date")]
    pub reference_date: NaiveDate,
    pub range: ReportRange,
    pub trips: TripTotals,
    pub expenses: ExpenseSummary,
    pub maintenance_cost: Decimal,
    /// Gross profit minus every expense and maintenance cost in the period
    pub operating_result: Decimal,
    pub display: ReportDisplay,
}

impl PeriodReport {
    pub fn new(
        period: ReportingPeriod,
        reference_date: NaiveDate,
        range: DateRange,
        trips: TripTotals,
        expenses: ExpenseSummary,
        maintenance_cost: Decimal,
        operating_result: Decimal,
    ) -> Self {
        let display = ReportDisplay {
            title: report_title(period, reference_date),
            period_label: period.label().to_string(),
            start_date: format_date(range.start_date()),
            end_date: format_date(range.end_date()),
            total_value: format_currency(trips.total_value),
            deduction: format_currency(trips.deduction),
            paid_value: format_currency(trips.paid_value),
            gross_profit: format_currency(trips.gross_profit),
            net_profit: format_currency(trips.net_profit),
            expenses: format_currency(expenses.total),
            maintenance_cost: format_currency(maintenance_cost),
            operating_result: format_currency(operating_result),
        };

        Self {
            period,
            reference_date,
            range: range.into(),
            trips,
            expenses,
            maintenance_cost,
            operating_result,
            display,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.trips.trip_count == 0 && self.expenses.total.is_zero() && self.maintenance_cost.is_zero()
    }
}
