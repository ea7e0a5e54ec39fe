mod period_report;

pub use period_report::{
    report_title, ExpenseSummary, PeriodReport, ReportDisplay, ReportQuery, ReportRange,
};
