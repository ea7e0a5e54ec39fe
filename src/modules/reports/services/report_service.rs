use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::core::period::resolve_range;
use crate::core::{ReportingPeriod, Result};
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::expenses::repositories::ExpenseRepository;
use crate::modules::maintenance::repositories::MaintenanceRepository;
use crate::modules::reports::models::{ExpenseSummary, PeriodReport};
use crate::modules::trips::repositories::TripRepository;
use crate::modules::trips::services::compute_net_profit;

/// Service for period summaries over trips, expenses and maintenance
pub struct ReportService {
    trip_repo: Arc<dyn TripRepository>,
    expense_repo: Arc<dyn ExpenseRepository>,
    maintenance_repo: Arc<dyn MaintenanceRepository>,
}

impl ReportService {
    pub fn new(
        trip_repo: Arc<dyn TripRepository>,
        expense_repo: Arc<dyn ExpenseRepository>,
        maintenance_repo: Arc<dyn MaintenanceRepository>,
    ) -> Self {
        Self {
            trip_repo,
            expense_repo,
            maintenance_repo,
        }
    }

    /// Summarise the calendar bucket of `period` containing `reference`.
    ///
    /// Trip figures are the stored ones; only the operating result is
    /// computed here.
    pub async fn period_summary(
        &self,
        user: &AuthenticatedUser,
        period: ReportingPeriod,
        reference: NaiveDate,
    ) -> Result<PeriodReport> {
        let range = resolve_range(period, reference);

        info!(
            user_id = %user.user_id,
            period = %period,
            start = %range.start_date(),
            end = %range.end_date(),
            "Generating period report"
        );

        let trips = self.trip_repo.totals(&user.user_id, Some(&range)).await?;
        let expenses_total = self.expense_repo.total(&user.user_id, Some(&range)).await?;
        let by_type = self
            .expense_repo
            .totals_by_type(&user.user_id, Some(&range))
            .await?;
        let maintenance_cost = self
            .maintenance_repo
            .total_cost(&user.user_id, Some(&range))
            .await?;

        let operating_result =
            compute_net_profit(trips.gross_profit, expenses_total + maintenance_cost);

        let report = PeriodReport::new(
            period,
            reference,
            range,
            trips,
            ExpenseSummary {
                total: expenses_total,
                by_type,
            },
            maintenance_cost,
            operating_result,
        );

        if report.is_empty() {
            warn!(period = %period, reference = %reference, "Empty period report");
        }

        Ok(report)
    }
}
