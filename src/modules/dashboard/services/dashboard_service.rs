use std::sync::Arc;

use crate::core::Result;
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::dashboard::models::{DashboardSummary, RECENT_TRIPS_LIMIT};
use crate::modules::expenses::repositories::ExpenseRepository;
use crate::modules::trips::models::TripFilter;
use crate::modules::trips::repositories::TripRepository;
use crate::modules::vehicles::models::VehicleStatus;
use crate::modules::vehicles::repositories::VehicleRepository;

pub struct DashboardService {
    trip_repo: Arc<dyn TripRepository>,
    vehicle_repo: Arc<dyn VehicleRepository>,
    expense_repo: Arc<dyn ExpenseRepository>,
}

impl DashboardService {
    pub fn new(
        trip_repo: Arc<dyn TripRepository>,
        vehicle_repo: Arc<dyn VehicleRepository>,
        expense_repo: Arc<dyn ExpenseRepository>,
    ) -> Self {
        Self {
            trip_repo,
            vehicle_repo,
            expense_repo,
        }
    }

    pub async fn summary(&self, user: &AuthenticatedUser) -> Result<DashboardSummary> {
        let totals = self.trip_repo.totals(&user.user_id, None).await?;
        let active_vehicles = self
            .vehicle_repo
            .count_by_status(&user.user_id, VehicleStatus::Active)
            .await?;
        let total_expenses = self.expense_repo.total(&user.user_id, None).await?;

        let recent_filter = TripFilter {
            limit: Some(RECENT_TRIPS_LIMIT),
            ..Default::default()
        };
        let recent_trips = self.trip_repo.list(&user.user_id, &recent_filter).await?;

        Ok(DashboardSummary::new(
            totals.total_value,
            totals.net_profit,
            totals.trip_count,
            active_vehicles,
            total_expenses,
            recent_trips,
        ))
    }
}
