use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::currency::format_currency;
use crate::modules::trips::models::TripResponse;

pub const RECENT_TRIPS_LIMIT: i64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardDisplay {
    pub total_revenue: String,
    pub total_net_profit: String,
    pub total_expenses: String,
}

/// All-time figures for the landing page
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_revenue: Decimal,
    pub total_net_profit: Decimal,
    pub total_trips: i64,
    pub active_vehicles: i64,
    pub total_expenses: Decimal,
    pub recent_trips: Vec<TripResponse>,
    pub display: DashboardDisplay,
}

impl DashboardSummary {
    pub fn new(
        total_revenue: Decimal,
        total_net_profit: Decimal,
        total_trips: i64,
        active_vehicles: i64,
        total_expenses: Decimal,
        recent_trips: Vec<TripResponse>,
    ) -> Self {
        Self {
            display: DashboardDisplay {
                total_revenue: format_currency(total_revenue),
                total_net_profit: format_currency(total_net_profit),
                total_expenses: format_currency(total_expenses),
            },
            total_revenue,
            total_net_profit,
            total_trips,
            active_vehicles,
            total_expenses,
            recent_trips,
        }
    }
}
