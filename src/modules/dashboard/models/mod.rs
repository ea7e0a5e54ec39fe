mod summary;

pub use summary::{DashboardDisplay, DashboardSummary, RECENT_TRIPS_LIMIT};
