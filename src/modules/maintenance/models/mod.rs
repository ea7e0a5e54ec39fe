mod maintenance;

pub use maintenance::{
    CreateMaintenanceRequest, MaintenanceListQuery, MaintenanceRecord, MaintenanceResponse,
    MaintenanceType, UpcomingQuery, UpdateMaintenanceRequest, DEFAULT_UPCOMING_DAYS,
};
