use serde::Serialize;

use crate::core::ReportingPeriod;
use crate::modules::auth::models::UserRole;
use crate::modules::expenses::models::ExpenseType;
use crate::modules::maintenance::models::MaintenanceType;
use crate::modules::trips::models::TripType;
use crate::modules::vehicles::models::{VehicleStatus, VehicleType};

pub const URBAN_ROUTES: &[&str] = &[
    "Barranquilla - Soledad",
    "Barranquilla - Malambo",
    "Barranquilla - Puerto Colombia",
    "Barranquilla - Galapa",
    "Barranquilla - Zona Industrial",
    "Otra (Urbana)",
];

pub const NATIONAL_ROUTES: &[&str] = &[
    "Barranquilla - Bogotá",
    "Barranquilla - Medellín",
    "Barranquilla - Cali",
    "Barranquilla - Cartagena",
    "Barranquilla - Santa Marta",
    "Barranquilla - Bucaramanga",
    "Barranquilla - Valledupar",
    "Otra (Nacional)",
];

/// Code plus Spanish label, as shown in selects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub code: String,
    pub label: &'static str,
}

fn entry(code: impl ToString, label: &'static str) -> CatalogEntry {
    CatalogEntry {
        code: code.to_string(),
        label,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteSuggestions {
    pub urban: &'static [&'static str],
    pub national: &'static [&'static str],
}

/// Fixed option lists for client forms
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub vehicle_types: Vec<CatalogEntry>,
    pub vehicle_statuses: Vec<CatalogEntry>,
    pub trip_types: Vec<CatalogEntry>,
    pub expense_types: Vec<CatalogEntry>,
    pub maintenance_types: Vec<CatalogEntry>,
    pub roles: Vec<CatalogEntry>,
    pub periods: Vec<CatalogEntry>,
    pub routes: RouteSuggestions,
}

impl Catalog {
    pub fn build() -> Self {
        let vehicle_types = [
            VehicleType::Truck,
            VehicleType::Trailer,
            VehicleType::Van,
            VehicleType::Other,
        ];
        let vehicle_statuses = [
            VehicleStatus::Active,
            VehicleStatus::Maintenance,
            VehicleStatus::Inactive,
        ];
        let roles = [UserRole::Admin, UserRole::Operator, UserRole::Viewer];
        let periods = [
            ReportingPeriod::Week,
            ReportingPeriod::Month,
            ReportingPeriod::Year,
        ];

        Self {
            vehicle_types: vehicle_types.iter().map(|t| entry(t, t.label())).collect(),
            vehicle_statuses: vehicle_statuses
                .iter()
                .map(|s| entry(s, s.label()))
                .collect(),
            trip_types: [TripType::Urban, TripType::National]
                .iter()
                .map(|t| entry(t, t.label()))
                .collect(),
            expense_types: ExpenseType::ALL
                .iter()
                .map(|t| entry(t, t.label()))
                .collect(),
            maintenance_types: MaintenanceType::ALL
                .iter()
                .map(|t| entry(t, t.label()))
                .collect(),
            roles: roles.iter().map(|r| entry(r, r.label())).collect(),
            periods: periods.iter().map(|p| entry(p, p.label())).collect(),
            routes: RouteSuggestions {
                urban: URBAN_ROUTES,
                national: NATIONAL_ROUTES,
            },
        }
    }

    /// Suggested routes for a trip type
    pub fn routes_for(trip_type: TripType) -> &'static [&'static str] {
        match trip_type {
            TripType::Urban => URBAN_ROUTES,
            TripType::National => NATIONAL_ROUTES,
        }
    }
}
