use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::currency::validate_amount;
use crate::core::dates::serde_date;
use crate::core::nullable;
use crate::core::{AppError, Result};

pub const DEFAULT_UPCOMING_DAYS: i64 = 30;
const MAX_UPCOMING_DAYS: i64 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MaintenanceType {
    Preventive,
    Corrective,
    Inspection,
    Emergency,
}

impl MaintenanceType {
    pub const ALL: [MaintenanceType; 4] = [
        MaintenanceType::Preventive,
        MaintenanceType::Corrective,
        MaintenanceType::Inspection,
        MaintenanceType::Emergency,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MaintenanceType::Preventive => "Preventivo",
            MaintenanceType::Corrective => "Correctivo",
            MaintenanceType::Inspection => "Inspección Técnico-Mecánica",
            MaintenanceType::Emergency => "Emergencia",
        }
    }
}

impl std::fmt::Display for MaintenanceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaintenanceType::Preventive => write!(f, "PREVENTIVE"),
            MaintenanceType::Corrective => write!(f, "CORRECTIVE"),
            MaintenanceType::Inspection => write!(f, "INSPECTION"),
            MaintenanceType::Emergency => write!(f, "EMERGENCY"),
        }
    }
}

impl std::str::FromStr for MaintenanceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "PREVENTIVE" => Ok(MaintenanceType::Preventive),
            "CORRECTIVE" => Ok(MaintenanceType::Corrective),
            "INSPECTION" => Ok(MaintenanceType::Inspection),
            "EMERGENCY" => Ok(MaintenanceType::Emergency),
            _ => Err(format!("Invalid maintenance type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: String,
    pub user_id: String,
    pub vehicle_id: String,
    pub maintenance_type: MaintenanceType,
    pub description: String,
    pub cost: Decimal,
    #[serde(with = "serde_date")]
    pub maintenance_date: NaiveDate,
    #[serde(with = "serde_date::option")]
    pub next_due_date: Option<NaiveDate>,
    pub mileage: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaintenanceRecord {
    pub fn new(user_id: &str, request: CreateMaintenanceRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            vehicle_id: request.vehicle_id.trim().to_string(),
            maintenance_type: request.maintenance_type,
            description: request.description.trim().to_string(),
            cost: request.cost,
            maintenance_date: request.maintenance_date,
            next_due_date: request.next_due_date,
            mileage: request.mileage,
            notes: request.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Checked again after a partial update has been merged
    pub fn validate_schedule(&self) -> Result<()> {
        if let Some(next_due) = self.next_due_date {
            if next_due < self.maintenance_date {
                return Err(AppError::validation(
                    "next_due_date must not be before maintenance_date",
                ));
            }
        }
        Ok(())
    }
}

fn validate_mileage(mileage: Option<i32>) -> Result<()> {
    match mileage {
        Some(m) if m <= 0 => Err(AppError::validation("mileage must be greater than zero")),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMaintenanceRequest {
    pub vehicle_id: String,
    pub maintenance_type: MaintenanceType,
    pub description: String,
    pub cost: Decimal,
    #[serde(with = "serde_date")]
    pub maintenance_date: NaiveDate,
    #[serde(default, with = "serde_date::option")]
    pub next_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub mileage: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateMaintenanceRequest {
    pub fn validate(&self) -> Result<()> {
        if self.vehicle_id.trim().is_empty() {
            return Err(AppError::validation("vehicle_id is required"));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::validation("description is required"));
        }
        validate_amount("cost", self.cost)?;
        validate_mileage(self.mileage)?;

        if let Some(next_due) = self.next_due_date {
            if next_due < self.maintenance_date {
                return Err(AppError::validation(
                    "next_due_date must not be before maintenance_date",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMaintenanceRequest {
    #[serde(default)]
    pub maintenance_type: Option<MaintenanceType>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cost: Option<Decimal>,
    #[serde(default, with = "serde_date::option")]
    pub maintenance_date: Option<NaiveDate>,
    #[serde(default, with = "serde_date::option")]
    pub next_due_date: Option<NaiveDate>,
    #[serde(default)]
    pub mileage: Option<i32>,
    /// `null` clears the stored notes
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
}

impl UpdateMaintenanceRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(description) = &self.description {
            if description.trim().is_empty() {
                return Err(AppError::validation("description is required"));
            }
        }
        if let Some(cost) = self.cost {
            validate_amount("cost", cost)?;
        }
        validate_mileage(self.mileage)
    }

    pub fn apply_to(self, record: &mut MaintenanceRecord, now: DateTime<Utc>) {
        if let Some(maintenance_type) = self.maintenance_type {
            record.maintenance_type = maintenance_type;
        }
        if let Some(description) = self.description {
            record.description = description.trim().to_string();
        }
        if let Some(cost) = self.cost {
            record.cost = cost;
        }
        if let Some(maintenance_date) = self.maintenance_date {
            record.maintenance_date = maintenance_date;
        }
        if self.next_due_date.is_some() {
            record.next_due_date = self.next_due_date;
        }
        if self.mileage.is_some() {
            record.mileage = self.mileage;
        }
        if let Some(notes) = self.notes {
            record.notes = notes;
        }
        record.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaintenanceListQuery {
    #[serde(default)]
    pub vehicle_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpcomingQuery {
    #[serde(default)]
    pub days: Option<i64>,
}

impl UpcomingQuery {
    pub fn window_days(&self) -> Result<i64> {
        let days = self.days.unwrap_or(DEFAULT_UPCOMING_DAYS);
        if !(0..=MAX_UPCOMING_DAYS).contains(&days) {
            return Err(AppError::validation(format!(
                "days must be between 0 and {}",
                MAX_UPCOMING_DAYS
            )));
        }
        Ok(days)
    }
}

/// Maintenance record joined with its vehicle plate
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceResponse {
    #[serde(flatten)]
    pub record: MaintenanceRecord,
    pub vehicle_license_plate: Option<String>,
}
