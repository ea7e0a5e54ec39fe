use chrono::{DateTime, Datelike, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

use crate::core::dates::serde_date;
use crate::core::nullable;
use crate::core::{AppError, Result};

const MIN_VEHICLE_YEAR: i32 = 1950;

/// Colombian plates: three letters, two digits, then a digit or letter (ABC123, ABC12D)
fn plate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z]{3}[0-9]{2}[0-9A-Z]$").expect("valid plate regex"))
}

/// Case-insensitive check of a Colombian license plate
pub fn is_valid_colombian_plate(plate: &str) -> bool {
    plate_pattern().is_match(&plate.to_uppercase())
}

pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VehicleType {
    Truck,
    Trailer,
    Van,
    Other,
}

impl VehicleType {
    pub fn label(&self) -> &'static str {
        match self {
            VehicleType::Truck => "Camión",
            VehicleType::Trailer => "Tractomula",
            VehicleType::Van => "Furgoneta",
            VehicleType::Other => "Otro",
        }
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleType::Truck => write!(f, "TRUCK"),
            VehicleType::Trailer => write!(f, "TRAILER"),
            VehicleType::Van => write!(f, "VAN"),
            VehicleType::Other => write!(f, "OTHER"),
        }
    }
}

impl std::str::FromStr for VehicleType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "TRUCK" => Ok(VehicleType::Truck),
            "TRAILER" => Ok(VehicleType::Trailer),
            "VAN" => Ok(VehicleType::Van),
            "OTHER" => Ok(VehicleType::Other),
            _ => Err(format!("Invalid vehicle type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VehicleStatus {
    #[default]
    Active,
    Maintenance,
    Inactive,
}

impl VehicleStatus {
    pub fn label(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "Activo",
            VehicleStatus::Maintenance => "En Mantenimiento",
            VehicleStatus::Inactive => "Inactivo",
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VehicleStatus::Active => write!(f, "ACTIVE"),
            VehicleStatus::Maintenance => write!(f, "MAINTENANCE"),
            VehicleStatus::Inactive => write!(f, "INACTIVE"),
        }
    }
}

impl std::str::FromStr for VehicleStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(VehicleStatus::Active),
            "MAINTENANCE" => Ok(VehicleStatus::Maintenance),
            "INACTIVE" => Ok(VehicleStatus::Inactive),
            _ => Err(format!("Invalid vehicle status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub user_id: String,
    pub license_plate: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub vehicle_type: VehicleType,
    pub status: VehicleStatus,
    #[serde(with = "serde_date::option")]
    pub acquisition_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(user_id: &str, request: CreateVehicleRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            license_plate: normalize_plate(&request.license_plate),
            brand: request.brand,
            model: request.model,
            year: request.year,
            vehicle_type: request.vehicle_type,
            status: request.status,
            acquisition_date: request.acquisition_date,
            notes: request.notes,
            created_at: now,
            updated_at: now,
        }
    }
}

fn validate_plate(plate: &str) -> Result<()> {
    let plate = normalize_plate(plate);
    if plate.chars().count() != 6 {
        return Err(AppError::validation(
            "license_plate must be exactly 6 characters",
        ));
    }
    if !is_valid_colombian_plate(&plate) {
        return Err(AppError::validation(
            "Invalid license_plate format (example: ABC123)",
        ));
    }
    Ok(())
}

fn validate_year(year: i32, today: NaiveDate) -> Result<()> {
    let max_year = today.year() + 1;
    if !(MIN_VEHICLE_YEAR..=max_year).contains(&year) {
        return Err(AppError::validation(format!(
            "year must be between {} and {}",
            MIN_VEHICLE_YEAR, max_year
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVehicleRequest {
    pub license_plate: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    pub vehicle_type: VehicleType,
    #[serde(default)]
    pub status: VehicleStatus,
    #[serde(default, with = "serde_date::option")]
    pub acquisition_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateVehicleRequest {
    /// `today` bounds the model year (at most next year)
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        validate_plate(&self.license_plate)?;
        if let Some(year) = self.year {
            validate_year(year, today)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVehicleRequest {
    #[serde(default)]
    pub license_plate: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub vehicle_type: Option<VehicleType>,
    #[serde(default)]
    pub status: Option<VehicleStatus>,
    #[serde(default, with = "serde_date::option")]
    pub acquisition_date: Option<NaiveDate>,
    /// `null` clears the stored notes
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
}

impl UpdateVehicleRequest {
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        if let Some(plate) = &self.license_plate {
            validate_plate(plate)?;
        }
        if let Some(year) = self.year {
            validate_year(year, today)?;
        }
        Ok(())
    }

    pub fn apply_to(self, vehicle: &mut Vehicle, now: DateTime<Utc>) {
        if let Some(plate) = self.license_plate {
            vehicle.license_plate = normalize_plate(&plate);
        }
        if self.brand.is_some() {
            vehicle.brand = self.brand;
        }
        if self.model.is_some() {
            vehicle.model = self.model;
        }
        if self.year.is_some() {
            vehicle.year = self.year;
        }
        if let Some(vehicle_type) = self.vehicle_type {
            vehicle.vehicle_type = vehicle_type;
        }
        if let Some(status) = self.status {
            vehicle.status = status;
        }
        if self.acquisition_date.is_some() {
            vehicle.acquisition_date = self.acquisition_date;
        }
        if let Some(notes) = self.notes {
            vehicle.notes = notes;
        }
        vehicle.updated_at = now;
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VehicleListQuery {
    #[serde(default)]
    pub status: Option<VehicleStatus>,
}
