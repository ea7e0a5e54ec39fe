// Trip model with validation
//
// A trip is a single transport job billed at `total_value`. The derived
// figures (deduction, paid value, gross/net profit) are computed by the
// financial calculator at creation time and stored on the record.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::currency::validate_amount;
use crate::core::dates::serde_date;
use crate::core::nullable;
use crate::core::{AppError, ReportingPeriod, Result};
use crate::modules::trips::services::financial_calculator::{
    DerivedFinancials, NATIONAL_PROFIT_RATE, URBAN_PROFIT_RATE,
};

const MAX_MANIFEST_LENGTH: usize = 50;
const MAX_ROUTE_LENGTH: usize = 255;

/// Trip classification driving the profit percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TripType {
    Urban,
    National,
}

impl TripType {
    pub fn profit_rate(&self) -> Decimal {
        match self {
            TripType::Urban => URBAN_PROFIT_RATE,
            TripType::National => NATIONAL_PROFIT_RATE,
        }
    }

    /// Stored form of the profit rate: 50 or 60
    pub fn profit_percentage(&self) -> Decimal {
        (self.profit_rate() * Decimal::ONE_HUNDRED).normalize()
    }

    pub fn label(&self) -> &'static str {
        match self {
            TripType::Urban => "Urbano",
            TripType::National => "Nacional",
        }
    }
}

impl std::fmt::Display for TripType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TripType::Urban => write!(f, "URBAN"),
            TripType::National => write!(f, "NATIONAL"),
        }
    }
}

impl std::str::FromStr for TripType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "URBAN" => Ok(TripType::Urban),
            "NATIONAL" => Ok(TripType::National),
            _ => Err(format!("Invalid trip type: {}", s)),
        }
    }
}

/// Stored trip record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub user_id: String,
    pub vehicle_id: String,
    pub manifest_number: String,
    #[serde(with = "serde_date")]
    pub trip_date: NaiveDate,
    pub trip_type: TripType,
    pub route: String,
    pub total_value: Decimal,
    pub deduction: Decimal,
    pub paid_value: Decimal,
    pub profit_percentage: Decimal,
    pub gross_profit: Decimal,
    pub net_profit: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// Build a new trip from a validated request; net profit starts equal to gross profit
    pub fn new(user_id: &str, request: CreateTripRequest, now: DateTime<Utc>) -> Self {
        let financials = DerivedFinancials::derive(request.total_value, request.trip_type)
            .rounded_for_storage(request.total_value);

        let mut trip = Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            vehicle_id: request.vehicle_id.trim().to_string(),
            manifest_number: request.manifest_number.trim().to_string(),
            trip_date: request.trip_date,
            trip_type: request.trip_type,
            route: request.route.trim().to_string(),
            total_value: request.total_value,
            deduction: Decimal::ZERO,
            paid_value: Decimal::ZERO,
            profit_percentage: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            net_profit: Decimal::ZERO,
            notes: request.notes,
            created_at: now,
            updated_at: now,
        };
        trip.apply_financials(financials);
        trip
    }

    pub fn apply_financials(&mut self, financials: DerivedFinancials) {
        self.deduction = financials.deduction;
        self.paid_value = financials.paid_value;
        self.profit_percentage = financials.profit_percentage;
        self.gross_profit = financials.gross_profit;
        self.net_profit = financials.net_profit;
    }

    /// Recompute every derived field from the current value, type and expense total
    pub fn rederive(&mut self, total_expenses: Decimal) {
        let financials = DerivedFinancials::derive(self.total_value, self.trip_type)
            .with_expenses(total_expenses)
            .rounded_for_storage(self.total_value);
        self.apply_financials(financials);
    }
}

fn validate_required(field: &str, value: &str, max_len: usize) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{} is required", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(())
}

fn validate_total_value(total_value: Decimal) -> Result<()> {
    validate_amount("total_value", total_value)
}

/// Request body for POST /api/trips
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTripRequest {
    pub vehicle_id: String,
    pub manifest_number: String,
    #[serde(with = "serde_date")]
    pub trip_date: NaiveDate,
    pub trip_type: TripType,
    pub route: String,
    pub total_value: Decimal,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateTripRequest {
    /// Boundary checks run before any financial derivation
    pub fn validate(&self) -> Result<()> {
        validate_required("vehicle_id", &self.vehicle_id, 36)?;
        validate_required("manifest_number", &self.manifest_number, MAX_MANIFEST_LENGTH)?;
        validate_required("route", &self.route, MAX_ROUTE_LENGTH)?;
        validate_total_value(self.total_value)
    }
}

/// Request body for PUT /api/trips/{id}; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTripRequest {
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub manifest_number: Option<String>,
    #[serde(default, with = "serde_date::option")]
    pub trip_date: Option<NaiveDate>,
    #[serde(default)]
    pub trip_type: Option<TripType>,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub total_value: Option<Decimal>,
    /// `null` clears the stored notes
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
}

impl UpdateTripRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(vehicle_id) = &self.vehicle_id {
            validate_required("vehicle_id", vehicle_id, 36)?;
        }
        if let Some(manifest_number) = &self.manifest_number {
            validate_required("manifest_number", manifest_number, MAX_MANIFEST_LENGTH)?;
        }
        if let Some(route) = &self.route {
            validate_required("route", route, MAX_ROUTE_LENGTH)?;
        }
        if let Some(total_value) = self.total_value {
            validate_total_value(total_value)?;
        }
        Ok(())
    }

    /// True when the change invalidates the stored financial figures
    pub fn affects_financials(&self) -> bool {
        self.total_value.is_some() || self.trip_type.is_some()
    }

    pub fn apply_to(self, trip: &mut Trip, now: DateTime<Utc>) {
        if let Some(vehicle_id) = self.vehicle_id {
            trip.vehicle_id = vehicle_id.trim().to_string();
        }
        if let Some(manifest_number) = self.manifest_number {
            trip.manifest_number = manifest_number.trim().to_string();
        }
        if let Some(trip_date) = self.trip_date {
            trip.trip_date = trip_date;
        }
        if let Some(trip_type) = self.trip_type {
            trip.trip_type = trip_type;
        }
        if let Some(route) = self.route {
            trip.route = route.trim().to_string();
        }
        if let Some(total_value) = self.total_value {
            trip.total_value = total_value;
        }
        if let Some(notes) = self.notes {
            trip.notes = notes;
        }
        trip.updated_at = now;
    }
}

/// Query string of GET /api/trips
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripListQuery {
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub trip_type: Option<TripType>,
    #[serde(default, with = "serde_date::option")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "serde_date::option")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub period: Option<ReportingPeriod>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Repository-level filter after the period token has been resolved
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripFilter {
    pub vehicle_id: Option<String>,
    pub trip_type: Option<TripType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<i64>,
}

impl TripFilter {
    pub fn matches(&self, trip: &Trip) -> bool {
        self.vehicle_id.as_ref().map_or(true, |v| &trip.vehicle_id == v)
            && self.trip_type.map_or(true, |t| trip.trip_type == t)
            && self.start_date.map_or(true, |d| trip.trip_date >= d)
            && self.end_date.map_or(true, |d| trip.trip_date <= d)
    }
}

/// Trip joined with its vehicle plate and expense total for listings
#[derive(Debug, Clone, Serialize)]
pub struct TripResponse {
    #[serde(flatten)]
    pub trip: Trip,
    pub vehicle_license_plate: Option<String>,
    pub total_expenses: Decimal,
}
