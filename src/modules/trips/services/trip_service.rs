use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::core::period::resolve_range;
use crate::core::{AppError, Result};
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::audit::repositories::record_best_effort;
use crate::modules::audit::{AuditAction, AuditEntity, AuditRepository};
use crate::modules::expenses::repositories::ExpenseRepository;
use crate::modules::trips::models::{
    CreateTripRequest, Trip, TripFilter, TripListQuery, TripResponse, UpdateTripRequest,
};
use crate::modules::trips::repositories::TripRepository;
use crate::modules::vehicles::repositories::VehicleRepository;

const DEFAULT_LIST_LIMIT: i64 = 100;
const MAX_LIST_LIMIT: i64 = 500;

/// Recompute a trip's stored net profit from its expense ledger.
///
/// Returns the new net profit, or `None` when the trip no longer exists.
pub async fn refresh_net_profit(
    trip_repo: &dyn TripRepository,
    trip_id: &str,
    user_id: &str,
) -> Result<Option<Decimal>> {
    let net_profit = trip_repo.recompute_net_profit(trip_id, user_id).await?;

    if let Some(net_profit) = net_profit {
        debug!(trip_id = %trip_id, net_profit = %net_profit, "Trip net profit refreshed");
    }

    Ok(net_profit)
}

/// Resolve the query string into a repository filter.
///
/// An explicit `start_date`/`end_date` wins over the bound computed from `period`.
pub fn build_filter(query: TripListQuery, today: NaiveDate) -> Result<TripFilter> {
    let range = query.period.map(|period| resolve_range(period, today));

    let filter = TripFilter {
        vehicle_id: query.vehicle_id.filter(|id| !id.trim().is_empty()),
        trip_type: query.trip_type,
        start_date: query.start_date.or(range.map(|r| r.start_date())),
        end_date: query.end_date.or(range.map(|r| r.end_date())),
        limit: Some(query.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)),
    };

    if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
        if start > end {
            return Err(AppError::validation(
                "start_date must not be after end_date",
            ));
        }
    }

    Ok(filter)
}

/// Service for trip registration and financial bookkeeping
pub struct TripService {
    trip_repo: Arc<dyn TripRepository>,
    vehicle_repo: Arc<dyn VehicleRepository>,
    expense_repo: Arc<dyn ExpenseRepository>,
    audit_repo: Arc<dyn AuditRepository>,
}

impl TripService {
    pub fn new(
        trip_repo: Arc<dyn TripRepository>,
        vehicle_repo: Arc<dyn VehicleRepository>,
        expense_repo: Arc<dyn ExpenseRepository>,
        audit_repo: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            trip_repo,
            vehicle_repo,
            expense_repo,
            audit_repo,
        }
    }

    async fn ensure_vehicle(&self, vehicle_id: &str, user_id: &str) -> Result<String> {
        self.vehicle_repo
            .find_by_id(vehicle_id.trim(), user_id)
            .await?
            .map(|v| v.license_plate)
            .ok_or_else(|| AppError::not_found("Vehicle not found"))
    }

    async fn find_trip(&self, id: &str, user_id: &str) -> Result<Trip> {
        self.trip_repo
            .find_by_id(id, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Trip not found"))
    }

    pub async fn create_trip(
        &self,
        user: &AuthenticatedUser,
        request: CreateTripRequest,
    ) -> Result<TripResponse> {
        user.ensure_can_write()?;
        request.validate()?;

        let plate = self.ensure_vehicle(&request.vehicle_id, &user.user_id).await?;

        let changes = serde_json::to_value(&request)?;
        let trip = Trip::new(&user.user_id, request, Utc::now());
        let created = self.trip_repo.create(&trip).await?;

        info!(
            trip_id = %created.id,
            manifest_number = %created.manifest_number,
            trip_type = %created.trip_type,
            total_value = %created.total_value,
            "Trip registered"
        );

        record_best_effort(
            self.audit_repo.as_ref(),
            &user.user_id,
            AuditAction::Create,
            AuditEntity::Trip,
            &created.id,
            Some(changes),
        )
        .await;

        Ok(TripResponse {
            trip: created,
            vehicle_license_plate: Some(plate),
            total_expenses: Decimal::ZERO,
        })
    }

    pub async fn list_trips(
        &self,
        user: &AuthenticatedUser,
        query: TripListQuery,
        today: NaiveDate,
    ) -> Result<Vec<TripResponse>> {
        let filter = build_filter(query, today)?;
        self.trip_repo.list(&user.user_id, &filter).await
    }

    pub async fn get_trip(&self, user: &AuthenticatedUser, id: &str) -> Result<TripResponse> {
        let trip = self.find_trip(id, &user.user_id).await?;

        let plate = self
            .vehicle_repo
            .find_by_id(&trip.vehicle_id, &user.user_id)
            .await?
            .map(|v| v.license_plate);
        let total_expenses = self
            .expense_repo
            .total_for_trip(&trip.id, &user.user_id)
            .await?;

        Ok(TripResponse {
            trip,
            vehicle_license_plate: plate,
            total_expenses,
        })
    }

    /// Partial update; financial figures are always re-derived against the expense ledger
    pub async fn update_trip(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        request: UpdateTripRequest,
    ) -> Result<TripResponse> {
        user.ensure_can_write()?;
        request.validate()?;

        let mut trip = self.find_trip(id, &user.user_id).await?;

        let plate = match &request.vehicle_id {
            Some(vehicle_id) => Some(self.ensure_vehicle(vehicle_id, &user.user_id).await?),
            None => None,
        };

        let changes = serde_json::to_value(&request)?;
        let recalculated = request.affects_financials();
        request.apply_to(&mut trip, Utc::now());

        let updated = self.trip_repo.update(&trip).await?;
        // Both figures are stored at two decimals, so the difference is the ledger total
        let total_expenses = updated.gross_profit - updated.net_profit;

        if recalculated {
            info!(
                trip_id = %updated.id,
                gross_profit = %updated.gross_profit,
                net_profit = %updated.net_profit,
                "Trip financials recalculated"
            );
        }

        record_best_effort(
            self.audit_repo.as_ref(),
            &user.user_id,
            AuditAction::Update,
            AuditEntity::Trip,
            &updated.id,
            Some(changes),
        )
        .await;

        let plate = match plate {
            Some(plate) => Some(plate),
            None => self
                .vehicle_repo
                .find_by_id(&updated.vehicle_id, &user.user_id)
                .await?
                .map(|v| v.license_plate),
        };

        Ok(TripResponse {
            trip: updated,
            vehicle_license_plate: plate,
            total_expenses,
        })
    }

    /// Attached expenses are kept and detached from the trip
    pub async fn delete_trip(&self, user: &AuthenticatedUser, id: &str) -> Result<()> {
        user.ensure_can_write()?;

        let trip = self.find_trip(id, &user.user_id).await?;

        if !self.trip_repo.delete(&trip.id, &user.user_id).await? {
            return Err(AppError::not_found("Trip not found"));
        }

        info!(trip_id = %trip.id, "Trip deleted");

        record_best_effort(
            self.audit_repo.as_ref(),
            &user.user_id,
            AuditAction::Delete,
            AuditEntity::Trip,
            &trip.id,
            None,
        )
        .await;

        Ok(())
    }
}
