use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::core::{AppError, Result};
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::audit::repositories::record_best_effort;
use crate::modules::audit::{AuditAction, AuditEntity, AuditRepository};
use crate::modules::trips::repositories::TripRepository;
use crate::modules::vehicles::models::{
    CreateVehicleRequest, UpdateVehicleRequest, Vehicle, VehicleStatus,
};
use crate::modules::vehicles::repositories::VehicleRepository;

/// Service for fleet management
pub struct VehicleService {
    vehicle_repo: Arc<dyn VehicleRepository>,
    trip_repo: Arc<dyn TripRepository>,
    audit_repo: Arc<dyn AuditRepository>,
}

impl VehicleService {
    pub fn new(
        vehicle_repo: Arc<dyn VehicleRepository>,
        trip_repo: Arc<dyn TripRepository>,
        audit_repo: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            vehicle_repo,
            trip_repo,
            audit_repo,
        }
    }

    pub async fn create_vehicle(
        &self,
        user: &AuthenticatedUser,
        request: CreateVehicleRequest,
        today: NaiveDate,
    ) -> Result<Vehicle> {
        user.ensure_can_write()?;
        request.validate(today)?;

        let changes = serde_json::to_value(&request)?;
        let vehicle = Vehicle::new(&user.user_id, request, Utc::now());
        let created = self.vehicle_repo.create(&vehicle).await?;

        info!(
            vehicle_id = %created.id,
            license_plate = %created.license_plate,
            "Vehicle registered"
        );

        record_best_effort(
            self.audit_repo.as_ref(),
            &user.user_id,
            AuditAction::Create,
            AuditEntity::Vehicle,
            &created.id,
            Some(changes),
        )
        .await;

        Ok(created)
    }

    pub async fn get_vehicle(&self, user: &AuthenticatedUser, id: &str) -> Result<Vehicle> {
        self.vehicle_repo
            .find_by_id(id, &user.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Vehicle not found"))
    }

    pub async fn list_vehicles(
        &self,
        user: &AuthenticatedUser,
        status: Option<VehicleStatus>,
    ) -> Result<Vec<Vehicle>> {
        self.vehicle_repo.list(&user.user_id, status).await
    }

    pub async fn update_vehicle(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        request: UpdateVehicleRequest,
        today: NaiveDate,
    ) -> Result<Vehicle> {
        user.ensure_can_write()?;
        request.validate(today)?;

        let mut vehicle = self.get_vehicle(user, id).await?;
        let changes = serde_json::to_value(&request)?;

        request.apply_to(&mut vehicle, Utc::now());
        let updated = self.vehicle_repo.update(&vehicle).await?;

        record_best_effort(
            self.audit_repo.as_ref(),
            &user.user_id,
            AuditAction::Update,
            AuditEntity::Vehicle,
            &updated.id,
            Some(changes),
        )
        .await;

        Ok(updated)
    }

    /// Vehicles with recorded trips cannot be deleted; mark them INACTIVE instead
    pub async fn delete_vehicle(&self, user: &AuthenticatedUser, id: &str) -> Result<()> {
        user.ensure_can_write()?;

        let vehicle = self.get_vehicle(user, id).await?;

        if self
            .trip_repo
            .exists_for_vehicle(&vehicle.id, &user.user_id)
            .await?
        {
            return Err(AppError::conflict(format!(
                "Vehicle '{}' has recorded trips; set its status to INACTIVE instead",
                vehicle.license_plate
            )));
        }

        if !self.vehicle_repo.delete(&vehicle.id, &user.user_id).await? {
            return Err(AppError::not_found("Vehicle not found"));
        }

        info!(vehicle_id = %vehicle.id, "Vehicle deleted");

        record_best_effort(
            self.audit_repo.as_ref(),
            &user.user_id,
            AuditAction::Delete,
            AuditEntity::Vehicle,
            &vehicle.id,
            None,
        )
        .await;

        Ok(())
    }
}
