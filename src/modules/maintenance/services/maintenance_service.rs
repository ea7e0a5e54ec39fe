use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use tracing::info;

use crate::core::{AppError, Result};
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::audit::repositories::record_best_effort;
use crate::modules::audit::{AuditAction, AuditEntity, AuditRepository};
use crate::modules::maintenance::models::{
    CreateMaintenanceRequest, MaintenanceRecord, MaintenanceResponse, UpdateMaintenanceRequest,
};
use crate::modules::maintenance::repositories::MaintenanceRepository;
use crate::modules::vehicles::repositories::VehicleRepository;

pub struct MaintenanceService {
    maintenance_repo: Arc<dyn MaintenanceRepository>,
    vehicle_repo: Arc<dyn VehicleRepository>,
    audit_repo: Arc<dyn AuditRepository>,
}

impl MaintenanceService {
    pub fn new(
        maintenance_repo: Arc<dyn MaintenanceRepository>,
        vehicle_repo: Arc<dyn VehicleRepository>,
        audit_repo: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            maintenance_repo,
            vehicle_repo,
            audit_repo,
        }
    }

    pub async fn create_record(
        &self,
        user: &AuthenticatedUser,
        request: CreateMaintenanceRequest,
    ) -> Result<MaintenanceResponse> {
        user.ensure_can_write()?;
        request.validate()?;

        let vehicle = self
            .vehicle_repo
            .find_by_id(request.vehicle_id.trim(), &user.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Vehicle not found"))?;

        let changes = serde_json::to_value(&request)?;
        let record = MaintenanceRecord::new(&user.user_id, request, Utc::now());
        let created = self.maintenance_repo.create(&record).await?;

        info!(
            maintenance_id = %created.id,
            vehicle = %vehicle.license_plate,
            maintenance_type = %created.maintenance_type,
            "Maintenance recorded"
        );

        record_best_effort(
            self.audit_repo.as_ref(),
            &user.user_id,
            AuditAction::Create,
            AuditEntity::Maintenance,
            &created.id,
            Some(changes),
        )
        .await;

        Ok(MaintenanceResponse {
            record: created,
            vehicle_license_plate: Some(vehicle.license_plate),
        })
    }

    pub async fn list_records(
        &self,
        user: &AuthenticatedUser,
        vehicle_id: Option<&str>,
    ) -> Result<Vec<MaintenanceResponse>> {
        let vehicle_id = vehicle_id.map(str::trim).filter(|id| !id.is_empty());
        self.maintenance_repo.list(&user.user_id, vehicle_id).await
    }

    /// Records due between `today` and `today + days`
    pub async fn upcoming(
        &self,
        user: &AuthenticatedUser,
        today: NaiveDate,
        days: i64,
    ) -> Result<Vec<MaintenanceResponse>> {
        let until = today + Duration::days(days);
        self.maintenance_repo
            .upcoming(&user.user_id, today, until)
            .await
    }

    pub async fn get_record(
        &self,
        user: &AuthenticatedUser,
        id: &str,
    ) -> Result<MaintenanceRecord> {
        self.maintenance_repo
            .find_by_id(id, &user.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Maintenance record not found"))
    }

    pub async fn update_record(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        request: UpdateMaintenanceRequest,
    ) -> Result<MaintenanceRecord> {
        user.ensure_can_write()?;
        request.validate()?;

        let mut record = self.get_record(user, id).await?;
        let changes = serde_json::to_value(&request)?;

        request.apply_to(&mut record, Utc::now());
        record.validate_schedule()?;

        let updated = self.maintenance_repo.update(&record).await?;

        record_best_effort(
            self.audit_repo.as_ref(),
            &user.user_id,
            AuditAction::Update,
            AuditEntity::Maintenance,
            &updated.id,
            Some(changes),
        )
        .await;

        Ok(updated)
    }

    pub async fn delete_record(&self, user: &AuthenticatedUser, id: &str) -> Result<()> {
        user.ensure_can_write()?;

        let record = self.get_record(user, id).await?;

        if !self
            .maintenance_repo
            .delete(&record.id, &user.user_id)
            .await?
        {
            return Err(AppError::not_found("Maintenance record not found"));
        }

        record_best_effort(
            self.audit_repo.as_ref(),
            &user.user_id,
            AuditAction::Delete,
            AuditEntity::Maintenance,
            &record.id,
            None,
        )
        .await;

        Ok(())
    }
}
