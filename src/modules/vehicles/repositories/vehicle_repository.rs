use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};

use crate::core::{AppError, Result};
use crate::modules::vehicles::models::{Vehicle, VehicleStatus};

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Fails with `Conflict` when the plate is already registered
    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle>;

    async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<Vehicle>>;

    /// Newest first
    async fn list(&self, user_id: &str, status: Option<VehicleStatus>) -> Result<Vec<Vehicle>>;

    async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle>;

    async fn delete(&self, id: &str, user_id: &str) -> Result<bool>;

    async fn count_by_status(&self, user_id: &str, status: VehicleStatus) -> Result<i64>;
}

#[derive(Debug, FromRow)]
struct VehicleRow {
    id: String,
    user_id: String,
    license_plate: String,
    brand: Option<String>,
    model: Option<String>,
    year: Option<i32>,
    vehicle_type: String,
    status: String,
    acquisition_date: Option<NaiveDate>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = AppError;

    fn try_from(row: VehicleRow) -> Result<Self> {
        Ok(Vehicle {
            vehicle_type: row.vehicle_type.parse().map_err(AppError::internal)?,
            status: row.status.parse().map_err(AppError::internal)?,
            id: row.id,
            user_id: row.user_id,
            license_plate: row.license_plate,
            brand: row.brand,
            model: row.model,
            year: row.year,
            acquisition_date: row.acquisition_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const VEHICLE_COLUMNS: &str = r#"
    id, user_id, license_plate, brand, model, year, vehicle_type, status,
    acquisition_date, notes, created_at, updated_at
"#;

pub struct MySqlVehicleRepository {
    pool: MySqlPool,
}

impl MySqlVehicleRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VehicleRepository for MySqlVehicleRepository {
    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle> {
        sqlx::query(
            r#"
            INSERT INTO vehicles (
                id, user_id, license_plate, brand, model, year, vehicle_type, status,
                acquisition_date, notes, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&vehicle.id)
        .bind(&vehicle.user_id)
        .bind(&vehicle.license_plate)
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.vehicle_type.to_string())
        .bind(vehicle.status.to_string())
        .bind(vehicle.acquisition_date)
        .bind(&vehicle.notes)
        .bind(vehicle.created_at)
        .bind(vehicle.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(
                e,
                format!("Vehicle with plate '{}' already exists", vehicle.license_plate),
            )
        })?;

        Ok(vehicle.clone())
    }

    async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<Vehicle>> {
        let sql = format!(
            "SELECT {} FROM vehicles WHERE id = ? AND user_id = ?",
            VEHICLE_COLUMNS
        );

        let row = sqlx::query_as::<_, VehicleRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Vehicle::try_from).transpose()
    }

    async fn list(&self, user_id: &str, status: Option<VehicleStatus>) -> Result<Vec<Vehicle>> {
        let mut qb: QueryBuilder<MySql> = QueryBuilder::new(format!(
            "SELECT {} FROM vehicles WHERE user_id = ",
            VEHICLE_COLUMNS
        ));
        qb.push_bind(user_id.to_string());

        if let Some(status) = status {
            qb.push(" AND status = ").push_bind(status.to_string());
        }
        qb.push(" ORDER BY created_at DESC");

        let rows = qb
            .build_query_as::<VehicleRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Vehicle::try_from).collect()
    }

    async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle> {
        sqlx::query(
            r#"
            UPDATE vehicles SET
                license_plate = ?, brand = ?, model = ?, year = ?, vehicle_type = ?,
                status = ?, acquisition_date = ?, notes = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&vehicle.license_plate)
        .bind(&vehicle.brand)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(vehicle.vehicle_type.to_string())
        .bind(vehicle.status.to_string())
        .bind(vehicle.acquisition_date)
        .bind(&vehicle.notes)
        .bind(vehicle.updated_at)
        .bind(&vehicle.id)
        .bind(&vehicle.user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(
                e,
                format!("Vehicle with plate '{}' already exists", vehicle.license_plate),
            )
        })?;

        Ok(vehicle.clone())
    }

    async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_by_status(&self, user_id: &str, status: VehicleStatus) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM vehicles WHERE user_id = ? AND status = ?")
                .bind(user_id)
                .bind(status.to_string())
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
