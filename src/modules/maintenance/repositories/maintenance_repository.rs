use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};

use crate::core::{AppError, DateRange, Result};
use crate::modules::maintenance::models::{MaintenanceRecord, MaintenanceResponse};

#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    async fn create(&self, record: &MaintenanceRecord) -> Result<MaintenanceRecord>;

    async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<MaintenanceRecord>>;

    /// Most recent maintenance first
    async fn list(
        &self,
        user_id: &str,
        vehicle_id: Option<&str>,
    ) -> Result<Vec<MaintenanceResponse>>;

    /// Records whose next due date falls inside `[from, until]`, soonest first
    async fn upcoming(
        &self,
        user_id: &str,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<MaintenanceResponse>>;

    async fn update(&self, record: &MaintenanceRecord) -> Result<MaintenanceRecord>;

    async fn delete(&self, id: &str, user_id: &str) -> Result<bool>;

    /// Sum of costs over all records, or those dated inside `range`
    async fn total_cost(&self, user_id: &str, range: Option<&DateRange>) -> Result<Decimal>;
}

#[derive(Debug, FromRow)]
struct MaintenanceRow {
    id: String,
    user_id: String,
    vehicle_id: String,
    maintenance_type: String,
    description: String,
    cost: Decimal,
    maintenance_date: NaiveDate,
    next_due_date: Option<NaiveDate>,
    mileage: Option<i32>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<MaintenanceRow> for MaintenanceRecord {
    type Error = AppError;

    fn try_from(row: MaintenanceRow) -> Result<Self> {
        Ok(MaintenanceRecord {
            maintenance_type: row.maintenance_type.parse().map_err(AppError::internal)?,
            id: row.id,
            user_id: row.user_id,
            vehicle_id: row.vehicle_id,
            description: row.description,
            cost: row.cost,
            maintenance_date: row.maintenance_date,
            next_due_date: row.next_due_date,
            mileage: row.mileage,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct MaintenanceListRow {
    #[sqlx(flatten)]
    record: MaintenanceRow,
    license_plate: Option<String>,
}

impl TryFrom<MaintenanceListRow> for MaintenanceResponse {
    type Error = AppError;

    fn try_from(row: MaintenanceListRow) -> Result<Self> {
        Ok(MaintenanceResponse {
            record: MaintenanceRecord::try_from(row.record)?,
            vehicle_license_plate: row.license_plate,
        })
    }
}

const MAINTENANCE_COLUMNS: &str = r#"
    m.id, m.user_id, m.vehicle_id, m.maintenance_type, m.description, m.cost,
    m.maintenance_date, m.next_due_date, m.mileage, m.notes, m.created_at, m.updated_at
"#;

fn select_with_plate() -> String {
    format!(
        r#"
        SELECT {}, v.license_plate
        FROM maintenance_records m
        LEFT JOIN vehicles v ON v.id = m.vehicle_id
        WHERE m.user_id = "#,
        MAINTENANCE_COLUMNS
    )
}

pub struct MySqlMaintenanceRepository {
    pool: MySqlPool,
}

impl MySqlMaintenanceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaintenanceRepository for MySqlMaintenanceRepository {
    async fn create(&self, record: &MaintenanceRecord) -> Result<MaintenanceRecord> {
        sqlx::query(
            r#"
            INSERT INTO maintenance_records (
                id, user_id, vehicle_id, maintenance_type, description, cost,
                maintenance_date, next_due_date, mileage, notes, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.user_id)
        .bind(&record.vehicle_id)
        .bind(record.maintenance_type.to_string())
        .bind(&record.description)
        .bind(record.cost)
        .bind(record.maintenance_date)
        .bind(record.next_due_date)
        .bind(record.mileage)
        .bind(&record.notes)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(record.clone())
    }

    async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<MaintenanceRecord>> {
        let sql = format!(
            "SELECT {} FROM maintenance_records m WHERE m.id = ? AND m.user_id = ?",
            MAINTENANCE_COLUMNS
        );

        let row = sqlx::query_as::<_, MaintenanceRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(MaintenanceRecord::try_from).transpose()
    }

    async fn list(
        &self,
        user_id: &str,
        vehicle_id: Option<&str>,
    ) -> Result<Vec<MaintenanceResponse>> {
        let mut qb: QueryBuilder<MySql> = QueryBuilder::new(select_with_plate());
        qb.push_bind(user_id.to_string());

        if let Some(vehicle_id) = vehicle_id {
            qb.push(" AND m.vehicle_id = ").push_bind(vehicle_id.to_string());
        }
        qb.push(" ORDER BY m.maintenance_date DESC, m.created_at DESC");

        let rows = qb
            .build_query_as::<MaintenanceListRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(MaintenanceResponse::try_from).collect()
    }

    async fn upcoming(
        &self,
        user_id: &str,
        from: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<MaintenanceResponse>> {
        let mut qb: QueryBuilder<MySql> = QueryBuilder::new(select_with_plate());
        qb.push_bind(user_id.to_string())
            .push(" AND m.next_due_date BETWEEN ")
            .push_bind(from)
            .push(" AND ")
            .push_bind(until)
            .push(" ORDER BY m.next_due_date ASC");

        let rows = qb
            .build_query_as::<MaintenanceListRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(MaintenanceResponse::try_from).collect()
    }

    async fn update(&self, record: &MaintenanceRecord) -> Result<MaintenanceRecord> {
        sqlx::query(
            r#"
            UPDATE maintenance_records SET
                maintenance_type = ?, description = ?, cost = ?, maintenance_date = ?,
                next_due_date = ?, mileage = ?, notes = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(record.maintenance_type.to_string())
        .bind(&record.description)
        .bind(record.cost)
        .bind(record.maintenance_date)
        .bind(record.next_due_date)
        .bind(record.mileage)
        .bind(&record.notes)
        .bind(record.updated_at)
        .bind(&record.id)
        .bind(&record.user_id)
        .execute(&self.pool)
        .await?;

        Ok(record.clone())
    }

    async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM maintenance_records WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn total_cost(&self, user_id: &str, range: Option<&DateRange>) -> Result<Decimal> {
        let mut qb: QueryBuilder<MySql> = QueryBuilder::new(
            "SELECT COALESCE(SUM(cost), 0) FROM maintenance_records WHERE user_id = ",
        );
        qb.push_bind(user_id.to_string());

        if let Some(range) = range {
            qb.push(" AND maintenance_date BETWEEN ")
                .push_bind(range.start_date())
                .push(" AND ")
                .push_bind(range.end_date());
        }

        let total: Decimal = qb.build_query_scalar().fetch_one(&self.pool).await?;

        Ok(total)
    }
}
