// TripRepository: MySQL persistence for trips
//
// All queries are scoped by user_id; a trip owned by another user is
// reported as absent.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder, Transaction};

use crate::core::{AppError, DateRange, Result};
use crate::modules::trips::models::{Trip, TripFilter, TripResponse};
use crate::modules::trips::services::financial_calculator::compute_net_profit;

/// Sums of the stored trip figures over a selection of trips
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
pub struct TripTotals {
    pub trip_count: i64,
    pub total_value: Decimal,
    pub deduction: Decimal,
    pub paid_value: Decimal,
    pub gross_profit: Decimal,
    pub net_profit: Decimal,
}

impl TripTotals {
    pub fn add(&mut self, trip: &Trip) {
        self.trip_count += 1;
        self.total_value += trip.total_value;
        self.deduction += trip.deduction;
        self.paid_value += trip.paid_value;
        self.gross_profit += trip.gross_profit;
        self.net_profit += trip.net_profit;
    }
}

#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn create(&self, trip: &Trip) -> Result<Trip>;

    async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<Trip>>;

    /// Trips matching the filter, newest trip date first
    async fn list(&self, user_id: &str, filter: &TripFilter) -> Result<Vec<TripResponse>>;

    /// Write the trip with its figures re-derived against the expense ledger.
    ///
    /// The ledger is read under the trip's row lock, so an expense written
    /// concurrently is either counted here or settles the trip after us.
    async fn update(&self, trip: &Trip) -> Result<Trip>;

    /// Settle the stored net profit against the current expense ledger.
    ///
    /// Returns the settled figure, or `None` when the trip does not exist.
    async fn recompute_net_profit(&self, id: &str, user_id: &str) -> Result<Option<Decimal>>;

    /// Returns false when nothing was deleted
    async fn delete(&self, id: &str, user_id: &str) -> Result<bool>;

    /// Totals over all of the user's trips, or over those dated inside `range`
    async fn totals(&self, user_id: &str, range: Option<&DateRange>) -> Result<TripTotals>;

    /// Whether any trip references the vehicle
    async fn exists_for_vehicle(&self, vehicle_id: &str, user_id: &str) -> Result<bool>;
}

#[derive(Debug, FromRow)]
struct TripRow {
    id: String,
    user_id: String,
    vehicle_id: String,
    manifest_number: String,
    trip_date: NaiveDate,
    trip_type: String,
    route: String,
    total_value: Decimal,
    deduction: Decimal,
    paid_value: Decimal,
    profit_percentage: Decimal,
    gross_profit: Decimal,
    net_profit: Decimal,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TripRow> for Trip {
    type Error = AppError;

    fn try_from(row: TripRow) -> Result<Self> {
        Ok(Trip {
            trip_type: row.trip_type.parse().map_err(AppError::internal)?,
            id: row.id,
            user_id: row.user_id,
            vehicle_id: row.vehicle_id,
            manifest_number: row.manifest_number,
            trip_date: row.trip_date,
            route: row.route,
            total_value: row.total_value,
            deduction: row.deduction,
            paid_value: row.paid_value,
            profit_percentage: row.profit_percentage.normalize(),
            gross_profit: row.gross_profit,
            net_profit: row.net_profit,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct TripListRow {
    #[sqlx(flatten)]
    trip: TripRow,
    license_plate: Option<String>,
    total_expenses: Decimal,
}

const TRIP_COLUMNS: &str = r#"
    t.id, t.user_id, t.vehicle_id, t.manifest_number, t.trip_date, t.trip_type, t.route,
    t.total_value, t.deduction, t.paid_value, t.profit_percentage, t.gross_profit,
    t.net_profit, t.notes, t.created_at, t.updated_at
"#;

pub struct MySqlTripRepository {
    pool: MySqlPool,
}

impl MySqlTripRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TripRepository for MySqlTripRepository {
    async fn create(&self, trip: &Trip) -> Result<Trip> {
        sqlx::query(
            r#"
            INSERT INTO trips (
                id, user_id, vehicle_id, manifest_number, trip_date, trip_type, route,
                total_value, deduction, paid_value, profit_percentage, gross_profit,
                net_profit, notes, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&trip.id)
        .bind(&trip.user_id)
        .bind(&trip.vehicle_id)
        .bind(&trip.manifest_number)
        .bind(trip.trip_date)
        .bind(trip.trip_type.to_string())
        .bind(&trip.route)
        .bind(trip.total_value)
        .bind(trip.deduction)
        .bind(trip.paid_value)
        .bind(trip.profit_percentage)
        .bind(trip.gross_profit)
        .bind(trip.net_profit)
        .bind(&trip.notes)
        .bind(trip.created_at)
        .bind(trip.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(trip.clone())
    }

    async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<Trip>> {
        let sql = format!(
            "SELECT {} FROM trips t WHERE t.id = ? AND t.user_id = ?",
            TRIP_COLUMNS
        );

        let row = sqlx::query_as::<_, TripRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Trip::try_from).transpose()
    }

    async fn list(&self, user_id: &str, filter: &TripFilter) -> Result<Vec<TripResponse>> {
        let mut qb: QueryBuilder<MySql> = QueryBuilder::new(format!(
            r#"
            SELECT {},
                v.license_plate,
                COALESCE((SELECT SUM(e.amount) FROM expenses e WHERE e.trip_id = t.id), 0)
                    AS total_expenses
            FROM trips t
            LEFT JOIN vehicles v ON v.id = t.vehicle_id
            WHERE t.user_id = "#,
            TRIP_COLUMNS
        ));
        qb.push_bind(user_id.to_string());

        if let Some(vehicle_id) = &filter.vehicle_id {
            qb.push(" AND t.vehicle_id = ").push_bind(vehicle_id.clone());
        }
        if let Some(trip_type) = filter.trip_type {
            qb.push(" AND t.trip_type = ").push_bind(trip_type.to_string());
        }
        if let Some(start_date) = filter.start_date {
            qb.push(" AND t.trip_date >= ").push_bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            qb.push(" AND t.trip_date <= ").push_bind(end_date);
        }

        qb.push(" ORDER BY t.trip_date DESC, t.created_at DESC");

        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ").push_bind(limit);
        }

        let rows = qb
            .build_query_as::<TripListRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(TripResponse {
                    trip: Trip::try_from(row.trip)?,
                    vehicle_license_plate: row.license_plate,
                    total_expenses: row.total_expenses,
                })
            })
            .collect()
    }

    async fn update(&self, trip: &Trip) -> Result<Trip> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to start transaction: {}", e)))?;

        if lock_gross_profit(&mut tx, &trip.id, &trip.user_id).await?.is_none() {
            return Err(AppError::not_found("Trip not found"));
        }

        let mut trip = trip.clone();
        trip.rederive(sum_trip_expenses(&mut tx, &trip.id, &trip.user_id).await?);

        sqlx::query(
            r#"
            UPDATE trips SET
                vehicle_id = ?, manifest_number = ?, trip_date = ?, trip_type = ?, route = ?,
                total_value = ?, deduction = ?, paid_value = ?, profit_percentage = ?,
                gross_profit = ?, net_profit = ?, notes = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&trip.vehicle_id)
        .bind(&trip.manifest_number)
        .bind(trip.trip_date)
        .bind(trip.trip_type.to_string())
        .bind(&trip.route)
        .bind(trip.total_value)
        .bind(trip.deduction)
        .bind(trip.paid_value)
        .bind(trip.profit_percentage)
        .bind(trip.gross_profit)
        .bind(trip.net_profit)
        .bind(&trip.notes)
        .bind(trip.updated_at)
        .bind(&trip.id)
        .bind(&trip.user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to commit transaction: {}", e)))?;

        Ok(trip)
    }

    async fn recompute_net_profit(&self, id: &str, user_id: &str) -> Result<Option<Decimal>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to start transaction: {}", e)))?;

        let Some(gross_profit) = lock_gross_profit(&mut tx, id, user_id).await? else {
            return Ok(None);
        };

        let total_expenses = sum_trip_expenses(&mut tx, id, user_id).await?;
        let net_profit = compute_net_profit(gross_profit, total_expenses);

        sqlx::query("UPDATE trips SET net_profit = ?, updated_at = ? WHERE id = ? AND user_id = ?")
            .bind(net_profit)
            .bind(Utc::now())
            .bind(id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to commit transaction: {}", e)))?;

        Ok(Some(net_profit))
    }

    async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM trips WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn totals(&self, user_id: &str, range: Option<&DateRange>) -> Result<TripTotals> {
        let mut qb: QueryBuilder<MySql> = QueryBuilder::new(
            r#"
            SELECT
                COUNT(*) AS trip_count,
                COALESCE(SUM(total_value), 0) AS total_value,
                COALESCE(SUM(deduction), 0) AS deduction,
                COALESCE(SUM(paid_value), 0) AS paid_value,
                COALESCE(SUM(gross_profit), 0) AS gross_profit,
                COALESCE(SUM(net_profit), 0) AS net_profit
            FROM trips
            WHERE user_id = "#,
        );
        qb.push_bind(user_id.to_string());

        if let Some(range) = range {
            qb.push(" AND trip_date BETWEEN ")
                .push_bind(range.start_date())
                .push(" AND ")
                .push_bind(range.end_date());
        }

        let totals = qb
            .build_query_as::<TripTotals>()
            .fetch_one(&self.pool)
            .await?;

        Ok(totals)
    }

    async fn exists_for_vehicle(&self, vehicle_id: &str, user_id: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM trips WHERE vehicle_id = ? AND user_id = ?")
                .bind(vehicle_id)
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }
}

/// Lock the trip row for the rest of the transaction
async fn lock_gross_profit(
    tx: &mut Transaction<'_, MySql>,
    id: &str,
    user_id: &str,
) -> Result<Option<Decimal>> {
    let gross_profit = sqlx::query_scalar(
        "SELECT gross_profit FROM trips WHERE id = ? AND user_id = ? FOR UPDATE",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(gross_profit)
}

async fn sum_trip_expenses(
    tx: &mut Transaction<'_, MySql>,
    trip_id: &str,
    user_id: &str,
) -> Result<Decimal> {
    let total: Decimal = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE trip_id = ? AND user_id = ?",
    )
    .bind(trip_id)
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;

    Ok(total)
}
