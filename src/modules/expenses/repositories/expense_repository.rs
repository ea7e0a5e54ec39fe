use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySql, MySqlPool, QueryBuilder};

use crate::core::{AppError, DateRange, Result};
use crate::modules::expenses::models::{Expense, ExpenseFilter, ExpenseType, ExpenseTypeTotal};

#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    async fn create(&self, expense: &Expense) -> Result<Expense>;

    async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<Expense>>;

    /// Newest expense date first
    async fn list(&self, user_id: &str, filter: &ExpenseFilter) -> Result<Vec<Expense>>;

    async fn update(&self, expense: &Expense) -> Result<Expense>;

    async fn delete(&self, id: &str, user_id: &str) -> Result<bool>;

    /// Sum of the expenses attached to one trip
    async fn total_for_trip(&self, trip_id: &str, user_id: &str) -> Result<Decimal>;

    /// Sum over all expenses, or those dated inside `range`
    async fn total(&self, user_id: &str, range: Option<&DateRange>) -> Result<Decimal>;

    /// Per-type sums inside `range`; types without expenses are omitted
    async fn totals_by_type(
        &self,
        user_id: &str,
        range: Option<&DateRange>,
    ) -> Result<Vec<ExpenseTypeTotal>>;
}

#[derive(Debug, FromRow)]
struct ExpenseRow {
    id: String,
    user_id: String,
    trip_id: Option<String>,
    description: String,
    amount: Decimal,
    expense_type: String,
    expense_date: NaiveDate,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ExpenseRow> for Expense {
    type Error = AppError;

    fn try_from(row: ExpenseRow) -> Result<Self> {
        Ok(Expense {
            expense_type: row.expense_type.parse().map_err(AppError::internal)?,
            id: row.id,
            user_id: row.user_id,
            trip_id: row.trip_id,
            description: row.description,
            amount: row.amount,
            expense_date: row.expense_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct TypeTotalRow {
    expense_type: String,
    total: Decimal,
}

const EXPENSE_COLUMNS: &str = r#"
    id, user_id, trip_id, description, amount, expense_type, expense_date, notes,
    created_at, updated_at
"#;

fn push_range(qb: &mut QueryBuilder<'_, MySql>, range: Option<&DateRange>) {
    if let Some(range) = range {
        qb.push(" AND expense_date BETWEEN ")
            .push_bind(range.start_date())
            .push(" AND ")
            .push_bind(range.end_date());
    }
}

pub struct MySqlExpenseRepository {
    pool: MySqlPool,
}

impl MySqlExpenseRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpenseRepository for MySqlExpenseRepository {
    async fn create(&self, expense: &Expense) -> Result<Expense> {
        sqlx::query(
            r#"
            INSERT INTO expenses (
                id, user_id, trip_id, description, amount, expense_type, expense_date, notes,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.user_id)
        .bind(&expense.trip_id)
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(expense.expense_type.to_string())
        .bind(expense.expense_date)
        .bind(&expense.notes)
        .bind(expense.created_at)
        .bind(expense.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(expense.clone())
    }

    async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<Expense>> {
        let sql = format!(
            "SELECT {} FROM expenses WHERE id = ? AND user_id = ?",
            EXPENSE_COLUMNS
        );

        let row = sqlx::query_as::<_, ExpenseRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Expense::try_from).transpose()
    }

    async fn list(&self, user_id: &str, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let mut qb: QueryBuilder<MySql> = QueryBuilder::new(format!(
            "SELECT {} FROM expenses WHERE user_id = ",
            EXPENSE_COLUMNS
        ));
        qb.push_bind(user_id.to_string());

        if let Some(trip_id) = &filter.trip_id {
            qb.push(" AND trip_id = ").push_bind(trip_id.clone());
        }
        if let Some(expense_type) = filter.expense_type {
            qb.push(" AND expense_type = ")
                .push_bind(expense_type.to_string());
        }
        if let Some(start_date) = filter.start_date {
            qb.push(" AND expense_date >= ").push_bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            qb.push(" AND expense_date <= ").push_bind(end_date);
        }
        qb.push(" ORDER BY expense_date DESC, created_at DESC");

        let rows = qb
            .build_query_as::<ExpenseRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Expense::try_from).collect()
    }

    async fn update(&self, expense: &Expense) -> Result<Expense> {
        sqlx::query(
            r#"
            UPDATE expenses SET
                trip_id = ?, description = ?, amount = ?, expense_type = ?, expense_date = ?,
                notes = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&expense.trip_id)
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(expense.expense_type.to_string())
        .bind(expense.expense_date)
        .bind(&expense.notes)
        .bind(expense.updated_at)
        .bind(&expense.id)
        .bind(&expense.user_id)
        .execute(&self.pool)
        .await?;

        Ok(expense.clone())
    }

    async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn total_for_trip(&self, trip_id: &str, user_id: &str) -> Result<Decimal> {
        let total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE trip_id = ? AND user_id = ?",
        )
        .bind(trip_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn total(&self, user_id: &str, range: Option<&DateRange>) -> Result<Decimal> {
        let mut qb: QueryBuilder<MySql> =
            QueryBuilder::new("SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE user_id = ");
        qb.push_bind(user_id.to_string());
        push_range(&mut qb, range);

        let total: Decimal = qb.build_query_scalar().fetch_one(&self.pool).await?;

        Ok(total)
    }

    async fn totals_by_type(
        &self,
        user_id: &str,
        range: Option<&DateRange>,
    ) -> Result<Vec<ExpenseTypeTotal>> {
        let mut qb: QueryBuilder<MySql> = QueryBuilder::new(
            "SELECT expense_type, SUM(amount) AS total FROM expenses WHERE user_id = ",
        );
        qb.push_bind(user_id.to_string());
        push_range(&mut qb, range);
        qb.push(" GROUP BY expense_type ORDER BY total DESC");

        let rows = qb
            .build_query_as::<TypeTotalRow>()
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                let expense_type: ExpenseType =
                    row.expense_type.parse().map_err(AppError::internal)?;
                Ok(ExpenseTypeTotal {
                    expense_type,
                    label: expense_type.label(),
                    total: row.total,
                })
            })
            .collect()
    }
}
