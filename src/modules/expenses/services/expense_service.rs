use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::core::period::resolve_range;
use crate::core::{AppError, Result};
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::audit::repositories::record_best_effort;
use crate::modules::audit::{AuditAction, AuditEntity, AuditRepository};
use crate::modules::expenses::models::{
    CreateExpenseRequest, Expense, ExpenseFilter, ExpenseListQuery, UpdateExpenseRequest,
};
use crate::modules::expenses::repositories::ExpenseRepository;
use crate::modules::trips::repositories::TripRepository;
use crate::modules::trips::services::refresh_net_profit;

/// Service for operating expenses.
///
/// Every change to an expense attached to a trip refreshes that trip's
/// stored net profit.
pub struct ExpenseService {
    expense_repo: Arc<dyn ExpenseRepository>,
    trip_repo: Arc<dyn TripRepository>,
    audit_repo: Arc<dyn AuditRepository>,
}

impl ExpenseService {
    pub fn new(
        expense_repo: Arc<dyn ExpenseRepository>,
        trip_repo: Arc<dyn TripRepository>,
        audit_repo: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            expense_repo,
            trip_repo,
            audit_repo,
        }
    }

    async fn ensure_trip(&self, trip_id: &str, user_id: &str) -> Result<()> {
        self.trip_repo
            .find_by_id(trip_id, user_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Trip not found"))
    }

    async fn refresh(&self, trip_id: Option<&str>, user_id: &str) -> Result<()> {
        if let Some(trip_id) = trip_id {
            refresh_net_profit(self.trip_repo.as_ref(), trip_id, user_id).await?;
        }
        Ok(())
    }

    pub async fn create_expense(
        &self,
        user: &AuthenticatedUser,
        mut request: CreateExpenseRequest,
    ) -> Result<Expense> {
        user.ensure_can_write()?;
        request.validate()?;

        request.trip_id = request.trip_id.filter(|id| !id.trim().is_empty());
        if let Some(trip_id) = &request.trip_id {
            self.ensure_trip(trip_id.trim(), &user.user_id).await?;
        }

        let changes = serde_json::to_value(&request)?;
        let expense = Expense::new(&user.user_id, request, Utc::now());
        let created = self.expense_repo.create(&expense).await?;

        info!(
            expense_id = %created.id,
            expense_type = %created.expense_type,
            amount = %created.amount,
            "Expense recorded"
        );

        self.refresh(created.trip_id.as_deref(), &user.user_id)
            .await?;

        record_best_effort(
            self.audit_repo.as_ref(),
            &user.user_id,
            AuditAction::Create,
            AuditEntity::Expense,
            &created.id,
            Some(changes),
        )
        .await;

        Ok(created)
    }

    pub async fn list_expenses(
        &self,
        user: &AuthenticatedUser,
        query: ExpenseListQuery,
        today: NaiveDate,
    ) -> Result<Vec<Expense>> {
        let range = query.period.map(|period| resolve_range(period, today));

        let filter = ExpenseFilter {
            trip_id: query.trip_id.filter(|id| !id.trim().is_empty()),
            expense_type: query.expense_type,
            start_date: range.map(|r| r.start_date()),
            end_date: range.map(|r| r.end_date()),
        };

        self.expense_repo.list(&user.user_id, &filter).await
    }

    pub async fn get_expense(&self, user: &AuthenticatedUser, id: &str) -> Result<Expense> {
        self.expense_repo
            .find_by_id(id, &user.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Expense not found"))
    }

    /// Moving an expense between trips refreshes both of them
    pub async fn update_expense(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        request: UpdateExpenseRequest,
    ) -> Result<Expense> {
        user.ensure_can_write()?;
        request.validate()?;

        let mut expense = self.get_expense(user, id).await?;
        let previous_trip = expense.trip_id.clone();

        if let Some(target) = request.target_trip_id(previous_trip.as_deref()) {
            if previous_trip.as_deref() != Some(target.as_str()) {
                self.ensure_trip(&target, &user.user_id).await?;
            }
        }

        let changes = serde_json::to_value(&request)?;
        request.apply_to(&mut expense, Utc::now());
        let updated = self.expense_repo.update(&expense).await?;

        self.refresh(updated.trip_id.as_deref(), &user.user_id)
            .await?;
        if previous_trip != updated.trip_id {
            self.refresh(previous_trip.as_deref(), &user.user_id)
                .await?;
        }

        record_best_effort(
            self.audit_repo.as_ref(),
            &user.user_id,
            AuditAction::Update,
            AuditEntity::Expense,
            &updated.id,
            Some(changes),
        )
        .await;

        Ok(updated)
    }

    pub async fn delete_expense(&self, user: &AuthenticatedUser, id: &str) -> Result<()> {
        user.ensure_can_write()?;

        let expense = self.get_expense(user, id).await?;

        if !self.expense_repo.delete(&expense.id, &user.user_id).await? {
            return Err(AppError::not_found("Expense not found"));
        }

        info!(expense_id = %expense.id, "Expense deleted");

        self.refresh(expense.trip_id.as_deref(), &user.user_id)
            .await?;

        record_best_effort(
            self.audit_repo.as_ref(),
            &user.user_id,
            AuditAction::Delete,
            AuditEntity::Expense,
            &expense.id,
            None,
        )
        .await;

        Ok(())
    }
}
